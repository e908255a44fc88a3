//! Error types for casket

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for casket operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in casket operations
///
/// Lookups of digests with no corresponding store entry are not errors;
/// they surface as `None` from the read operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Invalid byte range {start}..{end} for file of size {size}")]
    InvalidRange { start: u64, end: u64, size: u64 },

    #[error("Unable to create directory: {}", .0.display())]
    DirectoryCreation(PathBuf),

    #[error("Problem renaming file: {} -> {}", from.display(), to.display())]
    Publish {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
