//! Filesystem helpers: race-tolerant rename and temp-name tokens

use crate::{Error, Result};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fs;
use std::path::Path;

/// Atomically publish a file at its final name
///
/// No-op when source and destination resolve to the same absolute path.
/// If the destination already exists it is left untouched and the call
/// succeeds without renaming ("already present" is the desired end
/// state), unless `remove_if_exists` is set, in which case it is removed
/// first — best-effort, since another process may have removed it
/// already.
///
/// A failed rename with the destination now present is also success when
/// `remove_if_exists` is false. The destination's bytes are trusted to
/// match its name; content-addressing immutability is the only guarantee
/// relied on here, the contents are not re-verified.
pub fn publish(from: &Path, to: &Path, remove_if_exists: bool) -> Result<()> {
    if std::path::absolute(from)? == std::path::absolute(to)? {
        return Ok(());
    }
    if to.exists() {
        if remove_if_exists {
            // maybe it was removed by someone else
            let _ = fs::remove_file(to);
        } else {
            return Ok(());
        }
    }
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) if !remove_if_exists && to.exists() => Ok(()),
        Err(source) => Err(Error::Publish {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }),
    }
}

/// Random alphanumeric token for temporary file names
pub fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
