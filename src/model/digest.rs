//! Content-addressed digest type and hash algorithm tag

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The hash algorithm naming a store subtree.
///
/// The store is fixed on SHA-1; the enum keeps the path-derivation
/// contract open to future algorithms without changing its shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA-1, 40 hex characters
    Sha1,
}

impl HashAlgorithm {
    /// Directory name of this algorithm's subtree under the store root
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
        }
    }

    /// Length of a hex digest for this algorithm
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 40,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed-length lowercase hex digest identifying file contents
///
/// `digest(content)` is a pure function of the byte sequence; two files
/// with the same digest are treated as the same entry.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(String);

impl Digest {
    /// Parse and validate a digest string for the given algorithm
    ///
    /// Accepts exactly `algorithm.hex_len()` lowercase hex characters.
    pub fn parse(s: &str, algorithm: HashAlgorithm) -> Result<Self> {
        if s.len() != algorithm.hex_len() {
            return Err(Error::InvalidHash(s.to_string()));
        }
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(Error::InvalidHash(s.to_string()));
        }
        Ok(Digest(s.to_string()))
    }

    /// The digest as a hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get a short prefix for display (first 7 chars, like git)
    pub fn short(&self) -> String {
        self.0[..7].to_string()
    }

    pub(crate) fn from_hex_unchecked(hex: String) -> Self {
        Digest(hex)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short())
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
