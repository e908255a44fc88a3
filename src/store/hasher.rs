//! Streaming file hashing and the store-entry resolver shortcut

use crate::model::{Digest, HashAlgorithm};
use crate::store::BlobStore;
use crate::Result;
use sha1::{Digest as _, Sha1};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Block size for streaming digest computation
const HASH_BLOCK_SIZE: usize = 64 * 1024;

/// Files under this size are always hashed directly by the resolver;
/// computing the hash is cheap relative to a filesystem-metadata round
/// trip when the store root sits on a remote filesystem.
const DIRECT_HASH_LIMIT: u64 = 100_000;

/// Files above this size get a progress notice before hashing
const LARGE_FILE_NOTICE: u64 = 100 * 1024 * 1024;

/// Compute the content digest of a file, streaming in fixed-size blocks
///
/// Returns `None` if the path does not exist. Memory use is bounded
/// independent of file size.
pub fn compute_file_hash(path: &Path, algorithm: HashAlgorithm) -> Result<Option<Digest>> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(_) => return Ok(None),
    };
    if meta.len() > LARGE_FILE_NOTICE {
        info!(algorithm = %algorithm, path = %path.display(), "computing hash of large file");
    }

    match algorithm {
        HashAlgorithm::Sha1 => {
            let mut hasher = Sha1::new();
            let mut file = File::open(path)?;
            let mut buf = [0u8; HASH_BLOCK_SIZE];
            loop {
                let n = file.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                hasher.update(&buf[..n]);
            }
            let hex = hex::encode(hasher.finalize());
            Ok(Some(Digest::from_hex_unchecked(hex)))
        }
    }
}

impl BlobStore {
    /// Resolve the digest of a file, short-circuiting for store entries
    ///
    /// A large file whose name is itself a syntactically valid digest,
    /// and whose canonical store path for that digest resolves to the
    /// same absolute path, is provably an entry named by its own hash:
    /// the candidate digest is returned without reading file contents.
    /// This is sound only because entries are immutable once published.
    ///
    /// With `cache_only`, returns `None` instead of falling through to a
    /// full hash. Small files are always hashed directly. Returns `None`
    /// if the path does not exist.
    pub fn resolve_file_hash(&self, path: &Path, cache_only: bool) -> Result<Option<Digest>> {
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(_) => return Ok(None),
        };
        if meta.len() < DIRECT_HASH_LIMIT {
            return compute_file_hash(path, self.algorithm());
        }

        let abs = std::path::absolute(path)?;
        if let Some(name) = abs.file_name().and_then(|n| n.to_str()) {
            if let Ok(candidate) = self.parse_digest(name) {
                let entry = std::path::absolute(self.entry_path(&candidate))?;
                if entry == abs {
                    return Ok(Some(candidate));
                }
            }
        }

        if cache_only {
            return Ok(None);
        }
        compute_file_hash(path, self.algorithm())
    }
}
