//! The store handle and digest-to-path derivation

use crate::model::{Digest, HashAlgorithm};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A local content-addressed blob store rooted at a directory
///
/// All entries live under `<root>/<algorithm>/` in a three-level sharded
/// tree keyed by the first six hex characters of the digest, bounding the
/// number of entries per directory for large stores.
///
/// The handle holds no open files and no in-process locks; any number of
/// `BlobStore` values (in any number of processes) may operate on the
/// same root concurrently. Coordination happens entirely through
/// filesystem rename atomicity and content-addressing idempotence.
pub struct BlobStore {
    root: PathBuf,
    algorithm: HashAlgorithm,
}

impl BlobStore {
    /// Create a store handle rooted at the given directory
    ///
    /// Performs no IO: directories are created on demand by writes, and
    /// readers never require the root to exist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        BlobStore {
            root: root.into(),
            algorithm: HashAlgorithm::Sha1,
        }
    }

    /// The store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The hash algorithm naming this store's subtree
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Parse a digest string for this store's algorithm
    pub fn parse_digest(&self, s: &str) -> Result<Digest> {
        Digest::parse(s, self.algorithm)
    }

    /// The canonical path of the entry for a digest
    ///
    /// Pure derivation; neither the entry nor its directories need exist.
    pub fn entry_path(&self, digest: &Digest) -> PathBuf {
        self.shard_dir(digest).join(digest.as_str())
    }

    /// The canonical path of the entry, creating the sharding directories
    ///
    /// Creation is idempotent: losing a creation race to another process
    /// is success as long as the directory exists afterwards.
    pub fn ensure_entry_path(&self, digest: &Digest) -> Result<PathBuf> {
        let dir = self.shard_dir(digest);
        if !dir.exists() {
            if fs::create_dir_all(&dir).is_err() && !dir.exists() {
                return Err(Error::DirectoryCreation(dir));
            }
        }
        Ok(dir.join(digest.as_str()))
    }

    /// Sharding directory for a digest: `<root>/sha1/<d0d1>/<d2d3>/<d4d5>`
    fn shard_dir(&self, digest: &Digest) -> PathBuf {
        let hex = digest.as_str();
        self.root
            .join(self.algorithm.name())
            .join(&hex[0..2])
            .join(&hex[2..4])
            .join(&hex[4..6])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const HELLO_SHA1: &str = "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed";

    #[test]
    fn test_entry_path_layout() {
        let store = BlobStore::new("/data/casket");
        let digest = store.parse_digest(HELLO_SHA1).unwrap();

        assert_eq!(
            store.entry_path(&digest),
            PathBuf::from(format!("/data/casket/sha1/2a/ae/6c/{}", HELLO_SHA1))
        );
    }

    #[test]
    fn test_entry_path_does_not_create() {
        let dir = tempdir().unwrap();
        let store = BlobStore::new(dir.path());
        let digest = store.parse_digest(HELLO_SHA1).unwrap();

        let path = store.entry_path(&digest);
        assert!(!path.parent().unwrap().exists());
    }

    #[test]
    fn test_ensure_entry_path_creates_shards() {
        let dir = tempdir().unwrap();
        let store = BlobStore::new(dir.path());
        let digest = store.parse_digest(HELLO_SHA1).unwrap();

        let path = store.ensure_entry_path(&digest).unwrap();
        assert!(path.parent().unwrap().is_dir());
        assert_eq!(path, store.entry_path(&digest));

        // idempotent
        let again = store.ensure_entry_path(&digest).unwrap();
        assert_eq!(path, again);
    }
}
