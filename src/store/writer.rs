//! Publishing external files into the store

use crate::model::Digest;
use crate::store::fsutil::{publish, random_token};
use crate::store::BlobStore;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Length of the random suffix on temporary file names
const TEMP_TOKEN_LEN: usize = 6;

impl BlobStore {
    /// Store a file under its content digest, returning the final path
    ///
    /// A caller-supplied `known_hash` is trusted without verification;
    /// otherwise the digest is resolved via
    /// [`resolve_file_hash`](BlobStore::resolve_file_hash).
    ///
    /// When no entry exists at the derived path, the source is duplicated
    /// into a uniquely-named temporary file in the target directory — a
    /// hard link when `use_hard_link` is set (same-filesystem only, no
    /// extra disk space), a byte copy otherwise — and atomically renamed
    /// into place. An existing entry short-circuits: content-addressing
    /// guarantees its bytes are equivalent.
    ///
    /// Concurrent publishers of the same content race harmlessly; each
    /// writes its own temporary file and the rename is the sole
    /// serialization point.
    pub fn store_file(
        &self,
        source: &Path,
        use_hard_link: bool,
        known_hash: Option<Digest>,
    ) -> Result<(PathBuf, Digest)> {
        let digest = match known_hash {
            Some(digest) => digest,
            None => self
                .resolve_file_hash(source, false)?
                .ok_or_else(|| Error::SourceNotFound(source.to_path_buf()))?,
        };

        let target = self.ensure_entry_path(&digest)?;
        if target.exists() {
            debug!(digest = %digest, "entry already present");
            return Ok((target, digest));
        }

        let tmp = temp_sibling(&target);
        if use_hard_link {
            fs::hard_link(source, &tmp)?;
        } else {
            fs::copy(source, &tmp)?;
        }
        publish(&tmp, &target, false)?;
        // lost the race: publish left our temporary in place
        let _ = fs::remove_file(&tmp);

        debug!(digest = %digest, path = %target.display(), "stored blob");
        Ok((target, digest))
    }
}

/// Temporary name next to the target: `<final-path>.copying.<token>`
fn temp_sibling(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(format!(".copying.{}", random_token(TEMP_TOKEN_LEN)));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const HELLO_SHA1: &str = "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed";

    fn write_file(path: &Path, data: &[u8]) {
        let mut f = File::create(path).unwrap();
        f.write_all(data).unwrap();
    }

    #[test]
    fn test_store_places_entry_at_derived_path() {
        let dir = tempdir().unwrap();
        let store = BlobStore::new(dir.path().join("store"));
        let source = dir.path().join("source.txt");
        write_file(&source, b"hello world");

        let (path, digest) = store.store_file(&source, false, None).unwrap();
        assert_eq!(digest.as_str(), HELLO_SHA1);
        assert_eq!(path, store.entry_path(&digest));
        assert_eq!(fs::read(&path).unwrap(), b"hello world");
        // source untouched
        assert!(source.exists());
    }

    #[test]
    fn test_store_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = BlobStore::new(dir.path().join("store"));
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        write_file(&a, b"same content");
        write_file(&b, b"same content");

        let (path1, digest1) = store.store_file(&a, false, None).unwrap();
        let (path2, digest2) = store.store_file(&b, false, None).unwrap();
        assert_eq!(digest1, digest2);
        assert_eq!(path1, path2);

        // exactly one entry, no leftover temporaries
        let shard = path1.parent().unwrap();
        let entries: Vec<_> = fs::read_dir(shard).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_store_with_hard_link_shares_inode() {
        use std::os::unix::fs::MetadataExt;

        let dir = tempdir().unwrap();
        let store = BlobStore::new(dir.path().join("store"));
        let source = dir.path().join("source.bin");
        write_file(&source, b"linked content");

        let (path, _) = store.store_file(&source, true, None).unwrap();
        let m1 = fs::metadata(&source).unwrap();
        let m2 = fs::metadata(&path).unwrap();
        assert_eq!(m1.ino(), m2.ino());
        assert_eq!(m1.dev(), m2.dev());
    }

    #[test]
    fn test_known_hash_is_trusted() {
        let dir = tempdir().unwrap();
        let store = BlobStore::new(dir.path().join("store"));
        let source = dir.path().join("source.txt");
        write_file(&source, b"whatever");

        let claimed = store
            .parse_digest("0000000000000000000000000000000000000000")
            .unwrap();
        let (path, digest) = store
            .store_file(&source, false, Some(claimed.clone()))
            .unwrap();
        assert_eq!(digest, claimed);
        assert_eq!(path, store.entry_path(&claimed));
        assert!(path.exists());
    }

    #[test]
    fn test_missing_source_fails() {
        let dir = tempdir().unwrap();
        let store = BlobStore::new(dir.path().join("store"));
        let missing = dir.path().join("nope");

        let err = store.store_file(&missing, false, None).unwrap_err();
        assert!(matches!(err, Error::SourceNotFound(_)));
    }

    #[test]
    fn test_existing_entry_short_circuits() {
        let dir = tempdir().unwrap();
        let store = BlobStore::new(dir.path().join("store"));
        let source = dir.path().join("source.txt");
        write_file(&source, b"hello world");

        let (path, digest) = store.store_file(&source, false, None).unwrap();
        let before = fs::metadata(&path).unwrap().modified().unwrap();

        // second store of identical content must not rewrite the entry
        let (path2, _) = store.store_file(&source, false, Some(digest)).unwrap();
        assert_eq!(path, path2);
        let after = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }
}
