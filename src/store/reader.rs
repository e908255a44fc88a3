//! Lookups and byte-range reads of store entries

use crate::model::Digest;
use crate::store::BlobStore;
use crate::{Error, Result};
use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

/// Chunk size when streaming a range to an output sink
const STREAM_BLOCK_SIZE: usize = 4096;

impl BlobStore {
    /// Path of the entry for a digest, if one exists
    ///
    /// Pure existence check plus path derivation; creates nothing.
    pub fn load_file_path(&self, digest: &Digest) -> Option<PathBuf> {
        let path = self.entry_path(digest);
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Read the half-open byte range `[start, end)` of an entry
    ///
    /// `start` and `end` default to the whole file. Returns `None` when
    /// no entry exists for the digest. An empty range yields an empty
    /// vector without opening the file.
    pub fn load_bytes(
        &self,
        digest: &Digest,
        start: Option<u64>,
        end: Option<u64>,
    ) -> Result<Option<Vec<u8>>> {
        let path = match self.load_file_path(digest) {
            Some(path) => path,
            None => return Ok(None),
        };
        let size = fs::metadata(&path)?.len();
        let (start, end) = validate_range(start, end, size)?;
        if start == end {
            return Ok(Some(Vec::new()));
        }

        let mut file = File::open(&path)?;
        file.seek(SeekFrom::Start(start))?;
        let mut buf = vec![0u8; (end - start) as usize];
        file.read_exact(&mut buf)?;
        Ok(Some(buf))
    }

    /// Stream the half-open byte range `[start, end)` to an output sink
    ///
    /// Same resolution and validation as
    /// [`load_bytes`](BlobStore::load_bytes), but the range is written to
    /// `out` in 4 KiB chunks, bounding memory use for large ranges.
    /// Returns the number of bytes written, or `None` when no entry
    /// exists for the digest.
    pub fn stream_bytes(
        &self,
        digest: &Digest,
        start: Option<u64>,
        end: Option<u64>,
        out: &mut dyn Write,
    ) -> Result<Option<u64>> {
        let path = match self.load_file_path(digest) {
            Some(path) => path,
            None => return Ok(None),
        };
        let size = fs::metadata(&path)?.len();
        let (start, end) = validate_range(start, end, size)?;
        if start == end {
            return Ok(Some(0));
        }

        let mut file = File::open(&path)?;
        file.seek(SeekFrom::Start(start))?;
        let mut buf = [0u8; STREAM_BLOCK_SIZE];
        let mut remaining = end - start;
        while remaining > 0 {
            let n = remaining.min(STREAM_BLOCK_SIZE as u64) as usize;
            file.read_exact(&mut buf[..n])?;
            out.write_all(&buf[..n])?;
            remaining -= n as u64;
        }
        out.flush()?;
        Ok(Some(end - start))
    }
}

/// Validate `[start, end)` against the file size, applying defaults
fn validate_range(start: Option<u64>, end: Option<u64>, size: u64) -> Result<(u64, u64)> {
    let start = start.unwrap_or(0);
    let end = end.unwrap_or(size);
    if start > size || end < start || end > size {
        return Err(Error::InvalidRange { start, end, size });
    }
    Ok((start, end))
}
