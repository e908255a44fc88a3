//! Content-addressed blob storage
//!
//! This module implements the core storage layer. Entries are stored
//! verbatim under their SHA-1 digest in a sharded directory tree, and
//! published by atomic rename so concurrent writers never corrupt a
//! readable entry.

mod blob_store;
mod fsutil;
mod hasher;
mod reader;
mod writer;

pub use blob_store::BlobStore;
pub use fsutil::{publish, random_token};
pub use hasher::compute_file_hash;
