//! # casket
//!
//! A local content-addressed blob store.
//!
//! Files are stored and retrieved solely by the SHA-1 hash of their
//! contents, under a sharded directory layout on a local or
//! network-mounted filesystem:
//!
//! ```text
//! <root>/sha1/2a/ae/6c/2aae6c35c94fcfb415dbe95f408b9ce91ee846ed
//! ```
//!
//! ## Core Concepts
//!
//! - **Digest**: a 40-character lowercase hex SHA-1 identifying content
//! - **Store Entry**: an immutable file at its digest-derived path
//! - **Publish**: the atomic rename that makes a temporary file visible
//!   at its canonical name
//!
//! Entries are never mutated in place: once a path exists under its
//! digest name, its bytes are final. Concurrent publishers of the same
//! content race harmlessly — each writes its own uniquely-named
//! temporary file, and the rename step is the sole serialization point.
//!
//! ## Example
//!
//! ```ignore
//! use casket::BlobStore;
//!
//! let store = BlobStore::new("/var/lib/casket");
//! let (path, digest) = store.store_file("data.bin".as_ref(), false, None)?;
//! let bytes = store.load_bytes(&digest, None, None)?;
//! ```

pub mod model;
pub mod store;

mod error;

pub use error::{Error, Result};
pub use model::{Digest, HashAlgorithm};
pub use store::{compute_file_hash, publish, random_token, BlobStore};
