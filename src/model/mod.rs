//! Core data model types for casket

mod digest;

pub use digest::{Digest, HashAlgorithm};
