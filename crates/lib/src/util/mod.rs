//! Shared utilities.
//!
//! Content hashing used by the archive packer, plus test helpers.

pub mod hash;

#[cfg(test)]
pub mod testutil;
