//! Content hashing for archive entry deduplication.

use std::fs;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

/// A full 64-character SHA256 hash of some content.
///
/// Two files with the same `ContentHash` share a single stored entry when
/// packed with content identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(pub String);

/// Error while hashing a file.
#[derive(Debug, thiserror::Error)]
#[error("failed to read file {path}: {message}")]
pub struct HashError {
  pub path: String,
  pub message: String,
}

/// Hash a file's contents.
///
/// Returns the full 64-character SHA256 hash of the file.
pub fn hash_file(path: &Path) -> Result<ContentHash, HashError> {
  let read_error = |e: std::io::Error| HashError {
    path: path.display().to_string(),
    message: e.to_string(),
  };

  let mut file = fs::File::open(path).map_err(read_error)?;
  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];

  loop {
    let bytes_read = file.read(&mut buffer).map_err(read_error)?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(ContentHash(hex::encode(hasher.finalize())))
}
