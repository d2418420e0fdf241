//! Thin package archives.
//!
//! A package is a zip file in which one stored entry may expand into several
//! destination files. The mapping lives in a reserved JSON entry
//! ([`crate::consts::METADATA_ENTRY_NAME`]):
//!
//! ```json
//! { "items": [ { "fileName": "bin/core.dll", "destinationFiles": ["a/core.dll", "b/core.dll"] } ] }
//! ```
//!
//! An archive without that entry extracts 1:1.

pub mod extract;
pub mod metadata;
pub mod pack;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::util::hash::HashError;

pub use extract::{ExtractSummary, extract_archive};
pub use metadata::{ArchiveItem, ArchiveMetadata};
pub use pack::{EntryIdentity, PackSummary, Packer};

#[derive(Debug, Error)]
pub enum ArchiveError {
  /// The archive file could not be opened or created.
  #[error("failed to open archive {path}: {source}")]
  Open {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The file is not a readable zip archive, or an entry could not be read.
  #[error("zip error: {0}")]
  Zip(#[from] zip::result::ZipError),

  /// The metadata entry is malformed or violates its invariants.
  #[error("invalid archive metadata: {0}")]
  Metadata(String),

  /// A destination path would escape the output root.
  #[error("unsafe destination path: {0}")]
  UnsafePath(String),

  /// Two sources were packed to the same destination.
  #[error("duplicate destination path: {0}")]
  DuplicateDestination(String),

  /// A source file could not be hashed.
  #[error(transparent)]
  Hash(#[from] HashError),

  #[error("walk error: {0}")]
  Walk(#[from] walkdir::Error),

  #[error("io error: {0}")]
  Io(#[from] io::Error),
}
