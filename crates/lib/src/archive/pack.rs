//! Producing thin packages.

use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::consts::METADATA_ENTRY_NAME;
use crate::util::hash::hash_file;

use super::extract::safe_relative_path;
use super::{ArchiveError, ArchiveItem, ArchiveMetadata};

/// How the packer decides that two sources can share one stored entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryIdentity {
  /// Sources with identical bytes (SHA-256) share an entry.
  #[default]
  Content,
  /// Only the same source file (after canonicalization) shares an entry.
  SourcePath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PackEntry {
  source: PathBuf,
  destination: String,
}

/// What a finished pack wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSummary {
  pub archive: PathBuf,
  pub stored_entries: usize,
  pub destination_files: usize,
}

/// Collects source files and writes them as a thin package.
#[derive(Debug, Default)]
pub struct Packer {
  identity: EntryIdentity,
  entries: Vec<PackEntry>,
}

impl Packer {
  pub fn new(identity: EntryIdentity) -> Self {
    Self {
      identity,
      entries: Vec::new(),
    }
  }

  /// Install `source` at `destination` (relative, `/` or `\` separated).
  pub fn add_file(&mut self, source: impl Into<PathBuf>, destination: impl Into<String>) -> &mut Self {
    self.entries.push(PackEntry {
      source: source.into(),
      destination: destination.into(),
    });
    self
  }

  /// Add every file under `dir`, placed below `destination_prefix`.
  ///
  /// Files are visited in file-name order so the resulting archive is deterministic.
  pub fn add_directory(&mut self, dir: &Path, destination_prefix: &str) -> Result<&mut Self, ArchiveError> {
    for entry in WalkDir::new(dir).sort_by_file_name() {
      let entry = entry?;
      if !entry.file_type().is_file() {
        continue;
      }

      let relative = entry
        .path()
        .strip_prefix(dir)
        .unwrap_or(entry.path())
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");

      let destination = match destination_prefix.trim_matches(['/', '\\']) {
        "" => relative,
        prefix => format!("{prefix}/{relative}"),
      };

      self.add_file(entry.path(), destination);
    }
    Ok(self)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Compute the metadata, plus the source file for each stored entry.
  ///
  /// A stored entry is named after the first destination that introduced it.
  pub fn plan(&self) -> Result<(ArchiveMetadata, Vec<PathBuf>), ArchiveError> {
    let mut destinations = HashSet::new();
    let mut by_identity: HashMap<String, usize> = HashMap::new();
    let mut items: Vec<ArchiveItem> = Vec::new();
    let mut sources = Vec::new();

    for entry in &self.entries {
      let destination = portable_destination(&entry.destination)?;
      if !destinations.insert(destination.clone()) {
        return Err(ArchiveError::DuplicateDestination(destination));
      }

      let key = match self.identity {
        EntryIdentity::Content => hash_file(&entry.source)?.0,
        EntryIdentity::SourcePath => dunce::canonicalize(&entry.source)?.display().to_string(),
      };

      match by_identity.get(&key) {
        Some(&index) => items[index].destination_files.push(destination),
        None => {
          by_identity.insert(key, items.len());
          items.push(ArchiveItem {
            file_name: destination.clone(),
            destination_files: vec![destination],
          });
          sources.push(entry.source.clone());
        }
      }
    }

    Ok((ArchiveMetadata { items }, sources))
  }

  /// Write the package to `archive_path`, replacing any existing file.
  pub fn write(&self, archive_path: &Path) -> Result<PackSummary, ArchiveError> {
    let (metadata, sources) = self.plan()?;

    if let Some(parent) = archive_path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent)?;
    }

    let file = File::create(archive_path).map_err(|source| ArchiveError::Open {
      path: archive_path.to_path_buf(),
      source,
    })?;

    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (item, source) in metadata.items.iter().zip(&sources) {
      debug!(entry = %item.file_name, destinations = item.destination_files.len(), "storing entry");
      writer.start_file(item.file_name.as_str(), with_source_mode(options, source)?)?;
      let mut input = File::open(source)?;
      io::copy(&mut input, &mut writer)?;
    }

    writer.start_file(METADATA_ENTRY_NAME, options)?;
    metadata.to_writer(&mut writer)?;
    writer.finish()?.flush()?;

    let summary = PackSummary {
      archive: archive_path.to_path_buf(),
      stored_entries: metadata.items.len(),
      destination_files: metadata.destination_count(),
    };

    info!(
      archive = ?summary.archive,
      stored = summary.stored_entries,
      destinations = summary.destination_files,
      "package written"
    );

    Ok(summary)
  }
}

/// Normalize a destination to `/` separators and reject anything that is not
/// a plain relative path.
fn portable_destination(destination: &str) -> Result<String, ArchiveError> {
  let portable = destination.replace('\\', "/");
  let relative = safe_relative_path(&portable)?;
  let normalized = relative
    .components()
    .map(|c| c.as_os_str().to_string_lossy().into_owned())
    .collect::<Vec<_>>()
    .join("/");

  if normalized == METADATA_ENTRY_NAME {
    return Err(ArchiveError::Metadata(format!(
      "destination '{normalized}' collides with the reserved metadata entry"
    )));
  }
  Ok(normalized)
}

#[cfg(unix)]
fn with_source_mode(options: SimpleFileOptions, source: &Path) -> Result<SimpleFileOptions, ArchiveError> {
  use std::os::unix::fs::PermissionsExt;
  let mode = fs::metadata(source)?.permissions().mode();
  Ok(options.unix_permissions(mode & 0o777))
}

#[cfg(not(unix))]
fn with_source_mode(options: SimpleFileOptions, _source: &Path) -> Result<SimpleFileOptions, ArchiveError> {
  Ok(options)
}
