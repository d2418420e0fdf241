//! Expanding thin packages.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::consts::METADATA_ENTRY_NAME;
use crate::platform::{is_directory_marker, normalize_separators};
use crate::platform::os::Os;

use super::{ArchiveError, ArchiveMetadata};

/// What an extraction did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
  /// Files written, in the order they were written.
  pub written: Vec<PathBuf>,
  /// Stored entries that the metadata does not mention. These are skipped.
  pub unmatched_entries: Vec<String>,
  /// Metadata items whose stored entry is absent from the archive.
  pub missing_entries: Vec<String>,
  pub had_metadata: bool,
}

/// Extract `archive_path` below `output_root`, expanding entries through the
/// archive's metadata when it has one.
///
/// Destination separators are normalized for `os`. Existing files are
/// overwritten; directory entries are implied by the files below them.
pub fn extract_archive(archive_path: &Path, output_root: &Path, os: Os) -> Result<ExtractSummary, ArchiveError> {
  let file = File::open(archive_path).map_err(|source| ArchiveError::Open {
    path: archive_path.to_path_buf(),
    source,
  })?;
  let mut archive = ZipArchive::new(BufReader::new(file))?;
  let metadata = read_metadata(&mut archive)?;

  fs::create_dir_all(output_root)?;

  let names = (0..archive.len())
    .map(|index| archive.by_index_raw(index).map(|entry| entry.name().to_string()))
    .collect::<Result<Vec<_>, _>>()?;

  let mut summary = ExtractSummary {
    had_metadata: metadata.is_some(),
    ..Default::default()
  };
  let mut present = HashSet::new();

  for (index, name) in names.iter().enumerate() {
    if is_directory_marker(name) {
      continue;
    }
    present.insert(name.as_str());

    let destinations = match &metadata {
      None => vec![name.clone()],
      Some(_) if name == METADATA_ENTRY_NAME => continue,
      Some(metadata) => match metadata.find(name) {
        Some(item) => item.destination_files.clone(),
        None => {
          info!(entry = %name, "entry has no metadata, skipping");
          summary.unmatched_entries.push(name.clone());
          continue;
        }
      },
    };

    for destination in &destinations {
      let relative = safe_relative_path(&normalize_separators(destination, os))?;
      let target = output_root.join(relative);

      let mut entry = archive.by_index(index)?;
      let mode = entry.unix_mode();
      write_atomically(&mut entry, &target, mode)?;

      debug!(entry = %name, path = ?target, "inflated");
      summary.written.push(target);
    }
  }

  if let Some(metadata) = &metadata {
    for item in &metadata.items {
      if !present.contains(item.file_name.as_str()) {
        warn!(entry = %item.file_name, "metadata lists an entry the archive does not contain");
        summary.missing_entries.push(item.file_name.clone());
      }
    }
  }

  info!(
    archive = ?archive_path,
    written = summary.written.len(),
    skipped = summary.unmatched_entries.len(),
    "archive extracted"
  );

  Ok(summary)
}

fn read_metadata<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Option<ArchiveMetadata>, ArchiveError> {
  match archive.by_name(METADATA_ENTRY_NAME) {
    Ok(entry) => ArchiveMetadata::from_reader(entry).map(Some),
    Err(ZipError::FileNotFound) => Ok(None),
    Err(e) => Err(e.into()),
  }
}

/// Resolve a destination into a relative path that cannot leave the output root.
pub(crate) fn safe_relative_path(path: &str) -> Result<PathBuf, ArchiveError> {
  let mut relative = PathBuf::new();
  for component in Path::new(path).components() {
    match component {
      Component::Normal(part) => relative.push(part),
      Component::CurDir => {}
      Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
        return Err(ArchiveError::UnsafePath(path.to_string()));
      }
    }
  }

  if relative.as_os_str().is_empty() {
    return Err(ArchiveError::UnsafePath(path.to_string()));
  }
  Ok(relative)
}

/// Write through a temp file in the target directory, then rename over the target.
fn write_atomically(reader: &mut impl Read, target: &Path, mode: Option<u32>) -> Result<(), ArchiveError> {
  let parent = match target.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  fs::create_dir_all(parent)?;

  let mut temp = NamedTempFile::new_in(parent)?;
  io::copy(reader, &mut temp)?;
  temp.persist(target).map_err(|e| ArchiveError::Io(e.error))?;

  apply_mode(target, mode)?;
  Ok(())
}

#[cfg(unix)]
fn apply_mode(target: &Path, mode: Option<u32>) -> Result<(), ArchiveError> {
  use std::os::unix::fs::PermissionsExt;
  if let Some(mode) = mode
    && mode & 0o777 != 0
  {
    fs::set_permissions(target, fs::Permissions::from_mode(mode & 0o777))?;
  }
  Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_target: &Path, _mode: Option<u32>) -> Result<(), ArchiveError> {
  Ok(())
}
