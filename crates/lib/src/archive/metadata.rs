//! The metadata record stored inside a thin package.

use std::collections::HashSet;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use super::ArchiveError;

/// One stored entry and every path it expands to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveItem {
  #[serde(alias = "FileName")]
  pub file_name: String,

  #[serde(alias = "DestinationFiles")]
  pub destination_files: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveMetadata {
  #[serde(default, alias = "Items")]
  pub items: Vec<ArchiveItem>,
}

impl ArchiveMetadata {
  /// The item whose stored entry is `file_name`.
  pub fn find(&self, file_name: &str) -> Option<&ArchiveItem> {
    self.items.iter().find(|i| i.file_name == file_name)
  }

  /// Check that every item has a destination and stored names are unique.
  pub fn validate(&self) -> Result<(), ArchiveError> {
    let mut seen = HashSet::new();
    for item in &self.items {
      if item.destination_files.is_empty() {
        return Err(ArchiveError::Metadata(format!(
          "entry '{}' has no destination files",
          item.file_name
        )));
      }
      if !seen.insert(item.file_name.as_str()) {
        return Err(ArchiveError::Metadata(format!(
          "entry '{}' is listed more than once",
          item.file_name
        )));
      }
    }
    Ok(())
  }

  /// Total number of destination files across all items.
  pub fn destination_count(&self) -> usize {
    self.items.iter().map(|i| i.destination_files.len()).sum()
  }

  pub fn from_reader(reader: impl Read) -> Result<Self, ArchiveError> {
    let metadata: Self =
      serde_json::from_reader(reader).map_err(|e| ArchiveError::Metadata(e.to_string()))?;
    metadata.validate()?;
    Ok(metadata)
  }

  pub fn to_writer(&self, writer: impl Write) -> Result<(), ArchiveError> {
    serde_json::to_writer_pretty(writer, self).map_err(|e| ArchiveError::Metadata(e.to_string()))
  }
}
