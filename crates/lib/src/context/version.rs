//! Four-field build versions (`major.minor.build.revision`).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a string is not a valid build version.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid build version '{input}': {reason}")]
pub struct VersionParseError {
  pub input: String,
  pub reason: String,
}

/// A build version with two to four numeric fields.
///
/// Fields that were not specified compare and render as absent, so `1.2`
/// displays as `1.2` rather than `1.2.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildVersion {
  fields: [u32; 4],
  len: usize,
}

impl BuildVersion {
  /// Create a full four-field version.
  pub fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
    Self {
      fields: [major, minor, build, revision],
      len: 4,
    }
  }

  pub fn major(&self) -> u32 {
    self.fields[0]
  }

  pub fn minor(&self) -> u32 {
    self.fields[1]
  }

  pub fn build(&self) -> u32 {
    self.fields[2]
  }

  pub fn revision(&self) -> u32 {
    self.fields[3]
  }

  /// Number of fields the version was declared with.
  pub fn field_count(&self) -> usize {
    self.len
  }

  /// Render the first `count` fields, clamped to `1..=4`.
  ///
  /// Fields beyond the declared ones render as `0`.
  pub fn to_string_fields(&self, count: usize) -> String {
    let count = count.clamp(1, 4);
    self.fields[..count]
      .iter()
      .map(u32::to_string)
      .collect::<Vec<_>>()
      .join(".")
  }
}

impl fmt::Display for BuildVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_string_fields(self.len))
  }
}

impl FromStr for BuildVersion {
  type Err = VersionParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let error = |reason: &str| VersionParseError {
      input: s.to_string(),
      reason: reason.to_string(),
    };

    let parts: Vec<&str> = s.trim().split('.').collect();
    if !(2..=4).contains(&parts.len()) {
      return Err(error("expected 2 to 4 dot-separated fields"));
    }

    let mut fields = [0u32; 4];
    for (slot, part) in fields.iter_mut().zip(&parts) {
      *slot = part.parse().map_err(|_| error("fields must be non-negative integers"))?;
    }

    Ok(Self {
      fields,
      len: parts.len(),
    })
  }
}
