//! Implementation of the `brisk unzip` command.

use std::path::Path;

use anyhow::{Context, Result};

use brisk_lib::archive::extract_archive;
use brisk_lib::platform::os::Os;

use crate::output::{OutputFormat, print_json, print_success, print_warning};

pub fn cmd_unzip(archive: &Path, destination: &Path, output: OutputFormat) -> Result<()> {
  let summary = extract_archive(archive, destination, Os::host())
    .with_context(|| format!("Failed to extract {}", archive.display()))?;

  if output.is_json() {
    let written: Vec<String> = summary.written.iter().map(|p| p.display().to_string()).collect();
    return print_json(&serde_json::json!({
      "archive": archive.display().to_string(),
      "destination": destination.display().to_string(),
      "had_metadata": summary.had_metadata,
      "written": written,
      "unmatched_entries": summary.unmatched_entries,
      "missing_entries": summary.missing_entries,
    }));
  }

  for entry in &summary.missing_entries {
    print_warning(&format!("{entry} is listed in metadata but missing from the archive"));
  }
  print_success(&format!(
    "Extracted {} files to {}",
    summary.written.len(),
    destination.display()
  ));

  Ok(())
}
