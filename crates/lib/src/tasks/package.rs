//! Collects build outputs into a package.
//!
//! With a zip prefix the sources are packed into a thin archive named
//! `<prefix>_<version>.zip` inside the destination directory. Without one
//! they are copied into the destination directory as a staged folder.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::archive::{EntryIdentity, Packer};
use crate::context::ExecutionContext;
use crate::task::fluent::{TaskHandle, impl_task_handle};
use crate::task::{Task, TaskBase, TaskError};

/// Version fields used in the package file name.
const PACKAGE_VERSION_FIELDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
enum PackageSource {
  Directory { path: PathBuf, destination: String },
  File { path: PathBuf, destination: String },
}

pub struct PackageTask {
  base: TaskBase,
  destination_root: PathBuf,
  zip_prefix: Option<String>,
  add_version: bool,
  identity: EntryIdentity,
  sources: Vec<PackageSource>,
}

impl PackageTask {
  /// Package into `destination_root`.
  pub fn new(destination_root: impl Into<PathBuf>) -> Self {
    Self {
      base: TaskBase::default(),
      destination_root: destination_root.into(),
      zip_prefix: None,
      add_version: true,
      identity: EntryIdentity::default(),
      sources: Vec::new(),
    }
  }

  pub fn destination_root(&self) -> &Path {
    &self.destination_root
  }

  /// File name of the zip package, if one will be written.
  pub fn zip_file_name(&self, ctx: &ExecutionContext) -> Option<String> {
    let prefix = self.zip_prefix.as_deref()?;
    match ctx.build_version().filter(|_| self.add_version) {
      Some(version) => Some(format!("{prefix}_{}.zip", version.to_string_fields(PACKAGE_VERSION_FIELDS))),
      None => Some(format!("{prefix}.zip")),
    }
  }

  fn packer(&self) -> Result<Packer, TaskError> {
    let mut packer = Packer::new(self.identity);
    for source in &self.sources {
      match source {
        PackageSource::Directory { path, destination } => {
          ensure_exists(path)?;
          packer.add_directory(path, destination)?;
        }
        PackageSource::File { path, destination } => {
          ensure_exists(path)?;
          packer.add_file(path, destination.clone());
        }
      }
    }
    Ok(packer)
  }

  fn stage(&self, ctx: &mut ExecutionContext, packer: &Packer) -> Result<usize, TaskError> {
    let (metadata, sources) = packer.plan()?;
    let mut copied = 0;

    for (item, source) in metadata.items.iter().zip(&sources) {
      for destination in &item.destination_files {
        let target = self.destination_root.join(destination);
        if let Some(parent) = target.parent() {
          fs::create_dir_all(parent)?;
        }
        fs::copy(source, &target)?;
        debug!(source = ?source, target = ?target, "staged");
        copied += 1;
      }
    }

    self.log_info(ctx, &format!("Copied {copied} files to {}", self.destination_root.display()));
    Ok(copied)
  }
}

fn ensure_exists(path: &Path) -> Result<(), TaskError> {
  if path.exists() {
    Ok(())
  } else {
    Err(TaskError::failed(format!("package source {} does not exist", path.display()), 1))
  }
}

impl_task_handle!(PackageTask);

pub trait PackageBuilder: TaskHandle<Task = PackageTask> {
  /// Add every file under `source`, placed below `destination` in the package.
  fn add_directory_to_package(mut self, source: impl Into<PathBuf>, destination: impl Into<String>) -> Self {
    self.task_mut().sources.push(PackageSource::Directory {
      path: source.into(),
      destination: destination.into(),
    });
    self
  }

  fn add_file_to_package(mut self, source: impl Into<PathBuf>, destination: impl Into<String>) -> Self {
    self.task_mut().sources.push(PackageSource::File {
      path: source.into(),
      destination: destination.into(),
    });
    self
  }

  /// Write a zip archive named after `prefix` instead of a staged folder.
  fn zip_package(mut self, prefix: impl Into<String>) -> Self {
    self.task_mut().zip_prefix = Some(prefix.into());
    self
  }

  /// Leave the build version out of the zip file name.
  fn without_version(mut self) -> Self {
    self.task_mut().add_version = false;
    self
  }

  fn dedup_by(mut self, identity: EntryIdentity) -> Self {
    self.task_mut().identity = identity;
    self
  }
}

impl<H: TaskHandle<Task = PackageTask>> PackageBuilder for H {}

impl Task for PackageTask {
  fn base(&self) -> &TaskBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut TaskBase {
    &mut self.base
  }

  fn default_description(&self) -> String {
    format!("package to {}", self.destination_root.display())
  }

  fn do_execute(&mut self, ctx: &mut ExecutionContext) -> Result<i32, TaskError> {
    let packer = self.packer()?;
    if packer.is_empty() {
      self.log_warn(ctx, "Nothing to package");
    }

    let Some(file_name) = self.zip_file_name(ctx) else {
      self.stage(ctx, &packer)?;
      return Ok(0);
    };

    let archive_path = self.destination_root.join(file_name);
    let summary = packer.write(&archive_path)?;

    self.log_info(
      ctx,
      &format!(
        "Created {} ({} stored entries, {} files)",
        summary.archive.display(),
        summary.stored_entries,
        summary.destination_files
      ),
    );
    Ok(0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::archive::extract_archive;
  use crate::context::{BuildConfig, BuildVersion};
  use crate::platform::os::Os;
  use crate::task::TaskOutcome;
  use tempfile::TempDir;

  fn ctx() -> ExecutionContext {
    ExecutionContext::new(&BuildConfig {
      build_version: Some(BuildVersion::new(1, 4, 2, 77)),
      ..Default::default()
    })
  }

  fn publish_dir(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name).join("publish");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("shared.dll"), "shared").unwrap();
    fs::write(dir.join(format!("{name}.dll")), name).unwrap();
    dir
  }

  #[test]
  fn zip_name_includes_three_version_fields() {
    let task = PackageTask::new("out").zip_package("Rocket");
    assert_eq!(task.zip_file_name(&ctx()).as_deref(), Some("Rocket_1.4.2.zip"));

    let task = PackageTask::new("out").zip_package("Rocket").without_version();
    assert_eq!(task.zip_file_name(&ctx()).as_deref(), Some("Rocket.zip"));

    assert_eq!(PackageTask::new("out").zip_file_name(&ctx()), None);
  }

  #[test]
  fn zip_package_dedups_shared_files() {
    let temp = TempDir::new().unwrap();
    let api = publish_dir(temp.path(), "Api");
    let worker = publish_dir(temp.path(), "Worker");
    let out = temp.path().join("output");
    let mut ctx = ctx();

    let outcome = PackageTask::new(&out)
      .zip_package("Rocket")
      .add_directory_to_package(&api, "Api")
      .add_directory_to_package(&worker, "Worker")
      .execute(&mut ctx);
    assert_eq!(outcome, TaskOutcome::Succeeded);

    let archive = out.join("Rocket_1.4.2.zip");
    let zip = zip::ZipArchive::new(fs::File::open(&archive).unwrap()).unwrap();
    // Api.dll, Worker.dll, one shared.dll, metadata
    assert_eq!(zip.len(), 4);
    drop(zip);

    let extracted = temp.path().join("extracted");
    extract_archive(&archive, &extracted, Os::Linux).unwrap();
    assert_eq!(fs::read_to_string(extracted.join("Worker/shared.dll")).unwrap(), "shared");
    assert_eq!(fs::read_to_string(extracted.join("Api/Api.dll")).unwrap(), "Api");
  }

  #[test]
  fn without_prefix_stages_copies() {
    let temp = TempDir::new().unwrap();
    let api = publish_dir(temp.path(), "Api");
    let out = temp.path().join("staged");
    let mut ctx = ctx();

    PackageTask::new(&out)
      .add_directory_to_package(&api, "Api")
      .add_file_to_package(api.join("shared.dll"), "lib/shared.dll")
      .execute(&mut ctx);

    assert_eq!(fs::read_to_string(out.join("Api/shared.dll")).unwrap(), "shared");
    assert_eq!(fs::read_to_string(out.join("lib/shared.dll")).unwrap(), "shared");
    assert!(!ctx.has_failed());
  }

  #[test]
  fn missing_source_fails_the_build() {
    let temp = TempDir::new().unwrap();
    let mut ctx = ctx();

    let outcome = PackageTask::new(temp.path())
      .zip_package("Rocket")
      .add_directory_to_package(temp.path().join("nope"), "App")
      .execute(&mut ctx);

    assert_eq!(outcome, TaskOutcome::Failed { exit_code: 1 });
    assert!(ctx.fail_state().unwrap().message.contains("does not exist"));
  }
}
