//! Extracts a package, expanding thin entries through its metadata.

use std::path::PathBuf;

use crate::archive::extract_archive;
use crate::context::ExecutionContext;
use crate::task::fluent::impl_task_handle;
use crate::task::{Task, TaskBase, TaskError};

pub struct UnzipTask {
  base: TaskBase,
  archive: PathBuf,
  destination: PathBuf,
}

impl UnzipTask {
  pub fn new(archive: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
    Self {
      base: TaskBase::default(),
      archive: archive.into(),
      destination: destination.into(),
    }
  }
}

impl_task_handle!(UnzipTask);

impl Task for UnzipTask {
  fn base(&self) -> &TaskBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut TaskBase {
    &mut self.base
  }

  fn default_description(&self) -> String {
    format!(
      "unzip '{}' to '{}'",
      self.archive.display(),
      self.destination.display()
    )
  }

  fn do_execute(&mut self, ctx: &mut ExecutionContext) -> Result<i32, TaskError> {
    self.log_info(
      ctx,
      &format!("Extract {} to {}", self.archive.display(), self.destination.display()),
    );

    let summary = extract_archive(&self.archive, &self.destination, ctx.os())?;

    if !self.base.do_not_log_output {
      for path in &summary.written {
        self.log_info(ctx, &format!("inflating: {}", path.display()));
      }
    }
    for entry in &summary.unmatched_entries {
      self.log_info(ctx, &format!("{entry} not found in metadata!"));
    }
    for entry in &summary.missing_entries {
      self.log_warn(ctx, &format!("{entry} is listed in metadata but missing from the archive"));
    }

    Ok(0)
  }
}
