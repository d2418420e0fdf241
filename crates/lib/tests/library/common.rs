//! Shared helpers for library integration tests.

use std::sync::{Arc, Mutex};

use brisk_lib::context::{BuildConfig, BuildVersion, ExecutionContext};
use brisk_lib::task::{Task, TaskBase, TaskError};

/// Order in which recorded tasks ran.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
  Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
  journal.lock().unwrap().clone()
}

/// A task that appends its label to a journal and exits with a fixed status.
pub struct Record {
  base: TaskBase,
  label: String,
  status: i32,
  journal: Journal,
}

impl Record {
  pub fn ok(label: &str, journal: &Journal) -> Self {
    Self::exiting(label, 0, journal)
  }

  pub fn exiting(label: &str, status: i32, journal: &Journal) -> Self {
    Self {
      base: TaskBase::default(),
      label: label.to_string(),
      status,
      journal: Arc::clone(journal),
    }
  }
}

impl Task for Record {
  fn base(&self) -> &TaskBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut TaskBase {
    &mut self.base
  }

  fn default_description(&self) -> String {
    format!("record {}", self.label)
  }

  fn do_execute(&mut self, _ctx: &mut ExecutionContext) -> Result<i32, TaskError> {
    self.journal.lock().unwrap().push(self.label.clone());
    Ok(self.status)
  }
}

pub fn context() -> ExecutionContext {
  ExecutionContext::new(&BuildConfig {
    build_version: Some(BuildVersion::new(2, 1, 0, 9)),
    ..Default::default()
  })
}
