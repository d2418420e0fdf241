//! Types for planning and running targets.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::context::FailState;

/// Errors in the build definition. These are detected before any task runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
  #[error("target '{0}' is registered more than once")]
  DuplicateTarget(String),

  #[error("unknown target '{0}'")]
  UnknownTarget(String),

  #[error("target '{target}' depends on unknown target '{dependency}'")]
  UnknownDependency { target: String, dependency: String },

  /// The path starts and ends at the same target.
  #[error("dependency cycle detected: {}", path.join(" -> "))]
  Cycle { path: Vec<String> },

  #[error("no target requested and no default target set")]
  NoTargetRequested,
}

/// Lifecycle of one target within a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetStatus {
  Pending,
  Running,
  Succeeded,
  Failed { exit_code: i32 },
  /// Not run because the build or one of its dependencies failed first.
  Skipped,
}

impl TargetStatus {
  /// Final statuses are never left again during a build.
  pub fn is_final(&self) -> bool {
    matches!(
      self,
      TargetStatus::Succeeded | TargetStatus::Failed { .. } | TargetStatus::Skipped
    )
  }
}

impl fmt::Display for TargetStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TargetStatus::Pending => f.write_str("pending"),
      TargetStatus::Running => f.write_str("running"),
      TargetStatus::Succeeded => f.write_str("succeeded"),
      TargetStatus::Failed { exit_code } => write!(f, "failed (exit code {exit_code})"),
      TargetStatus::Skipped => f.write_str("skipped"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
  pub name: String,
  #[serde(flatten)]
  pub status: TargetStatus,
  /// Time spent in this run. Zero for targets settled by an earlier run.
  #[serde(rename = "duration_ms", serialize_with = "as_millis")]
  pub duration: Duration,
}

/// Result of one [`super::Scheduler::run`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
  pub requested: Vec<String>,
  /// Targets in execution order.
  pub targets: Vec<TargetReport>,
  pub exit_code: i32,
  pub failure: Option<FailState>,
  #[serde(rename = "duration_ms", serialize_with = "as_millis")]
  pub duration: Duration,
}

impl BuildReport {
  pub fn status(&self, name: &str) -> Option<TargetStatus> {
    self.targets.iter().find(|t| t.name == name).map(|t| t.status)
  }

  pub fn is_success(&self) -> bool {
    self.exit_code == 0
  }

  pub fn succeeded(&self) -> Vec<&str> {
    self.names_where(|s| matches!(s, TargetStatus::Succeeded))
  }

  pub fn failed(&self) -> Vec<&str> {
    self.names_where(|s| matches!(s, TargetStatus::Failed { .. }))
  }

  pub fn skipped(&self) -> Vec<&str> {
    self.names_where(|s| matches!(s, TargetStatus::Skipped))
  }

  fn names_where(&self, pred: impl Fn(&TargetStatus) -> bool) -> Vec<&str> {
    self
      .targets
      .iter()
      .filter(|t| pred(&t.status))
      .map(|t| t.name.as_str())
      .collect()
  }
}

/// The targets a request resolves to, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
  pub requested: Vec<String>,
  pub order: Vec<String>,
  waves: Vec<Vec<String>>,
}

impl ExecutionPlan {
  pub(crate) fn new(requested: Vec<String>, order: Vec<String>, waves: Vec<Vec<String>>) -> Self {
    Self {
      requested,
      order,
      waves,
    }
  }

  /// Targets grouped by dependency depth. Every target in a wave depends only
  /// on targets in earlier waves, so a wave's members could run concurrently.
  pub fn waves(&self) -> &[Vec<String>] {
    &self.waves
  }

  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
