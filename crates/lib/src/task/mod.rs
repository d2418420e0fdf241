//! The task contract.
//!
//! A task is a one-shot unit of work configured before it runs. Concrete
//! tasks implement [`Task::do_execute`]; the provided [`Task::execute`] wraps
//! it so that:
//! - the task runs at most once (later calls replay the first outcome),
//! - a nonzero status or an error is recorded on the context's fail state,
//! - a task that calls `ctx.fail` itself is reported as failed even if it
//!   returns 0.

pub mod fluent;
pub mod process;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::context::{ExecutionContext, VersionParseError};

pub use fluent::{TaskConfig, TaskHandle};
pub use process::{CommandSpec, ProcessError, ProcessOutput, ProcessRunner, SystemProcessRunner};

/// Errors a task can return from `do_execute`.
#[derive(Debug, Error)]
pub enum TaskError {
  /// A failure with an explicit exit code.
  #[error("{message}")]
  Failed { message: String, exit_code: i32 },

  #[error(transparent)]
  Process(#[from] ProcessError),

  #[error(transparent)]
  Archive(#[from] ArchiveError),

  #[error(transparent)]
  Version(#[from] VersionParseError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl TaskError {
  pub fn failed(message: impl Into<String>, exit_code: i32) -> Self {
    Self::Failed {
      message: message.into(),
      exit_code,
    }
  }

  /// Exit code recorded on the fail state for this error.
  pub fn exit_code(&self) -> i32 {
    match self {
      Self::Failed { exit_code, .. } => *exit_code,
      Self::Process(ProcessError::NotFound { .. }) => -1,
      _ => 1,
    }
  }
}

/// How a task's single execution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
  Succeeded,
  Failed { exit_code: i32 },
}

impl TaskOutcome {
  pub fn is_success(&self) -> bool {
    matches!(self, TaskOutcome::Succeeded)
  }
}

/// Configuration shared by every task type.
///
/// Set through [`TaskConfig`] before the task runs.
#[derive(Debug, Clone, Default)]
pub struct TaskBase {
  pub(crate) arguments: Vec<String>,
  pub(crate) working_folder: Option<PathBuf>,
  pub(crate) do_not_log_output: bool,
  pub(crate) no_log: bool,
  pub(crate) description: Option<String>,
  outcome: Option<TaskOutcome>,
}

impl TaskBase {
  pub fn arguments(&self) -> &[String] {
    &self.arguments
  }

  pub fn working_folder(&self) -> Option<&Path> {
    self.working_folder.as_deref()
  }

  pub fn do_not_log_output(&self) -> bool {
    self.do_not_log_output
  }

  pub fn no_log(&self) -> bool {
    self.no_log
  }

  /// Outcome of the execution, if the task has run.
  pub fn outcome(&self) -> Option<TaskOutcome> {
    self.outcome
  }
}

pub trait Task {
  fn base(&self) -> &TaskBase;

  fn base_mut(&mut self) -> &mut TaskBase;

  /// Description used in log lines when none was configured.
  fn default_description(&self) -> String;

  /// Perform the work. Return `Ok(0)` on success, `Ok(code)` or an error on failure.
  fn do_execute(&mut self, ctx: &mut ExecutionContext) -> Result<i32, TaskError>;

  fn description(&self) -> String {
    self
      .base()
      .description
      .clone()
      .unwrap_or_else(|| self.default_description())
  }

  /// Run the task once against `ctx`.
  fn execute(&mut self, ctx: &mut ExecutionContext) -> TaskOutcome {
    if let Some(outcome) = self.base().outcome {
      tracing::debug!(task = %self.description(), "task already executed, replaying outcome");
      return outcome;
    }

    let description = self.description();
    let failures_before = ctx.failure_count();

    if !self.base().no_log {
      ctx.log().debug(format!("executing {description}"));
    }

    let outcome = match self.do_execute(ctx) {
      Ok(0) if ctx.failure_count() > failures_before => TaskOutcome::Failed {
        exit_code: ctx.exit_code(),
      },
      Ok(0) => TaskOutcome::Succeeded,
      Ok(code) => {
        ctx.fail(format!("{description} failed with exit code {code}"), code);
        TaskOutcome::Failed { exit_code: code }
      }
      Err(e) => {
        let code = e.exit_code();
        ctx.fail(format!("{description}: {e}"), code);
        TaskOutcome::Failed { exit_code: code }
      }
    };

    self.base_mut().outcome = Some(outcome);
    outcome
  }

  /// Log an info line unless logging is disabled for this task.
  fn log_info(&self, ctx: &mut ExecutionContext, message: &str) {
    if !self.base().no_log {
      ctx.log().info(message);
    }
  }

  /// Log a warning unless logging is disabled for this task.
  fn log_warn(&self, ctx: &mut ExecutionContext, message: &str) {
    if !self.base().no_log {
      ctx.log().warn(message);
    }
  }
}
