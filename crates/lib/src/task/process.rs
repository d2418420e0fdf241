//! External process collaborator.
//!
//! Tasks never spawn processes directly; they hand a [`CommandSpec`] to the
//! context's [`ProcessRunner`]. The system runner drives `tokio::process` on a
//! private current-thread runtime and blocks until the process exits, so the
//! owning task's `execute` call stays synchronous.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Everything needed to launch one process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
  pub program: String,
  pub args: Vec<String>,
  pub working_dir: Option<PathBuf>,
  pub env: BTreeMap<String, String>,
  pub timeout: Option<Duration>,
}

impl CommandSpec {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      ..Default::default()
    }
  }

  /// The command line as a single display string.
  pub fn display(&self) -> String {
    std::iter::once(self.program.as_str())
      .chain(self.args.iter().map(String::as_str))
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
  /// Exit code, or -1 if the process was terminated by a signal.
  pub exit_code: i32,
  pub stdout: String,
  pub stderr: String,
}

impl ProcessOutput {
  pub fn success(&self) -> bool {
    self.exit_code == 0
  }
}

#[derive(Debug, Error)]
pub enum ProcessError {
  /// The executable does not exist.
  #[error("program not found: {program}")]
  NotFound { program: String },

  /// The process could not be started.
  #[error("failed to start {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },

  /// The process ran longer than its configured timeout and was killed.
  #[error("{program} timed out after {}s", timeout.as_secs_f64())]
  TimedOut { program: String, timeout: Duration },

  /// The async runtime used to drive the process could not be created.
  #[error("failed to create process runtime: {0}")]
  Runtime(#[source] io::Error),
}

/// Runs an external executable and captures its output.
pub trait ProcessRunner: Send + Sync {
  fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput, ProcessError>;
}

/// Spawns real processes.
///
/// Must not be called from inside an existing tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
  fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput, ProcessError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .map_err(ProcessError::Runtime)?;

    runtime.block_on(run_process(spec))
  }
}

async fn run_process(spec: &CommandSpec) -> Result<ProcessOutput, ProcessError> {
  let mut command = Command::new(&spec.program);
  command.args(&spec.args).envs(&spec.env).kill_on_drop(true);

  if let Some(dir) = &spec.working_dir {
    command.current_dir(dir);
  }

  debug!(cmd = %spec.display(), working_dir = ?spec.working_dir, "spawning process");

  let spawn_error = |e: io::Error| {
    if e.kind() == io::ErrorKind::NotFound {
      ProcessError::NotFound {
        program: spec.program.clone(),
      }
    } else {
      ProcessError::Spawn {
        program: spec.program.clone(),
        source: e,
      }
    }
  };

  let output = match spec.timeout {
    Some(timeout) => tokio::time::timeout(timeout, command.output())
      .await
      .map_err(|_| ProcessError::TimedOut {
        program: spec.program.clone(),
        timeout,
      })?
      .map_err(spawn_error)?,
    None => command.output().await.map_err(spawn_error)?,
  };

  let result = ProcessOutput {
    exit_code: output.status.code().unwrap_or(-1),
    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
  };

  debug!(program = %spec.program, exit_code = result.exit_code, "process finished");

  Ok(result)
}
