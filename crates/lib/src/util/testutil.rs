//! Test utilities for brisk-lib.
//!
//! Cross-platform shell helpers plus a scripted [`ProcessRunner`] so task
//! tests can run without spawning anything.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::context::{BuildConfig, ExecutionContext};
use crate::task::process::{CommandSpec, ProcessError, ProcessOutput, ProcessRunner};

/// Returns the shell command and args to echo an environment variable.
#[cfg(unix)]
pub fn shell_echo_env(var: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), format!("echo \"${}\"", var)])
}

#[cfg(windows)]
pub fn shell_echo_env(var: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), format!("echo %{}%", var)])
}

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Returns the command and args to create a marker file in the current directory.
#[cfg(unix)]
pub fn touch_file(filename: &str) -> (&'static str, Vec<String>) {
  ("/usr/bin/touch", vec![filename.to_string()])
}

#[cfg(windows)]
pub fn touch_file(filename: &str) -> (&'static str, Vec<String>) {
  (
    "powershell.exe",
    vec![
      "-NoProfile".to_string(),
      "-Command".to_string(),
      format!("New-Item -ItemType File -Path '{}' -Force | Out-Null", filename),
    ],
  )
}

/// A process runner that records every spec and replays queued results.
///
/// When the queue is empty the process "succeeds" with empty output.
#[derive(Default)]
pub struct FakeRunner {
  calls: Mutex<Vec<CommandSpec>>,
  results: Mutex<VecDeque<Result<ProcessOutput, ProcessError>>>,
}

impl FakeRunner {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn push_output(&self, exit_code: i32, stdout: &str, stderr: &str) {
    self.results.lock().unwrap().push_back(Ok(ProcessOutput {
      exit_code,
      stdout: stdout.to_string(),
      stderr: stderr.to_string(),
    }));
  }

  pub fn push_error(&self, error: ProcessError) {
    self.results.lock().unwrap().push_back(Err(error));
  }

  pub fn calls(&self) -> Vec<CommandSpec> {
    self.calls.lock().unwrap().clone()
  }
}

impl ProcessRunner for FakeRunner {
  fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput, ProcessError> {
    self.calls.lock().unwrap().push(spec.clone());
    self
      .results
      .lock()
      .unwrap()
      .pop_front()
      .unwrap_or_else(|| Ok(ProcessOutput::default()))
  }
}

/// A context wired to `runner`, with default configuration.
pub fn context_with(runner: Arc<FakeRunner>) -> ExecutionContext {
  ExecutionContext::new(&BuildConfig::default()).with_process_runner(runner)
}
