//! Runs an external program and waits for it to finish.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::context::ExecutionContext;
use crate::task::fluent::{TaskHandle, impl_task_handle};
use crate::task::{CommandSpec, ProcessError, Task, TaskBase, TaskError};

pub struct RunProgramTask {
  base: TaskBase,
  program: String,
  capture_output: bool,
  capture_error_output: bool,
  output_property: Option<String>,
  timeout: Option<Duration>,
  env: BTreeMap<String, String>,
}

impl RunProgramTask {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      base: TaskBase::default(),
      program: program.into(),
      capture_output: false,
      capture_error_output: false,
      output_property: None,
      timeout: None,
      env: BTreeMap::new(),
    }
  }

  pub fn program(&self) -> &str {
    &self.program
  }

  fn command_spec(&self) -> CommandSpec {
    CommandSpec {
      program: self.program.clone(),
      args: self.base.arguments.clone(),
      working_dir: self.base.working_folder.clone(),
      env: self.env.clone(),
      timeout: self.timeout,
    }
  }
}

impl_task_handle!(RunProgramTask);

/// Configuration specific to [`RunProgramTask`].
pub trait RunProgramBuilder: TaskHandle<Task = RunProgramTask> {
  /// Keep stdout so it can be stored in a property.
  fn capture_output(mut self) -> Self {
    self.task_mut().capture_output = true;
    self
  }

  /// Include stderr in the failure message when the program fails.
  fn capture_error_output(mut self) -> Self {
    self.task_mut().capture_error_output = true;
    self
  }

  /// Store trimmed stdout under `key` after a successful run. Implies `capture_output`.
  fn output_to_property(mut self, key: impl Into<String>) -> Self {
    let task = self.task_mut();
    task.capture_output = true;
    task.output_property = Some(key.into());
    self
  }

  /// Kill the program if it runs longer than `timeout`.
  fn with_timeout(mut self, timeout: Duration) -> Self {
    self.task_mut().timeout = Some(timeout);
    self
  }

  fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.task_mut().env.insert(key.into(), value.into());
    self
  }
}

impl<H: TaskHandle<Task = RunProgramTask>> RunProgramBuilder for H {}

impl Task for RunProgramTask {
  fn base(&self) -> &TaskBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut TaskBase {
    &mut self.base
  }

  fn default_description(&self) -> String {
    format!("run program '{}'", self.program)
  }

  fn do_execute(&mut self, ctx: &mut ExecutionContext) -> Result<i32, TaskError> {
    let spec = self.command_spec();
    self.log_info(ctx, &format!("Running program: {}", spec.display()));

    let runner = ctx.process_runner();
    let output = match runner.run(&spec) {
      Ok(output) => output,
      Err(ProcessError::NotFound { program }) => {
        return Err(TaskError::failed(format!("program '{program}' not found"), -1));
      }
      Err(e) => return Err(e.into()),
    };

    if !self.base.do_not_log_output && !self.base.no_log {
      for line in output.stdout.lines().filter(|l| !l.trim().is_empty()) {
        ctx.log().info(line);
      }
      for line in output.stderr.lines().filter(|l| !l.trim().is_empty()) {
        ctx.log().warn(line);
      }
    }

    if output.exit_code != 0 {
      let stderr = output.stderr.trim();
      if self.capture_error_output && !stderr.is_empty() {
        return Err(TaskError::failed(
          format!("{} exited with code {}: {}", self.program, output.exit_code, stderr),
          output.exit_code,
        ));
      }
      return Ok(output.exit_code);
    }

    if self.capture_output
      && let Some(key) = &self.output_property
    {
      ctx.set(key.clone(), output.stdout.trim().to_string());
    }

    Ok(0)
  }
}
