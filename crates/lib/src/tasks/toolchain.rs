//! Runs a command word through an external toolchain executable
//! (`dotnet build`, `dotnet restore`, ...).
//!
//! The executable is taken from an explicit path if one was configured,
//! otherwise from a context property. When neither is available the task
//! fails with exit code -1 before anything is spawned.

use std::fmt;

use crate::context::{ExecutionContext, keys};
use crate::task::fluent::{TaskHandle, impl_task_handle};
use crate::task::{Task, TaskBase, TaskConfig, TaskError};

use super::run_program::{RunProgramBuilder, RunProgramTask};

/// Standard dotnet CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotnetCommand {
  Build,
  Restore,
  Publish,
  Test,
  Pack,
  Clean,
}

impl DotnetCommand {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Build => "build",
      Self::Restore => "restore",
      Self::Publish => "publish",
      Self::Test => "test",
      Self::Pack => "pack",
      Self::Clean => "clean",
    }
  }
}

impl fmt::Display for DotnetCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

pub struct ToolchainCommandTask {
  base: TaskBase,
  tool: String,
  command: String,
  executable: Option<String>,
  executable_property: String,
}

impl ToolchainCommandTask {
  /// A command for `tool`, resolving its executable from `executable_property`.
  pub fn new(tool: impl Into<String>, command: impl Into<String>, executable_property: impl Into<String>) -> Self {
    Self {
      base: TaskBase::default(),
      tool: tool.into(),
      command: command.into(),
      executable: None,
      executable_property: executable_property.into(),
    }
  }

  pub fn dotnet(command: DotnetCommand) -> Self {
    Self::dotnet_command(command.as_str())
  }

  /// A dotnet command that has no [`DotnetCommand`] variant.
  pub fn dotnet_command(command: impl Into<String>) -> Self {
    Self::new("dotnet", command, keys::DOTNET_EXECUTABLE)
  }

  pub fn command(&self) -> &str {
    &self.command
  }

  fn resolve_executable(&self, ctx: &ExecutionContext) -> Option<String> {
    self
      .executable
      .clone()
      .or_else(|| ctx.try_get::<String>(&self.executable_property))
      .filter(|p| !p.trim().is_empty())
  }
}

impl_task_handle!(ToolchainCommandTask);

pub trait ToolchainCommandBuilder: TaskHandle<Task = ToolchainCommandTask> {
  /// Full path to the toolchain executable, bypassing the context property.
  fn executable(mut self, path: impl Into<String>) -> Self {
    self.task_mut().executable = Some(path.into());
    self
  }
}

impl<H: TaskHandle<Task = ToolchainCommandTask>> ToolchainCommandBuilder for H {}

impl Task for ToolchainCommandTask {
  fn base(&self) -> &TaskBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut TaskBase {
    &mut self.base
  }

  fn default_description(&self) -> String {
    format!("{} {}", self.tool, self.command)
  }

  fn do_execute(&mut self, ctx: &mut ExecutionContext) -> Result<i32, TaskError> {
    let Some(program) = self.resolve_executable(ctx) else {
      return Err(TaskError::failed(format!("{} executable not set!", self.tool), -1));
    };

    let mut inner = RunProgramTask::new(program)
      .with_argument(self.command.clone())
      .with_arguments(self.base.arguments.iter().cloned())
      .capture_output()
      .capture_error_output();

    if let Some(folder) = &self.base.working_folder {
      inner = inner.working_folder(folder.clone());
    }
    if self.base.do_not_log_output {
      inner = inner.do_not_log_output();
    }
    if self.base.no_log {
      inner = inner.no_log();
    }

    inner.do_execute(ctx)
  }
}
