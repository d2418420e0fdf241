//! Self-typed configuration chaining.
//!
//! Every configuration method takes `self` by value and returns `Self`, so a
//! chain keeps its concrete type from the first call to the last. The same
//! methods work on a bare task and on a [`crate::target::TaskChain`] that is
//! still attached to its target:
//!
//! - [`TaskHandle`] is anything that can hand out `&mut` to a concrete task.
//! - [`TaskConfig`] holds the base configuration every task shares and is
//!   implemented for every handle.
//! - Each concrete task adds its own builder trait, implemented for every
//!   handle whose `Task` is that concrete type.

use std::path::PathBuf;

use super::Task;

/// Access to the concrete task being configured.
pub trait TaskHandle: Sized {
  type Task: Task;

  fn task_mut(&mut self) -> &mut Self::Task;
}

/// Configuration shared by all tasks. Call before execution.
pub trait TaskConfig: TaskHandle {
  /// Append arguments.
  fn with_arguments<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self
      .task_mut()
      .base_mut()
      .arguments
      .extend(args.into_iter().map(Into::into));
    self
  }

  /// Append a single argument.
  fn with_argument(mut self, arg: impl Into<String>) -> Self {
    self.task_mut().base_mut().arguments.push(arg.into());
    self
  }

  fn working_folder(mut self, folder: impl Into<PathBuf>) -> Self {
    self.task_mut().base_mut().working_folder = Some(folder.into());
    self
  }

  /// Do not log the output of processes spawned by the task.
  fn do_not_log_output(mut self) -> Self {
    self.task_mut().base_mut().do_not_log_output = true;
    self
  }

  /// Suppress all log lines written by the task itself.
  fn no_log(mut self) -> Self {
    self.task_mut().base_mut().no_log = true;
    self
  }

  fn set_description(mut self, description: impl Into<String>) -> Self {
    self.task_mut().base_mut().description = Some(description.into());
    self
  }
}

impl<H: TaskHandle> TaskConfig for H {}

/// Implements [`TaskHandle`] for concrete task types so they can be configured
/// before being handed to a target.
macro_rules! impl_task_handle {
  ($($ty:ty),* $(,)?) => {
    $(
      impl $crate::task::fluent::TaskHandle for $ty {
        type Task = Self;

        fn task_mut(&mut self) -> &mut Self {
          self
        }
      }
    )*
  };
}

pub(crate) use impl_task_handle;
