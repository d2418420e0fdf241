//! Targets and the fluent target builder.
//!
//! ```ignore
//! let target = TargetBuilder::new("compile")
//!   .set_description("Compile the solution")
//!   .depends_on(["restore"])
//!   .add_task(RunProgramTask::new("cargo"))
//!   .with_arguments(["build", "--release"])
//!   .capture_error_output()
//!   .back_to_target()
//!   .tasks()
//!   .dotnet_build(["App.sln"])
//!   .back_to_target()
//!   .build();
//! ```

pub mod extensions;

use tracing::debug;

use crate::context::ExecutionContext;
use crate::task::fluent::TaskHandle;
use crate::task::{Task, TaskOutcome};

pub use extensions::TaskExtensions;

/// A named, ordered list of tasks plus the targets it depends on.
pub struct Target {
  name: String,
  description: Option<String>,
  dependencies: Vec<String>,
  tasks: Vec<Box<dyn Task>>,
}

impl Target {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      description: None,
      dependencies: Vec::new(),
      tasks: Vec::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  /// Names of the targets that must succeed before this one runs, in declaration order.
  pub fn dependencies(&self) -> &[String] {
    &self.dependencies
  }

  pub fn task_count(&self) -> usize {
    self.tasks.len()
  }

  /// Descriptions of the tasks in execution order.
  pub fn task_descriptions(&self) -> Vec<String> {
    self.tasks.iter().map(|t| t.description()).collect()
  }

  /// Run the tasks in order, stopping at the first failure.
  pub fn execute(&mut self, ctx: &mut ExecutionContext) -> TaskOutcome {
    for (index, task) in self.tasks.iter_mut().enumerate() {
      debug!(target = %self.name, task = index, description = %task.description(), "executing task");
      let outcome = task.execute(ctx);
      if !outcome.is_success() {
        return outcome;
      }
    }
    TaskOutcome::Succeeded
  }
}

impl std::fmt::Debug for Target {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Target")
      .field("name", &self.name)
      .field("dependencies", &self.dependencies)
      .field("tasks", &self.task_descriptions())
      .finish()
  }
}

/// Builds a [`Target`] through chained calls.
pub struct TargetBuilder {
  target: Target,
}

impl TargetBuilder {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      target: Target::new(name),
    }
  }

  pub fn name(&self) -> &str {
    &self.target.name
  }

  pub fn set_description(mut self, description: impl Into<String>) -> Self {
    self.target.description = Some(description.into());
    self
  }

  /// Add dependencies. Names already listed are ignored.
  pub fn depends_on<I, S>(mut self, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    for name in names {
      let name = name.into();
      if !self.target.dependencies.contains(&name) {
        self.target.dependencies.push(name);
      }
    }
    self
  }

  /// Start configuring `task`. It is appended when the chain returns to the target.
  pub fn add_task<T: Task + 'static>(self, task: T) -> TaskChain<T> {
    TaskChain { target: self, task }
  }

  /// Append an already configured task.
  pub fn do_task<T: Task + 'static>(mut self, task: T) -> Self {
    self.target.tasks.push(Box::new(task));
    self
  }

  /// Switch to the task-extension surface.
  pub fn tasks(self) -> TaskExtensions {
    TaskExtensions::new(self)
  }

  pub fn build(self) -> Target {
    self.target
  }
}

/// A task being configured while still attached to its target builder.
pub struct TaskChain<T: Task + 'static> {
  target: TargetBuilder,
  task: T,
}

impl<T: Task + 'static> TaskChain<T> {
  /// Append the task and return to the target.
  pub fn back_to_target(self) -> TargetBuilder {
    self.target.do_task(self.task)
  }
}

impl<T: Task + 'static> TaskHandle for TaskChain<T> {
  type Task = T;

  fn task_mut(&mut self) -> &mut T {
    &mut self.task
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::context::BuildConfig;
  use crate::task::TaskConfig;
  use crate::tasks::{RunProgramBuilder, RunProgramTask};
  use crate::util::testutil::{FakeRunner, context_with};

  #[test]
  fn chain_appends_tasks_in_call_order() {
    let target = TargetBuilder::new("compile")
      .set_description("Compile everything")
      .add_task(RunProgramTask::new("first"))
      .with_argument("--one")
      .capture_output()
      .working_folder("src")
      .back_to_target()
      .do_task(RunProgramTask::new("second"))
      .add_task(RunProgramTask::new("third"))
      .back_to_target()
      .build();

    assert_eq!(target.name(), "compile");
    assert_eq!(target.description(), Some("Compile everything"));
    assert_eq!(
      target.task_descriptions(),
      vec!["run program 'first'", "run program 'second'", "run program 'third'"]
    );
  }

  #[test]
  fn depends_on_keeps_order_without_duplicates() {
    let target = TargetBuilder::new("package")
      .depends_on(["test", "compile"])
      .depends_on(["test"])
      .build();
    assert_eq!(target.dependencies(), ["test", "compile"]);
  }

  #[test]
  fn execute_stops_at_first_failure() {
    let runner = FakeRunner::new();
    runner.push_output(0, "", "");
    runner.push_output(3, "", "boom");
    let mut ctx = context_with(runner.clone());

    let mut target = TargetBuilder::new("build")
      .do_task(RunProgramTask::new("a"))
      .do_task(RunProgramTask::new("b"))
      .do_task(RunProgramTask::new("c"))
      .build();

    assert_eq!(target.execute(&mut ctx), TaskOutcome::Failed { exit_code: 3 });
    assert_eq!(runner.calls().len(), 2);
    assert_eq!(ctx.exit_code(), 3);
  }

  #[test]
  fn empty_target_succeeds() {
    let mut ctx = ExecutionContext::new(&BuildConfig::default());
    let mut target = TargetBuilder::new("noop").build();
    assert_eq!(target.execute(&mut ctx), TaskOutcome::Succeeded);
  }
}
