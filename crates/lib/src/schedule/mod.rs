//! Target registration, dependency resolution, and execution.
//!
//! The scheduler validates the whole target graph before anything runs, so a
//! broken build definition fails with no side effects. Targets then run one at
//! a time in a stable topological order (declaration order breaks ties). Each
//! target settles at most once per build; later requests replay its status.

pub mod graph;
pub mod types;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::context::ExecutionContext;
use crate::target::{Target, TargetBuilder};
use crate::task::TaskOutcome;

pub use graph::TargetGraph;
pub use types::{BuildReport, ExecutionPlan, ScheduleError, TargetReport, TargetStatus};

#[derive(Debug, Default)]
pub struct Scheduler {
  targets: Vec<Target>,
  index: HashMap<String, usize>,
  statuses: HashMap<String, TargetStatus>,
  default_target: Option<String>,
  continue_on_failure: bool,
}

impl Scheduler {
  pub fn new() -> Self {
    Self::default()
  }

  /// Keep running targets whose dependencies succeeded after another target fails.
  ///
  /// The build still reports the first failure's exit code.
  pub fn continue_on_failure(mut self, enabled: bool) -> Self {
    self.continue_on_failure = enabled;
    self
  }

  /// Register a target. Names must be unique within a build.
  pub fn register(&mut self, target: Target) -> Result<(), ScheduleError> {
    if self.index.contains_key(target.name()) {
      return Err(ScheduleError::DuplicateTarget(target.name().to_string()));
    }
    debug!(target = %target.name(), tasks = target.task_count(), "registered target");
    self.index.insert(target.name().to_string(), self.targets.len());
    self.targets.push(target);
    Ok(())
  }

  /// Build and register a target.
  pub fn add_target(&mut self, builder: TargetBuilder) -> Result<(), ScheduleError> {
    self.register(builder.build())
  }

  /// Target run when a request names none.
  pub fn set_default_target(&mut self, name: impl Into<String>) {
    self.default_target = Some(name.into());
  }

  pub fn default_target(&self) -> Option<&str> {
    self.default_target.as_deref()
  }

  /// Target names in declaration order.
  pub fn target_names(&self) -> Vec<&str> {
    self.targets.iter().map(|t| t.name()).collect()
  }

  pub fn target(&self, name: &str) -> Option<&Target> {
    self.index.get(name).map(|&i| &self.targets[i])
  }

  pub fn targets(&self) -> impl Iterator<Item = &Target> {
    self.targets.iter()
  }

  /// Status of `name` in this build, `None` for unknown targets.
  pub fn status(&self, name: &str) -> Option<TargetStatus> {
    if !self.index.contains_key(name) {
      return None;
    }
    Some(self.statuses.get(name).copied().unwrap_or(TargetStatus::Pending))
  }

  /// Check every declared dependency exists and the graph is acyclic.
  pub fn validate(&self) -> Result<TargetGraph, ScheduleError> {
    TargetGraph::build(self.targets.iter().map(|t| (t.name(), t.dependencies())))
  }

  /// Resolve `requested` (or the default target when empty) into an execution plan.
  pub fn plan<S: AsRef<str>>(&self, requested: &[S]) -> Result<ExecutionPlan, ScheduleError> {
    let graph = self.validate()?;

    let requested: Vec<String> = if requested.is_empty() {
      let default = self.default_target.clone().ok_or(ScheduleError::NoTargetRequested)?;
      vec![default]
    } else {
      requested.iter().map(|s| s.as_ref().to_string()).collect()
    };

    let order = graph.order(&requested)?;
    let waves = graph.waves(&order);
    Ok(ExecutionPlan::new(requested, order, waves))
  }

  /// Run `requested` and everything it depends on.
  ///
  /// # Errors
  ///
  /// Only configuration errors are returned, and always before any task runs.
  /// Task failures are recorded on `ctx` and reflected in the report.
  pub fn run<S: AsRef<str>>(
    &mut self,
    ctx: &mut ExecutionContext,
    requested: &[S],
  ) -> Result<BuildReport, ScheduleError> {
    let plan = self.plan(requested)?;
    let started = Instant::now();
    info!(targets = ?plan.order, "starting build");

    let mut reports = Vec::with_capacity(plan.len());
    for name in &plan.order {
      let (status, duration) = self.settle(ctx, name);
      reports.push(TargetReport {
        name: name.clone(),
        status,
        duration,
      });
    }

    let report = BuildReport {
      requested: plan.requested,
      targets: reports,
      exit_code: ctx.exit_code(),
      failure: ctx.fail_state().cloned(),
      duration: started.elapsed(),
    };

    if report.is_success() {
      info!(duration = ?report.duration, "build succeeded");
    } else {
      warn!(exit_code = report.exit_code, failed = ?report.failed(), skipped = ?report.skipped(), "build failed");
    }
    Ok(report)
  }

  /// Bring `name` to a final status, running it if it is still pending.
  fn settle(&mut self, ctx: &mut ExecutionContext, name: &str) -> (TargetStatus, Duration) {
    let current = self.status(name).unwrap_or(TargetStatus::Pending);
    if current.is_final() {
      debug!(target = %name, status = %current, "target already settled");
      return (current, Duration::ZERO);
    }

    let Some(&idx) = self.index.get(name) else {
      return (TargetStatus::Skipped, Duration::ZERO);
    };

    let blocked_by = self.targets[idx]
      .dependencies()
      .iter()
      .find(|dep| self.status(dep) != Some(TargetStatus::Succeeded))
      .cloned();

    let aborted = ctx.has_failed() && !self.continue_on_failure;
    if aborted || blocked_by.is_some() {
      info!(target = %name, blocked_by = ?blocked_by, "skipping target");
      self.statuses.insert(name.to_string(), TargetStatus::Skipped);
      return (TargetStatus::Skipped, Duration::ZERO);
    }

    self.statuses.insert(name.to_string(), TargetStatus::Running);
    info!(target = %name, "running target");
    ctx.log().enter_target(name);

    let started = Instant::now();
    let outcome = self.targets[idx].execute(ctx);
    let duration = started.elapsed();
    ctx.log().leave_target();

    let status = match outcome {
      TaskOutcome::Succeeded => TargetStatus::Succeeded,
      TaskOutcome::Failed { exit_code } => TargetStatus::Failed { exit_code },
    };
    info!(target = %name, status = %status, duration = ?duration, "target finished");

    self.statuses.insert(name.to_string(), status);
    (status, duration)
  }
}
