//! brisk-lib: build automation engine.
//!
//! A build is a set of named targets. Each target is an ordered list of
//! tasks plus the targets it depends on:
//! - [`context::ExecutionContext`]: properties, platform facts, log sink and
//!   the build's first-failure-wins fail state
//! - [`task`]: the one-shot task contract and its fluent configuration traits
//! - [`tasks`]: concrete tasks (processes, toolchains, packaging, versioning)
//! - [`target`]: targets and the fluent target builder
//! - [`schedule`]: dependency validation, ordering and execution
//! - [`archive`]: thin zip packages where one stored entry expands to many files
//! - [`script`]: TOML build scripts

pub mod archive;
pub mod consts;
pub mod context;
pub mod platform;
pub mod schedule;
pub mod script;
pub mod target;
pub mod task;
pub mod tasks;
pub mod util;

/// Everything needed to declare targets in Rust.
pub mod prelude {
  pub use crate::context::{BuildConfig, BuildVersion, ExecutionContext, keys};
  pub use crate::schedule::{BuildReport, Scheduler, TargetStatus};
  pub use crate::target::{Target, TargetBuilder, TaskChain, TaskExtensions};
  pub use crate::task::{Task, TaskConfig, TaskHandle, TaskOutcome};
  pub use crate::tasks::*;
}
