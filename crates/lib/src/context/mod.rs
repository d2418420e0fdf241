//! Shared execution context for one build invocation.
//!
//! The context holds the typed property bag, the host OS, the logger
//! sink, and the build's fail state. The fail state is monotonic: the first
//! call to [`ExecutionContext::fail`] wins and nothing clears it. Failing does
//! not unwind; callers check [`ExecutionContext::has_failed`] between steps.

pub mod log;
pub mod props;
pub mod version;

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error};

use crate::consts::{BUILD_VERSION_ENV, DEFAULT_BUILD_VERSION, DOTNET_EXECUTABLE_ENV};
use crate::platform::{self, os::Os};
use crate::task::process::{ProcessRunner, SystemProcessRunner};

pub use log::{BuildLog, LogLevel, LogLine};
pub use props::{FromProperty, PropertyBag, PropertyValue, keys};
pub use version::{BuildVersion, VersionParseError};

/// The first failure recorded during a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailState {
  pub message: String,
  pub exit_code: i32,
}

/// Settings supplied by whoever bootstraps the build.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
  /// Keep running independent targets after a target fails.
  pub continue_on_failure: bool,

  /// Property overrides applied after the seeded defaults.
  pub properties: Vec<(String, PropertyValue)>,

  /// Build version override. Wins over `BRISK_BUILD_VERSION` and over a
  /// `BuildVersion` entry in `properties`.
  pub build_version: Option<BuildVersion>,

  /// Pretend to run on another OS. Only affects path policies, not process spawning.
  pub os: Option<Os>,
}

pub struct ExecutionContext {
  properties: PropertyBag,
  os: Os,
  fail_state: Option<FailState>,
  failure_count: usize,
  log: BuildLog,
  runner: Arc<dyn ProcessRunner>,
}

impl ExecutionContext {
  /// Create a context seeded with host facts and the config's overrides.
  pub fn new(config: &BuildConfig) -> Self {
    let os = config.os.unwrap_or_else(Os::host);

    let mut properties = PropertyBag::new();
    properties.set(keys::OS_PLATFORM, os.as_str());
    properties.set(keys::BUILD_VERSION, seed_build_version());
    properties.set(keys::BUILD_CONFIGURATION, "Release");
    properties.set(keys::PRODUCT_ROOT_DIR, PathBuf::from("."));
    properties.set(keys::PRODUCT_VERSION_FIELD_COUNT, 2i64);
    properties.set(keys::AUTO_ASSEMBLY_VERSION, true);
    if let Some(dotnet) = seed_dotnet_executable() {
      properties.set(keys::DOTNET_EXECUTABLE, dotnet);
    }

    for (key, value) in &config.properties {
      properties.set(key.clone(), value.clone());
    }
    if let Some(version) = config.build_version {
      properties.set(keys::BUILD_VERSION, version);
    }

    debug!(os = %os, properties = properties.len(), "execution context created");

    Self {
      properties,
      os,
      fail_state: None,
      failure_count: 0,
      log: BuildLog::new(),
      runner: Arc::new(SystemProcessRunner),
    }
  }

  /// Replace the process runner used by process-spawning tasks.
  pub fn with_process_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
    self.runner = runner;
    self
  }

  pub fn process_runner(&self) -> Arc<dyn ProcessRunner> {
    Arc::clone(&self.runner)
  }

  /// The OS used for path policies.
  pub fn os(&self) -> Os {
    self.os
  }

  pub fn properties(&self) -> &PropertyBag {
    &self.properties
  }

  pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
    self.properties.set(key, value);
  }

  pub fn try_get<T: FromProperty>(&self, key: &str) -> Option<T> {
    self.properties.try_get(key)
  }

  pub fn get_or<T: FromProperty>(&self, key: &str, default: T) -> T {
    self.properties.get_or(key, default)
  }

  pub fn build_version(&self) -> Option<BuildVersion> {
    self.properties.try_get(keys::BUILD_VERSION)
  }

  pub fn set_build_version(&mut self, version: BuildVersion) {
    self.properties.set(keys::BUILD_VERSION, version);
  }

  /// Directory that relative product paths resolve against.
  pub fn product_root(&self) -> PathBuf {
    self.properties.get_or(keys::PRODUCT_ROOT_DIR, PathBuf::from("."))
  }

  pub fn log(&mut self) -> &mut BuildLog {
    &mut self.log
  }

  pub fn log_lines(&self) -> &[LogLine] {
    self.log.lines()
  }

  /// Record a build failure. Only the first call has any effect on the fail state.
  pub fn fail(&mut self, message: impl Into<String>, exit_code: i32) {
    self.failure_count += 1;
    let message = message.into();

    if self.fail_state.is_some() {
      debug!(message = %message, exit_code, "build already failed, ignoring later failure");
      return;
    }

    error!(message = %message, exit_code, "build failed");
    self.log.error(message.clone());
    self.fail_state = Some(FailState { message, exit_code });
  }

  pub fn has_failed(&self) -> bool {
    self.fail_state.is_some()
  }

  pub fn fail_state(&self) -> Option<&FailState> {
    self.fail_state.as_ref()
  }

  /// Number of `fail` calls so far, including ignored ones.
  pub(crate) fn failure_count(&self) -> usize {
    self.failure_count
  }

  /// Exit code for the process: 0 when nothing failed, otherwise the first
  /// failure's code (a recorded code of 0 is reported as 1).
  pub fn exit_code(&self) -> i32 {
    match &self.fail_state {
      None => 0,
      Some(state) if state.exit_code == 0 => 1,
      Some(state) => state.exit_code,
    }
  }
}

fn seed_build_version() -> BuildVersion {
  let from_env = std::env::var(BUILD_VERSION_ENV)
    .ok()
    .and_then(|v| v.parse::<BuildVersion>().ok());

  from_env
    .or_else(|| DEFAULT_BUILD_VERSION.parse().ok())
    .unwrap_or_else(|| BuildVersion::new(1, 0, 0, 0))
}

fn seed_dotnet_executable() -> Option<String> {
  if let Ok(explicit) = std::env::var(DOTNET_EXECUTABLE_ENV)
    && !explicit.is_empty()
  {
    return Some(explicit);
  }

  platform::find_executable("dotnet").map(|p| p.display().to_string())
}
