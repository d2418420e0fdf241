//! Logger sink owned by the execution context.
//!
//! Every line is emitted as a `tracing` event and kept in memory so the run
//! can be inspected afterwards.

use std::fmt;

use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
  Debug,
  Info,
  Warn,
  Error,
}

impl fmt::Display for LogLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      LogLevel::Debug => "debug",
      LogLevel::Info => "info",
      LogLevel::Warn => "warn",
      LogLevel::Error => "error",
    };
    f.write_str(s)
  }
}

/// A single recorded log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
  pub level: LogLevel,
  /// Name of the target that was running when the line was written.
  pub target: Option<String>,
  pub message: String,
}

#[derive(Debug, Default)]
pub struct BuildLog {
  lines: Vec<LogLine>,
  current_target: Option<String>,
}

impl BuildLog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn debug(&mut self, message: impl Into<String>) {
    self.record(LogLevel::Debug, message.into());
  }

  pub fn info(&mut self, message: impl Into<String>) {
    self.record(LogLevel::Info, message.into());
  }

  pub fn warn(&mut self, message: impl Into<String>) {
    self.record(LogLevel::Warn, message.into());
  }

  pub fn error(&mut self, message: impl Into<String>) {
    self.record(LogLevel::Error, message.into());
  }

  pub fn lines(&self) -> &[LogLine] {
    &self.lines
  }

  /// Returns true if any recorded line contains `needle`.
  pub fn contains(&self, needle: &str) -> bool {
    self.lines.iter().any(|l| l.message.contains(needle))
  }

  /// Lines at `level` or above.
  pub fn at_least(&self, level: LogLevel) -> impl Iterator<Item = &LogLine> {
    self.lines.iter().filter(move |l| l.level >= level)
  }

  pub(crate) fn enter_target(&mut self, name: &str) {
    self.current_target = Some(name.to_string());
  }

  pub(crate) fn leave_target(&mut self) {
    self.current_target = None;
  }

  fn record(&mut self, level: LogLevel, message: String) {
    let target = self.current_target.as_deref().unwrap_or("-");
    match level {
      LogLevel::Debug => debug!(target_name = %target, "{}", message),
      LogLevel::Info => info!(target_name = %target, "{}", message),
      LogLevel::Warn => warn!(target_name = %target, "{}", message),
      LogLevel::Error => error!(target_name = %target, "{}", message),
    }

    self.lines.push(LogLine {
      level,
      target: self.current_target.clone(),
      message,
    });
  }
}
