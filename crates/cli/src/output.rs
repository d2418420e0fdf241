//! CLI output formatting utilities.
//!
//! Colored status symbols, duration formatting, and JSON output.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use brisk_lib::schedule::TargetStatus;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
  pub const SKIPPED: &str = "-";
}

/// Human-readable duration, rounded to milliseconds.
pub fn format_duration(duration: Duration) -> String {
  let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
  humantime::format_duration(Duration::from_millis(millis)).to_string()
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// One summary line for a target.
pub fn print_target_status(name: &str, status: TargetStatus, duration: Duration) {
  match status {
    TargetStatus::Succeeded => println!(
      "{} {} {}",
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
      name,
      format!("({})", format_duration(duration)).if_supports_color(Stream::Stdout, |s| s.dimmed())
    ),
    TargetStatus::Failed { exit_code } => println!(
      "{} {} {}",
      symbols::ERROR.if_supports_color(Stream::Stdout, |s| s.red()),
      name,
      format!("failed (exit code {exit_code})").if_supports_color(Stream::Stdout, |s| s.red())
    ),
    TargetStatus::Skipped | TargetStatus::Pending | TargetStatus::Running => println!(
      "{} {} {}",
      symbols::SKIPPED.if_supports_color(Stream::Stdout, |s| s.dimmed()),
      name,
      status.if_supports_color(Stream::Stdout, |s| s.dimmed())
    ),
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
