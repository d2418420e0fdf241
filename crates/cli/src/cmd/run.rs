//! Implementation of the `brisk run` command.
//!
//! Loads the build script, runs the requested targets, prints a per-target
//! summary and returns the build's exit code.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use brisk_lib::context::{BuildConfig, BuildVersion, ExecutionContext, PropertyValue};

use crate::output::{OutputFormat, format_duration, print_error, print_json, print_success, print_target_status};

use super::load_script;

pub struct RunOptions {
  pub file: PathBuf,
  pub targets: Vec<String>,
  pub continue_on_failure: bool,
  pub properties: Vec<(String, String)>,
  pub build_version: Option<BuildVersion>,
  pub output: OutputFormat,
}

pub fn cmd_run(options: RunOptions) -> Result<i32> {
  let script = load_script(&options.file)?;

  let mut properties = script.property_values().context("Invalid [properties] table")?;
  properties.extend(
    options
      .properties
      .into_iter()
      .map(|(key, value)| (key, PropertyValue::String(value))),
  );

  let config = BuildConfig {
    continue_on_failure: options.continue_on_failure,
    properties,
    build_version: options.build_version,
    os: None,
  };

  let mut scheduler = script
    .to_scheduler()
    .context("Invalid build script")?
    .continue_on_failure(config.continue_on_failure);
  let mut ctx = ExecutionContext::new(&config);
  debug!(targets = ?options.targets, "running build");

  let report = scheduler.run(&mut ctx, &options.targets).context("Invalid build definition")?;

  if options.output.is_json() {
    print_json(&report)?;
    return Ok(report.exit_code);
  }

  println!();
  for target in &report.targets {
    print_target_status(&target.name, target.status, target.duration);
  }
  println!();

  let elapsed = format_duration(report.duration);
  match &report.failure {
    None => print_success(&format!("Build succeeded in {elapsed}")),
    Some(failure) => print_error(&format!(
      "Build failed in {elapsed} (exit code {}): {}",
      report.exit_code, failure.message
    )),
  }

  Ok(report.exit_code)
}

/// Parse a `KEY=VALUE` property override.
pub fn parse_property(s: &str) -> Result<(String, String), String> {
  let (key, value) = s
    .split_once('=')
    .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
  let key = key.trim();
  if key.is_empty() {
    return Err(format!("property key is empty in '{s}'"));
  }
  Ok((key.to_string(), value.to_string()))
}
