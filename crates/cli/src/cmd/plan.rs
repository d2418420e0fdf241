//! Implementation of the `brisk plan` command.
//!
//! Resolves the requested targets without running anything and prints the
//! execution order grouped into dependency waves.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};

use crate::output::{OutputFormat, print_json, symbols};

use super::load_script;

pub fn cmd_plan(file: &Path, targets: &[String], output: OutputFormat) -> Result<()> {
  let script = load_script(file)?;
  let scheduler = script.to_scheduler().context("Invalid build script")?;
  let plan = scheduler.plan(targets).context("Invalid build definition")?;

  if output.is_json() {
    return print_json(&plan);
  }

  println!("Plan: {}", plan.requested.join(", "));
  for (index, wave) in plan.waves().iter().enumerate() {
    println!(
      "  {} {} {}",
      format!("wave {}", index + 1).if_supports_color(Stream::Stdout, |s| s.dimmed()),
      symbols::ARROW,
      wave.join(", ")
    );
  }
  println!("Targets: {}", plan.len());

  Ok(())
}
