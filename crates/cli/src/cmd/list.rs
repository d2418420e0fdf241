//! Implementation of the `brisk list` command.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use crate::output::{OutputFormat, print_info, print_json};

use super::load_script;

#[derive(Serialize)]
struct TargetListing<'a> {
  name: &'a str,
  description: Option<&'a str>,
  depends_on: &'a [String],
  tasks: Vec<String>,
  default: bool,
}

pub fn cmd_list(file: &Path, output: OutputFormat) -> Result<()> {
  let script = load_script(file)?;
  let scheduler = script.to_scheduler().context("Invalid build script")?;

  let listings: Vec<TargetListing<'_>> = scheduler
    .targets()
    .map(|target| TargetListing {
      name: target.name(),
      description: target.description(),
      depends_on: target.dependencies(),
      tasks: target.task_descriptions(),
      default: scheduler.default_target() == Some(target.name()),
    })
    .collect();

  if output.is_json() {
    return print_json(&listings);
  }

  if listings.is_empty() {
    print_info("No targets declared.");
    return Ok(());
  }

  for listing in &listings {
    let marker = if listing.default { " (default)" } else { "" };
    println!(
      "{}{}",
      listing.name.if_supports_color(Stream::Stdout, |s| s.bold()),
      marker.if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
    if let Some(description) = listing.description {
      println!("  {description}");
    }
    if !listing.depends_on.is_empty() {
      println!(
        "  {}",
        format!("depends on: {}", listing.depends_on.join(", ")).if_supports_color(Stream::Stdout, |s| s.dimmed())
      );
    }
  }

  Ok(())
}
