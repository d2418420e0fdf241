//! Loading build scripts.
//!
//! A script is turned into targets through the same fluent builder Rust
//! callers use, so both paths produce identical targets.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::archive::EntryIdentity;
use crate::context::PropertyValue;
use crate::schedule::{ScheduleError, Scheduler};
use crate::target::TargetBuilder;
use crate::task::{Task, TaskConfig};
use crate::tasks::{
  AssemblyInfoBuilder, FetchBuildVersionTask, GenerateCommonAssemblyInfoTask, PackageBuilder, PackageTask,
  RunProgramBuilder, RunProgramTask, ToolchainCommandBuilder, ToolchainCommandTask, UnzipTask,
  WriteVersionFileBuilder, WriteVersionFileTask,
};

pub use types::{BuildScript, DedupSpec, PackageSourceSpec, TargetSpec, TaskKind, TaskSpec};

use types::COMMON_TASK_KEYS;

#[derive(Debug, Error)]
pub enum ScriptError {
  #[error("failed to read build script {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse build script: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("invalid property '{key}': {reason}")]
  InvalidProperty { key: String, reason: String },

  #[error("target '{target}': {message}")]
  InvalidTask { target: String, message: String },

  #[error(transparent)]
  Schedule(#[from] ScheduleError),
}

impl FromStr for BuildScript {
  type Err = ScriptError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let script: Self = toml::from_str(s)?;
    reject_unknown_task_keys(&s.parse::<toml::Table>()?)?;
    Ok(script)
  }
}

/// Flattened task tables cannot use `deny_unknown_fields`, so their keys are
/// checked on the raw document.
fn reject_unknown_task_keys(raw: &toml::Table) -> Result<(), ScriptError> {
  let targets = raw.get("target").and_then(toml::Value::as_array).into_iter().flatten();
  for target in targets.filter_map(toml::Value::as_table) {
    let name = target.get("name").and_then(toml::Value::as_str).unwrap_or_default();
    let tasks = target.get("task").and_then(toml::Value::as_array).into_iter().flatten();

    for task in tasks.filter_map(toml::Value::as_table) {
      let type_name = task.get("type").and_then(toml::Value::as_str).unwrap_or_default();
      let Some(specific) = TaskKind::accepted_keys(type_name) else {
        continue;
      };
      if let Some(key) = task
        .keys()
        .find(|key| !COMMON_TASK_KEYS.contains(&key.as_str()) && !specific.contains(&key.as_str()))
      {
        return Err(ScriptError::InvalidTask {
          target: name.to_string(),
          message: format!("unknown key '{key}' in {type_name} task"),
        });
      }
    }
  }
  Ok(())
}

impl BuildScript {
  pub fn load(path: &Path) -> Result<Self, ScriptError> {
    let content = fs::read_to_string(path).map_err(|source| ScriptError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let script: Self = content.parse()?;
    debug!(path = ?path, targets = script.targets.len(), "loaded build script");
    Ok(script)
  }

  /// The `[properties]` table as typed property values.
  pub fn property_values(&self) -> Result<Vec<(String, PropertyValue)>, ScriptError> {
    self
      .properties
      .iter()
      .map(|(key, value)| Ok((key.clone(), property_value(key, value)?)))
      .collect()
  }

  /// Register every target with a new scheduler.
  pub fn to_scheduler(&self) -> Result<Scheduler, ScriptError> {
    let mut scheduler = Scheduler::new();
    for spec in &self.targets {
      scheduler.add_target(target_builder(spec)?)?;
    }
    if let Some(default) = &self.default_target {
      scheduler.set_default_target(default.clone());
    }
    Ok(scheduler)
  }
}

fn property_value(key: &str, value: &toml::Value) -> Result<PropertyValue, ScriptError> {
  let invalid = |reason: &str| ScriptError::InvalidProperty {
    key: key.to_string(),
    reason: reason.to_string(),
  };

  match value {
    toml::Value::String(s) => Ok(PropertyValue::String(s.clone())),
    toml::Value::Boolean(b) => Ok(PropertyValue::Bool(*b)),
    toml::Value::Integer(i) => Ok(PropertyValue::Int(*i)),
    toml::Value::Array(items) => items
      .iter()
      .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid("arrays may only hold strings")))
      .collect::<Result<Vec<_>, _>>()
      .map(PropertyValue::List),
    toml::Value::Float(_) | toml::Value::Datetime(_) | toml::Value::Table(_) => {
      Err(invalid("expected a string, boolean, integer or string array"))
    }
  }
}

fn target_builder(spec: &TargetSpec) -> Result<TargetBuilder, ScriptError> {
  let mut builder = TargetBuilder::new(spec.name.clone()).depends_on(spec.depends_on.iter().cloned());
  if let Some(description) = &spec.description {
    builder = builder.set_description(description.clone());
  }

  for task in &spec.tasks {
    builder = add_task(builder, task).map_err(|message| ScriptError::InvalidTask {
      target: spec.name.clone(),
      message,
    })?;
  }
  Ok(builder)
}

fn add_task(builder: TargetBuilder, spec: &TaskSpec) -> Result<TargetBuilder, String> {
  let builder = match &spec.kind {
    TaskKind::RunProgram {
      program,
      capture_output,
      capture_error_output,
      output_property,
      timeout_secs,
      env,
    } => {
      let mut task = RunProgramTask::new(program.clone());
      if *capture_output {
        task = task.capture_output();
      }
      if *capture_error_output {
        task = task.capture_error_output();
      }
      if let Some(key) = output_property {
        task = task.output_to_property(key.clone());
      }
      if let Some(secs) = timeout_secs {
        task = task.with_timeout(Duration::from_secs(*secs));
      }
      for (key, value) in env {
        task = task.with_env(key.clone(), value.clone());
      }
      attach(builder, task, spec)
    }

    TaskKind::Toolchain {
      tool,
      command,
      executable,
      executable_property,
    } => {
      let mut task = match (tool.as_deref(), executable_property) {
        (None | Some("dotnet"), None) => ToolchainCommandTask::dotnet_command(command.clone()),
        (Some(tool), Some(property)) => ToolchainCommandTask::new(tool, command.clone(), property.clone()),
        (None, Some(property)) => ToolchainCommandTask::new("dotnet", command.clone(), property.clone()),
        (Some(tool), None) if executable.is_some() => {
          ToolchainCommandTask::new(tool, command.clone(), format!("{tool}Executable"))
        }
        (Some(tool), None) => {
          return Err(format!(
            "toolchain '{tool}' needs an 'executable' or 'executable_property'"
          ));
        }
      };
      if let Some(path) = executable {
        task = task.executable(path.clone());
      }
      attach(builder, task, spec)
    }

    TaskKind::Package {
      destination,
      zip_prefix,
      add_version,
      dedup,
      directories,
      files,
    } => {
      let identity = match dedup {
        DedupSpec::Content => EntryIdentity::Content,
        DedupSpec::SourcePath => EntryIdentity::SourcePath,
      };
      let mut task = PackageTask::new(destination.clone()).dedup_by(identity);
      if let Some(prefix) = zip_prefix {
        task = task.zip_package(prefix.clone());
      }
      if !add_version {
        task = task.without_version();
      }
      for dir in directories {
        task = task.add_directory_to_package(dir.source.clone(), dir.destination.clone().unwrap_or_default());
      }
      for file in files {
        let destination = match &file.destination {
          Some(d) => d.clone(),
          None => file
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| format!("package file {} has no file name", file.source.display()))?,
        };
        task = task.add_file_to_package(file.source.clone(), destination);
      }
      attach(builder, task, spec)
    }

    TaskKind::Unzip { archive, destination } => {
      attach(builder, UnzipTask::new(archive.clone(), destination.clone()), spec)
    }

    TaskKind::AssemblyInfo {
      product_root_dir,
      product_name,
      company_name,
      informational_version,
      product_version_field_count,
      generate_assembly_version,
      generate_configuration_attribute,
      generate_culture_attribute,
    } => {
      let mut task = GenerateCommonAssemblyInfoTask::new();
      if let Some(dir) = product_root_dir {
        task = task.product_root_dir(dir.clone());
      }
      if let Some(name) = product_name {
        task = task.product_name(name.clone());
      }
      if let Some(name) = company_name {
        task = task.company_name(name.clone());
      }
      if let Some(version) = informational_version {
        task = task.informational_version(version.clone());
      }
      if let Some(count) = product_version_field_count {
        task = task.product_version_field_count(*count);
      }
      if let Some(generate) = generate_assembly_version {
        task = task.generate_assembly_version(*generate);
      }
      if *generate_configuration_attribute {
        task = task.generate_configuration_attribute();
      }
      if *generate_culture_attribute {
        task = task.generate_culture_attribute();
      }
      attach(builder, task, spec)
    }

    TaskKind::WriteVersion { file, product, fields } => {
      let mut task = WriteVersionFileTask::new(file.clone());
      if let Some(product) = product {
        task = task.product(product.clone());
      }
      if let Some(fields) = fields {
        task = task.short_version_fields(*fields);
      }
      attach(builder, task, spec)
    }

    TaskKind::FetchVersion { file } => {
      let task = match file {
        Some(file) => FetchBuildVersionTask::from_file(file.clone()),
        None => FetchBuildVersionTask::new(),
      };
      attach(builder, task, spec)
    }
  };
  Ok(builder)
}

/// Append `task` with the settings every task table shares.
fn attach<T: Task + 'static>(builder: TargetBuilder, task: T, spec: &TaskSpec) -> TargetBuilder {
  let mut chain = builder.add_task(task).with_arguments(spec.args.iter().cloned());
  if let Some(folder) = &spec.working_folder {
    chain = chain.working_folder(folder.clone());
  }
  if spec.no_log {
    chain = chain.no_log();
  }
  if spec.do_not_log_output {
    chain = chain.do_not_log_output();
  }
  if let Some(description) = &spec.description {
    chain = chain.set_description(description.clone());
  }
  chain.back_to_target()
}
