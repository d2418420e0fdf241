//! Serde model of a build script file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// A whole build script.
///
/// ```toml
/// default_target = "package"
///
/// [properties]
/// ProductName = "Rocket"
///
/// [[target]]
/// name = "compile"
///
/// [[target.task]]
/// type = "run_program"
/// program = "cargo"
/// args = ["build", "--release"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildScript {
  #[serde(default)]
  pub default_target: Option<String>,

  #[serde(default)]
  pub properties: toml::Table,

  /// Targets in declaration order.
  #[serde(default, rename = "target")]
  pub targets: Vec<TargetSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSpec {
  pub name: String,

  #[serde(default)]
  pub description: Option<String>,

  #[serde(default)]
  pub depends_on: Vec<String>,

  #[serde(default, rename = "task")]
  pub tasks: Vec<TaskSpec>,
}

/// One task table. The common fields apply to every task type.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskSpec {
  #[serde(default)]
  pub args: Vec<String>,

  #[serde(default)]
  pub working_folder: Option<PathBuf>,

  #[serde(default)]
  pub no_log: bool,

  #[serde(default)]
  pub do_not_log_output: bool,

  #[serde(default)]
  pub description: Option<String>,

  #[serde(flatten)]
  pub kind: TaskKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskKind {
  RunProgram {
    program: String,
    #[serde(default)]
    capture_output: bool,
    #[serde(default)]
    capture_error_output: bool,
    #[serde(default)]
    output_property: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    env: BTreeMap<String, String>,
  },

  /// A command run through a toolchain executable. `tool` defaults to dotnet.
  Toolchain {
    #[serde(default)]
    tool: Option<String>,
    command: String,
    #[serde(default)]
    executable: Option<String>,
    #[serde(default)]
    executable_property: Option<String>,
  },

  Package {
    destination: PathBuf,
    #[serde(default)]
    zip_prefix: Option<String>,
    #[serde(default = "default_true")]
    add_version: bool,
    #[serde(default)]
    dedup: DedupSpec,
    #[serde(default)]
    directories: Vec<PackageSourceSpec>,
    #[serde(default)]
    files: Vec<PackageSourceSpec>,
  },

  Unzip {
    archive: PathBuf,
    destination: PathBuf,
  },

  AssemblyInfo {
    #[serde(default)]
    product_root_dir: Option<PathBuf>,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    informational_version: Option<String>,
    #[serde(default)]
    product_version_field_count: Option<usize>,
    #[serde(default)]
    generate_assembly_version: Option<bool>,
    #[serde(default)]
    generate_configuration_attribute: bool,
    #[serde(default)]
    generate_culture_attribute: bool,
  },

  WriteVersion {
    file: PathBuf,
    #[serde(default)]
    product: Option<String>,
    #[serde(default)]
    fields: Option<usize>,
  },

  FetchVersion {
    #[serde(default)]
    file: Option<PathBuf>,
  },
}

/// Keys every task table accepts, whatever its `type`.
pub(crate) const COMMON_TASK_KEYS: &[&str] = &[
  "type",
  "args",
  "working_folder",
  "no_log",
  "do_not_log_output",
  "description",
];

impl TaskKind {
  /// Keys a task table of type `type_name` accepts on top of [`COMMON_TASK_KEYS`].
  pub(crate) fn accepted_keys(type_name: &str) -> Option<&'static [&'static str]> {
    let keys: &'static [&'static str] = match type_name {
      "run_program" => &[
        "program",
        "capture_output",
        "capture_error_output",
        "output_property",
        "timeout_secs",
        "env",
      ],
      "toolchain" => &["tool", "command", "executable", "executable_property"],
      "package" => &["destination", "zip_prefix", "add_version", "dedup", "directories", "files"],
      "unzip" => &["archive", "destination"],
      "assembly_info" => &[
        "product_root_dir",
        "product_name",
        "company_name",
        "informational_version",
        "product_version_field_count",
        "generate_assembly_version",
        "generate_configuration_attribute",
        "generate_culture_attribute",
      ],
      "write_version" => &["file", "product", "fields"],
      "fetch_version" => &["file"],
      _ => return None,
    };
    Some(keys)
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupSpec {
  #[default]
  Content,
  SourcePath,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSourceSpec {
  pub source: PathBuf,
  /// Path inside the package. Defaults to the source's file name.
  #[serde(default)]
  pub destination: Option<String>,
}

fn default_true() -> bool {
  true
}
