//! Generates `CommonAssemblyInfo.cs` in the product root.
//!
//! Every field left unset is filled from the context when the task runs.
//! The file is rewritten wholesale on every run.

use std::fs;
use std::path::PathBuf;

use crate::consts::COMMON_ASSEMBLY_INFO_FILE;
use crate::context::{BuildVersion, ExecutionContext, keys};
use crate::task::fluent::{TaskHandle, impl_task_handle};
use crate::task::{Task, TaskBase, TaskError};

#[derive(Default)]
pub struct GenerateCommonAssemblyInfoTask {
  base: TaskBase,
  build_version: Option<BuildVersion>,
  product_root_dir: Option<PathBuf>,
  company_name: Option<String>,
  product_name: Option<String>,
  company_copyright: Option<String>,
  company_trademark: Option<String>,
  build_configuration: Option<String>,
  generate_configuration_attribute: bool,
  generate_culture_attribute: bool,
  generate_assembly_version: Option<bool>,
  product_version_field_count: Option<usize>,
  informational_version: Option<String>,
}

/// Values after filling unset fields from the context.
struct AssemblyInfo {
  version: BuildVersion,
  company_name: String,
  product_name: String,
  company_copyright: String,
  company_trademark: String,
  build_configuration: String,
  generate_assembly_version: bool,
  field_count: usize,
  informational_version: Option<String>,
}

impl GenerateCommonAssemblyInfoTask {
  pub fn new() -> Self {
    Self::default()
  }

  fn resolve(&self, ctx: &ExecutionContext) -> Option<AssemblyInfo> {
    let text = |own: &Option<String>, key: &str| {
      own
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| ctx.get_or(key, String::new()))
    };

    let product_name = self
      .product_name
      .clone()
      .filter(|s| !s.is_empty())
      .or_else(|| ctx.try_get(keys::PRODUCT_NAME))
      .or_else(|| ctx.try_get(keys::PRODUCT_ID))
      .unwrap_or_default();

    let field_count = self
      .product_version_field_count
      .filter(|&n| n > 0)
      .unwrap_or_else(|| ctx.get_or(keys::PRODUCT_VERSION_FIELD_COUNT, 2usize));

    Some(AssemblyInfo {
      version: self.build_version.or_else(|| ctx.build_version())?,
      company_name: text(&self.company_name, keys::COMPANY_NAME),
      product_name,
      company_copyright: text(&self.company_copyright, keys::COMPANY_COPYRIGHT),
      company_trademark: text(&self.company_trademark, keys::COMPANY_TRADEMARK),
      build_configuration: text(&self.build_configuration, keys::BUILD_CONFIGURATION),
      generate_assembly_version: self
        .generate_assembly_version
        .unwrap_or_else(|| ctx.get_or(keys::AUTO_ASSEMBLY_VERSION, true)),
      field_count,
      informational_version: self
        .informational_version
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| ctx.try_get(keys::INFORMATIONAL_VERSION)),
    })
  }

  fn render(&self, info: &AssemblyInfo) -> String {
    let mut out = String::from(
      "using System.Reflection;
using System.Runtime.InteropServices;

//------------------------------------------------------------------------------
// <auto-generated>
//     This code was generated by a tool.
//
//     Changes to this file may cause incorrect behavior and will be lost if
//     the code is regenerated.
// </auto-generated>
//------------------------------------------------------------------------------

",
    );

    let short = info.version.to_string_fields(info.field_count);
    let informational = info.informational_version.clone().unwrap_or_else(|| short.clone());

    out.push_str(&format!(
      "[assembly: AssemblyCompanyAttribute(\"{}\")]
[assembly: AssemblyProductAttribute(\"{}\")]
[assembly: AssemblyCopyrightAttribute(\"{}\")]
[assembly: AssemblyTrademarkAttribute(\"{}\")]
[assembly: AssemblyFileVersionAttribute(\"{}\")]
[assembly: ComVisible(false)]
[assembly: AssemblyInformationalVersionAttribute(\"{informational}\")]
",
      info.company_name, info.product_name, info.company_copyright, info.company_trademark, info.version
    ));

    if info.generate_assembly_version {
      out.push_str(&format!("[assembly: AssemblyVersionAttribute(\"{short}\")]\n"));
    }
    if self.generate_configuration_attribute {
      out.push_str(&format!(
        "[assembly: AssemblyConfigurationAttribute(\"{}\")]\n",
        info.build_configuration
      ));
    }
    if self.generate_culture_attribute {
      out.push_str("[assembly: AssemblyCultureAttribute(\"\")]\n");
    }

    out
  }
}

impl_task_handle!(GenerateCommonAssemblyInfoTask);

pub trait AssemblyInfoBuilder: TaskHandle<Task = GenerateCommonAssemblyInfoTask> {
  fn build_version(mut self, version: BuildVersion) -> Self {
    self.task_mut().build_version = Some(version);
    self
  }

  fn product_root_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.task_mut().product_root_dir = Some(dir.into());
    self
  }

  fn company_name(mut self, name: impl Into<String>) -> Self {
    self.task_mut().company_name = Some(name.into());
    self
  }

  fn product_name(mut self, name: impl Into<String>) -> Self {
    self.task_mut().product_name = Some(name.into());
    self
  }

  fn company_copyright(mut self, copyright: impl Into<String>) -> Self {
    self.task_mut().company_copyright = Some(copyright.into());
    self
  }

  fn company_trademark(mut self, trademark: impl Into<String>) -> Self {
    self.task_mut().company_trademark = Some(trademark.into());
    self
  }

  fn build_configuration(mut self, configuration: impl Into<String>) -> Self {
    self.task_mut().build_configuration = Some(configuration.into());
    self
  }

  /// Emit `AssemblyConfigurationAttribute` with the build configuration.
  fn generate_configuration_attribute(mut self) -> Self {
    self.task_mut().generate_configuration_attribute = true;
    self
  }

  fn generate_culture_attribute(mut self) -> Self {
    self.task_mut().generate_culture_attribute = true;
    self
  }

  /// Override the `AutoAssemblyVersion` property.
  fn generate_assembly_version(mut self, generate: bool) -> Self {
    self.task_mut().generate_assembly_version = Some(generate);
    self
  }

  /// Number of version fields used for the short version.
  fn product_version_field_count(mut self, count: usize) -> Self {
    self.task_mut().product_version_field_count = Some(count);
    self
  }

  fn informational_version(mut self, version: impl Into<String>) -> Self {
    self.task_mut().informational_version = Some(version.into());
    self
  }
}

impl<H: TaskHandle<Task = GenerateCommonAssemblyInfoTask>> AssemblyInfoBuilder for H {}

impl Task for GenerateCommonAssemblyInfoTask {
  fn base(&self) -> &TaskBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut TaskBase {
    &mut self.base
  }

  fn default_description(&self) -> String {
    format!("generate {COMMON_ASSEMBLY_INFO_FILE}")
  }

  fn do_execute(&mut self, ctx: &mut ExecutionContext) -> Result<i32, TaskError> {
    let Some(info) = self.resolve(ctx) else {
      return Err(TaskError::failed("Assembly file version is not set.", 1));
    };

    let root = self.product_root_dir.clone().unwrap_or_else(|| ctx.product_root());
    fs::create_dir_all(&root)?;
    let path = root.join(COMMON_ASSEMBLY_INFO_FILE);

    fs::write(&path, self.render(&info))?;
    self.log_info(ctx, &format!("Generated {}", path.display()));
    Ok(0)
  }
}
