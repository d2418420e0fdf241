//! Reading and writing build version files.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::consts::PROJECT_VERSION_FILE;
use crate::context::{BuildVersion, ExecutionContext, keys};
use crate::task::fluent::{TaskHandle, impl_task_handle};
use crate::task::{Task, TaskBase, TaskError};

/// Reads the build version from a text file and stores it under `BuildVersion`.
///
/// The first line that parses as a version wins. A leading `v` and anything
/// after a `#` are ignored, so the file can carry comments.
#[derive(Default)]
pub struct FetchBuildVersionTask {
  base: TaskBase,
  file: Option<PathBuf>,
}

impl FetchBuildVersionTask {
  pub fn new() -> Self {
    Self::default()
  }

  /// Read from `path` instead of `ProductRootDir/ProjectVersion.txt`.
  pub fn from_file(path: impl Into<PathBuf>) -> Self {
    Self {
      base: TaskBase::default(),
      file: Some(path.into()),
    }
  }

  fn resolve_file(&self, ctx: &ExecutionContext) -> PathBuf {
    self
      .file
      .clone()
      .unwrap_or_else(|| ctx.product_root().join(PROJECT_VERSION_FILE))
  }
}

/// Find the first version in `content`.
pub fn parse_version_file(content: &str) -> Option<BuildVersion> {
  content.lines().find_map(|line| {
    let line = line.split('#').next().unwrap_or_default().trim();
    let line = line.strip_prefix(['v', 'V']).unwrap_or(line);
    line.parse().ok()
  })
}

impl_task_handle!(FetchBuildVersionTask);

impl Task for FetchBuildVersionTask {
  fn base(&self) -> &TaskBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut TaskBase {
    &mut self.base
  }

  fn default_description(&self) -> String {
    "fetch build version".to_string()
  }

  fn do_execute(&mut self, ctx: &mut ExecutionContext) -> Result<i32, TaskError> {
    let path = self.resolve_file(ctx);
    let content = fs::read_to_string(&path)
      .map_err(|e| TaskError::failed(format!("cannot read version file {}: {e}", path.display()), 1))?;

    let Some(version) = parse_version_file(&content) else {
      return Err(TaskError::failed(
        format!("no build version found in {}", path.display()),
        1,
      ));
    };

    debug!(path = ?path, version = %version, "fetched build version");
    ctx.set_build_version(version);
    self.log_info(ctx, &format!("Build version: {version}"));
    Ok(0)
  }
}

/// Writes a plain-text file describing the product version.
///
/// ```text
/// ProductName=Rocket
/// Version=2.5.30.4
/// ShortVersion=2.5
/// Company=Acme
/// ```
pub struct WriteVersionFileTask {
  base: TaskBase,
  file: PathBuf,
  product_name: Option<String>,
  version: Option<BuildVersion>,
  field_count: Option<usize>,
}

impl WriteVersionFileTask {
  /// Write to `path`, relative paths resolving against the product root.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      base: TaskBase::default(),
      file: path.into(),
      product_name: None,
      version: None,
      field_count: None,
    }
  }

  pub fn file(&self) -> &std::path::Path {
    &self.file
  }

  fn render(&self, ctx: &ExecutionContext, version: BuildVersion) -> String {
    let product = self
      .product_name
      .clone()
      .or_else(|| ctx.try_get(keys::PRODUCT_NAME))
      .or_else(|| ctx.try_get(keys::PRODUCT_ID))
      .unwrap_or_default();
    let company: String = ctx.get_or(keys::COMPANY_NAME, String::new());
    let fields = self
      .field_count
      .unwrap_or_else(|| ctx.get_or(keys::PRODUCT_VERSION_FIELD_COUNT, 2usize));

    format!(
      "ProductName={product}\nVersion={version}\nShortVersion={}\nCompany={company}\n",
      version.to_string_fields(fields)
    )
  }
}

impl_task_handle!(WriteVersionFileTask);

pub trait WriteVersionFileBuilder: TaskHandle<Task = WriteVersionFileTask> {
  /// Product name written instead of the `ProductName` property.
  fn product(mut self, name: impl Into<String>) -> Self {
    self.task_mut().product_name = Some(name.into());
    self
  }

  /// Write this version instead of the context's build version.
  fn version(mut self, version: BuildVersion) -> Self {
    self.task_mut().version = Some(version);
    self
  }

  fn short_version_fields(mut self, count: usize) -> Self {
    self.task_mut().field_count = Some(count);
    self
  }
}

impl<H: TaskHandle<Task = WriteVersionFileTask>> WriteVersionFileBuilder for H {}

impl Task for WriteVersionFileTask {
  fn base(&self) -> &TaskBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut TaskBase {
    &mut self.base
  }

  fn default_description(&self) -> String {
    format!("write version file {}", self.file.display())
  }

  fn do_execute(&mut self, ctx: &mut ExecutionContext) -> Result<i32, TaskError> {
    let Some(version) = self.version.or_else(|| ctx.build_version()) else {
      return Err(TaskError::failed("build version is not set", 1));
    };

    let path = ctx.product_root().join(&self.file);
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent)?;
    }

    fs::write(&path, self.render(ctx, version))?;
    self.log_info(ctx, &format!("Wrote version {version} to {}", path.display()));
    Ok(0)
  }
}
