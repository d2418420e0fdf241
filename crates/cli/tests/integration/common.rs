//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get a Command for the brisk binary with logging quietened.
pub fn brisk_cmd() -> Command {
  let mut cmd = cargo_bin_cmd!("brisk");
  cmd.env("RUST_LOG", "warn");
  cmd.env_remove("BRISK_BUILD_VERSION");
  cmd
}

/// Isolated project directory holding a `brisk.toml`.
pub struct TestProject {
  pub temp: TempDir,
}

impl TestProject {
  pub fn new(script: &str) -> Self {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("brisk.toml"), script).unwrap();
    Self { temp }
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  pub fn script_path(&self) -> PathBuf {
    self.root().join("brisk.toml")
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.root().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.root().join(relative_path))
      .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative_path, e))
  }

  /// `brisk` pointed at this project's script.
  pub fn cmd(&self, subcommand: &str) -> Command {
    let mut cmd = brisk_cmd();
    cmd.arg(subcommand).arg("-f").arg(self.script_path());
    cmd
  }
}

/// Stamp, version and package targets that need no external programs.
pub const RELEASE_SCRIPT: &str = r#"
default_target = "package"

[properties]
ProductName = "Rocket"
CompanyName = "Acme"

[[target]]
name = "version"
description = "Read ProjectVersion.txt"

[[target.task]]
type = "fetch_version"

[[target]]
name = "stamp"
depends_on = ["version"]

[[target.task]]
type = "write_version"
file = "out/version.txt"

[[target]]
name = "package"
depends_on = ["stamp"]

[[target.task]]
type = "package"
destination = "out"
zip_prefix = "Rocket"
directories = [{ source = "publish", destination = "app" }]
"#;

pub fn release_project() -> TestProject {
  let project = TestProject::new(RELEASE_SCRIPT);
  project.write_file("ProjectVersion.txt", "5.4.3.2\n");
  project.write_file("publish/app.dll", "app");
  project.write_file("publish/lib/shared.dll", "shared");
  project
}
