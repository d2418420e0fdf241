//! Build scripts loaded from disk and run through the scheduler.

use std::fs;
use std::path::Path;

use brisk_lib::context::{BuildConfig, ExecutionContext, keys};
use brisk_lib::schedule::TargetStatus;
use brisk_lib::script::{BuildScript, ScriptError};
use tempfile::TempDir;

fn load(dir: &Path, script: &str) -> BuildScript {
  let path = dir.join("brisk.toml");
  fs::write(&path, script).unwrap();
  BuildScript::load(&path).unwrap()
}

fn context_for(script: &BuildScript, root: &Path) -> ExecutionContext {
  let mut properties = script.property_values().unwrap();
  properties.push((keys::PRODUCT_ROOT_DIR.to_string(), root.to_path_buf().into()));
  ExecutionContext::new(&BuildConfig {
    properties,
    ..Default::default()
  })
}

#[test]
fn version_file_flows_into_package_name() {
  let temp = TempDir::new().unwrap();
  let root = temp.path();
  fs::write(root.join("ProjectVersion.txt"), "# release line\n3.2.1.400\n").unwrap();
  fs::create_dir_all(root.join("publish")).unwrap();
  fs::write(root.join("publish").join("app.dll"), "app").unwrap();

  let script = load(
    root,
    &format!(
      r#"
default_target = "package"

[properties]
ProductName = "Rocket"
CompanyName = "Acme"

[[target]]
name = "version"

[[target.task]]
type = "fetch_version"

[[target]]
name = "package"
depends_on = ["version"]

[[target.task]]
type = "package"
destination = '{out}'
zip_prefix = "Rocket"
directories = [{{ source = '{publish}', destination = "app" }}]
"#,
      out = root.join("out").display(),
      publish = root.join("publish").display(),
    ),
  );

  let mut ctx = context_for(&script, root);
  let mut scheduler = script.to_scheduler().unwrap();
  let default = scheduler.default_target().unwrap().to_string();
  let report = scheduler.run(&mut ctx, &[default]).unwrap();

  assert!(report.is_success(), "{:?}", ctx.fail_state());
  assert_eq!(report.status("version"), Some(TargetStatus::Succeeded));
  assert!(root.join("out").join("Rocket_3.2.1.zip").is_file());
}

#[test]
fn missing_version_file_fails_the_build() {
  let temp = TempDir::new().unwrap();
  let script = load(
    temp.path(),
    r#"
[[target]]
name = "version"

[[target.task]]
type = "fetch_version"

[[target]]
name = "stamp"
depends_on = ["version"]

[[target.task]]
type = "write_version"
file = "version.txt"
"#,
  );

  let mut ctx = context_for(&script, temp.path());
  let report = script.to_scheduler().unwrap().run(&mut ctx, &["stamp"]).unwrap();

  assert_eq!(report.status("version"), Some(TargetStatus::Failed { exit_code: 1 }));
  assert_eq!(report.status("stamp"), Some(TargetStatus::Skipped));
  assert_eq!(report.exit_code, 1);
  assert!(!temp.path().join("version.txt").exists());
}

#[test]
fn unknown_dependency_is_reported_before_running() {
  let temp = TempDir::new().unwrap();
  let script = load(
    temp.path(),
    r#"
[[target]]
name = "stamp"
depends_on = ["nowhere"]

[[target.task]]
type = "write_version"
file = "version.txt"
"#,
  );

  let mut ctx = context_for(&script, temp.path());
  let result = script.to_scheduler().unwrap().run(&mut ctx, &["stamp"]);

  assert!(result.is_err());
  assert!(!temp.path().join("version.txt").exists());
}

#[test]
fn unreadable_script_reports_its_path() {
  let temp = TempDir::new().unwrap();
  let missing = temp.path().join("absent.toml");

  match BuildScript::load(&missing) {
    Err(ScriptError::Read { path, .. }) => assert_eq!(path, missing),
    other => panic!("expected a read error, got {other:?}"),
  }
}
