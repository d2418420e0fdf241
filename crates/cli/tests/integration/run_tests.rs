//! Tests for `brisk run`.

use predicates::prelude::*;

use super::common::{TestProject, brisk_cmd, release_project};

#[test]
fn run_default_target_builds_the_package() {
  let project = release_project();

  project
    .cmd("run")
    .assert()
    .success()
    .stdout(predicate::str::contains("Build succeeded"));

  assert!(project.root().join("out/Rocket_5.4.3.zip").is_file());
  let version = project.read_file("out/version.txt");
  assert!(version.contains("ProductName=Rocket"), "{version}");
  assert!(version.contains("Version=5.4.3.2"), "{version}");
}

#[test]
fn run_named_target_only_runs_its_closure() {
  let project = release_project();

  project.cmd("run").arg("stamp").assert().success();

  assert!(project.root().join("out/version.txt").is_file());
  assert!(!project.root().join("out/Rocket_5.4.3.zip").exists());
}

#[test]
fn failing_target_propagates_exit_code_and_skips_dependents() {
  let project = release_project();
  std::fs::remove_file(project.root().join("ProjectVersion.txt")).unwrap();

  project
    .cmd("run")
    .assert()
    .code(1)
    .stdout(predicate::str::contains("skipped"))
    .stderr(predicate::str::contains("Build failed"));

  assert!(!project.root().join("out").exists());
}

#[cfg(unix)]
#[test]
fn process_exit_code_becomes_build_exit_code() {
  let project = TestProject::new(
    r#"
[[target]]
name = "compile"

[[target.task]]
type = "run_program"
program = "/bin/sh"
args = ["-c", "exit 3"]

[[target]]
name = "test"
depends_on = ["compile"]

[[target.task]]
type = "write_version"
file = "tested.txt"
"#,
  );

  project.cmd("run").arg("test").assert().code(3);
  assert!(!project.root().join("tested.txt").exists());
}

#[test]
fn property_override_reaches_tasks() {
  let project = release_project();

  project
    .cmd("run")
    .arg("stamp")
    .arg("-p")
    .arg("ProductName=Booster")
    .assert()
    .success();

  assert!(project.read_file("out/version.txt").contains("ProductName=Booster"));
}

#[test]
fn build_version_flag_beats_script_property() {
  let project = TestProject::new(
    r#"
[properties]
ProductName = "Rocket"
BuildVersion = "1.0.0.0"

[[target]]
name = "stamp"

[[target.task]]
type = "write_version"
file = "version.txt"
"#,
  );

  project
    .cmd("run")
    .arg("stamp")
    .arg("--build-version")
    .arg("9.9.9.9")
    .assert()
    .success();

  let version = project.read_file("version.txt");
  assert!(version.contains("Version=9.9.9.9"), "{version}");
  assert!(version.contains("ShortVersion=9.9"), "{version}");
}

#[test]
fn script_build_version_used_without_flag() {
  let project = TestProject::new(
    r#"
[properties]
BuildVersion = "4.2.0.0"

[[target]]
name = "stamp"

[[target.task]]
type = "write_version"
file = "version.txt"
"#,
  );

  project.cmd("run").arg("stamp").assert().success();

  assert!(project.read_file("version.txt").contains("Version=4.2.0.0"));
}

#[test]
fn run_json_reports_every_target() {
  let project = release_project();

  let output = project.cmd("run").arg("--output").arg("json").output().unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let names: Vec<&str> = report["targets"]
    .as_array()
    .unwrap()
    .iter()
    .map(|t| t["name"].as_str().unwrap())
    .collect();
  assert_eq!(names, vec!["version", "stamp", "package"]);
  assert_eq!(report["exit_code"], 0);
  assert_eq!(report["targets"][0]["status"], "succeeded");
}

#[test]
fn unknown_target_is_a_usage_error() {
  let project = release_project();

  project
    .cmd("run")
    .arg("deploy")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("deploy"));
}

#[test]
fn missing_script_fails_cleanly() {
  let temp = tempfile::TempDir::new().unwrap();

  brisk_cmd()
    .arg("run")
    .arg("-f")
    .arg(temp.path().join("brisk.toml"))
    .assert()
    .code(1)
    .stderr(predicate::str::contains("brisk.toml"));
}

#[test]
fn malformed_property_flag_is_rejected() {
  let project = release_project();

  project
    .cmd("run")
    .arg("-p")
    .arg("novalue")
    .assert()
    .failure()
    .stderr(predicate::str::contains("KEY=VALUE"));
}
