//! Tests for `brisk list`, `brisk plan` and `brisk info`.

use predicates::prelude::*;

use super::common::{TestProject, brisk_cmd, release_project};

#[test]
fn list_marks_default_target() {
  let project = release_project();

  project
    .cmd("list")
    .assert()
    .success()
    .stdout(predicate::str::contains("package (default)"))
    .stdout(predicate::str::contains("Read ProjectVersion.txt"))
    .stdout(predicate::str::contains("depends on: stamp"));
}

#[test]
fn list_json_includes_tasks() {
  let project = release_project();

  let output = project.cmd("list").arg("-o").arg("json").output().unwrap();
  assert!(output.status.success());

  let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let targets = listing.as_array().unwrap();
  assert_eq!(targets.len(), 3);
  assert_eq!(targets[2]["name"], "package");
  assert_eq!(targets[2]["default"], true);
  assert_eq!(targets[1]["depends_on"][0], "version");
}

#[test]
fn plan_prints_waves_without_running() {
  let project = release_project();

  project
    .cmd("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("Plan: package"))
    .stdout(predicate::str::contains("Targets: 3"));

  assert!(!project.root().join("out").exists());
}

#[test]
fn plan_rejects_cycles() {
  let project = TestProject::new(
    r#"
[[target]]
name = "a"
depends_on = ["b"]

[[target]]
name = "b"
depends_on = ["a"]
"#,
  );

  project
    .cmd("plan")
    .arg("a")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("cycle"));
}

#[test]
fn info_shows_host_os_and_separator_policy() {
  brisk_cmd()
    .arg("info")
    .assert()
    .success()
    .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
    .stdout(predicate::str::contains("OS: "))
    .stdout(predicate::str::contains("Archive separators"));
}

#[test]
fn help_lists_commands() {
  brisk_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("run"))
    .stdout(predicate::str::contains("unzip"));
}
