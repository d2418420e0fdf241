//! Tests for `brisk unzip` against packages produced by `brisk run`.

use predicates::prelude::*;

use super::common::{brisk_cmd, release_project};

#[test]
fn unzip_restores_the_packaged_tree() {
  let project = release_project();
  project.cmd("run").assert().success();

  let archive = project.root().join("out/Rocket_5.4.3.zip");
  let dest = project.root().join("installed");

  brisk_cmd()
    .arg("unzip")
    .arg(&archive)
    .arg(&dest)
    .assert()
    .success()
    .stdout(predicate::str::contains("Extracted 2 files"));

  assert_eq!(project.read_file("installed/app/app.dll"), "app");
  assert_eq!(project.read_file("installed/app/lib/shared.dll"), "shared");
}

#[test]
fn unzip_json_lists_written_files() {
  let project = release_project();
  project.cmd("run").assert().success();

  let output = brisk_cmd()
    .arg("unzip")
    .arg(project.root().join("out/Rocket_5.4.3.zip"))
    .arg(project.root().join("installed"))
    .arg("--output")
    .arg("json")
    .output()
    .unwrap();
  assert!(output.status.success());

  let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(summary["had_metadata"], true);
  assert_eq!(summary["written"].as_array().unwrap().len(), 2);
}

#[test]
fn unzip_missing_archive_fails() {
  let temp = tempfile::TempDir::new().unwrap();

  brisk_cmd()
    .arg("unzip")
    .arg(temp.path().join("absent.zip"))
    .arg(temp.path().join("out"))
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Failed to extract"));
}
