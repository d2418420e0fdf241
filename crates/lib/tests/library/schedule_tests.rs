//! Scheduling scenarios across several targets.

use brisk_lib::prelude::*;
use brisk_lib::schedule::ScheduleError;

use super::common::{Record, context, entries, journal};

#[test]
fn failed_compile_skips_dependents_and_sets_exit_code() {
  let log = journal();
  let mut scheduler = Scheduler::new();
  scheduler
    .add_target(TargetBuilder::new("compile").do_task(Record::exiting("compile", 4, &log)))
    .unwrap();
  scheduler
    .add_target(
      TargetBuilder::new("test")
        .depends_on(["compile"])
        .do_task(Record::ok("test", &log)),
    )
    .unwrap();
  scheduler
    .add_target(
      TargetBuilder::new("package")
        .depends_on(["test"])
        .do_task(Record::ok("package", &log)),
    )
    .unwrap();

  let mut ctx = context();
  let report = scheduler.run(&mut ctx, &["package"]).unwrap();

  assert_eq!(report.status("compile"), Some(TargetStatus::Failed { exit_code: 4 }));
  assert_eq!(report.status("test"), Some(TargetStatus::Skipped));
  assert_eq!(report.status("package"), Some(TargetStatus::Skipped));
  assert_eq!(report.exit_code, 4);
  assert!(!report.is_success());
  assert_eq!(entries(&log), vec!["compile"]);
}

#[test]
fn shared_dependency_runs_once() {
  let log = journal();
  let mut scheduler = Scheduler::new();
  scheduler
    .add_target(TargetBuilder::new("restore").do_task(Record::ok("restore", &log)))
    .unwrap();
  scheduler
    .add_target(
      TargetBuilder::new("build-api")
        .depends_on(["restore"])
        .do_task(Record::ok("build-api", &log)),
    )
    .unwrap();
  scheduler
    .add_target(
      TargetBuilder::new("build-web")
        .depends_on(["restore"])
        .do_task(Record::ok("build-web", &log)),
    )
    .unwrap();
  scheduler
    .add_target(TargetBuilder::new("all").depends_on(["build-api", "build-web"]))
    .unwrap();

  let mut ctx = context();
  let report = scheduler.run(&mut ctx, &["build-web", "all"]).unwrap();

  assert!(report.is_success());
  assert_eq!(entries(&log), vec!["restore", "build-api", "build-web"]);
  assert_eq!(report.targets.len(), 4);
}

#[test]
fn cycle_is_rejected_before_anything_runs() {
  let log = journal();
  let mut scheduler = Scheduler::new();
  scheduler
    .add_target(
      TargetBuilder::new("a")
        .depends_on(["b"])
        .do_task(Record::ok("a", &log)),
    )
    .unwrap();
  scheduler
    .add_target(
      TargetBuilder::new("b")
        .depends_on(["a"])
        .do_task(Record::ok("b", &log)),
    )
    .unwrap();

  let mut ctx = context();
  let err = scheduler.run(&mut ctx, &["a"]).unwrap_err();

  assert!(matches!(err, ScheduleError::Cycle { ref path } if path.len() >= 2));
  assert!(entries(&log).is_empty());
  assert!(!ctx.has_failed());
}

#[test]
fn running_again_does_not_rerun_settled_targets() {
  let log = journal();
  let mut scheduler = Scheduler::new();
  scheduler
    .add_target(TargetBuilder::new("compile").do_task(Record::ok("compile", &log)))
    .unwrap();

  let mut ctx = context();
  scheduler.run(&mut ctx, &["compile"]).unwrap();
  let second = scheduler.run(&mut ctx, &["compile"]).unwrap();

  assert_eq!(second.status("compile"), Some(TargetStatus::Succeeded));
  assert_eq!(entries(&log), vec!["compile"]);
}

#[test]
fn task_failure_inside_target_stops_remaining_tasks() {
  let log = journal();
  let mut scheduler = Scheduler::new();
  scheduler
    .add_target(
      TargetBuilder::new("compile")
        .do_task(Record::ok("first", &log))
        .do_task(Record::exiting("second", 2, &log))
        .do_task(Record::ok("third", &log)),
    )
    .unwrap();

  let mut ctx = context();
  let report = scheduler.run(&mut ctx, &["compile"]).unwrap();

  assert_eq!(report.exit_code, 2);
  assert_eq!(entries(&log), vec!["first", "second"]);
  assert_eq!(ctx.fail_state().map(|f| f.exit_code), Some(2));
}
