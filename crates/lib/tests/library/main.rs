//! End-to-end tests for brisk-lib through its public API.

mod archive_tests;
mod common;
mod schedule_tests;
mod script_tests;
