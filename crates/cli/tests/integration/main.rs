//! Integration tests for the brisk binary.

mod common;
mod list_tests;
mod run_tests;
mod unzip_tests;
