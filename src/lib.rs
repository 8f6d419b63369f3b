//! ctask - build-and-test task runner for C unit test suites.
//!
//! Given a toolchain profile and a directory of `test*.c` sources, ctask
//! builds one standalone executable per test file (auxiliary sources,
//! include-resolved dependencies, a generated runner and the test itself),
//! runs it directly or under a simulator, classifies the captured output and
//! records it in `.testpass`/`.testfail` marker files, then prints an
//! aggregate summary.

pub mod builder;
pub mod command;
pub mod config;
pub mod deps;
pub mod executor;
pub mod outcome;
pub mod runner_gen;
pub mod summary;
pub mod tasks;
pub mod utils;
