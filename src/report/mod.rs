//! Reporting collaborators.
//!
//! The runner drives a [`TestReporter`] while it executes tests. Reporting is kept out of the
//! runner so output formats can be swapped without touching execution:
//!
//! - [`ConsoleReporter`]: `"<name>... PASS"` / `"<name>... FAIL"` lines and a summary.
//! - [`JsonReporter`]: one JSON object per result, then a summary object.
//! - [`NullReporter`]: discards everything (used by [`Runner::run_all`](crate::Runner::run_all)).

mod console;
mod json;

pub use console::ConsoleReporter;
pub use json::{JsonReporter, JsonResult};

use crate::descriptor::TestDescriptor;
use crate::result::{RunSummary, TestResult};

/// Receives progress callbacks from the runner, always in input order.
pub trait TestReporter {
    /// Called once the test list is known.
    fn on_collection_complete(&mut self, test_count: usize);

    /// Called before a test's result is reported.
    fn on_test_start(&mut self, _test: &TestDescriptor) {}

    /// Called with each test's result.
    fn on_test_complete(&mut self, test: &TestDescriptor, result: &TestResult);

    /// Called after every test has completed.
    fn on_run_complete(&mut self, summary: &RunSummary);
}

/// Reporter that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl TestReporter for NullReporter {
    fn on_collection_complete(&mut self, _test_count: usize) {}

    fn on_test_complete(&mut self, _test: &TestDescriptor, _result: &TestResult) {}

    fn on_run_complete(&mut self, _summary: &RunSummary) {}
}
