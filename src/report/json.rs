//! JSON-lines reporter.

use std::io::{self, Write};

use serde::Serialize;

use super::TestReporter;
use crate::descriptor::TestDescriptor;
use crate::failure::Failure;
use crate::result::{RunSummary, Status, TestResult};

/// One serialized test result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonResult<'a> {
    pub name: &'a str,
    pub status: Status,
    pub kind: Option<&'static str>,
    pub expected: Option<&'a str>,
    pub actual: Option<&'a str>,
    pub message: Option<String>,
    pub duration_ms: u128,
}

impl<'a> JsonResult<'a> {
    pub fn from_result(result: &'a TestResult) -> Self {
        let failure = result.failure();
        let assertion = failure.and_then(Failure::as_assertion);
        Self {
            name: result.descriptor().display_name(),
            status: result.status(),
            kind: failure.map(|f| f.kind().name()),
            expected: assertion.map(|a| a.expected()),
            actual: assertion.map(|a| a.actual()),
            message: failure.map(|f| f.to_string()),
            duration_ms: result.duration().as_millis(),
        }
    }
}

#[derive(Serialize)]
struct SummaryLine<'a> {
    summary: &'a RunSummary,
}

/// Writes one JSON object per line: a result object per test, then `{"summary": {...}}`.
pub struct JsonReporter<W: Write = io::Stdout> {
    out: W,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit<T: Serialize>(&mut self, value: &T) {
        match serde_json::to_string(value) {
            Ok(line) => {
                let _ = writeln!(self.out, "{line}");
            }
            Err(err) => tracing::warn!(%err, "failed to serialize report line"),
        }
    }
}

impl<W: Write> TestReporter for JsonReporter<W> {
    fn on_collection_complete(&mut self, _test_count: usize) {}

    fn on_test_complete(&mut self, _test: &TestDescriptor, result: &TestResult) {
        self.emit(&JsonResult::from_result(result));
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        self.emit(&SummaryLine { summary });
        let _ = self.out.flush();
    }
}
