//! Test results and run summaries.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::descriptor::TestDescriptor;
use crate::failure::Failure;

/// Lifecycle stage of one test execution.
///
/// Classification is the [`TestResult`] itself; the result records the last stage reached before
/// it, i.e. where a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Discovered,
    Validated,
    Instantiated,
    Invoked,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Discovered => "discovered",
            Phase::Validated => "validated",
            Phase::Instantiated => "instantiated",
            Phase::Invoked => "invoked",
        };
        f.write_str(name)
    }
}

/// Coarse classification of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Passed,
    /// An assertion did not hold.
    Failed,
    /// Anything else went wrong (raised error or contract violation).
    Errored,
}

/// Outcome of running one test. Created once per execution, never mutated.
#[derive(Debug, Clone)]
pub struct TestResult {
    descriptor: TestDescriptor,
    failure: Option<Failure>,
    phase: Phase,
    duration: Duration,
}

impl TestResult {
    pub fn new(descriptor: TestDescriptor, failure: Option<Failure>, phase: Phase, duration: Duration) -> Self {
        Self {
            descriptor,
            failure,
            phase,
            duration,
        }
    }

    pub fn descriptor(&self) -> &TestDescriptor {
        &self.descriptor
    }

    /// The failure cause, `None` on pass.
    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn pass(&self) -> bool {
        self.failure.is_none()
    }

    pub fn fail(&self) -> bool {
        !self.pass()
    }

    /// Whether the failure cause is an assertion failure (as opposed to any other error).
    pub fn assertion_failed(&self) -> bool {
        self.failure.as_ref().is_some_and(Failure::is_assertion)
    }

    pub fn status(&self) -> Status {
        match &self.failure {
            None => Status::Passed,
            Some(Failure::Assertion(_)) => Status::Failed,
            Some(_) => Status::Errored,
        }
    }
}

/// Aggregate counts over a list of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub assertion_failures: usize,
    pub errors: usize,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

impl RunSummary {
    /// Summarise `results`. `duration` is the wall-clock time of the whole run.
    pub fn from_results(results: &[TestResult], duration: Duration) -> Self {
        let mut summary = RunSummary {
            total: results.len(),
            duration,
            ..RunSummary::default()
        };
        for result in results {
            match result.status() {
                Status::Passed => summary.passed += 1,
                Status::Failed => summary.assertion_failures += 1,
                Status::Errored => summary.errors += 1,
            }
        }
        summary.failed = summary.assertion_failures + summary.errors;
        summary
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

fn as_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u128(duration.as_millis())
}
