//! testease: a minimal unit-testing harness.
//!
//! Tag functions as tests, discover them, run each in isolation and classify the outcome as a
//! pass, an assertion failure or an unexpected error.
//!
//! ```rust
//! use testease::{assert, kinds, Outcome};
//!
//! #[testease::test(name = "Example of Assert.Equal")]
//! fn equal() -> Outcome {
//!     assert::equal(4, 2 + 2)
//! }
//!
//! #[derive(Default)]
//! struct Calculator {
//!     zero: i32,
//! }
//!
//! #[testease::fixture]
//! impl Calculator {
//!     #[test]
//!     fn divide_by_zero(&self) -> Outcome {
//!         let zero = self.zero;
//!         assert::throws(&kinds::DIVIDE_BY_ZERO, move || {
//!             let _ = 1 / zero;
//!         })
//!     }
//! }
//!
//! let results = testease::run_all(None);
//! assert!(results.iter().all(|r| r.pass()));
//! ```
//!
//! ## Layout
//!
//! - [`assert`]: assertion primitives returning [`Outcome`].
//! - [`descriptor`]: marker, method reference and resolved descriptor.
//! - [`discovery`]: registry enumeration, skip filtering, ordering.
//! - [`executor`]: validation, fixture lifetime, failure capture for one test.
//! - [`runner`]: sequential or concurrent execution of many tests.
//! - [`report`]: console and JSON reporters.
//! - [`cli`]: command-line front end shared by the `testease` binary and `harness = false` targets.
//!
//! ## Panic Policy
//!
//! Test bodies may panic; the executor captures it. Harness code itself returns `Result`s and
//! never unwraps. The `cli` module enforces `#![deny(clippy::unwrap_used)]`.

extern crate self as testease;

pub mod assert;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod discovery;
pub mod executor;
pub mod failure;
pub mod panic;
pub mod report;
pub mod result;
pub mod runner;

pub use testease_core::kinds;
pub use testease_core::kinds::Kind;
pub use testease_derive::{fixture, test};

#[doc(hidden)]
pub use inventory;

pub use config::RunConfig;
pub use descriptor::{Location, Returns, Signature, Target, TestDescriptor, TestEntry, TestMarker, TestMethod};
pub use discovery::{InventoryDiscovery, Registry, TestDiscovery};
pub use failure::{AssertionFailure, ContractViolation, Failure, IntoOutcome, Outcome, RaisedError, ResultExt};
pub use report::{ConsoleReporter, JsonReporter, NullReporter, TestReporter};
pub use result::{Phase, RunSummary, Status, TestResult};
pub use runner::Runner;

/// Discover every registered test, excluding skipped ones unless `include_skipped`.
pub fn find_tests(include_skipped: bool) -> Vec<TestDescriptor> {
    discovery::find_tests(include_skipped)
}

/// Run `descriptors` (all discovered tests when `None`) sequentially.
pub fn run_all(descriptors: Option<Vec<TestDescriptor>>) -> Vec<TestResult> {
    Runner::default().run_all(descriptors)
}

/// Run one test.
pub fn run_one(descriptor: &TestDescriptor) -> TestResult {
    executor::run_one(descriptor)
}
