//! Executor: runs one test and classifies its outcome.
//!
//! ## Steps
//!
//! 1. Validate the recorded signature (no parameters, no return value).
//! 2. Instance tests: build a fresh fixture, invoke the method on it, release the fixture.
//!    Static tests: invoke directly.
//! 3. Capture whatever went wrong (returned failure or panic) as the result's failure cause.
//!
//! ## Notes
//!
//! - [`run_one`] never panics and never returns an error: every problem becomes data on the
//!   [`TestResult`].
//! - The fixture is released on both the passing and the failing path. A failure while releasing
//!   is reported only when the test itself passed; otherwise the test's own failure is kept.

use std::any::Any;
use std::time::{Duration, Instant};

use tracing::{debug, debug_span, trace};

use crate::descriptor::{Returns, Target, TestDescriptor, TestMethod};
use crate::failure::{ContractViolation, Failure, Outcome, RaisedError};
use crate::panic::capture;
use crate::result::{Phase, TestResult};
use testease_core::kinds;

/// Run one test to completion.
pub fn run_one(descriptor: &TestDescriptor) -> TestResult {
    let span = debug_span!("test", name = %descriptor.display_name());
    let _enter = span.enter();

    let started = Instant::now();
    let mut tracker = PhaseTracker::default();
    let failure = execute(descriptor.method(), &mut tracker).err();
    let duration = started.elapsed();

    match &failure {
        None => debug!(?duration, "passed"),
        Some(failure) => debug!(phase = %tracker.phase, kind = %failure.kind(), %failure, "failed"),
    }

    TestResult::new(descriptor.clone(), failure, tracker.phase, duration)
}

/// Result for a test that did not finish within `limit`.
pub fn timed_out(descriptor: &TestDescriptor, limit: Duration) -> TestResult {
    let failure = Failure::raised(
        &kinds::TIMEOUT,
        format!("test did not finish within {}ms", limit.as_millis()),
    );
    TestResult::new(descriptor.clone(), Some(failure), Phase::Invoked, limit)
}

/// Result for a test whose worker task ended without producing a result.
pub fn aborted(descriptor: &TestDescriptor, reason: impl Into<String>, duration: Duration) -> TestResult {
    let failure = Failure::raised(&kinds::PANIC, reason);
    TestResult::new(descriptor.clone(), Some(failure), Phase::Invoked, duration)
}

// ============================================================================
// Steps
// ============================================================================

#[derive(Debug, Default)]
struct PhaseTracker {
    phase: Phase,
}

impl PhaseTracker {
    fn advance(&mut self, phase: Phase) {
        trace!(from = %self.phase, to = %phase, "phase");
        self.phase = phase;
    }
}

fn execute(method: &TestMethod, tracker: &mut PhaseTracker) -> Outcome {
    validate(method)?;
    tracker.advance(Phase::Validated);

    match method.target {
        Target::Free(body) => {
            tracker.advance(Phase::Invoked);
            capture(body)?
        }
        Target::Instance { factory, call } => {
            let factory = factory.ok_or_else(|| ContractViolation::MissingConstructor {
                owner: method.owner_path().to_string(),
            })?;
            let instance = capture(factory)??;
            let mut fixture = FixtureGuard::new(instance);
            tracker.advance(Phase::Instantiated);

            tracker.advance(Phase::Invoked);
            let outcome = capture(|| call(fixture.instance_mut())).and_then(|outcome| outcome);
            let released = fixture.release();
            outcome.and(released)
        }
        Target::Unbound => Err(ContractViolation::Unbound {
            name: method.name.to_string(),
        }
        .into()),
    }
}

/// Check the recorded shape before anything is invoked.
fn validate(method: &TestMethod) -> Result<(), ContractViolation> {
    let signature = method.signature;
    if !signature.params.is_empty() {
        return Err(ContractViolation::Parameters {
            params: signature.params.iter().map(|p| p.to_string()).collect(),
        });
    }
    if let Returns::Value(ty) = signature.returns {
        return Err(ContractViolation::ReturnsValue { ty: ty.to_string() });
    }
    Ok(())
}

// ============================================================================
// Fixture lifetime
// ============================================================================

/// Owns a fixture instance for the duration of one test.
///
/// Dropping the guard drops the instance. [`FixtureGuard::release`] does the same under panic
/// capture so a failing `Drop` is reported instead of unwinding.
struct FixtureGuard {
    instance: Box<dyn Any>,
}

impl FixtureGuard {
    fn new(instance: Box<dyn Any>) -> Self {
        Self { instance }
    }

    fn instance_mut(&mut self) -> &mut dyn Any {
        self.instance.as_mut()
    }

    fn release(self) -> Outcome {
        trace!("releasing fixture");
        let instance = self.instance;
        capture(move || drop(instance)).map_err(|failure| match failure {
            Failure::Raised(raised) => {
                let message = format!("while releasing fixture: {}", raised.message());
                let location = raised.location().map(str::to_string);
                Failure::Raised(RaisedError::new(raised.kind(), message).with_location(location))
            }
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert;
    use crate::descriptor::{Signature, TestMarker};
    use crate::failure::AssertionFailure;
    use std::cell::Cell;

    fn passing() -> Outcome {
        assert::equal(1, 1)
    }

    fn failing() -> Outcome {
        assert::equal(1, 2)
    }

    fn panicking() -> Outcome {
        let values: Vec<i32> = Vec::new();
        assert::equal(0, values[3])
    }

    fn describe(method: TestMethod) -> TestDescriptor {
        TestDescriptor::new(method, TestMarker::new())
    }

    fn free(name: &'static str, body: fn() -> Outcome) -> TestDescriptor {
        describe(TestMethod::new("executor", name, Target::Free(body)))
    }

    #[test]
    fn test_passing_static() {
        let result = run_one(&free("passing", passing));
        assert!(result.pass());
        assert_eq!(result.phase(), Phase::Invoked);
    }

    #[test]
    fn test_assertion_failure_is_kept() {
        let result = run_one(&free("failing", failing));
        assert!(result.assertion_failed());
        assert_eq!(result.failure(), Some(&Failure::Assertion(AssertionFailure::new("1", "2"))));
    }

    #[test]
    fn test_panic_is_unexpected_error() {
        let result = run_one(&free("panicking", panicking));
        assert!(result.fail());
        assert!(!result.assertion_failed());
        assert_eq!(result.failure().map(Failure::kind), Some(&kinds::INDEX_OUT_OF_RANGE));
    }

    #[test]
    fn test_parameters_violate_contract() {
        let method = TestMethod::new("executor", "takes_input", Target::Unbound)
            .with_signature(Signature::new(&["i32"], Returns::Unit));
        let result = run_one(&describe(method));
        assert_eq!(result.phase(), Phase::Discovered);
        assert!(matches!(
            result.failure(),
            Some(Failure::Contract(ContractViolation::Parameters { params })) if params == &["i32"]
        ));
    }

    #[test]
    fn test_return_value_violates_contract() {
        let method = TestMethod::new("executor", "returns", Target::Unbound)
            .with_signature(Signature::new(&[], Returns::Value("i32")));
        let result = run_one(&describe(method));
        assert!(matches!(
            result.failure(),
            Some(Failure::Contract(ContractViolation::ReturnsValue { ty })) if ty == "i32"
        ));
    }

    #[test]
    fn test_unbound_with_valid_shape() {
        let method = TestMethod::new("executor", "ghost", Target::Unbound);
        let result = run_one(&describe(method));
        assert_eq!(result.phase(), Phase::Validated);
        assert_eq!(result.failure().map(Failure::kind), Some(&kinds::CONTRACT_VIOLATION));
    }

    #[test]
    fn test_missing_constructor() {
        fn call(_: &mut dyn Any) -> Outcome {
            Ok(())
        }
        let method = TestMethod::new("executor", "needs_fixture", Target::Instance { factory: None, call })
            .owned_by("executor::NoDefault");
        let result = run_one(&describe(method));
        assert!(matches!(
            result.failure(),
            Some(Failure::Contract(ContractViolation::MissingConstructor { owner })) if owner == "executor::NoDefault"
        ));
    }

    thread_local! {
        static DROPS: Cell<usize> = const { Cell::new(0) };
    }

    struct Counted {
        value: i32,
    }

    impl Drop for Counted {
        fn drop(&mut self) {
            DROPS.with(|d| d.set(d.get() + 1));
        }
    }

    fn make_counted() -> Result<Box<dyn Any>, Failure> {
        Ok(Box::new(Counted { value: 3 }))
    }

    fn counted_equals_three(instance: &mut dyn Any) -> Outcome {
        let counted = instance
            .downcast_mut::<Counted>()
            .ok_or_else(|| ContractViolation::fixture_type("Counted"))?;
        assert::equal(3, counted.value)
    }

    fn counted_equals_four(instance: &mut dyn Any) -> Outcome {
        let counted = instance
            .downcast_mut::<Counted>()
            .ok_or_else(|| ContractViolation::fixture_type("Counted"))?;
        assert::equal(4, counted.value)
    }

    #[test]
    fn test_fixture_released_on_pass_and_failure() {
        DROPS.with(|d| d.set(0));

        let method = TestMethod::new(
            "executor",
            "three",
            Target::Instance {
                factory: Some(make_counted),
                call: counted_equals_three,
            },
        );
        let result = run_one(&describe(method));
        assert!(result.pass());
        assert_eq!(DROPS.with(Cell::get), 1);

        let method = TestMethod::new(
            "executor",
            "four",
            Target::Instance {
                factory: Some(make_counted),
                call: counted_equals_four,
            },
        );
        let result = run_one(&describe(method));
        assert!(result.assertion_failed());
        assert_eq!(DROPS.with(Cell::get), 2);
    }

    #[test]
    fn test_construction_panic_is_captured() {
        fn exploding() -> Result<Box<dyn Any>, Failure> {
            panic!("constructor exploded")
        }
        fn call(_: &mut dyn Any) -> Outcome {
            Ok(())
        }
        let method = TestMethod::new(
            "executor",
            "ctor",
            Target::Instance {
                factory: Some(exploding),
                call,
            },
        );
        let result = run_one(&describe(method));
        assert_eq!(result.phase(), Phase::Validated);
        assert_eq!(result.failure().map(Failure::kind), Some(&kinds::PANIC));
    }

    struct NoisyDrop;

    impl Drop for NoisyDrop {
        fn drop(&mut self) {
            panic!("disposal failed");
        }
    }

    #[test]
    fn test_release_failure_reported_when_test_passed() {
        fn make() -> Result<Box<dyn Any>, Failure> {
            Ok(Box::new(NoisyDrop))
        }
        fn call(_: &mut dyn Any) -> Outcome {
            Ok(())
        }
        let method = TestMethod::new(
            "executor",
            "noisy",
            Target::Instance {
                factory: Some(make),
                call,
            },
        );
        let result = run_one(&describe(method));
        match result.failure() {
            Some(Failure::Raised(raised)) => {
                assert_eq!(raised.message(), "while releasing fixture: disposal failed");
            }
            other => panic!("expected a raised error, got {other:?}"),
        }
    }

    #[test]
    fn test_timed_out_result() {
        let result = timed_out(&free("slow", passing), Duration::from_millis(10));
        assert_eq!(result.failure().map(Failure::kind), Some(&kinds::TIMEOUT));
        assert_eq!(result.duration(), Duration::from_millis(10));
    }
}
