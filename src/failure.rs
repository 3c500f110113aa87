//! Failure taxonomy for test execution.
//!
//! Every way a test can fail is a [`Failure`] value:
//! - [`AssertionFailure`]: the test's own logic declared an expected-vs-actual mismatch.
//! - [`RaisedError`]: any other error raised by the test body or its fixture (captured panics
//!   included). This is the "unexpected error" class.
//! - [`ContractViolation`]: the test method or fixture cannot be invoked by the runner at all.
//!
//! Assertions and fallible test bodies return [`Outcome`], so failures travel as data and the
//! executor classifies them by variant instead of by inspecting a caught error.

use std::fmt::Display;
use std::panic::Location;

use miette::Diagnostic;
use testease_core::kinds::{self, Kind};
use testease_core::{assertion_message, NULL_REPR};
use thiserror::Error;

/// Result of an assertion or of a fallible test body.
pub type Outcome = Result<(), Failure>;

// ============================================================================
// Assertion failures
// ============================================================================

/// An assertion did not hold.
///
/// Carries string representations of the compared values, never the values themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(testease::assertion), help("the asserted condition did not hold"))]
pub struct AssertionFailure {
    expected: String,
    actual: String,
    message: String,
}

impl AssertionFailure {
    /// Create a failure with the canonical `Assertion failed! ...` message.
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        let expected = expected.into();
        let actual = actual.into();
        let message = assertion_message(&expected, &actual);
        Self {
            expected,
            actual,
            message,
        }
    }

    /// Create a failure where either side may be absent (rendered as `"(null)"`).
    pub fn from_reprs(expected: Option<String>, actual: Option<String>) -> Self {
        Self::new(
            expected.unwrap_or_else(|| NULL_REPR.to_string()),
            actual.unwrap_or_else(|| NULL_REPR.to_string()),
        )
    }

    /// Replace the message, keeping both representations.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn actual(&self) -> &str {
        &self.actual
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// Contract violations
// ============================================================================

/// The test method or its fixture breaks the runner's invocation contract.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ContractViolation {
    #[error("test methods may not take parameters (found: {})", .params.join(", "))]
    #[diagnostic(
        code(testease::contract::parameters),
        help("build the inputs inside the test body instead")
    )]
    Parameters { params: Vec<String> },

    #[error("test methods may not return a value (returns `{ty}`)")]
    #[diagnostic(
        code(testease::contract::returns),
        help("return `()` or `testease::Outcome`")
    )]
    ReturnsValue { ty: String },

    #[error("fixture `{owner}` has no zero-argument constructor")]
    #[diagnostic(
        code(testease::contract::constructor),
        help("implement `Default`, or pass `factory = path` to `#[testease::fixture]`")
    )]
    MissingConstructor { owner: String },

    #[error("fixture factory did not produce a `{expected}`")]
    #[diagnostic(code(testease::contract::fixture_type))]
    FixtureType { expected: String },

    #[error("test method `{name}` has no invocable target")]
    #[diagnostic(code(testease::contract::unbound))]
    Unbound { name: String },
}

impl ContractViolation {
    /// Used by generated fixture shims when the factory output has the wrong type.
    pub fn fixture_type(expected: &str) -> Self {
        ContractViolation::FixtureType {
            expected: expected.to_string(),
        }
    }
}

// ============================================================================
// Raised (unexpected) errors
// ============================================================================

/// Any other error raised by a test body, fixture construction or disposal.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}: {message}")]
#[diagnostic(code(testease::raised))]
pub struct RaisedError {
    kind: &'static Kind,
    message: String,
    location: Option<String>,
}

impl RaisedError {
    pub fn new(kind: &'static Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
        }
    }

    /// Attach a source location (`file:line:col`), if known.
    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    pub fn kind(&self) -> &'static Kind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

// ============================================================================
// Failure
// ============================================================================

/// Why a test did not pass.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum Failure {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Assertion(#[from] AssertionFailure),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Contract(#[from] ContractViolation),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Raised(#[from] RaisedError),
}

impl Failure {
    /// Shorthand for a [`RaisedError`] without a location.
    pub fn raised(kind: &'static Kind, message: impl Into<String>) -> Self {
        Failure::Raised(RaisedError::new(kind, message))
    }

    /// The kind this failure is classified as.
    ///
    /// Assertion failures and contract violations map to their dedicated builtin kinds.
    pub fn kind(&self) -> &'static Kind {
        match self {
            Failure::Assertion(_) => &kinds::ASSERTION_FAILED,
            Failure::Contract(_) => &kinds::CONTRACT_VIOLATION,
            Failure::Raised(raised) => raised.kind,
        }
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, Failure::Assertion(_))
    }

    pub fn as_assertion(&self) -> Option<&AssertionFailure> {
        match self {
            Failure::Assertion(assertion) => Some(assertion),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions for test bodies
// ============================================================================

/// Values a test body (or a `throws` action) may return.
pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Outcome {
        Ok(())
    }
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

/// Turn ordinary errors into [`Failure`]s so test bodies can use `?`.
pub trait ResultExt<T> {
    /// Map the error into a [`RaisedError`] of `kind`, keeping its `Display` text.
    fn or_raise(self, kind: &'static Kind) -> Result<T, Failure>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn or_raise(self, kind: &'static Kind) -> Result<T, Failure> {
        self.map_err(|err| Failure::raised(kind, err.to_string()))
    }
}

/// Raise a typed error (implemented as a panic carrying a [`RaisedError`]).
///
/// Prefer the [`raise!`](crate::raise) macro.
#[cold]
#[track_caller]
pub fn raise_kind(kind: &'static Kind, message: String) -> ! {
    let location = Location::caller().to_string();
    std::panic::panic_any(RaisedError::new(kind, message).with_location(Some(location)))
}

/// Raise a typed error from anywhere inside a test.
///
/// ```no_run
/// use testease::{kinds, raise};
///
/// fn parse(input: &str) -> i64 {
///     input
///         .parse()
///         .unwrap_or_else(|_| raise!(&kinds::INVALID_ARGUMENT, "not a number: {input}"))
/// }
/// ```
#[macro_export]
macro_rules! raise {
    ($kind:expr, $($arg:tt)+) => {
        $crate::failure::raise_kind($kind, ::std::format!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_failure_message() {
        let failure = AssertionFailure::new("1", "2");
        assert_eq!(failure.expected(), "1");
        assert_eq!(failure.actual(), "2");
        assert_eq!(failure.to_string(), "Assertion failed! Expected: 1, Actual: 2.");
    }

    #[test]
    fn test_assertion_failure_absent_values() {
        let failure = AssertionFailure::from_reprs(Some("DivideByZeroError".into()), None);
        assert_eq!(failure.actual(), "(null)");
    }

    #[test]
    fn test_failure_kinds() {
        let assertion: Failure = AssertionFailure::new("true", "false").into();
        assert_eq!(assertion.kind(), &kinds::ASSERTION_FAILED);
        assert!(assertion.is_assertion());

        let contract: Failure = ContractViolation::Parameters {
            params: vec!["i32".into()],
        }
        .into();
        assert_eq!(contract.kind(), &kinds::CONTRACT_VIOLATION);
        assert!(!contract.is_assertion());

        let raised = Failure::raised(&kinds::OVERFLOW, "attempt to add with overflow");
        assert_eq!(raised.kind(), &kinds::OVERFLOW);
        assert!(raised.as_assertion().is_none());
    }

    #[test]
    fn test_contract_violation_messages() {
        let params = ContractViolation::Parameters {
            params: vec!["i32".into(), "String".into()],
        };
        assert_eq!(
            params.to_string(),
            "test methods may not take parameters (found: i32, String)"
        );
        let returns = ContractViolation::ReturnsValue { ty: "i32".into() };
        assert_eq!(returns.to_string(), "test methods may not return a value (returns `i32`)");
    }

    #[test]
    fn test_raised_display_prefixes_kind() {
        let raised = RaisedError::new(&kinds::INVALID_ARGUMENT, "bad input");
        assert_eq!(raised.to_string(), "InvalidArgumentError: bad input");
    }

    #[test]
    fn test_diagnostic_codes() {
        let failure: Failure = AssertionFailure::new("1", "2").into();
        let code = failure.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("testease::assertion"));
    }

    #[test]
    fn test_or_raise_keeps_display_text() {
        let parsed: Result<i32, _> = "abc".parse::<i32>();
        let failure = parsed.or_raise(&kinds::INVALID_ARGUMENT).unwrap_err();
        assert_eq!(failure.kind(), &kinds::INVALID_ARGUMENT);
        assert!(failure.to_string().starts_with("InvalidArgumentError: invalid digit"));
    }

    #[test]
    fn test_into_outcome() {
        assert!(().into_outcome().is_ok());
        let err: Outcome = Err(Failure::raised(&kinds::PANIC, "x"));
        assert!(err.into_outcome().is_err());
    }
}
