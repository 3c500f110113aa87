//! Assertion primitives.
//!
//! Each assertion returns an [`Outcome`]: `Ok(())` when the condition holds, or
//! `Err(Failure::Assertion(..))` carrying string representations of the expected and actual
//! values. Test bodies propagate with `?`:
//!
//! ```rust
//! use testease::{assert, Outcome};
//!
//! fn adds() -> Outcome {
//!     assert::equal(4, 2 + 2)?;
//!     assert::is_true("abc".starts_with('a'))
//! }
//! # assert!(adds().is_ok());
//! ```

use std::fmt::Debug;

use testease_core::kinds::Kind;
use testease_core::repr;

use crate::failure::{AssertionFailure, Failure, IntoOutcome, Outcome};
use crate::panic;

/// Decides whether two values are equal.
///
/// Any `Fn(&T, &T) -> bool` is a comparer.
pub trait Comparer<T: ?Sized> {
    fn equals(&self, expected: &T, actual: &T) -> bool;
}

impl<T: ?Sized, F: Fn(&T, &T) -> bool> Comparer<T> for F {
    fn equals(&self, expected: &T, actual: &T) -> bool {
        self(expected, actual)
    }
}

/// The type's own `PartialEq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Natural;

impl<T: PartialEq + ?Sized> Comparer<T> for Natural {
    fn equals(&self, expected: &T, actual: &T) -> bool {
        expected == actual
    }
}

/// Assert that two values are equal under their natural equality.
pub fn equal<T: PartialEq + Debug>(expected: T, actual: T) -> Outcome {
    equal_by(expected, actual, Natural)
}

/// Assert that two values are equal under `comparer`.
///
/// ```rust
/// use testease::assert;
///
/// let case_insensitive = |a: &&str, b: &&str| a.eq_ignore_ascii_case(b);
/// assert!(assert::equal_by("Hello", "HELLO", case_insensitive).is_ok());
/// ```
pub fn equal_by<T: Debug, C: Comparer<T>>(expected: T, actual: T, comparer: C) -> Outcome {
    if comparer.equals(&expected, &actual) {
        Ok(())
    } else {
        Err(AssertionFailure::new(repr(&expected), repr(&actual)).into())
    }
}

/// Assert that two values differ under their natural equality.
pub fn not_equal<T: PartialEq + Debug>(unexpected: T, actual: T) -> Outcome {
    if unexpected != actual {
        Ok(())
    } else {
        let failure = AssertionFailure::new(format!("not {}", repr(&unexpected)), repr(&actual));
        Err(failure.into())
    }
}

/// Assert that `condition` holds.
pub fn is_true(condition: bool) -> Outcome {
    if condition {
        Ok(())
    } else {
        Err(AssertionFailure::new("true", "false").into())
    }
}

/// Assert that `condition` does not hold.
pub fn is_false(condition: bool) -> Outcome {
    if condition {
        Err(AssertionFailure::new("false", "true").into())
    } else {
        Ok(())
    }
}

/// Fail the current test with a message.
pub fn fail(message: impl Into<String>) -> Outcome {
    let failure = AssertionFailure::new("(pass)", "(fail)").with_message(message);
    Err(failure.into())
}

/// Assert that `action` raises an error of `kind` or one of its subkinds.
///
/// Both returned failures and panics raised by `action` are captured; neither escapes.
///
/// ## Returns
/// - `Ok(())` when the raised error's kind is `kind` or a subkind of it.
/// - An assertion failure with actual `"(null)"` when nothing was raised.
/// - An assertion failure with actual = the raised kind's name otherwise.
///
/// ```rust
/// use std::hint::black_box;
/// use testease::{assert, kinds};
///
/// let outcome = assert::throws(&kinds::DIVIDE_BY_ZERO, || {
///     let _ = 1 / black_box(0);
/// });
/// assert!(outcome.is_ok());
/// ```
pub fn throws<R: IntoOutcome>(kind: &'static Kind, action: impl FnOnce() -> R) -> Outcome {
    let raised: Option<Failure> = match panic::capture(|| action().into_outcome()) {
        Ok(Ok(())) => None,
        Ok(Err(failure)) | Err(failure) => Some(failure),
    };

    match raised {
        None => Err(AssertionFailure::from_reprs(Some(kind.name().to_string()), None).into()),
        Some(failure) if failure.kind().is(kind) => Ok(()),
        Some(failure) => Err(AssertionFailure::new(kind.name(), failure.kind().name()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hint::black_box;
    use testease_core::kinds;

    fn assertion(outcome: Outcome) -> AssertionFailure {
        match outcome {
            Err(Failure::Assertion(assertion)) => assertion,
            other => panic!("expected an assertion failure, got {other:?}"),
        }
    }

    #[test]
    fn test_equal_passes() {
        assert!(equal(1, 1).is_ok());
        assert!(equal("a".to_string(), "a".to_string()).is_ok());
    }

    #[test]
    fn test_equal_reports_reprs() {
        let failure = assertion(equal(1, 2));
        assert_eq!(failure.expected(), "1");
        assert_eq!(failure.actual(), "2");
        assert_eq!(failure.message(), "Assertion failed! Expected: 1, Actual: 2.");
    }

    #[test]
    fn test_equal_absent_values() {
        let failure = assertion(equal(Some(1), None));
        assert_eq!(failure.expected(), "Some(1)");
        assert_eq!(failure.actual(), "(null)");
        assert_eq!(failure.message(), "Assertion failed! Expected: Some(1), Actual: (null).");

        let failure = assertion(equal(None, Some("x")));
        assert_eq!(failure.expected(), "(null)");
    }

    #[test]
    fn test_equal_by_custom_comparer() {
        let within_one = |a: &i32, b: &i32| (a - b).abs() <= 1;
        assert!(equal_by(10, 11, within_one).is_ok());
        let failure = assertion(equal_by(10, 13, within_one));
        assert_eq!(failure.actual(), "13");
    }

    #[test]
    fn test_not_equal() {
        assert!(not_equal(1, 2).is_ok());
        let failure = assertion(not_equal(3, 3));
        assert_eq!(failure.expected(), "not 3");
    }

    #[test]
    fn test_is_true_and_is_false() {
        assert!(is_true(true).is_ok());
        let failure = assertion(is_true(false));
        assert_eq!((failure.expected(), failure.actual()), ("true", "false"));

        assert!(is_false(false).is_ok());
        let failure = assertion(is_false(true));
        assert_eq!((failure.expected(), failure.actual()), ("false", "true"));
    }

    #[test]
    fn test_fail_uses_message() {
        let failure = assertion(fail("not implemented yet"));
        assert_eq!(failure.message(), "not implemented yet");
    }

    #[test]
    fn test_throws_matching_kind() {
        let outcome = throws(&kinds::DIVIDE_BY_ZERO, || {
            let _ = 1 / black_box(0);
        });
        assert!(outcome.is_ok());
    }

    #[test]
    fn test_throws_accepts_subkind() {
        let outcome = throws(&kinds::ARITHMETIC, || {
            let _ = 1 / black_box(0);
        });
        assert!(outcome.is_ok());
    }

    #[test]
    fn test_throws_nothing_raised() {
        let failure = assertion(throws(&kinds::DIVIDE_BY_ZERO, || {}));
        assert_eq!(failure.expected(), "DivideByZeroError");
        assert_eq!(failure.actual(), "(null)");
    }

    #[test]
    fn test_throws_other_kind() {
        let failure = assertion(throws(&kinds::DIVIDE_BY_ZERO, || -> Outcome {
            crate::raise!(&kinds::INVALID_ARGUMENT, "bad")
        }));
        assert_eq!(failure.actual(), "InvalidArgumentError");
    }

    #[test]
    fn test_throws_supertype_is_not_a_match() {
        let failure = assertion(throws(&kinds::DIVIDE_BY_ZERO, || -> Outcome {
            Err(Failure::raised(&kinds::ARITHMETIC, "generic"))
        }));
        assert_eq!(failure.actual(), "ArithmeticError");
    }

    #[test]
    fn test_throws_returned_assertion_failure() {
        let outcome = throws(&kinds::ASSERTION_FAILED, || equal(1, 2));
        assert!(outcome.is_ok());
    }
}
