//! Public assertion API as seen from a test crate.

use std::hint::black_box;

use testease::{AssertionFailure, Failure, Outcome, ResultExt, assert, kinds};

fn assertion(outcome: Outcome) -> AssertionFailure {
    match outcome {
        Err(Failure::Assertion(assertion)) => assertion,
        other => panic!("expected an assertion failure, got {other:?}"),
    }
}

#[test]
fn equal_reports_expected_and_actual() {
    assert!(assert::equal(1, 1).is_ok());
    let failure = assertion(assert::equal(1, 2));
    assert_eq!((failure.expected(), failure.actual()), ("1", "2"));
    assert_eq!(failure.to_string(), "Assertion failed! Expected: 1, Actual: 2.");
}

#[test]
fn absent_values_render_as_null() {
    let found: Option<&str> = ["a", "b"].into_iter().find(|s| *s == "c");
    let failure = assertion(assert::equal(Some("c"), found));
    assert_eq!((failure.expected(), failure.actual()), ("Some(\"c\")", "(null)"));
    assert_eq!(failure.to_string(), "Assertion failed! Expected: Some(\"c\"), Actual: (null).");
}

#[test]
fn equal_by_uses_comparer() {
    let same_len = |a: &String, b: &String| a.len() == b.len();
    assert!(assert::equal_by("abc".to_string(), "xyz".to_string(), same_len).is_ok());
    let failure = assertion(assert::equal_by("abc".to_string(), "xy".to_string(), same_len));
    assert_eq!(failure.actual(), "\"xy\"");
}

#[test]
fn is_true_reports_booleans() {
    let failure = assertion(assert::is_true(false));
    assert_eq!((failure.expected(), failure.actual()), ("true", "false"));
}

#[test]
fn throws_divide_by_zero() {
    let outcome = assert::throws(&kinds::DIVIDE_BY_ZERO, || {
        let i = black_box(0);
        let _ = 1 / i;
    });
    assert!(outcome.is_ok());
}

#[test]
fn throws_overflow() {
    let outcome = assert::throws(&kinds::OVERFLOW, || {
        let max = black_box(i32::MAX);
        let _ = max + 1;
    });
    // Arithmetic overflow only traps with debug assertions.
    assert_eq!(outcome.is_ok(), cfg!(debug_assertions));
}

#[test]
fn throws_without_error_reports_null() {
    let failure = assertion(assert::throws(&kinds::DIVIDE_BY_ZERO, || {}));
    assert_eq!(failure.expected(), "DivideByZeroError");
    assert_eq!(failure.actual(), "(null)");
}

#[test]
fn throws_wrong_kind_reports_raised_kind() {
    let failure = assertion(assert::throws(&kinds::DIVIDE_BY_ZERO, || -> Outcome {
        let parsed: Result<i32, _> = "x".parse::<i32>();
        parsed.or_raise(&kinds::INVALID_ARGUMENT)?;
        Ok(())
    }));
    assert_eq!(failure.actual(), "InvalidArgumentError");
}

#[test]
fn throws_index_out_of_range() {
    let values = vec![1, 2, 3];
    let outcome = assert::throws(&kinds::INDEX_OUT_OF_RANGE, || {
        let _ = values[black_box(5)];
    });
    assert!(outcome.is_ok());
}

#[test]
fn assertions_compose_with_question_mark() {
    fn body() -> Outcome {
        assert::equal("a", "a")?;
        assert::not_equal(1, 2)?;
        assert::is_false(false)?;
        assert::equal(1, 0)?;
        assert::fail("unreachable")
    }
    let failure = assertion(body());
    assert_eq!(failure.expected(), "1");
}
