//! Define how compared values are rendered in assertion failures.
//!
//! Assertion failures carry **strings**, never the raw values, so a failure can outlive the test
//! body that produced it and cross thread boundaries freely.
//!
//! ## Notes
//! - Values render through `Debug`, matching what `assert_eq!` prints.
//! - An absent value (a top-level `Option::None`) renders as the literal [`NULL_REPR`]. A `None`
//!   nested inside another value keeps its `Debug` form (`Some(None)`, `[None]`).

use std::fmt::Debug;

/// Representation of an absent value.
pub const NULL_REPR: &str = "(null)";

/// Render a value for an assertion failure.
///
/// ## Examples
/// ```rust
/// use testease_core::repr;
///
/// assert_eq!(repr(&1), "1");
/// assert_eq!(repr("abc"), "\"abc\"");
/// assert_eq!(repr(&None::<i32>), "(null)");
/// assert_eq!(repr(&Some(2)), "Some(2)");
/// ```
pub fn repr<T: Debug + ?Sized>(value: &T) -> String {
    let rendered = format!("{value:?}");
    if rendered == "None" && is_option::<T>() {
        return NULL_REPR.to_string();
    }
    rendered
}

/// Whether `T` is an `Option`, looking through references.
fn is_option<T: ?Sized>() -> bool {
    let mut name = std::any::type_name::<T>();
    while let Some(rest) = name.strip_prefix('&') {
        name = rest.strip_prefix("mut ").unwrap_or(rest);
    }
    name.starts_with("core::option::Option<")
}

/// Build the canonical assertion failure message from two representations.
///
/// ## Parameters
/// - `expected`: representation of the expected value.
/// - `actual`: representation of the actual value.
///
/// ## Returns
/// - (`String`): `"Assertion failed! Expected: {expected}, Actual: {actual}."`
pub fn assertion_message(expected: &str, actual: &str) -> String {
    format!("Assertion failed! Expected: {expected}, Actual: {actual}.")
}
