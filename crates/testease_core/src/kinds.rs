//! Error kind vocabulary.
//!
//! A [`Kind`] names a category of raised error. Kinds form a tree through their `parent` link, so a
//! check for `ARITHMETIC` also accepts `DIVIDE_BY_ZERO`. The builtin kinds below are registered in
//! [`BUILTIN_KINDS`] so tooling can list and resolve them by name.
//!
//! ## Notes
//! - Kinds compare **by name**. Custom kinds must pick a name that does not collide with a builtin.
//! - Kinds are `static` (not `const`) so every reference points at one definition.
//! - [`classify_panic`] maps the standard library's panic messages (and the canonical
//!   `Kind: message` prefix produced by `raise!`) onto this taxonomy.
//!
//! ## Examples
//! ```rust
//! use testease_core::kinds::{self, Kind};
//!
//! static PARSE_ERROR: Kind = Kind::new("ParseError", Some(&kinds::INVALID_ARGUMENT), "Input could not be parsed.");
//!
//! assert!(PARSE_ERROR.is(&kinds::INVALID_ARGUMENT));
//! assert!(PARSE_ERROR.is(&kinds::ERROR));
//! assert!(!kinds::INVALID_ARGUMENT.is(&PARSE_ERROR));
//! ```

use std::fmt;

/// A named error category with an optional parent.
pub struct Kind {
    name: &'static str,
    parent: Option<&'static Kind>,
    description: &'static str,
}

impl Kind {
    /// Define a kind. Usable in `static` items.
    pub const fn new(name: &'static str, parent: Option<&'static Kind>, description: &'static str) -> Self {
        Self {
            name,
            parent,
            description,
        }
    }

    /// Canonical spelling (e.g. `"DivideByZeroError"`).
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The kind this one refines, if any.
    pub const fn parent(&self) -> Option<&'static Kind> {
        self.parent
    }

    /// User-facing description.
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Check whether this kind is `other` or one of its subkinds.
    ///
    /// ## Parameters
    /// - `other`: the kind to match against.
    ///
    /// ## Returns
    /// - (`bool`): `true` if `other` is this kind or any of its ancestors.
    pub fn is(&self, other: &Kind) -> bool {
        self.lineage().any(|k| k == other)
    }

    /// Iterate this kind followed by its ancestors, nearest first.
    pub fn lineage(&self) -> impl Iterator<Item = &Kind> {
        std::iter::successors(Some(self), |k| k.parent.map(|p| p as &Kind))
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Kind {}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Kind").field(&self.name).finish()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// =====================================================================
// Builtin kinds
// =====================================================================

/// Root of the taxonomy. Every kind is an `Error`.
pub static ERROR: Kind = Kind::new("Error", None, "Any error raised while running a test.");

/// A panic whose message does not map to a more specific kind.
pub static PANIC: Kind = Kind::new("Panic", Some(&ERROR), "The test body panicked.");

/// Arithmetic failures.
pub static ARITHMETIC: Kind = Kind::new("ArithmeticError", Some(&ERROR), "An arithmetic operation failed.");

/// Integer division or remainder by zero.
pub static DIVIDE_BY_ZERO: Kind = Kind::new(
    "DivideByZeroError",
    Some(&ARITHMETIC),
    "Raised when dividing or taking a remainder by zero.",
);

/// Checked arithmetic overflowed.
pub static OVERFLOW: Kind = Kind::new(
    "OverflowError",
    Some(&ARITHMETIC),
    "Raised when an arithmetic operation overflows its type.",
);

/// An index or range was outside the bounds of a collection.
pub static INDEX_OUT_OF_RANGE: Kind = Kind::new(
    "IndexOutOfRangeError",
    Some(&ERROR),
    "Raised when an index is out of bounds.",
);

/// A value had the right type but an invalid content.
pub static INVALID_ARGUMENT: Kind = Kind::new(
    "InvalidArgumentError",
    Some(&ERROR),
    "Raised when an argument has an invalid value.",
);

/// An operation was not valid for the current state (e.g. unwrapping `None`).
pub static INVALID_OPERATION: Kind = Kind::new(
    "InvalidOperationError",
    Some(&ERROR),
    "Raised when an operation is not valid in the current state.",
);

/// A test assertion did not hold.
pub static ASSERTION_FAILED: Kind = Kind::new(
    "AssertionFailedError",
    Some(&ERROR),
    "Raised when a test assertion does not hold.",
);

/// The test method or its fixture breaks the runner's invocation contract.
pub static CONTRACT_VIOLATION: Kind = Kind::new(
    "ContractViolationError",
    Some(&INVALID_OPERATION),
    "Raised when a test method or fixture cannot be invoked by the runner.",
);

/// The test exceeded its configured time budget.
pub static TIMEOUT: Kind = Kind::new("TimeoutError", Some(&ERROR), "Raised when a test exceeds its timeout.");

/// Registry of builtin kinds.
pub static BUILTIN_KINDS: &[&Kind] = &[
    &ERROR,
    &PANIC,
    &ARITHMETIC,
    &DIVIDE_BY_ZERO,
    &OVERFLOW,
    &INDEX_OUT_OF_RANGE,
    &INVALID_ARGUMENT,
    &INVALID_OPERATION,
    &ASSERTION_FAILED,
    &CONTRACT_VIOLATION,
    &TIMEOUT,
];

/// Resolve a canonical spelling to a builtin kind.
///
/// Matching is case-sensitive.
pub fn from_str(name: &str) -> Option<&'static Kind> {
    BUILTIN_KINDS.iter().copied().find(|k| k.name == name)
}

/// Map a panic message onto the kind taxonomy.
///
/// ## Parameters
/// - `message`: the panic payload rendered as text.
///
/// ## Returns
/// - (`&'static Kind`): the most specific builtin kind recognised, [`PANIC`] otherwise.
///
/// ## Notes
/// - A canonical `"<KindName>: ..."` prefix wins over message sniffing.
/// - Overflow is checked before division so `i32::MIN / -1` is an overflow, not a division by zero.
pub fn classify_panic(message: &str) -> &'static Kind {
    if let Some(kind) = message.split_once(": ").and_then(|(prefix, _)| from_str(prefix)) {
        return kind;
    }

    if message.contains("with overflow") {
        &OVERFLOW
    } else if message.contains("divide by zero") || message.contains("divisor of zero") {
        &DIVIDE_BY_ZERO
    } else if message.contains("index out of bounds")
        || message.contains("out of range for slice")
        || message.contains("is out of bounds of")
    {
        &INDEX_OUT_OF_RANGE
    } else if message.contains("called `Option::unwrap()`")
        || message.contains("called `Result::unwrap()`")
        || message.contains("called `Result::unwrap_err()`")
    {
        &INVALID_OPERATION
    } else {
        &PANIC
    }
}
