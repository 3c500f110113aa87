//! Provide the shared, pure vocabulary of the testease harness.
//!
//! This crate is intentionally small and dependency-free. It holds the pieces that both the
//! assertion helpers and the runner need to agree on:
//! - the error-kind taxonomy used to classify raised errors and captured panics ([`kinds`]),
//! - the string representation of compared values and the canonical assertion message ([`repr`]).
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global mutable state, no runner types.
//! - Kinds live in `static` tables so they can be referenced from link-time test registrations.

pub mod kinds;
pub mod repr;

pub use kinds::Kind;
pub use repr::{NULL_REPR, assertion_message, repr};
