//! Panic capture.
//!
//! Test bodies may fail by panicking (`raise!`, arithmetic traps, `unwrap()` on `None`, ...).
//! [`capture`] runs a closure under `catch_unwind` and turns the panic payload back into the
//! original [`Failure`]: typed payloads are restored as-is, string payloads become a
//! [`RaisedError`] classified with [`kinds::classify_panic`].
//!
//! A process-wide panic hook keeps captured panics quiet: while a thread is inside [`capture`],
//! the hook only records the panic location. Panics anywhere else are forwarded to whatever hook
//! was installed before.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use testease_core::kinds;

use crate::failure::{AssertionFailure, Failure, RaisedError};

thread_local! {
    static CAPTURE_DEPTH: Cell<usize> = const { Cell::new(0) };
    static LAST_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// Install the capturing panic hook (idempotent).
pub fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURE_DEPTH.with(Cell::get) > 0 {
                let location = info.location().map(|l| l.to_string());
                LAST_LOCATION.with(|slot| *slot.borrow_mut() = location);
            } else {
                previous(info);
            }
        }));
    });
}

/// Marks the current thread as capturing for the guard's lifetime. Nests.
struct CaptureGuard;

impl CaptureGuard {
    fn enter() -> Self {
        CAPTURE_DEPTH.with(|depth| depth.set(depth.get() + 1));
        CaptureGuard
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        CAPTURE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Run `f`, converting a panic into a [`Failure`].
///
/// ## Returns
/// - `Ok(value)` when `f` returned normally.
/// - `Err(failure)` when `f` panicked; the failure is the innermost original cause.
pub fn capture<T>(f: impl FnOnce() -> T) -> Result<T, Failure> {
    install_hook();
    let _guard = CaptureGuard::enter();
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let location = LAST_LOCATION.with(|slot| slot.borrow_mut().take());
        from_payload(payload, location)
    })
}

/// Unwrap a panic payload into the failure it carries.
pub fn from_payload(payload: Box<dyn Any + Send>, location: Option<String>) -> Failure {
    let payload = match payload.downcast::<Failure>() {
        Ok(failure) => return *failure,
        Err(other) => other,
    };
    let payload = match payload.downcast::<AssertionFailure>() {
        Ok(assertion) => return Failure::Assertion(*assertion),
        Err(other) => other,
    };
    let payload = match payload.downcast::<RaisedError>() {
        Ok(raised) => return Failure::Raised(*raised),
        Err(other) => other,
    };

    let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panicked with a non-string payload".to_string()
    };

    Failure::Raised(RaisedError::new(kinds::classify_panic(&message), message).with_location(location))
}
