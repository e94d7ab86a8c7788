//! Event — the per-dispatch value object handed to listeners.
//!
//! An `Event` is constructed fresh at the start of each `emit` pass (unless
//! event-object creation is disabled via
//! [`EmitterOptions`](crate::EmitterOptions)), borrowed by every listener in
//! the pass, and dropped when the pass completes. It is never reused across
//! passes.
//!
//! The propagation flag lives in a `Cell<bool>` so that listeners holding a
//! shared reference can still request an immediate stop.

use std::cell::Cell;
use std::fmt;

use crate::emitter::Emitter;

/// The value object passed as the first listener argument during dispatch.
///
/// In this non-bubbling design [`target`](Event::target) and
/// [`current_target`](Event::current_target) are always the same emitter —
/// the one `emit` was called on.
pub struct Event<'e, A> {
    event_type: &'e str,
    target: &'e Emitter<A>,
    current_target: &'e Emitter<A>,
    propagating: Cell<bool>,
}

impl<'e, A> Event<'e, A> {
    /// Create an event with the propagation flag raised.
    pub fn new(
        event_type: &'e str,
        target: &'e Emitter<A>,
        current_target: &'e Emitter<A>,
    ) -> Self {
        Self {
            event_type,
            target,
            current_target,
            propagating: Cell::new(true),
        }
    }

    /// Name of the event being dispatched.
    pub fn event_type(&self) -> &'e str {
        self.event_type
    }

    /// The emitter that owns the listener list.
    ///
    /// Listeners can use this to re-enter the emitter — register, remove, or
    /// emit — from inside a callback.
    pub fn target(&self) -> &'e Emitter<A> {
        self.target
    }

    /// Same as [`target`](Event::target) in this non-bubbling design.
    pub fn current_target(&self) -> &'e Emitter<A> {
        self.current_target
    }

    /// Whether the current pass is still delivering to remaining listeners.
    pub fn is_propagating(&self) -> bool {
        self.propagating.get()
    }

    /// Stop the remaining listeners in the current pass from being invoked.
    ///
    /// Idempotent — the flag only ever transitions `true → false`, and only
    /// within the lifetime of a single pass. Listeners suppressed by the stop
    /// stay registered for future passes.
    pub fn stop_immediate_propagation(&self) {
        self.propagating.set(false);
    }
}

impl<A> fmt::Debug for Event<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("event_type", &self.event_type)
            .field("propagating", &self.propagating.get())
            .finish()
    }
}
