//! A small synchronous publish/subscribe event emitter, JS-style.
//!
//! # Overview
//!
//! [`Emitter<A>`](Emitter) keeps an ordered registry of named-event
//! listeners — persistent, once-only, or positionally inserted — plus a
//! global "attachment" channel fired on every dispatch. [`Emitter::emit`]
//! invokes the listeners for a name synchronously, in registration order,
//! removing once-listeners as it goes; an optional per-pass [`Event`] value
//! object gives listeners access to the emitting instance and to
//! immediate-propagation stop. The `"*"` sentinel ([`WILDCARD`]) addresses
//! every name in removal and dispatch contexts.
//!
//! Dispatch is fully synchronous and reentrant: listeners may register,
//! remove, or emit from inside a callback. Malformed input (empty names,
//! wildcard registration) is logged as a warning and skipped, never an
//! error; listener panics are not caught and propagate to the `emit` caller.
//!
//! # Quick start
//!
//! ```
//! use mini_emitter::{callback, Callback, Emitter};
//! use std::sync::{Arc, Mutex};
//!
//! let emitter: Emitter<u32> = Emitter::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&seen);
//! let on_save: Callback<u32> = callback(move |_evt, n| sink.lock().unwrap().push(*n));
//! emitter.on("save", &on_save);
//!
//! assert_eq!(emitter.emit("save", &7), 1);
//! emitter.off("save", &on_save);
//! assert_eq!(emitter.emit("save", &7), 0);
//! assert_eq!(*seen.lock().unwrap(), vec![7]);
//! ```
//!
//! # Modules
//!
//! - [`event`] — the per-dispatch [`Event`] value object.
//! - [`names`] — [`EventNames`] argument shapes and the [`WILDCARD`] sentinel.
//! - [`emitter`] — [`Emitter`]: registration, removal, dispatch.

pub mod emitter;
pub mod event;
pub mod names;

pub use emitter::{callback, Callback, Emitter, EmitterOptions, ListenerFn};
pub use event::Event;
pub use names::{EventNames, WILDCARD};
