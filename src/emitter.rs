//! Emitter — the named-listener registry and synchronous dispatcher.
//!
//! # Threading model
//!
//! All methods take `&self`; internal state sits behind a single
//! `parking_lot::Mutex` that is never held while a listener runs. Listeners
//! may therefore re-enter any emitter operation — including `emit` — from
//! inside a callback without deadlocking.
//!
//! # Dispatch semantics
//!
//! Each `emit` pass snapshots the relevant listener lists under the lock and
//! then invokes the snapshot lock-free:
//!   - A listener removed *during* the pass is still called in that pass.
//!   - A listener added *during* the pass is NOT called until the next pass.
//!   - A `once` entry is consumed from the live list immediately before its
//!     invocation; if a re-entrant pass already consumed it, the invocation
//!     is skipped. A once listener fires at most once in total.
//!
//! Panics inside a listener propagate to the `emit` caller — no isolation at
//! this level. The mutex does not poison, so the emitter stays usable after
//! a listener panic; entries consumed before the panic stay consumed.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::names::{EventNames, WILDCARD};

// ============================================================================
// Callback types
// ============================================================================

/// Closure type for event listeners.
///
/// The first argument is the per-pass [`Event`] — `None` when event-object
/// creation is disabled via [`EmitterOptions`]. The second is the emit
/// payload, borrowed for the duration of the call.
pub type ListenerFn<A> = dyn for<'e> Fn(Option<&'e Event<'e, A>>, &'e A) + Send + Sync;

/// A shared callback handle.
///
/// Registration stores a clone of the handle; removal matches by handle
/// identity (`Arc::ptr_eq`) — removing a listener by reference, the way a
/// JS-style emitter removes one by function identity. Keep a clone of the
/// handle you registered if you intend to remove it later.
pub type Callback<A> = Arc<ListenerFn<A>>;

/// Wrap a closure into a [`Callback`] handle.
pub fn callback<A, F>(f: F) -> Callback<A>
where
    F: for<'e> Fn(Option<&'e Event<'e, A>>, &'e A) + Send + Sync + 'static,
{
    Arc::new(f)
}

// ============================================================================
// Options
// ============================================================================

fn default_event() -> bool {
    true
}

/// Construction-time emitter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitterOptions {
    /// Whether an [`Event`] value object is constructed for each `emit` pass
    /// and passed to listeners as their first argument. Defaults to `true`;
    /// with `false`, listeners receive `None` and immediate-propagation stop
    /// is unavailable.
    #[serde(default = "default_event")]
    pub event: bool,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        Self { event: true }
    }
}

// ============================================================================
// Internal registry
// ============================================================================

struct ListenerEntry<A> {
    /// Identity for once-consumption bookkeeping during dispatch.
    id: u64,
    callback: Callback<A>,
    once: bool,
}

// Manual impl: `A` itself need not be `Clone` — only the `Arc` is cloned.
impl<A> Clone for ListenerEntry<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: Arc::clone(&self.callback),
            once: self.once,
        }
    }
}

/// The (name → listener list) store plus the global attachment channel.
///
/// `order` tracks first-registration order of names — the explicit ordering
/// contract for wildcard dispatch. Per-name clears empty the list in place
/// and keep the key; only a full clear resets the store.
struct Registry<A> {
    named: HashMap<String, Vec<ListenerEntry<A>>>,
    order: Vec<String>,
    attachments: Vec<ListenerEntry<A>>,
    next_id: u64,
}

impl<A> Registry<A> {
    fn new() -> Self {
        Self {
            named: HashMap::new(),
            order: Vec::new(),
            attachments: Vec::new(),
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn list_mut(&mut self, name: &str) -> &mut Vec<ListenerEntry<A>> {
        if !self.named.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.named.entry(name.to_string()).or_default()
    }

    fn clear_named(&mut self) {
        self.named.clear();
        self.order.clear();
    }

    /// Remove the first `callback` match from every named list.
    fn remove_first_match_everywhere(&mut self, callback: &Callback<A>) {
        for list in self.named.values_mut() {
            remove_first_match(list, callback);
        }
    }
}

/// Front-to-back scan removing the first entry holding `callback`.
///
/// Duplicate registrations of the same handle are removed one per call.
fn remove_first_match<A>(list: &mut Vec<ListenerEntry<A>>, callback: &Callback<A>) -> bool {
    if let Some(pos) = list
        .iter()
        .position(|entry| Arc::ptr_eq(&entry.callback, callback))
    {
        list.remove(pos);
        return true;
    }
    false
}

// ============================================================================
// Emitter
// ============================================================================

/// Synchronous publish/subscribe emitter.
///
/// `A` is the emit payload type, declared once per emitter instance. Named
/// listeners are invoked in insertion order; the global attachment channel
/// fires after them on every pass.
pub struct Emitter<A = ()> {
    registry: Mutex<Registry<A>>,
    opts: EmitterOptions,
}

impl<A> Emitter<A> {
    /// Create an emitter with default options.
    pub fn new() -> Self {
        Self::with_options(EmitterOptions::default())
    }

    /// Create an emitter with explicit options.
    pub fn with_options(opts: EmitterOptions) -> Self {
        Self {
            registry: Mutex::new(Registry::new()),
            opts,
        }
    }

    /// The configuration this emitter was constructed with.
    pub fn options(&self) -> &EmitterOptions {
        &self.opts
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register a persistent listener for each resolved name.
    ///
    /// Registering the same [`Callback`] handle twice produces two
    /// independent entries — both fire. Returns the emitter for chaining.
    pub fn on(&self, names: impl Into<EventNames>, callback: &Callback<A>) -> &Self {
        self.add_entries(names.into(), callback, false, None);
        self
    }

    /// Register a listener that is deregistered after its first invocation.
    pub fn once(&self, names: impl Into<EventNames>, callback: &Callback<A>) -> &Self {
        self.add_entries(names.into(), callback, true, None);
        self
    }

    /// Like [`on`](Emitter::on), but the entry is spliced at `index` in each
    /// resolved name's list (clamped to the list length) instead of appended.
    /// The list is created first if it does not exist.
    pub fn insert(
        &self,
        index: usize,
        names: impl Into<EventNames>,
        callback: &Callback<A>,
    ) -> &Self {
        self.add_entries(names.into(), callback, false, Some(index));
        self
    }

    /// [`insert`](Emitter::insert) + [`once`](Emitter::once).
    pub fn insert_once(
        &self,
        index: usize,
        names: impl Into<EventNames>,
        callback: &Callback<A>,
    ) -> &Self {
        self.add_entries(names.into(), callback, true, Some(index));
        self
    }

    /// Register each `(name, callback)` entry of a mapping as one persistent
    /// listener. Names are used verbatim, without scalar splitting.
    pub fn on_map<S>(&self, entries: impl IntoIterator<Item = (S, Callback<A>)>) -> &Self
    where
        S: AsRef<str>,
    {
        for (name, callback) in entries {
            self.add_entries(
                EventNames::Many(vec![name.as_ref().to_string()]),
                &callback,
                false,
                None,
            );
        }
        self
    }

    /// [`on_map`](Emitter::on_map) with every entry marked once.
    pub fn once_map<S>(&self, entries: impl IntoIterator<Item = (S, Callback<A>)>) -> &Self
    where
        S: AsRef<str>,
    {
        for (name, callback) in entries {
            self.add_entries(
                EventNames::Many(vec![name.as_ref().to_string()]),
                &callback,
                true,
                None,
            );
        }
        self
    }

    /// Register a global listener, fired on every `emit` regardless of name,
    /// after the named listeners.
    pub fn attach(&self, callback: &Callback<A>) -> &Self {
        self.attach_entry(callback, false);
        self
    }

    /// [`attach`](Emitter::attach) with the entry marked once.
    pub fn attach_once(&self, callback: &Callback<A>) -> &Self {
        self.attach_entry(callback, true);
        self
    }

    /// Alias for [`on`](Emitter::on).
    pub fn add_listener(&self, names: impl Into<EventNames>, callback: &Callback<A>) -> &Self {
        self.on(names, callback)
    }

    fn add_entries(
        &self,
        names: EventNames,
        callback: &Callback<A>,
        once: bool,
        index: Option<usize>,
    ) {
        if names.is_all() {
            log::warn!("cannot register a listener under the reserved name {WILDCARD:?}");
            return;
        }
        let mut reg = self.registry.lock();
        names.for_each_name(|name| {
            if name == WILDCARD {
                log::warn!("cannot register a listener under the reserved name {WILDCARD:?}");
                return;
            }
            let entry = ListenerEntry {
                id: reg.next_id(),
                callback: Arc::clone(callback),
                once,
            };
            let list = reg.list_mut(name);
            match index {
                Some(index) => {
                    let index = index.min(list.len());
                    list.insert(index, entry);
                }
                None => list.push(entry),
            }
        });
    }

    fn attach_entry(&self, callback: &Callback<A>, once: bool) {
        let mut reg = self.registry.lock();
        let entry = ListenerEntry {
            id: reg.next_id(),
            callback: Arc::clone(callback),
            once,
        };
        reg.attachments.push(entry);
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    /// Remove, for each resolved name, the first entry holding `callback`.
    ///
    /// Duplicate registrations require repeated calls to remove all
    /// instances. With the wildcard sentinel the scan-and-remove applies to
    /// every named list. Unknown names are silent no-ops.
    pub fn off(&self, names: impl Into<EventNames>, callback: &Callback<A>) -> &Self {
        let names = names.into();
        let mut reg = self.registry.lock();
        if names.is_all() {
            reg.remove_first_match_everywhere(callback);
        } else {
            names.for_each_name(|name| {
                if name == WILDCARD {
                    reg.remove_first_match_everywhere(callback);
                } else if let Some(list) = reg.named.get_mut(name) {
                    remove_first_match(list, callback);
                }
            });
        }
        self
    }

    /// Clear all listeners for each resolved name, regardless of callback.
    ///
    /// The emptied list keeps its key (and its position in wildcard dispatch
    /// order). With the wildcard sentinel the entire named registry is
    /// cleared in one step.
    pub fn off_all(&self, names: impl Into<EventNames>) -> &Self {
        let names = names.into();
        let mut reg = self.registry.lock();
        if names.is_all() {
            reg.clear_named();
        } else {
            names.for_each_name(|name| {
                if name == WILDCARD {
                    reg.clear_named();
                } else if let Some(list) = reg.named.get_mut(name) {
                    list.clear();
                }
            });
        }
        self
    }

    /// Clear the entire named registry — all names, all listeners. The
    /// attachment channel is untouched; see [`detach_all`](Emitter::detach_all).
    pub fn remove_all_listeners(&self) -> &Self {
        self.registry.lock().clear_named();
        self
    }

    /// Remove the first attachment entry holding `callback`.
    pub fn detach(&self, callback: &Callback<A>) -> &Self {
        let mut reg = self.registry.lock();
        remove_first_match(&mut reg.attachments, callback);
        self
    }

    /// Clear the attachment channel.
    pub fn detach_all(&self) -> &Self {
        self.registry.lock().attachments.clear();
        self
    }

    /// Alias for [`off`](Emitter::off).
    pub fn remove_listener(&self, names: impl Into<EventNames>, callback: &Callback<A>) -> &Self {
        self.off(names, callback)
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Synchronously dispatch `event_name` to its listeners, then to the
    /// attachment channel. Returns the number of listener invocations
    /// performed in this pass — 0 when nothing is registered, which is a
    /// normal, silent outcome.
    ///
    /// A name with no listener list at all returns 0 immediately and the
    /// attachment channel is not dispatched; a list emptied by
    /// [`off_all`](Emitter::off_all) still exists, so attachments fire.
    ///
    /// `emit(WILDCARD, ..)` dispatches every named list, in first-registration
    /// order of names. A propagation stop halts the entire remaining pass:
    /// later listeners in the current list, later wildcard lists, and the
    /// attachment channel.
    pub fn emit(&self, event_name: &str, args: &A) -> usize {
        let evt = self
            .opts
            .event
            .then(|| Event::new(event_name, self, self));

        // Snapshot under the lock, dispatch lock-free.
        let (named_lists, attachments) = {
            let reg = self.registry.lock();
            let named: Vec<(String, Vec<ListenerEntry<A>>)> = if event_name == WILDCARD {
                reg.order
                    .iter()
                    .filter_map(|name| {
                        reg.named.get(name).map(|list| (name.clone(), list.clone()))
                    })
                    .collect()
            } else {
                match reg.named.get(event_name) {
                    Some(list) => vec![(event_name.to_string(), list.clone())],
                    None => return 0,
                }
            };
            (named, reg.attachments.clone())
        };

        log::trace!("dispatching {event_name:?}");

        let mut invoked = 0usize;
        let mut halted = false;

        'named: for (name, list) in &named_lists {
            for entry in list {
                if entry.once && !self.consume_named(name, entry.id) {
                    continue;
                }
                (entry.callback)(evt.as_ref(), args);
                invoked += 1;
                if let Some(evt) = &evt {
                    if !evt.is_propagating() {
                        halted = true;
                        break 'named;
                    }
                }
            }
        }

        if !halted {
            for entry in &attachments {
                if entry.once && !self.consume_attachment(entry.id) {
                    continue;
                }
                (entry.callback)(evt.as_ref(), args);
                invoked += 1;
                if let Some(evt) = &evt {
                    if !evt.is_propagating() {
                        break;
                    }
                }
            }
        }

        invoked
    }

    /// Alias for [`emit`](Emitter::emit).
    pub fn trigger(&self, event_name: &str, args: &A) -> usize {
        self.emit(event_name, args)
    }

    /// Remove a once entry from the live list before invoking it.
    ///
    /// Returns `false` when the entry is already gone — consumed by a
    /// re-entrant pass — in which case the invocation is skipped.
    fn consume_named(&self, name: &str, id: u64) -> bool {
        let mut reg = self.registry.lock();
        if let Some(list) = reg.named.get_mut(name) {
            if let Some(pos) = list.iter().position(|entry| entry.id == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    fn consume_attachment(&self, id: u64) -> bool {
        let mut reg = self.registry.lock();
        if let Some(pos) = reg.attachments.iter().position(|entry| entry.id == id) {
            reg.attachments.remove(pos);
            return true;
        }
        false
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Number of listeners currently registered for `event_name`, or across
    /// every name when given the wildcard sentinel. Attachments not included.
    pub fn listener_count(&self, event_name: &str) -> usize {
        let reg = self.registry.lock();
        if event_name == WILDCARD {
            reg.named.values().map(Vec::len).sum()
        } else {
            reg.named.get(event_name).map_or(0, Vec::len)
        }
    }

    /// Number of listeners on the attachment channel.
    pub fn attachment_count(&self) -> usize {
        self.registry.lock().attachments.len()
    }
}

impl<A> Default for Emitter<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Emitter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reg = self.registry.lock();
        f.debug_struct("Emitter")
            .field("opts", &self.opts)
            .field("event_names", &reg.order.len())
            .field("attachments", &reg.attachments.len())
            .finish()
    }
}
