//! Tests for listener removal: `off`, `off_all`, `remove_all_listeners`,
//! `detach`, `detach_all`, and wildcard removal.

use mini_emitter::{callback, Callback, Emitter};
use std::sync::{Arc, Mutex};

fn make_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

fn logger(log: &Arc<Mutex<Vec<String>>>, tag: &str) -> Callback<i32> {
    let log = Arc::clone(log);
    let tag = tag.to_string();
    callback(move |_evt, n| log.lock().unwrap().push(format!("{tag}:{n}")))
}

// ============================================================================
// off — by callback handle
// ============================================================================

#[test]
fn off_removes_exactly_one_instance_first_match() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();
    let f = logger(&log, "f");

    emitter.on("a", &f).on("a", &f);
    assert_eq!(emitter.emit("a", &1), 2);

    emitter.off("a", &f);
    assert_eq!(emitter.emit("a", &2), 1, "one instance remains");

    emitter.off("a", &f);
    assert_eq!(emitter.emit("a", &3), 0);
}

#[test]
fn off_matches_by_handle_identity_not_by_code() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();
    let f = logger(&log, "same");
    let g = logger(&log, "same");

    emitter.on("a", &f);
    emitter.off("a", &g); // different handle, same behavior — no match

    assert_eq!(emitter.listener_count("a"), 1);
}

#[test]
fn off_with_unregistered_name_is_a_silent_noop() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();
    let f = logger(&log, "f");

    emitter.on("a", &f);
    emitter.off("ghost", &f);

    assert_eq!(emitter.listener_count("a"), 1);
}

#[test]
fn off_scalar_with_separators_removes_from_each_name() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();
    let f = logger(&log, "f");

    emitter.on("a b", &f);
    emitter.off("a, b", &f);

    assert_eq!(emitter.listener_count("a"), 0);
    assert_eq!(emitter.listener_count("b"), 0);
}

#[test]
fn off_wildcard_removes_the_callback_from_every_list() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();
    let f = logger(&log, "f");
    let g = logger(&log, "g");

    emitter.on("a", &f).on("b", &f).on("b", &g);
    emitter.off("*", &f);

    assert_eq!(emitter.listener_count("a"), 0);
    assert_eq!(emitter.listener_count("b"), 1, "g survives");
}

#[test]
fn remove_listener_is_an_alias_for_off() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();
    let f = logger(&log, "f");

    emitter.on("a", &f);
    emitter.remove_listener("a", &f);

    assert_eq!(emitter.listener_count("a"), 0);
}

// ============================================================================
// off_all / remove_all_listeners
// ============================================================================

#[test]
fn off_all_clears_one_name_and_keeps_the_others() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();

    emitter
        .on("a", &logger(&log, "a1"))
        .on("a", &logger(&log, "a2"))
        .on("b", &logger(&log, "b1"));

    emitter.off_all("a");

    assert_eq!(emitter.listener_count("a"), 0);
    assert_eq!(emitter.listener_count("b"), 1);
}

#[test]
fn off_all_wildcard_clears_every_name() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();

    emitter.on("a", &logger(&log, "a")).on("b", &logger(&log, "b"));
    emitter.off_all("*");

    assert_eq!(emitter.listener_count("*"), 0);
}

#[test]
fn remove_all_listeners_clears_named_but_not_attachments() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();

    emitter.on("a", &logger(&log, "a")).attach(&logger(&log, "att"));
    emitter.remove_all_listeners();

    assert_eq!(emitter.listener_count("*"), 0);
    assert_eq!(emitter.attachment_count(), 1);
}

// ============================================================================
// detach / detach_all
// ============================================================================

#[test]
fn detach_removes_one_matching_attachment() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();
    let f = logger(&log, "f");

    emitter.attach(&f).attach(&f);
    emitter.detach(&f);

    assert_eq!(emitter.attachment_count(), 1);
}

#[test]
fn detach_with_unknown_handle_is_a_noop() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();
    let f = logger(&log, "f");
    let g = logger(&log, "g");

    emitter.attach(&f);
    emitter.detach(&g);

    assert_eq!(emitter.attachment_count(), 1);
}

#[test]
fn detach_all_clears_the_attachment_channel() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();

    emitter.attach(&logger(&log, "f")).attach(&logger(&log, "g"));
    emitter.detach_all();

    assert_eq!(emitter.attachment_count(), 0);
}
