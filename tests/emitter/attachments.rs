//! Tests for the global attachment channel: `attach`, `attach_once`, and
//! when the channel is (and is not) reached by a dispatch pass.

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

#[test]
fn attachments_fire_after_named_listeners() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();

    emitter.attach(&logger(&log, "att")).on("save", &logger(&log, "a"));

    emitter.emit("save", &1);
    assert_eq!(*log.lock().unwrap(), vec!["a:1", "att:1"]);
}

#[test]
fn attachments_fire_for_every_registered_name() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();

    emitter
        .on("open", &logger(&log, "open"))
        .on("close", &logger(&log, "close"))
        .attach(&logger(&log, "att"));

    emitter.emit("open", &1);
    emitter.emit("close", &2);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["open:1", "att:1", "close:2", "att:2"]
    );
}

#[test]
fn attachments_are_invoked_in_append_order() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();

    emitter
        .on("save", &logger(&log, "a"))
        .attach(&logger(&log, "first"))
        .attach(&logger(&log, "second"));

    emitter.emit("save", &1);
    assert_eq!(*log.lock().unwrap(), vec!["a:1", "first:1", "second:1"]);
}

#[test]
fn attach_once_is_consumed_after_one_pass() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();

    emitter.on("save", &logger(&log, "a")).attach_once(&logger(&log, "att"));

    emitter.emit("save", &1);
    assert_eq!(emitter.attachment_count(), 0);

    emitter.emit("save", &2);
    assert_eq!(*log.lock().unwrap(), vec!["a:1", "att:1", "a:2"]);
}

#[test]
fn unknown_event_name_does_not_reach_attachments() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();

    emitter.attach(&logger(&log, "att"));

    assert_eq!(emitter.emit("ghost", &1), 0);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn a_list_emptied_by_off_all_still_reaches_attachments() {
    let emitter: Emitter<i32> = Emitter::new();
    let log = make_log();

    emitter.on("save", &logger(&log, "a")).attach(&logger(&log, "att"));
    emitter.off_all("save");

    // The name keeps its (empty) list, so the pass proceeds to the channel.
    assert_eq!(emitter.emit("save", &1), 1);
    assert_eq!(*log.lock().unwrap(), vec!["att:1"]);
}
