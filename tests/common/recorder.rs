//! Line-driven tracker harness.

use parking_lot::{Mutex, RwLock};
use slirc_mirror::proto::{Command, Message};
use slirc_mirror::{Connection, Event, StateTracker};
use std::sync::Arc;

/// Connection that records every command instead of sending it.
pub struct RecordingConnection {
    nick: RwLock<String>,
    sent: Mutex<Vec<Command>>,
}

impl RecordingConnection {
    pub fn new(nick: &str) -> Self {
        Self {
            nick: RwLock::new(nick.to_string()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn set_nick(&self, nick: &str) {
        *self.nick.write() = nick.to_string();
    }

    /// Drain recorded commands in wire form.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.sent.lock())
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl Connection for RecordingConnection {
    fn current_nick(&self) -> String {
        self.nick.read().clone()
    }

    fn send(&self, command: Command) {
        self.sent.lock().push(command);
    }
}

/// Parse a raw line and hand the resulting event to `state`.
///
/// Panics if the line is not a valid event.
pub fn feed_line(state: &StateTracker, line: &str) {
    let msg = Message::parse(line).expect("valid line");
    let event = Event::from_message(&msg)
        .expect("well-formed event")
        .expect("tracked command");
    state.handle(&event);
}

/// A tracker wired to a recording connection.
pub struct Harness {
    pub conn: Arc<RecordingConnection>,
    pub state: StateTracker,
}

impl Harness {
    pub fn new(nick: &str) -> Self {
        let conn = Arc::new(RecordingConnection::new(nick));
        let state = StateTracker::new(conn.clone());
        Self { conn, state }
    }

    /// Parse a raw line and hand the resulting event to the tracker.
    ///
    /// Panics if the line is not a valid event, so typos in tests fail
    /// loudly.
    pub fn feed(&self, line: &str) {
        feed_line(&self.state, line);
    }

    /// Feed several lines in order.
    pub fn feed_all(&self, lines: &[&str]) {
        for line in lines {
            self.feed(line);
        }
    }

    /// Commands sent so far, drained.
    pub fn sent(&self) -> Vec<String> {
        self.conn.take()
    }

    pub fn assert_consistent(&self) {
        let violations = self.state.consistency_violations();
        assert!(violations.is_empty(), "inconsistent state: {violations:?}");
    }
}
