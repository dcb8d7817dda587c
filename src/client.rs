//! Outbound connection seam.
//!
//! The state tracker needs two things from the live connection: the nick
//! the bot currently holds, and a way to fire off corrective queries. Both go
//! through [`Connection`] so the tracker can run against a recorder in
//! tests and against the socket writer queue at runtime.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::event::Event;
use crate::proto::Command;

/// What the state tracker and the bot need from the connection.
pub trait Connection: Send + Sync {
    /// The nickname the bot currently holds on the network.
    fn current_nick(&self) -> String;

    /// Queue a command for the server. Never blocks and never waits for a
    /// reply.
    fn send(&self, command: Command);
}

/// Runtime connection handle: an unbounded writer queue plus the live nick.
pub struct ClientHandle {
    nick: RwLock<String>,
    tx: mpsc::UnboundedSender<Command>,
}

impl ClientHandle {
    /// Create a handle and the receiving end of its writer queue.
    pub fn new(nick: impl Into<String>) -> (Arc<Self>, mpsc::UnboundedReceiver<Command>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = Arc::new(Self {
            nick: RwLock::new(nick.into()),
            tx,
        });
        (handle, rx)
    }

    pub fn set_nick(&self, nick: impl Into<String>) {
        *self.nick.write() = nick.into();
    }

    /// Follow our own nick through registration and renames.
    ///
    /// Runs after the tracker has seen the event, so the tracker can still
    /// read our previous nick while re-keying.
    pub fn observe(&self, event: &Event) {
        match event {
            Event::Welcome { nick } => {
                debug!(nick = %nick, "registered");
                self.set_nick(nick.clone());
            }
            Event::NickChange { old, new } if *old == self.current_nick() => {
                debug!(old = %old, new = %new, "own nick changed");
                self.set_nick(new.clone());
            }
            _ => {}
        }
    }
}

impl Connection for ClientHandle {
    fn current_nick(&self) -> String {
        self.nick.read().clone()
    }

    fn send(&self, command: Command) {
        if let Err(e) = self.tx.send(command) {
            let command = e.0;
            warn!(command = command.name(), "writer queue closed, dropping command");
        }
    }
}
