//! The state tracker - the client's mirror of channels and nicks.
//!
//! Two maps are kept: nick → [`Nick`] and channel → [`Channel`]. Membership
//! lives in both, as the same [`PrivilegeHandle`] stored under the channel
//! name in the nick and under the nick in the channel. Every structural
//! change goes through the helpers on [`Inner`] so the two sides never
//! diverge.

use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

use super::{Channel, Nick, PrivilegeHandle};
use crate::client::Connection;
use crate::proto::Command;

/// Client-side mirror of the network state visible to the bot.
///
/// All handlers and accessors take the same lock for their whole body, so
/// callers always observe both maps in a consistent state. Nothing awaits
/// while the lock is held; queries are queued on the connection and their
/// replies come back later as ordinary events.
pub struct StateTracker {
    inner: Mutex<Inner>,
    conn: Arc<dyn Connection>,
}

#[derive(Debug, Default)]
pub(super) struct Inner {
    pub(super) nicks: HashMap<String, Nick>,
    pub(super) channels: HashMap<String, Channel>,
}

impl StateTracker {
    /// Create a tracker that already knows the bot's own nick.
    pub fn new(conn: Arc<dyn Connection>) -> Self {
        let mut inner = Inner::default();
        let me = conn.current_nick();
        inner.nicks.insert(me.clone(), Nick::new(me));
        Self {
            inner: Mutex::new(inner),
            conn,
        }
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock()
    }

    pub(super) fn conn(&self) -> &dyn Connection {
        self.conn.as_ref()
    }
}

impl Inner {
    /// Get a channel, creating it and probing its modes and members if it
    /// was unknown.
    pub(super) fn ensure_channel(&mut self, name: &str, conn: &dyn Connection) -> &mut Channel {
        self.channels.entry(name.to_owned()).or_insert_with(|| {
            debug!(channel = %name, "tracking new channel");
            trace!(channel = %name, "probing channel modes and members");
            conn.send(Command::mode_query(name));
            conn.send(Command::WHO(name.to_owned()));
            Channel::new(name)
        })
    }

    /// Get a nick, creating it and probing it with WHO if it was unknown.
    pub(super) fn ensure_nick(&mut self, nick: &str, conn: &dyn Connection) -> &mut Nick {
        self.nicks.entry(nick.to_owned()).or_insert_with(|| {
            debug!(nick = %nick, "tracking new nick");
            trace!(nick = %nick, "probing nick");
            conn.send(Command::WHO(nick.to_owned()));
            Nick::new(nick)
        })
    }

    /// Record `nick` as a member of `channel` with a fresh, empty privilege
    /// record. An existing membership is replaced, not merged.
    pub(super) fn associate(
        &mut self,
        nick: &str,
        channel: &str,
        conn: &dyn Connection,
    ) -> PrivilegeHandle {
        let privs = PrivilegeHandle::new();
        self.ensure_channel(channel, conn)
            .members
            .insert(nick.to_owned(), privs.clone());
        self.ensure_nick(nick, conn)
            .channels
            .insert(channel.to_owned(), privs.clone());
        privs
    }

    /// Drop the membership from both sides.
    pub(super) fn disassociate(&mut self, nick: &str, channel: &str) {
        if let Some(chan) = self.channels.get_mut(channel) {
            chan.members.remove(nick);
        }
        if let Some(entity) = self.nicks.get_mut(nick) {
            entity.channels.remove(channel);
        }
    }

    /// Move a nick to a new key, re-keying its memberships. Privilege
    /// records are moved, not recreated.
    pub(super) fn rename(&mut self, old: &str, new: &str) {
        if old == new {
            return;
        }
        let Some(mut entity) = self.nicks.remove(old) else {
            debug!(old = %old, new = %new, "rename of unknown nick");
            return;
        };

        // A stale entity under the new name would leave memberships nobody
        // owns once overwritten.
        if self.delete_nick(new) {
            debug!(nick = %new, "replaced stale entity on rename");
        }

        for channel in entity.channels.keys() {
            if let Some(chan) = self.channels.get_mut(channel)
                && let Some(privs) = chan.members.remove(old)
            {
                chan.members.insert(new.to_owned(), privs);
            }
        }

        entity.nick = new.to_owned();
        self.nicks.insert(new.to_owned(), entity);
    }

    /// Remove a nick and purge it from every channel. Returns whether the
    /// nick was known.
    pub(super) fn delete_nick(&mut self, nick: &str) -> bool {
        let known = self.nicks.remove(nick).is_some();
        for chan in self.channels.values_mut() {
            chan.members.remove(nick);
        }
        known
    }

    /// Describe every place where the two maps disagree.
    pub(super) fn consistency_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for (name, chan) in &self.channels {
            for (nick, privs) in &chan.members {
                match self.nicks.get(nick).and_then(|n| n.channels.get(name)) {
                    Some(other) if other.ptr_eq(privs) => {}
                    Some(_) => violations.push(format!("{name}/{nick}: records differ")),
                    None => violations.push(format!("{name}/{nick}: missing on nick side")),
                }
            }
        }

        for (nick, entity) in &self.nicks {
            if entity.nick != *nick {
                violations.push(format!("{nick}: keyed under a stale name ({})", entity.nick));
            }
            for name in entity.channels.keys() {
                let present = self
                    .channels
                    .get(name)
                    .is_some_and(|chan| chan.members.contains_key(nick));
                if !present {
                    violations.push(format!("{name}/{nick}: missing on channel side"));
                }
            }
        }

        violations.sort();
        violations
    }
}
