//! Read-only views of the tracker.
//!
//! Accessors hand out clones taken under the lock. Privilege handles inside
//! the clones still point at the live records.

use serde::Serialize;
use std::collections::BTreeMap;

use super::{Channel, Nick, PrivilegeHandle, StateTracker};

/// Point-in-time dump of the whole mirror, ordered for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub nicks: BTreeMap<String, NickSnapshot>,
    pub channels: BTreeMap<String, ChannelSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NickSnapshot {
    pub user: String,
    pub host: String,
    pub realname: String,
    pub modes: String,
    pub channels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSnapshot {
    pub topic: String,
    pub modes: String,
    /// Member nick → every prefix glyph it holds, highest first.
    pub members: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&Nick> for NickSnapshot {
    fn from(nick: &Nick) -> Self {
        let mut channels: Vec<String> = nick.channels.keys().cloned().collect();
        channels.sort();
        Self {
            user: nick.user.clone(),
            host: nick.host.clone(),
            realname: nick.realname.clone(),
            modes: nick.modes.as_mode_string(),
            channels,
        }
    }
}

impl From<&Channel> for ChannelSnapshot {
    fn from(channel: &Channel) -> Self {
        Self {
            topic: channel.topic.clone(),
            modes: channel.modes.as_mode_string(),
            members: channel
                .members
                .iter()
                .map(|(nick, privs)| (nick.clone(), privs.get().all_prefix_chars()))
                .collect(),
        }
    }
}

impl StateTracker {
    pub fn get_nick(&self, nick: &str) -> Option<Nick> {
        self.lock().nicks.get(nick).cloned()
    }

    /// A copy of the channel. Its member handles keep reading the live
    /// privilege records, but grants only happen through the handlers:
    ///
    /// ```compile_fail
    /// # use slirc_mirror::state::Channel;
    /// fn grant(mut channel: Channel) {
    ///     channel.apply_modes("+o", &["alice".to_string()]);
    /// }
    /// ```
    pub fn get_channel(&self, channel: &str) -> Option<Channel> {
        self.lock().channels.get(channel).cloned()
    }

    /// The bot's own entity, looked up under the nick the connection
    /// currently holds.
    pub fn me(&self) -> Option<Nick> {
        let nick = self.conn().current_nick();
        self.get_nick(&nick)
    }

    /// Privilege record for `nick` in `channel`, if it is a member.
    pub fn get_privs(&self, channel: &str, nick: &str) -> Option<PrivilegeHandle> {
        self.lock()
            .channels
            .get(channel)
            .and_then(|chan| chan.members.get(nick))
            .cloned()
    }

    /// All tracked nicks, sorted.
    pub fn nicks(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().nicks.keys().cloned().collect();
        names.sort();
        names
    }

    /// All tracked channels, sorted.
    pub fn channels(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().channels.keys().cloned().collect();
        names.sort();
        names
    }

    /// Every disagreement between the nick and channel sides. Empty when
    /// the mirror is consistent.
    pub fn consistency_violations(&self) -> Vec<String> {
        self.lock().consistency_violations()
    }

    pub fn snapshot(&self) -> Snapshot {
        let inner = self.lock();
        Snapshot {
            nicks: inner
                .nicks
                .iter()
                .map(|(name, nick)| (name.clone(), NickSnapshot::from(nick)))
                .collect(),
            channels: inner
                .channels
                .iter()
                .map(|(name, chan)| (name.clone(), ChannelSnapshot::from(chan)))
                .collect(),
        }
    }
}
