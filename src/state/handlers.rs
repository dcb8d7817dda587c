//! Event handlers.
//!
//! One entry point per inbound event kind. Each takes the tracker lock for
//! its whole body and degrades to a no-op when the entity it refers to is
//! unknown.

use tracing::debug;

use super::{Nick, PrivilegeHandle, StateTracker, Tier};
use crate::event::Event;

/// Operator marker in a WHO reply flags token.
const WHO_OPER_FLAG: char = '*';
/// Marker treated as invisibility in a WHO reply flags token.
const WHO_INVISIBLE_FLAG: char = 'H';

fn is_channel_name(target: &str) -> bool {
    target.starts_with(['#', '&', '+', '!'])
}

impl StateTracker {
    /// Route an event to its handler. Events that carry no state are
    /// ignored here.
    pub fn handle(&self, event: &Event) {
        match event {
            Event::Welcome { nick } => self.handle_welcome(nick),
            Event::Join {
                nick,
                user,
                host,
                channel,
            } => self.handle_join(nick, user, host, channel),
            Event::Part { nick, channel } => self.handle_part(nick, channel),
            Event::Kick { channel, nick, by } => self.handle_kick(channel, nick, by),
            Event::Quit { nick } => self.handle_quit(nick),
            Event::NickChange { old, new } => self.handle_nick_change(old, new),
            Event::Topic { channel, topic } => self.handle_topic(channel, topic),
            Event::TopicReply { channel, topic } => self.handle_topic_reply(channel, topic),
            Event::Mode {
                target,
                modes,
                args,
            } => self.handle_mode(target, modes, args),
            Event::WhoReply {
                nick,
                user,
                host,
                flags,
            } => self.handle_who_reply(nick, user, host, flags),
            Event::WhoisUser {
                nick,
                user,
                host,
                realname,
            } => self.handle_whois_user(nick, user, host, realname),
            Event::WhoisSecure {
                nick,
                user,
                host,
                realname,
            } => self.handle_whois_secure(
                nick,
                user.as_deref(),
                host.as_deref(),
                realname.as_deref(),
            ),
            Event::Names { channel, names } => self.handle_names(channel, names),
            Event::NickInUse { .. }
            | Event::CannotJoin { .. }
            | Event::Ping { .. }
            | Event::Pong
            | Event::Privmsg { .. } => {}
        }
    }

    /// Explicitly record `nick` as a member of `channel`, creating either
    /// side if needed. Replaces any existing record for the pair with a
    /// fresh one.
    pub fn associate(&self, nick: &str, channel: &str) -> PrivilegeHandle {
        let mut inner = self.lock();
        inner.associate(nick, channel, self.conn())
    }

    /// Re-key our own entity under the nick the server registered us with.
    ///
    /// Must run before the connection learns the new nick, since the old
    /// one is read from it.
    pub fn handle_welcome(&self, nick: &str) {
        let me = self.conn().current_nick();
        let mut inner = self.lock();
        inner.rename(&me, nick);
        inner
            .nicks
            .entry(nick.to_owned())
            .or_insert_with(|| Nick::new(nick));
    }

    pub fn handle_join(&self, nick: &str, user: &str, host: &str, channel: &str) {
        let mut inner = self.lock();
        let conn = self.conn();

        inner.ensure_channel(channel, conn);
        if !inner.nicks.contains_key(nick) {
            let entity = inner.ensure_nick(nick, conn);
            entity.user = user.to_owned();
            entity.host = host.to_owned();
        }
        inner.associate(nick, channel, conn);
        debug!(nick = %nick, channel = %channel, "joined");
    }

    pub fn handle_part(&self, nick: &str, channel: &str) {
        self.lock().disassociate(nick, channel);
        debug!(nick = %nick, channel = %channel, "parted");
    }

    /// The kicked nick may be the bot itself; callers compare against
    /// [`crate::client::Connection::current_nick`] to detect that.
    pub fn handle_kick(&self, channel: &str, nick: &str, by: &str) {
        self.lock().disassociate(nick, channel);
        debug!(nick = %nick, channel = %channel, by = %by, "kicked");
    }

    pub fn handle_quit(&self, nick: &str) {
        if self.lock().delete_nick(nick) {
            debug!(nick = %nick, "quit");
        }
    }

    pub fn handle_nick_change(&self, old: &str, new: &str) {
        self.lock().rename(old, new);
        debug!(old = %old, new = %new, "nick changed");
    }

    /// Live topic change. Creates the channel if it was unknown.
    pub fn handle_topic(&self, channel: &str, topic: &str) {
        let mut inner = self.lock();
        inner.ensure_channel(channel, self.conn()).topic = topic.to_owned();
        debug!(channel = %channel, "topic set");
    }

    /// Topic reply for a channel we already know about.
    pub fn handle_topic_reply(&self, channel: &str, topic: &str) {
        let mut inner = self.lock();
        match inner.channels.get_mut(channel) {
            Some(chan) => chan.topic = topic.to_owned(),
            None => debug!(channel = %channel, "topic reply for unknown channel"),
        }
    }

    /// Live MODE or mode reply. Channel targets go through the channel mode
    /// parser, nick targets through the user mode parser.
    pub fn handle_mode(&self, target: &str, modes: &str, args: &[String]) {
        let mut inner = self.lock();
        if is_channel_name(target) {
            match inner.channels.get_mut(target) {
                Some(chan) => {
                    let consumed = chan.apply_modes(modes, args);
                    debug!(channel = %target, modes = %modes, consumed, "channel modes applied");
                }
                None => debug!(channel = %target, "mode for unknown channel"),
            }
        } else {
            match inner.nicks.get_mut(target) {
                Some(entity) => {
                    entity.apply_modes(modes);
                    debug!(nick = %target, modes = %modes, "user modes applied");
                }
                None => debug!(nick = %target, "mode for unknown nick"),
            }
        }
    }

    pub fn handle_who_reply(&self, nick: &str, user: &str, host: &str, flags: &str) {
        let mut inner = self.lock();
        let Some(entity) = inner.nicks.get_mut(nick) else {
            debug!(nick = %nick, "who reply for unknown nick");
            return;
        };
        entity.user = user.to_owned();
        entity.host = host.to_owned();
        if flags.contains(WHO_OPER_FLAG) {
            entity.modes.oper = true;
        }
        if flags.contains(WHO_INVISIBLE_FLAG) {
            entity.modes.invisible = true;
        }
    }

    pub fn handle_whois_user(&self, nick: &str, user: &str, host: &str, realname: &str) {
        self.apply_whois(nick, Some(user), Some(host), Some(realname), false);
    }

    pub fn handle_whois_secure(
        &self,
        nick: &str,
        user: Option<&str>,
        host: Option<&str>,
        realname: Option<&str>,
    ) {
        self.apply_whois(nick, user, host, realname, true);
    }

    fn apply_whois(
        &self,
        nick: &str,
        user: Option<&str>,
        host: Option<&str>,
        realname: Option<&str>,
        secure: bool,
    ) {
        let me = self.conn().current_nick();
        if nick == me {
            return;
        }

        let mut inner = self.lock();
        let Some(entity) = inner.nicks.get_mut(nick) else {
            debug!(nick = %nick, "whois reply for unknown nick");
            return;
        };
        if let Some(user) = user {
            entity.user = user.to_owned();
        }
        if let Some(host) = host {
            entity.host = host.to_owned();
        }
        if let Some(realname) = realname {
            entity.realname = realname.to_owned();
        }
        if secure {
            entity.modes.secure = true;
        }
        debug!(hostmask = %entity.hostmask(), secure, "whois");
    }

    /// NAMES reply. Adds members and the tier implied by each prefix glyph
    /// without resetting tiers already known, so repeated replies
    /// accumulate.
    pub fn handle_names(&self, channel: &str, names: &str) {
        let mut inner = self.lock();
        if !inner.channels.contains_key(channel) {
            debug!(channel = %channel, "names reply for unknown channel");
            return;
        }

        for token in names.split_whitespace() {
            let mut chars = token.chars();
            let tier = chars.next().and_then(Tier::from_prefix);
            let name = if tier.is_some() { chars.as_str() } else { token };
            if name.is_empty() {
                continue;
            }

            // Names replies come right after our own WHO on the channel, so
            // new nicks here are not queried individually.
            if !inner.nicks.contains_key(name) {
                inner.nicks.insert(name.to_owned(), Nick::new(name));
            }

            let existing = inner
                .channels
                .get(channel)
                .and_then(|chan| chan.members.get(name))
                .cloned();
            let privs = match existing {
                Some(privs) => privs,
                None => inner.associate(name, channel, self.conn()),
            };

            if let Some(tier) = tier {
                privs.set(tier, true);
            }
        }
    }
}
