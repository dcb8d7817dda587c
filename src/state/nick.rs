//! Nick-related types and state.

use std::collections::HashMap;

use super::PrivilegeHandle;

/// User modes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NickModes {
    pub bot: bool,         // +B
    pub invisible: bool,   // +i
    pub oper: bool,        // +o (IRC operator)
    pub wallops: bool,     // +w
    pub hidden_host: bool, // +x
    pub secure: bool,      // +Z (TLS connection)
}

impl NickModes {
    pub(crate) fn flag_mut(&mut self, c: char) -> Option<&mut bool> {
        match c {
            'B' => Some(&mut self.bot),
            'i' => Some(&mut self.invisible),
            'o' => Some(&mut self.oper),
            'w' => Some(&mut self.wallops),
            'x' => Some(&mut self.hidden_host),
            'Z' => Some(&mut self.secure),
            _ => None,
        }
    }

    /// Convert modes to a string like "+iw".
    pub fn as_mode_string(&self) -> String {
        let mut s = String::from("+");
        if self.bot {
            s.push('B');
        }
        if self.invisible {
            s.push('i');
        }
        if self.oper {
            s.push('o');
        }
        if self.wallops {
            s.push('w');
        }
        if self.hidden_host {
            s.push('x');
        }
        if self.secure {
            s.push('Z');
        }
        s
    }
}

/// A user as seen from the client.
#[derive(Debug, Clone)]
pub struct Nick {
    pub nick: String,
    pub user: String,
    pub host: String,
    pub realname: String,
    pub modes: NickModes,
    /// Channels by name. Each handle is shared with the channel's member map.
    pub channels: HashMap<String, PrivilegeHandle>,
}

impl Nick {
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            user: String::new(),
            host: String::new(),
            realname: String::new(),
            modes: NickModes::default(),
            channels: HashMap::new(),
        }
    }

    pub fn in_channel(&self, channel: &str) -> bool {
        self.channels.contains_key(channel)
    }

    /// `nick!user@host`, with missing parts left out.
    pub fn hostmask(&self) -> String {
        match (self.user.is_empty(), self.host.is_empty()) {
            (false, false) => format!("{}!{}@{}", self.nick, self.user, self.host),
            (true, false) => format!("{}@{}", self.nick, self.host),
            _ => self.nick.clone(),
        }
    }
}
