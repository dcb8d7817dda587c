//! Channel-related types and state.

use std::collections::HashMap;

use super::PrivilegeHandle;

/// Channel modes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChannelModes {
    pub private: bool,         // +p
    pub secret: bool,          // +s
    pub topic_lock: bool,      // +t
    pub no_external: bool,     // +n
    pub moderated: bool,       // +m
    pub invite_only: bool,     // +i
    pub oper_only: bool,       // +O
    pub tls_only: bool,        // +z
    pub registered: bool,      // +r
    pub all_tls: bool,         // +Z
    pub key: Option<String>,   // +k
    /// User limit (+l), `0` when unset.
    pub limit: u32,
}

impl ChannelModes {
    /// Boolean flag toggled by `c`, if `c` is a no-argument channel mode.
    pub(crate) fn flag_mut(&mut self, c: char) -> Option<&mut bool> {
        match c {
            'p' => Some(&mut self.private),
            's' => Some(&mut self.secret),
            't' => Some(&mut self.topic_lock),
            'n' => Some(&mut self.no_external),
            'm' => Some(&mut self.moderated),
            'i' => Some(&mut self.invite_only),
            'O' => Some(&mut self.oper_only),
            'z' => Some(&mut self.tls_only),
            'r' => Some(&mut self.registered),
            'Z' => Some(&mut self.all_tls),
            _ => None,
        }
    }

    /// Convert modes to a string like "+ntkl key 10".
    pub fn as_mode_string(&self) -> String {
        let mut flags = String::from("+");
        let mut params = Vec::with_capacity(2);

        for (set, c) in [
            (self.private, 'p'),
            (self.secret, 's'),
            (self.topic_lock, 't'),
            (self.no_external, 'n'),
            (self.moderated, 'm'),
            (self.invite_only, 'i'),
            (self.oper_only, 'O'),
            (self.tls_only, 'z'),
            (self.registered, 'r'),
            (self.all_tls, 'Z'),
        ] {
            if set {
                flags.push(c);
            }
        }

        if let Some(key) = &self.key {
            flags.push('k');
            params.push(key.clone());
        }
        if self.limit > 0 {
            flags.push('l');
            params.push(self.limit.to_string());
        }

        if params.is_empty() {
            flags
        } else {
            format!("{} {}", flags, params.join(" "))
        }
    }
}

/// A channel as seen from the client.
#[derive(Debug, Clone)]
pub struct Channel {
    pub name: String,
    pub topic: String,
    pub modes: ChannelModes,
    /// Members by nick. Each handle is shared with the nick's channel map.
    pub members: HashMap<String, PrivilegeHandle>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            topic: String::new(),
            modes: ChannelModes::default(),
            members: HashMap::new(),
        }
    }

    pub fn has_nick(&self, nick: &str) -> bool {
        self.members.contains_key(nick)
    }

    /// Member nicks in sorted order.
    pub fn member_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.members.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_modes_string() {
        assert_eq!(ChannelModes::default().as_mode_string(), "+");
    }

    #[test]
    fn test_modes_string_with_params() {
        let modes = ChannelModes {
            no_external: true,
            topic_lock: true,
            key: Some("sekrit".to_string()),
            limit: 25,
            ..Default::default()
        };
        assert_eq!(modes.as_mode_string(), "+tnkl sekrit 25");
    }

    #[test]
    fn test_flag_mut_covers_boolean_modes() {
        let mut modes = ChannelModes::default();
        for c in "pstnmiOzrZ".chars() {
            *modes.flag_mut(c).unwrap() = true;
        }
        assert_eq!(modes.as_mode_string(), "+pstnmiOzrZ");
        assert!(modes.flag_mut('k').is_none());
        assert!(modes.flag_mut('o').is_none());
    }

    #[test]
    fn test_member_names_sorted() {
        let mut channel = Channel::new("#x");
        channel.members.insert("zed".into(), PrivilegeHandle::new());
        channel.members.insert("amy".into(), PrivilegeHandle::new());
        assert_eq!(channel.member_names(), vec!["amy", "zed"]);
        assert!(channel.has_nick("amy"));
        assert!(!channel.has_nick("bob"));
    }
}
