//! IRC message prefix types.
//!
//! An IRC message prefix identifies the origin of a message. It can be either
//! a server name or a user's nick!user@host mask.

use std::fmt;

/// IRC message prefix - identifies the origin of a message.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// Server name (e.g., "irc.example.com")
    ServerName(String),
    /// User prefix: (nickname, username, hostname)
    Nickname(String, String, String),
}

impl Prefix {
    /// Parse a prefix string into a Prefix.
    ///
    /// This is a lenient parser that does not validate the components.
    pub fn new_from_str(s: &str) -> Self {
        #[derive(Copy, Clone, Eq, PartialEq)]
        enum Part {
            Name,
            User,
            Host,
        }

        let mut name = String::new();
        let mut user = String::new();
        let mut host = String::new();
        let mut part = Part::Name;
        let mut is_server = false;

        for c in s.chars() {
            // A dot before any ! or @ means a server name
            if c == '.' && part == Part::Name {
                is_server = true;
            }

            match c {
                '!' if part == Part::Name => {
                    is_server = false;
                    part = Part::User;
                }
                '@' if part != Part::Host => {
                    is_server = false;
                    part = Part::Host;
                }
                _ => {
                    match part {
                        Part::Name => &mut name,
                        Part::User => &mut user,
                        Part::Host => &mut host,
                    }
                    .push(c);
                }
            }
        }

        if is_server {
            Prefix::ServerName(name)
        } else {
            Prefix::Nickname(name, user, host)
        }
    }

    /// Get the nickname if this is a user prefix.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(nick, _, _) if !nick.is_empty() => Some(nick),
            _ => None,
        }
    }

    /// Get the username if this is a user prefix.
    pub fn user(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(_, user, _) if !user.is_empty() => Some(user),
            _ => None,
        }
    }

    /// Get the hostname.
    pub fn host(&self) -> Option<&str> {
        match self {
            Prefix::ServerName(name) => Some(name),
            Prefix::Nickname(_, _, host) if !host.is_empty() => Some(host),
            _ => None,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::ServerName(name) => f.write_str(name),
            Prefix::Nickname(nick, user, host) => {
                f.write_str(nick)?;
                if !user.is_empty() {
                    write!(f, "!{user}")?;
                }
                if !host.is_empty() {
                    write!(f, "@{host}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_user_prefix() {
        let prefix = Prefix::new_from_str("alice!ali@example.com");
        assert_eq!(
            prefix,
            Prefix::Nickname("alice".into(), "ali".into(), "example.com".into())
        );
        assert_eq!(prefix.nick(), Some("alice"));
        assert_eq!(prefix.user(), Some("ali"));
        assert_eq!(prefix.host(), Some("example.com"));
    }

    #[test]
    fn test_server_prefix() {
        let prefix = Prefix::new_from_str("irc.example.net");
        assert_eq!(prefix, Prefix::ServerName("irc.example.net".to_string()));
        assert_eq!(prefix.nick(), None);
        assert_eq!(prefix.host(), Some("irc.example.net"));
    }

    #[test]
    fn test_bare_nick_prefix() {
        let prefix = Prefix::new_from_str("bob");
        assert_eq!(prefix.nick(), Some("bob"));
        assert_eq!(prefix.user(), None);
        assert_eq!(prefix.host(), None);
    }

    #[test]
    fn test_dotted_host_is_still_user() {
        let prefix = Prefix::new_from_str("carol!c@host.with.dots");
        assert_eq!(prefix.nick(), Some("carol"));
        assert_eq!(prefix.to_string(), "carol!c@host.with.dots");
    }
}
