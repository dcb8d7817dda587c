//! Outbound IRC commands.
//!
//! Only what the client sends is modeled; each variant serializes to its
//! wire form through `Display` (without the CRLF terminator).

use std::fmt;

/// A command the client sends to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Command {
    /// `PASS password`
    PASS(String),
    /// `NICK nickname`
    NICK(String),
    /// `USER username 0 * :realname`
    USER(String, String),
    /// `JOIN channel`
    JOIN(String),
    /// `MODE target [modestring [args...]]`
    MODE(String, Option<String>),
    /// `WHO mask`
    WHO(String),
    /// `PRIVMSG target :text`
    PRIVMSG(String, String),
    /// `NOTICE target :text`
    NOTICE(String, String),
    /// `PONG :token`
    PONG(String),
    /// `QUIT [:reason]`
    QUIT(Option<String>),
}

impl Command {
    /// CTCP ACTION (`/me`) sent as a PRIVMSG.
    pub fn action(target: impl Into<String>, text: impl fmt::Display) -> Self {
        Command::PRIVMSG(target.into(), format!("\x01ACTION {text}\x01"))
    }

    /// Query a channel's modes.
    pub fn mode_query(target: impl Into<String>) -> Self {
        Command::MODE(target.into(), None)
    }

    /// Name of the command as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Command::PASS(_) => "PASS",
            Command::NICK(_) => "NICK",
            Command::USER(_, _) => "USER",
            Command::JOIN(_) => "JOIN",
            Command::MODE(_, _) => "MODE",
            Command::WHO(_) => "WHO",
            Command::PRIVMSG(_, _) => "PRIVMSG",
            Command::NOTICE(_, _) => "NOTICE",
            Command::PONG(_) => "PONG",
            Command::QUIT(_) => "QUIT",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::PASS(pass) => write!(f, "PASS {pass}"),
            Command::NICK(nick) => write!(f, "NICK {nick}"),
            Command::USER(user, realname) => write!(f, "USER {user} 0 * :{realname}"),
            Command::JOIN(channel) => write!(f, "JOIN {channel}"),
            Command::MODE(target, None) => write!(f, "MODE {target}"),
            Command::MODE(target, Some(modes)) => write!(f, "MODE {target} {modes}"),
            Command::WHO(mask) => write!(f, "WHO {mask}"),
            Command::PRIVMSG(target, text) => write!(f, "PRIVMSG {target} :{text}"),
            Command::NOTICE(target, text) => write!(f, "NOTICE {target} :{text}"),
            Command::PONG(token) => write!(f, "PONG :{token}"),
            Command::QUIT(None) => f.write_str("QUIT"),
            Command::QUIT(Some(reason)) => write!(f, "QUIT :{reason}"),
        }
    }
}
