//! Normalized inbound events.
//!
//! Every protocol line the client cares about becomes one [`Event`]. The
//! positional argument layout of each command and numeric is resolved here,
//! once, so the state tracker and the bot match on a closed enum instead of
//! indexing into parameter lists.

use crate::error::EventError;
use crate::proto::Message;

/// `RPL_WELCOME`
pub const RPL_WELCOME: &str = "001";
/// `RPL_WHOISUSER`
pub const RPL_WHOISUSER: &str = "311";
/// `RPL_CHANNELMODEIS`
pub const RPL_CHANNELMODEIS: &str = "324";
/// `RPL_TOPIC`
pub const RPL_TOPIC: &str = "332";
/// `RPL_WHOREPLY`
pub const RPL_WHOREPLY: &str = "352";
/// `RPL_NAMREPLY`
pub const RPL_NAMREPLY: &str = "353";
/// `ERR_NICKNAMEINUSE`
pub const ERR_NICKNAMEINUSE: &str = "433";
/// `ERR_NEEDREGGEDNICK`
pub const ERR_NEEDREGGEDNICK: &str = "477";
/// `RPL_WHOISSECURE`
pub const RPL_WHOISSECURE: &str = "671";

/// An inbound protocol event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Registration completed; `nick` is the nickname the server assigned us.
    Welcome { nick: String },
    /// The nickname we asked for is taken.
    NickInUse { nick: String },
    /// A channel refused our JOIN until we identify.
    CannotJoin { channel: String },
    Ping { token: String },
    Pong,
    Join {
        nick: String,
        user: String,
        host: String,
        channel: String,
    },
    Part { nick: String, channel: String },
    Kick {
        channel: String,
        nick: String,
        by: String,
    },
    Quit { nick: String },
    NickChange { old: String, new: String },
    /// Live topic change.
    Topic { channel: String, topic: String },
    /// Topic sent in reply to a JOIN or TOPIC query.
    TopicReply { channel: String, topic: String },
    /// Live MODE or a `324` channel mode reply.
    Mode {
        target: String,
        modes: String,
        args: Vec<String>,
    },
    WhoReply {
        nick: String,
        user: String,
        host: String,
        flags: String,
    },
    WhoisUser {
        nick: String,
        user: String,
        host: String,
        realname: String,
    },
    WhoisSecure {
        nick: String,
        user: Option<String>,
        host: Option<String>,
        realname: Option<String>,
    },
    Names { channel: String, names: String },
    Privmsg {
        nick: String,
        target: String,
        text: String,
    },
}

fn required(msg: &Message, index: usize) -> Result<String, EventError> {
    msg.arg(index)
        .map(str::to_owned)
        .ok_or_else(|| EventError::MissingArgument {
            command: msg.command.clone(),
            index,
        })
}

fn optional(msg: &Message, index: usize) -> Option<String> {
    msg.arg(index).map(str::to_owned)
}

fn source(msg: &Message) -> Result<String, EventError> {
    msg.source_nick()
        .map(str::to_owned)
        .ok_or_else(|| EventError::MissingSource(msg.command.clone()))
}

impl Event {
    /// Map a parsed line to an event.
    ///
    /// Returns `Ok(None)` for commands nothing downstream consumes, and an
    /// error when a consumed command lacks a required argument.
    pub fn from_message(msg: &Message) -> Result<Option<Event>, EventError> {
        let event = match msg.command.as_str() {
            RPL_WELCOME => Event::Welcome {
                nick: required(msg, 0)?,
            },
            ERR_NICKNAMEINUSE => Event::NickInUse {
                nick: required(msg, 1)?,
            },
            ERR_NEEDREGGEDNICK => Event::CannotJoin {
                channel: required(msg, 1)?,
            },
            "PING" => Event::Ping {
                token: optional(msg, 0).unwrap_or_default(),
            },
            "PONG" => Event::Pong,
            "JOIN" => {
                let prefix = msg.prefix.as_ref();
                Event::Join {
                    nick: source(msg)?,
                    user: prefix.and_then(|p| p.user()).unwrap_or_default().to_owned(),
                    host: prefix.and_then(|p| p.host()).unwrap_or_default().to_owned(),
                    channel: required(msg, 0)?,
                }
            }
            "PART" => Event::Part {
                nick: source(msg)?,
                channel: required(msg, 0)?,
            },
            "KICK" => Event::Kick {
                channel: required(msg, 0)?,
                nick: required(msg, 1)?,
                by: msg
                    .prefix
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            },
            "QUIT" => Event::Quit { nick: source(msg)? },
            "NICK" => Event::NickChange {
                old: source(msg)?,
                new: required(msg, 0)?,
            },
            "TOPIC" => Event::Topic {
                channel: required(msg, 0)?,
                topic: optional(msg, 1).unwrap_or_default(),
            },
            RPL_TOPIC => Event::TopicReply {
                channel: required(msg, 1)?,
                topic: optional(msg, 2).unwrap_or_default(),
            },
            "MODE" => Event::Mode {
                target: required(msg, 0)?,
                modes: required(msg, 1)?,
                args: msg.params.iter().skip(2).cloned().collect(),
            },
            RPL_CHANNELMODEIS => Event::Mode {
                target: required(msg, 1)?,
                modes: required(msg, 2)?,
                args: msg.params.iter().skip(3).cloned().collect(),
            },
            RPL_WHOREPLY => Event::WhoReply {
                user: required(msg, 2)?,
                host: required(msg, 3)?,
                nick: required(msg, 5)?,
                flags: required(msg, 6)?,
            },
            RPL_WHOISUSER => Event::WhoisUser {
                nick: required(msg, 1)?,
                user: required(msg, 2)?,
                host: required(msg, 3)?,
                realname: required(msg, 5)?,
            },
            // Some servers send `<nick> :is using a secure connection`, others
            // repeat the user/host/realname layout of 311.
            RPL_WHOISSECURE => {
                let full = msg.params.len() >= 6;
                Event::WhoisSecure {
                    nick: required(msg, 1)?,
                    user: full.then(|| optional(msg, 2)).flatten(),
                    host: full.then(|| optional(msg, 3)).flatten(),
                    realname: full.then(|| optional(msg, 5)).flatten(),
                }
            }
            RPL_NAMREPLY => {
                let channel = required(msg, 2)?;
                // Tokens are the final parameter, after the visibility symbol.
                let names = required(msg, msg.params.len().saturating_sub(1).max(3))?;
                Event::Names { channel, names }
            }
            "PRIVMSG" => Event::Privmsg {
                nick: source(msg)?,
                target: required(msg, 0)?,
                text: required(msg, 1)?,
            },
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Welcome { .. } => "welcome",
            Event::NickInUse { .. } => "nick_in_use",
            Event::CannotJoin { .. } => "cannot_join",
            Event::Ping { .. } => "ping",
            Event::Pong => "pong",
            Event::Join { .. } => "join",
            Event::Part { .. } => "part",
            Event::Kick { .. } => "kick",
            Event::Quit { .. } => "quit",
            Event::NickChange { .. } => "nick",
            Event::Topic { .. } => "topic",
            Event::TopicReply { .. } => "topic_reply",
            Event::Mode { .. } => "mode",
            Event::WhoReply { .. } => "who_reply",
            Event::WhoisUser { .. } => "whois_user",
            Event::WhoisSecure { .. } => "whois_secure",
            Event::Names { .. } => "names",
            Event::Privmsg { .. } => "privmsg",
        }
    }
}
