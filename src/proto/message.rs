//! Raw line splitting.
//!
//! Message tags are accepted and skipped; nothing the state mirror tracks
//! depends on them.

use std::str::FromStr;

use crate::error::ParseError;

use super::Prefix;

/// A parsed inbound line: optional source prefix, command or numeric, and
/// positional parameters (the trailing parameter included as the last one).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub prefix: Option<Prefix>,
    /// Command name, uppercased, or a three-digit numeric.
    pub command: String,
    pub params: Vec<String>,
}

impl Message {
    /// Parse a single protocol line. Trailing CR/LF is ignored.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        line.parse()
    }

    /// Nickname of the sender, when the source is a user.
    pub fn source_nick(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nick)
    }

    /// Positional argument, if present.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

impl FromStr for Message {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        let line = s.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(ParseError::EmptyMessage);
        }

        let mut rest = line;

        if let Some(tagged) = rest.strip_prefix('@') {
            let (_, after) = tagged
                .split_once(' ')
                .ok_or_else(|| ParseError::UnterminatedTags(line.to_owned()))?;
            rest = after.trim_start_matches(' ');
        }

        let prefix = match rest.strip_prefix(':') {
            Some(source) => {
                let (source, after) = source.split_once(' ').unwrap_or((source, ""));
                rest = after.trim_start_matches(' ');
                Some(Prefix::new_from_str(source))
            }
            None => None,
        };

        let (middle, trailing) = match rest.find(" :") {
            Some(idx) => (&rest[..idx], Some(&rest[idx + 2..])),
            None => (rest, None),
        };

        let mut words = middle.split(' ').filter(|w| !w.is_empty());
        let command = words
            .next()
            .ok_or_else(|| ParseError::MissingCommand(line.to_owned()))?
            .to_ascii_uppercase();

        let mut params: Vec<String> = words.map(str::to_owned).collect();
        if let Some(trailing) = trailing {
            params.push(trailing.to_owned());
        }

        Ok(Message {
            prefix,
            command,
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_ping() {
        let msg = Message::parse("PING :irc.example.net\r\n").unwrap();
        assert!(msg.prefix.is_none());
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.params, vec!["irc.example.net"]);
    }

    #[test]
    fn test_parse_privmsg() {
        let msg = Message::parse(":nick!user@host PRIVMSG #channel :Hello, world!").unwrap();
        assert_eq!(msg.source_nick(), Some("nick"));
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.arg(0), Some("#channel"));
        assert_eq!(msg.arg(1), Some("Hello, world!"));
        assert_eq!(msg.arg(2), None);
    }

    #[test]
    fn test_parse_with_tags() {
        let msg =
            Message::parse("@time=2023-01-01T12:00:00.000Z;msgid=abc :a!b@c JOIN #x").unwrap();
        assert_eq!(msg.command, "JOIN");
        assert_eq!(msg.params, vec!["#x"]);
    }

    #[test]
    fn test_parse_numeric_with_trailing_spaces() {
        let msg = Message::parse(":srv 353 me = #x :@alice +bob carol ").unwrap();
        assert_eq!(msg.command, "353");
        assert_eq!(msg.params, vec!["me", "=", "#x", "@alice +bob carol "]);
    }

    #[test]
    fn test_parse_mode_without_trailing() {
        let msg = Message::parse(":op!o@h MODE #x +ov alice bob").unwrap();
        assert_eq!(msg.params, vec!["#x", "+ov", "alice", "bob"]);
    }

    #[test]
    fn test_lowercase_command_is_uppercased() {
        let msg = Message::parse("ping :x").unwrap();
        assert_eq!(msg.command, "PING");
    }

    #[test]
    fn test_empty_trailing() {
        let msg = Message::parse(":a!b@c TOPIC #x :").unwrap();
        assert_eq!(msg.params, vec!["#x", ""]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(Message::parse("\r\n"), Err(ParseError::EmptyMessage));
        assert!(matches!(
            Message::parse(":only.a.prefix"),
            Err(ParseError::MissingCommand(_))
        ));
        assert!(matches!(
            Message::parse("@tags-without-end"),
            Err(ParseError::UnterminatedTags(_))
        ));
    }
}
