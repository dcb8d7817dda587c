//! Built-in `!` commands.

use tracing::{debug, info};

use super::Bot;
use crate::proto::Command;

/// Every built-in command, sorted.
const COMMANDS: [&str; 5] = ["!help", "!ping", "!quit", "!rejoin", "!voice"];

const CTCP_VERSION: &str = "\x01VERSION\x01";

impl Bot {
    /// Run a built-in command from a PRIVMSG, if the text is one.
    pub(super) fn run_builtin(&self, nick: &str, target: &str, text: &str, out: &mut Vec<Command>) {
        if text == CTCP_VERSION {
            if let Some(version) = &self.config.version {
                out.push(Command::NOTICE(
                    nick.to_owned(),
                    format!("\x01VERSION {version}\x01"),
                ));
            }
            return;
        }

        let mut words = text.split_whitespace();
        let Some(command) = words.next() else {
            return;
        };
        let args: Vec<&str> = words.collect();

        let private = target == self.conn.current_nick();
        let reply_to = if private { nick } else { target };
        // Unknown in a private message, so privileged commands are ignored
        // there.
        let privs = self.state.get_privs(target, nick).map(|p| p.get());

        match (command, privs) {
            ("!rejoin", _) if private => {
                info!(nick = %nick, "rejoin requested");
                for channel in self.config.channels() {
                    out.push(Command::JOIN(channel.to_owned()));
                }
            }
            ("!ping", _) => {
                out.push(Command::PRIVMSG(reply_to.to_owned(), format!("{nick}: PONG!")));
            }
            ("!help", _) => match args.first() {
                Some(cmd) => out.push(self.command_help(reply_to, nick, cmd)),
                None => out.push(Command::PRIVMSG(
                    reply_to.to_owned(),
                    format!("{nick}: available commands are: {}", COMMANDS.join(", ")),
                )),
            },
            ("!quit", Some(privs)) => {
                if privs.has_op_or_higher() {
                    info!(nick = %nick, channel = %target, "quit requested");
                    out.push(Command::QUIT(Some(format!("requested by {nick}"))));
                } else {
                    out.push(slap(target, nick));
                }
            }
            ("!voice", Some(privs)) => {
                if privs.has_op_or_higher() {
                    self.voice_all(target, out);
                } else {
                    out.push(slap(target, nick));
                }
            }
            _ => {}
        }
    }

    /// Voice every member of `channel` that holds no tier.
    fn voice_all(&self, channel: &str, out: &mut Vec<Command>) {
        let me = self.conn.current_nick();
        let can_voice = self
            .state
            .get_privs(channel, &me)
            .is_some_and(|privs| privs.get().has_halfop_or_higher());
        if !can_voice {
            debug!(channel = %channel, "no privileges to grant voice");
            return;
        }

        let Some(chan) = self.state.get_channel(channel) else {
            return;
        };
        for member in chan.member_names() {
            let bare = chan
                .members
                .get(&member)
                .is_some_and(|privs| !privs.get().has_voice_or_higher());
            if bare {
                out.push(Command::MODE(channel.to_owned(), Some(format!("+v {member}"))));
            }
        }
    }

    fn command_help(&self, reply_to: &str, nick: &str, cmd: &str) -> Command {
        let me = self.conn.current_nick();
        let message = match cmd {
            "!ping" => format!("makes `{me}` answer with PONG!"),
            "!help" => "lists commands, or explains one".to_owned(),
            "!quit" => format!("makes `{me}` disconnect (op only)"),
            "!voice" => "voices everyone in the channel without a rank (op only)".to_owned(),
            "!rejoin" => "rejoins the configured channels, private message only".to_owned(),
            _ => "unknown command, run `!help` for the list".to_owned(),
        };
        Command::PRIVMSG(reply_to.to_owned(), format!("{nick}: {cmd} - {message}"))
    }
}

fn slap(channel: &str, nick: &str) -> Command {
    Command::action(
        channel,
        format_args!("slaps {nick}'s hands away from the op only controls"),
    )
}
