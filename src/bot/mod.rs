//! Bot behaviour on top of the state mirror.
//!
//! The bot never touches the socket. Each event is turned into a list of
//! commands for the runtime to write, which keeps every reaction testable
//! against a plain [`StateTracker`].

mod builtin;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use tracing::{debug, info, warn};

use crate::client::Connection;
use crate::config::IrcConfig;
use crate::event::Event;
use crate::proto::Command;
use crate::state::StateTracker;

/// Services nick that handles GHOST, IDENTIFY, RECOVER and RELEASE.
const NICKSERV: &str = "NickServ";

/// Consecutive nick-in-use replies handled before giving up on the
/// configured nick until the next welcome.
const MAX_RECLAIM_ATTEMPTS: u32 = 3;

/// Event-driven bot logic.
pub struct Bot {
    config: IrcConfig,
    state: Arc<StateTracker>,
    conn: Arc<dyn Connection>,
    registered: AtomicBool,
    reclaim_attempts: AtomicU32,
}

impl Bot {
    pub fn new(config: IrcConfig, state: Arc<StateTracker>, conn: Arc<dyn Connection>) -> Self {
        Self {
            config,
            state,
            conn,
            registered: AtomicBool::new(false),
            reclaim_attempts: AtomicU32::new(0),
        }
    }

    /// Whether the server has welcomed us.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Relaxed)
    }

    /// React to an event. Must run after the tracker has seen it.
    pub fn handle(&self, event: &Event) -> Vec<Command> {
        let mut out = Vec::new();
        match event {
            Event::Welcome { nick } => {
                info!(nick = %nick, "registered with server");
                self.registered.store(true, Ordering::Relaxed);
                self.reclaim_attempts.store(0, Ordering::Relaxed);
                self.setup(&mut out);
                self.join_channels(&mut out);
            }
            Event::NickInUse { nick } => self.nick_in_use(nick, &mut out),
            Event::Ping { token } => {
                out.push(Command::PONG(token.clone()));
                self.join_channels(&mut out);
            }
            Event::Pong | Event::CannotJoin { .. } | Event::Kick { .. } => {
                self.join_channels(&mut out);
            }
            Event::Join { nick, channel, .. } => self.auto_voice(nick, channel, &mut out),
            Event::Privmsg { nick, target, text } => {
                self.run_builtin(nick, target, text, &mut out);
            }
            _ => {}
        }
        out
    }

    /// Take the configured nick, identify, and flag ourselves as a bot.
    fn setup(&self, out: &mut Vec<Command>) {
        let wanted = &self.config.nick;
        let current = self.conn.current_nick();

        if let Some(pass) = &self.config.nick_pass
            && *wanted != current
            && self.state.get_nick(wanted).is_some()
        {
            debug!(nick = %wanted, "ghosting squatter");
            out.push(Command::PRIVMSG(
                NICKSERV.to_owned(),
                format!("GHOST {wanted} {pass}"),
            ));
        }

        if *wanted != current {
            out.push(Command::NICK(wanted.clone()));
        }

        if let Some(pass) = &self.config.nick_pass {
            out.push(Command::PRIVMSG(
                NICKSERV.to_owned(),
                format!("IDENTIFY {pass}"),
            ));
        }

        out.push(Command::MODE(wanted.clone(), Some("+B".to_owned())));
    }

    fn nick_in_use(&self, nick: &str, out: &mut Vec<Command>) {
        if !self.is_registered() {
            let fallback = format!("{nick}_");
            info!(nick = %nick, fallback = %fallback, "nick in use during registration");
            out.push(Command::NICK(fallback));
            return;
        }

        let Some(pass) = &self.config.nick_pass else {
            warn!(nick = %nick, "nick in use and no NickServ password to reclaim it");
            return;
        };

        let attempts = self.reclaim_attempts.fetch_add(1, Ordering::Relaxed) + 1;
        if attempts > MAX_RECLAIM_ATTEMPTS {
            warn!(nick = %nick, attempts, "giving up on reclaiming nick");
            return;
        }

        let wanted = &self.config.nick;
        if self.state.get_nick(wanted).is_some() {
            info!(nick = %wanted, attempts, "reclaiming nick");
            out.push(Command::PRIVMSG(
                NICKSERV.to_owned(),
                format!("RECOVER {wanted} {pass}"),
            ));
            out.push(Command::PRIVMSG(
                NICKSERV.to_owned(),
                format!("RELEASE {wanted} {pass}"),
            ));
        }
        self.setup(out);
    }

    /// Join every configured channel the bot is not currently in.
    fn join_channels(&self, out: &mut Vec<Command>) {
        if !self.is_registered() {
            return;
        }
        let me = self.conn.current_nick();
        for channel in self.config.channels() {
            if self.state.get_privs(channel, &me).is_none() {
                debug!(channel = %channel, "joining configured channel");
                out.push(Command::JOIN(channel.to_owned()));
            }
        }
    }

    fn auto_voice(&self, nick: &str, channel: &str, out: &mut Vec<Command>) {
        if !self.config.auto_voice {
            return;
        }
        let me = self.conn.current_nick();
        if nick == me {
            return;
        }

        let can_voice = self
            .state
            .get_privs(channel, &me)
            .is_some_and(|privs| privs.get().has_halfop_or_higher());
        if !can_voice {
            debug!(channel = %channel, "no privileges to grant voice");
            return;
        }

        let can_speak = self
            .state
            .get_privs(channel, nick)
            .is_some_and(|privs| privs.get().has_voice_or_higher());
        if !can_speak {
            out.push(Command::MODE(channel.to_owned(), Some(format!("+v {nick}"))));
        }
    }
}
