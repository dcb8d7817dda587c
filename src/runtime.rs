//! Connection loop.
//!
//! ```text
//!   socket ──lines──► Session::feed ──► StateTracker ──► ClientHandle ──► Bot
//!                                          │ queries                        │ replies
//!                                          ▼                                ▼
//!   socket ◄──lines── writer ◄────────── mpsc queue ◄──────────────────────┘
//! ```
//!
//! [`Session`] holds everything that reacts to lines and owns no I/O, so it
//! can be fed directly in tests. [`run`] wires it to a TCP stream.

use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{Instrument, debug, info, warn};

use crate::bot::Bot;
use crate::client::{ClientHandle, Connection};
use crate::config::IrcConfig;
use crate::error::TransportError;
use crate::event::Event;
use crate::proto::{Command, LineCodec, Message};
use crate::state::StateTracker;
use crate::telemetry::spans;

/// Why the connection loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// A QUIT went out, requested by a user or by the bot.
    Quit,
    /// Interrupted from the terminal.
    Interrupted,
}

/// The line-driven half of a connection.
pub struct Session {
    handle: Arc<ClientHandle>,
    state: Arc<StateTracker>,
    bot: Bot,
}

impl Session {
    /// Build a session and the receiving end of its outbound queue.
    pub fn new(config: &IrcConfig) -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (handle, rx) = ClientHandle::new(config.nick.clone());
        let state = Arc::new(StateTracker::new(handle.clone()));
        let bot = Bot::new(config.clone(), state.clone(), handle.clone());
        (Self { handle, state, bot }, rx)
    }

    pub fn state(&self) -> &Arc<StateTracker> {
        &self.state
    }

    pub fn handle(&self) -> &Arc<ClientHandle> {
        &self.handle
    }

    /// Queue the registration burst.
    pub fn register(&self, config: &IrcConfig) {
        if let Some(pass) = &config.pass {
            self.handle.send(Command::PASS(pass.clone()));
        }
        self.handle.send(Command::NICK(config.nick.clone()));
        self.handle.send(Command::USER(
            config.username().to_owned(),
            config.realname().to_owned(),
        ));
    }

    /// Process one inbound line. Unparseable or irrelevant lines are
    /// dropped.
    pub fn feed(&self, line: &str) {
        let msg = match Message::parse(line) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(error = %e, "dropping unparseable line");
                return;
            }
        };

        let event = match Event::from_message(&msg) {
            Ok(Some(event)) => event,
            Ok(None) => return,
            Err(e) => {
                debug!(error = %e, code = e.error_code(), "dropping malformed event");
                return;
            }
        };

        let _span = spans::event(event.kind()).entered();
        self.state.handle(&event);
        self.handle.observe(&event);
        for command in self.bot.handle(&event) {
            self.handle.send(command);
        }
    }
}

/// Connect, register, and run until QUIT, interruption, or a transport
/// failure. Returns the tracker so callers can inspect the final state.
pub async fn run(config: &IrcConfig) -> Result<(Arc<StateTracker>, Shutdown), TransportError> {
    let addr = config.address();
    let span = spans::connection(&addr, &config.nick);

    async move {
        info!("connecting");
        let stream = TcpStream::connect(&addr).await?;
        let (mut sink, mut lines) = Framed::new(stream, LineCodec::new()).split();

        let (session, mut rx) = Session::new(config);
        session.register(config);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let shutdown = loop {
            tokio::select! {
                line = lines.next() => match line {
                    Some(Ok(line)) => session.feed(&line),
                    Some(Err(e)) => return Err(TransportError::from(e)),
                    None => {
                        warn!("server closed the connection");
                        return Err(TransportError::Closed);
                    }
                },
                Some(command) = rx.recv() => {
                    let quit = matches!(command, Command::QUIT(_));
                    sink.send(command.to_string()).await?;
                    if quit {
                        info!("quit sent");
                        break Shutdown::Quit;
                    }
                }
                _ = &mut ctrl_c => {
                    info!("interrupted, quitting");
                    let quit = Command::QUIT(Some("shutting down".to_owned()));
                    sink.send(quit.to_string()).await?;
                    break Shutdown::Interrupted;
                }
            }
        };

        Ok((session.state().clone(), shutdown))
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> IrcConfig {
        toml::from_str(
            r##"
host = "irc.example.net"
nick = "mirror"
pass = "serverpw"
realname = "State Mirror"
normal_channel = "#lobby"
"##,
        )
        .unwrap()
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Command>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(command) = rx.try_recv() {
            out.push(command.to_string());
        }
        out
    }

    #[test]
    fn test_register_burst() {
        let config = config();
        let (session, mut rx) = Session::new(&config);
        session.register(&config);
        assert_eq!(
            drain(&mut rx),
            vec!["PASS serverpw", "NICK mirror", "USER mirror 0 * :State Mirror"]
        );
    }

    #[test]
    fn test_feed_runs_tracker_then_bot() {
        let config = config();
        let (session, mut rx) = Session::new(&config);

        session.feed(":irc.example.net 001 mirror :Welcome");
        assert_eq!(
            drain(&mut rx),
            vec!["MODE mirror +B", "JOIN #lobby"]
        );

        session.feed(":mirror!m@host JOIN #lobby");
        assert_eq!(drain(&mut rx), vec!["MODE #lobby", "WHO #lobby"]);

        session.feed(":irc.example.net 353 mirror = #lobby :@mirror alice");
        assert!(session.state().get_privs("#lobby", "mirror").unwrap().get().op);

        session.feed("PING :irc.example.net");
        assert_eq!(drain(&mut rx), vec!["PONG :irc.example.net"]);
    }

    #[test]
    fn test_feed_drops_garbage() {
        let config = config();
        let (session, mut rx) = Session::new(&config);
        session.feed("");
        session.feed(":only.a.prefix");
        session.feed(":nick!u@h KICK #lobby");
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_welcome_under_fallback_nick() {
        let config = config();
        let (session, mut rx) = Session::new(&config);

        session.feed(":irc.example.net 433 * mirror :Nickname is already in use");
        assert_eq!(drain(&mut rx), vec!["NICK mirror_"]);

        session.feed(":irc.example.net 001 mirror_ :Welcome");
        assert_eq!(session.handle().current_nick(), "mirror_");
        assert_eq!(session.state().me().unwrap().nick, "mirror_");
        assert_eq!(
            drain(&mut rx),
            vec!["NICK mirror", "MODE mirror +B", "JOIN #lobby"]
        );
    }
}
