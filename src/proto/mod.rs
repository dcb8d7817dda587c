//! Minimal IRC line handling for the client side.
//!
//! Inbound lines are split into a [`Message`] (prefix, command, params);
//! outbound traffic is the closed [`Command`] set the client actually sends.

mod command;
mod line;
mod message;
mod prefix;

pub use command::Command;
pub use line::{LineCodec, MAX_LINE_LENGTH};
pub use message::Message;
pub use prefix::Prefix;
