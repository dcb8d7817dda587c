//! slirc-mirror - IRC client-side state mirror.
//!
//! Tracks the channels and nicks visible to a bot connection: membership,
//! per-channel privileges, channel and user modes, topics. A small bot
//! layer and connection loop sit on top.

pub mod bot;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod proto;
pub mod runtime;
pub mod state;
pub mod telemetry;

pub use client::{ClientHandle, Connection};
pub use event::Event;
pub use state::StateTracker;
