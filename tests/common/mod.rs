//! Integration test common infrastructure.
//!
//! Provides a recording connection for driving the tracker with raw lines,
//! and a fake server for exercising the connection loop over TCP.

pub mod recorder;
pub mod server;

#[allow(unused_imports)]
pub use recorder::{Harness, RecordingConnection, feed_line};
#[allow(unused_imports)]
pub use server::{FakeClient, FakeServer};
