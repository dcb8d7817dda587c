//! State tracking module.
//!
//! Contains the [`StateTracker`] mirror and the entities it holds.

mod channel;
mod handlers;
mod modes;
mod nick;
mod privileges;
mod queries;
mod tracker;

pub use channel::{Channel, ChannelModes};
pub use nick::{Nick, NickModes};
pub use privileges::{PrivilegeHandle, Privileges, Tier};
pub use queries::{ChannelSnapshot, NickSnapshot, Snapshot};
pub use tracker::StateTracker;
