//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions and loading (Config, IrcConfig, LogConfig)
//! - [`defaults`]: Named default functions referenced by serde
//! - [`validation`]: Post-parse validation of required fields

mod defaults;
mod types;
mod validation;

pub use types::{Config, ConfigError, IrcConfig, LogConfig};
pub use validation::{ValidationError, validate};
