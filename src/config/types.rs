//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{default_log_level, default_port};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Network connection and identity.
    pub irc: IrcConfig,
    /// Logging output.
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// IRC connection and identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IrcConfig {
    /// Server hostname (e.g., "irc.libera.chat").
    pub host: String,
    /// Server port (default: 6667).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Nickname the bot registers and defends.
    pub nick: String,
    /// NickServ password used for IDENTIFY, GHOST, RECOVER and RELEASE.
    #[serde(default)]
    pub nick_pass: Option<String>,
    /// Connection password sent as PASS, if the server requires one.
    #[serde(default)]
    pub pass: Option<String>,
    /// Username (ident). Falls back to the nickname.
    #[serde(default)]
    pub username: Option<String>,
    /// Realname / GECOS. Falls back to the nickname.
    #[serde(default)]
    pub realname: Option<String>,
    /// Public channel the bot always sits in.
    pub normal_channel: String,
    /// Staff channel the bot also sits in.
    #[serde(default)]
    pub staff_channel: Option<String>,
    /// Voice every plain member who joins, when the bot can.
    #[serde(default)]
    pub auto_voice: bool,
    /// CTCP VERSION reply.
    #[serde(default)]
    pub version: Option<String>,
}

impl IrcConfig {
    /// Username to register with.
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.nick)
    }

    /// Realname to register with.
    pub fn realname(&self) -> &str {
        self.realname.as_deref().unwrap_or(&self.nick)
    }

    /// Channels the bot keeps itself joined to.
    pub fn channels(&self) -> Vec<&str> {
        let mut channels = vec![self.normal_channel.as_str()];
        if let Some(staff) = self.staff_channel.as_deref() {
            channels.push(staff);
        }
        channels
    }

    /// `host:port` address to dial.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
