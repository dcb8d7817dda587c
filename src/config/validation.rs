//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("irc.host is required")]
    MissingHost,
    #[error("irc.nick is required")]
    MissingNick,
    #[error("irc.nick must not contain spaces or start with a digit, got '{0}'")]
    InvalidNick(String),
    #[error("irc.normal_channel must start with '#' or '&', got '{0}'")]
    InvalidChannel(String),
    #[error("irc.staff_channel must start with '#' or '&', got '{0}'")]
    InvalidStaffChannel(String),
    #[error("irc.port must not be 0")]
    InvalidPort,
}

fn is_channel_name(name: &str) -> bool {
    name.starts_with(['#', '&']) && name.len() > 1 && !name.contains([' ', ','])
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let irc = &config.irc;

    if irc.host.is_empty() {
        errors.push(ValidationError::MissingHost);
    }
    if irc.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    if irc.nick.is_empty() {
        errors.push(ValidationError::MissingNick);
    } else if irc.nick.contains(' ') || irc.nick.starts_with(|c: char| c.is_ascii_digit()) {
        errors.push(ValidationError::InvalidNick(irc.nick.clone()));
    }

    if !is_channel_name(&irc.normal_channel) {
        errors.push(ValidationError::InvalidChannel(irc.normal_channel.clone()));
    }
    if let Some(staff) = &irc.staff_channel
        && !is_channel_name(staff)
    {
        errors.push(ValidationError::InvalidStaffChannel(staff.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_valid_config() -> String {
        r##"
[irc]
host = "irc.example.net"
nick = "mirror"
normal_channel = "#lobby"
staff_channel = "#staff"
"##
        .to_string()
    }

    #[test]
    fn test_valid_config_passes() {
        let config: Config = toml::from_str(&minimal_valid_config()).unwrap();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_nick_fails() {
        let toml = r##"
[irc]
host = "irc.example.net"
nick = ""
normal_channel = "#lobby"
"##;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingNick)));
    }

    #[test]
    fn test_bad_nick_and_channel_reported_together() {
        let toml = r##"
[irc]
host = ""
nick = "9lives"
normal_channel = "lobby"
staff_channel = "#"
"##;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingHost)));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidNick(_))));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidChannel(_))));
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, ValidationError::InvalidStaffChannel(_)))
        );
    }
}
