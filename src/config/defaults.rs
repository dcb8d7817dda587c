//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// IRC Defaults
// =============================================================================

pub fn default_port() -> u16 {
    6667
}

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_level() -> String {
    "info".to_string()
}
