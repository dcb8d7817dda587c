//! Logging setup and span constructors.

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level when it is set.
pub fn init(config: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Span for the lifetime of a server connection.
    pub fn connection(addr: &str, nick: &str) -> Span {
        info_span!("connection", addr = %addr, nick = %nick)
    }

    /// Span for handling one inbound event.
    pub fn event(kind: &str) -> Span {
        debug_span!("event", kind = %kind)
    }
}
