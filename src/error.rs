//! Unified error handling for slirc-mirror.
//!
//! State tracking itself never fails: every handler degrades to a no-op on
//! missing or malformed data. Errors only exist at the edges, where raw
//! lines become events and where commands leave for the network.

use thiserror::Error;

// ============================================================================
// Parse Errors (raw line -> Message)
// ============================================================================

/// Errors produced while splitting a raw protocol line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty message")]
    EmptyMessage,

    #[error("missing command in line: {0:?}")]
    MissingCommand(String),

    #[error("unterminated tags in line: {0:?}")]
    UnterminatedTags(String),
}

// ============================================================================
// Event Errors (Message -> Event)
// ============================================================================

/// Errors produced when a recognized command lacks what its event needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("{command}: missing argument {index}")]
    MissingArgument { command: String, index: usize },

    #[error("{0}: missing source nick")]
    MissingSource(String),
}

impl EventError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingArgument { .. } => "missing_argument",
            Self::MissingSource(_) => "missing_source",
        }
    }
}

// ============================================================================
// Transport Errors (connection glue)
// ============================================================================

/// Errors raised by the connection loop.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server closed the connection")]
    Closed,
}
