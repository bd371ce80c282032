//! Domain error types.

use thiserror::Error;

use super::entity::SessionState;

/// Errors raised while constructing value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Session lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// `start` while another session is live
    #[error("a stream by '{owner}' is already live")]
    Conflict { owner: String },

    /// `stop` or a query with no live session
    #[error("no active stream")]
    NotFound,

    /// Counter update with no live session
    #[error("no active session to record into")]
    NoActiveSession,

    #[error("invalid session transition from {from} to {to}")]
    InvalidTransition { from: SessionState, to: SessionState },
}

/// Connection hub errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),

    /// Delivery to one connection failed; the connection has been dropped
    #[error("failed to deliver to connection '{0}'")]
    Transport(String),
}

/// Failures of collaborators outside the core (media server, log file,
/// notification channels)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternalError {
    #[error("external service unavailable: {0}")]
    Unavailable(String),

    #[error("external call timed out after {0} ms")]
    Timeout(u64),

    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ExternalError {
    fn from(err: std::io::Error) -> Self {
        ExternalError::Io(err.to_string())
    }
}
