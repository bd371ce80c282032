//! UseCase error types.

use thiserror::Error;

use crate::domain::{SessionError, ValueObjectError, escape_markup};

/// Errors from `StartStreamUseCase`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartStreamError {
    #[error("media server unavailable")]
    MediaUnavailable,

    #[error("invalid username: {0}")]
    InvalidUsername(ValueObjectError),

    /// Another session is live; names its owner, escaped
    #[error("a stream by '{owner}' is already live, stop it first")]
    AlreadyLive { owner: String },

    #[error(transparent)]
    Session(SessionError),
}

impl From<SessionError> for StartStreamError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Conflict { owner } => StartStreamError::AlreadyLive {
                owner: escape_markup(&owner),
            },
            other => StartStreamError::Session(other),
        }
    }
}

/// Errors from `StopStreamUseCase`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StopStreamError {
    #[error("no active stream to stop")]
    NotLive,

    #[error(transparent)]
    Session(SessionError),
}

impl From<SessionError> for StopStreamError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound => StopStreamError::NotLive,
            other => StopStreamError::Session(other),
        }
    }
}

/// Errors from inbound chat handling. Echoed to the offending connection only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(#[from] ValueObjectError),

    #[error("malformed message: {0}")]
    Decode(String),
}
