//! Ports to collaborators outside the core.
//!
//! Every call through these traits is made without holding registry or hub
//! locks, and callers bound it with a timeout.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    entity::{ChatMessage, SessionSnapshot},
    error::ExternalError,
};

/// Health probe for the external media (transcoding) server
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaHealthCheck: Send + Sync {
    /// `false` on any failure
    async fn is_healthy(&self) -> bool;
}

/// Durable text log of chat lines and session summaries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn append(&self, message: &ChatMessage) -> Result<(), ExternalError>;

    async fn append_session_summary(&self, snapshot: &SessionSnapshot)
    -> Result<(), ExternalError>;
}

/// Kind of side channel a notification goes out on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Sms,
    Tts,
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationChannel::Sms => f.write_str("sms"),
            NotificationChannel::Tts => f.write_str("tts"),
        }
    }
}

/// Best-effort notification sender
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    fn channel(&self) -> NotificationChannel;

    async fn notify(&self, message: &str) -> Result<(), ExternalError>;
}
