//! Domain entities: chat messages and the stream session lifecycle.

use std::fmt;

use serde::Serialize;

use super::{
    error::SessionError,
    value_object::{DisplayName, MessageText, SessionId, Timestamp, Username},
};

/// Fixed stream key the media server publishes under
pub const DEFAULT_STREAM_KEY: &str = "stream";

/// One accepted chat message. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub author: DisplayName,
    pub text: MessageText,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(author: DisplayName, text: MessageText, timestamp: Timestamp) -> Self {
        Self {
            author,
            text,
            timestamp,
        }
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.timestamp.value(),
            self.author,
            self.text.as_str()
        )
    }
}

/// Lifecycle state of a session. Transitions only Idle → Live → Ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Live,
    Ended,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Idle => "idle",
            SessionState::Live => "live",
            SessionState::Ended => "ended",
        };
        f.write_str(label)
    }
}

/// Where the broadcaster pushes to and where viewers pull from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEndpoints {
    pub stream_key: String,
    pub ingest_url: String,
    pub playback_url: String,
}

impl StreamEndpoints {
    /// Endpoints for the default stream key on the given media server
    pub fn for_media_server(media_server_url: &str) -> Self {
        let base = media_server_url.trim_end_matches('/');
        Self {
            stream_key: DEFAULT_STREAM_KEY.to_string(),
            ingest_url: format!("rtmp://localhost/live/{}", DEFAULT_STREAM_KEY),
            playback_url: format!("{}/live/{}/index.m3u8", base, DEFAULT_STREAM_KEY),
        }
    }
}

/// The lifecycle-guarded record of one stream
///
/// Mutated only through `SessionRegistry`, which serializes access.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    owner: Username,
    state: SessionState,
    started_at: Option<Timestamp>,
    ended_at: Option<Timestamp>,
    endpoints: StreamEndpoints,
    messages: Vec<ChatMessage>,
    total_messages: u64,
    peak_viewer_count: usize,
    notifications_sent: u32,
}

impl Session {
    /// Create an idle session with a fresh id
    pub fn new(owner: Username, endpoints: StreamEndpoints) -> Self {
        Self {
            id: SessionId::generate(),
            owner,
            state: SessionState::Idle,
            started_at: None,
            ended_at: None,
            endpoints,
            messages: Vec::new(),
            total_messages: 0,
            peak_viewer_count: 0,
            notifications_sent: 0,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn owner(&self) -> &Username {
        &self.owner
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state == SessionState::Live
    }

    /// Idle → Live
    pub fn go_live(&mut self, at: Timestamp) -> Result<(), SessionError> {
        self.transition(SessionState::Idle, SessionState::Live)?;
        self.started_at = Some(at);
        Ok(())
    }

    /// Live → Ended, returning the final snapshot
    pub fn end(&mut self, at: Timestamp) -> Result<SessionSnapshot, SessionError> {
        self.transition(SessionState::Live, SessionState::Ended)?;
        self.ended_at = Some(at);
        Ok(self.snapshot(at))
    }

    fn transition(&mut self, from: SessionState, to: SessionState) -> Result<(), SessionError> {
        if self.state != from {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    /// Append a message to the log. Returns the new total.
    pub fn append_message(&mut self, message: ChatMessage) -> Result<u64, SessionError> {
        if !self.is_live() {
            return Err(SessionError::NoActiveSession);
        }
        self.messages.push(message);
        self.total_messages += 1;
        Ok(self.total_messages)
    }

    /// Record a viewer count sample. Returns the (possibly unchanged) peak.
    pub fn record_viewer_sample(&mut self, count: usize) -> usize {
        self.peak_viewer_count = self.peak_viewer_count.max(count);
        self.peak_viewer_count
    }

    pub fn record_notification(&mut self) -> u32 {
        self.notifications_sent += 1;
        self.notifications_sent
    }

    /// Read-only view of the message log, in arrival order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }

    /// Point-in-time copy of everything except the message log
    ///
    /// `now` is used for the duration while the session is still live.
    pub fn snapshot(&self, now: Timestamp) -> SessionSnapshot {
        let duration_millis = match (self.started_at, self.ended_at) {
            (Some(started), Some(ended)) => ended.millis_since(started),
            (Some(started), None) => now.millis_since(started),
            _ => 0,
        };
        SessionSnapshot {
            id: self.id,
            owner: self.owner.clone(),
            state: self.state,
            started_at: self.started_at,
            ended_at: self.ended_at,
            duration_millis,
            total_messages: self.total_messages,
            peak_viewer_count: self.peak_viewer_count,
            notifications_sent: self.notifications_sent,
            endpoints: self.endpoints.clone(),
        }
    }
}

/// Immutable summary of a session at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub owner: Username,
    pub state: SessionState,
    pub started_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
    pub duration_millis: u64,
    pub total_messages: u64,
    pub peak_viewer_count: usize,
    pub notifications_sent: u32,
    pub endpoints: StreamEndpoints,
}

impl SessionSnapshot {
    /// Duration rendered as `"{h}h {m}m {s}s"`
    pub fn duration_label(&self) -> String {
        let total_secs = self.duration_millis / 1000;
        format!(
            "{}h {}m {}s",
            total_secs / 3600,
            (total_secs % 3600) / 60,
            total_secs % 60
        )
    }
}
