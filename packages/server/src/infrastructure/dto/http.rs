//! HTTP API request and response bodies.

use serde::{Deserialize, Serialize};

use crate::domain::NotificationChannel;

/// `POST /api/stream/start`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartStreamRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notify: Vec<NotificationChannel>,
}

/// `POST /api/chat`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Session as exposed over HTTP
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSessionDto {
    pub session_id: String,
    pub username: String,
    pub status: String,
    pub rtmp_url: String,
    pub hls_url: String,
    pub stream_key: String,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub duration: String,
    pub messages: u64,
    pub peak_viewers: usize,
    pub notifications_sent: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewers: Option<usize>,
}

/// Chat history entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub author: String,
    pub text: String,
    pub timestamp: i64,
}

/// Result of an HTTP-submitted chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatAcceptedDto {
    pub message: ChatMessageDto,
    pub recorded: bool,
    pub delivered: usize,
}

/// `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub backend: String,
    pub media_server: bool,
    pub active_session: bool,
    pub websocket_connections: usize,
}

/// Success wrapper: `{ "message": ..., "data": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessDto<T> {
    pub message: String,
    pub data: T,
}

/// Error body: `{ "error": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
