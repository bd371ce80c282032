//! WebSocket envelopes.
//!
//! Every frame is a JSON object tagged by `"type"`. Inbound frames are decoded
//! once, at the socket boundary, into `InboundEnvelope`.

use serde::{Deserialize, Serialize};

/// Client → server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEnvelope {
    Chat {
        #[serde(default)]
        author: Option<String>,
        #[serde(default)]
        text: Option<String>,
    },
    Ping,
    Identify {
        #[serde(default)]
        username: Option<String>,
    },
}

/// Lifecycle event carried by `stream_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamStatusEvent {
    Started,
    Ended,
}

/// Server → client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEnvelope {
    Chat {
        author: String,
        text: String,
        timestamp: i64,
    },
    StreamStatus {
        event: StreamStatusEvent,
        data: String,
        timestamp: i64,
    },
    Viewers {
        count: usize,
    },
    System {
        data: String,
        timestamp: i64,
    },
    Error {
        message: String,
        timestamp: i64,
    },
}

impl OutboundEnvelope {
    /// Serialize to the JSON text frame sent to clients
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("outbound envelope is always serializable")
    }
}
