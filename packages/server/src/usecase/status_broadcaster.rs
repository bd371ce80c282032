//! Lifecycle and viewer-count announcements.

use std::sync::Arc;

use metastream_shared::time::Clock;

use crate::{
    domain::{BroadcastReport, ConnectionHub, DisplayName, SessionSnapshot, Username},
    infrastructure::dto::websocket::{OutboundEnvelope, StreamStatusEvent},
};

/// Emits `stream_status` and `viewers` envelopes through the hub
///
/// Driven by the usecases that call `SessionRegistry::start`/`stop`; the
/// registry itself never broadcasts.
pub struct StatusBroadcaster {
    hub: Arc<dyn ConnectionHub>,
    clock: Arc<dyn Clock>,
}

impl StatusBroadcaster {
    pub fn new(hub: Arc<dyn ConnectionHub>, clock: Arc<dyn Clock>) -> Self {
        Self { hub, clock }
    }

    /// `{type:"stream_status", event:"started", data: owner}`, owner escaped
    pub async fn announce_started(&self, owner: &Username) -> BroadcastReport {
        let envelope = OutboundEnvelope::StreamStatus {
            event: StreamStatusEvent::Started,
            data: DisplayName::from(owner).into_string(),
            timestamp: self.clock.now_millis(),
        };
        let report = self.hub.broadcast(&envelope.to_json()).await;
        tracing::info!(
            "Announced stream start by '{}' ({} sent, {} failed)",
            owner,
            report.sent,
            report.failed
        );
        report
    }

    /// `{type:"stream_status", event:"ended", data: duration label}`
    pub async fn announce_ended(&self, summary: &SessionSnapshot) -> BroadcastReport {
        let envelope = OutboundEnvelope::StreamStatus {
            event: StreamStatusEvent::Ended,
            data: summary.duration_label(),
            timestamp: self.clock.now_millis(),
        };
        let report = self.hub.broadcast(&envelope.to_json()).await;
        tracing::info!(
            "Announced end of session {} ({} sent, {} failed)",
            summary.id,
            report.sent,
            report.failed
        );
        report
    }

    pub async fn announce_viewer_count(&self, count: usize) -> BroadcastReport {
        let envelope = OutboundEnvelope::Viewers { count };
        self.hub.broadcast(&envelope.to_json()).await
    }
}
