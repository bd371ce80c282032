//! Conversion logic between domain entities and DTOs.

use metastream_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatMessage, DisplayName, SessionSnapshot};
use crate::infrastructure::dto::{http as http_dto, websocket as ws_dto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&ChatMessage> for ws_dto::OutboundEnvelope {
    fn from(message: &ChatMessage) -> Self {
        ws_dto::OutboundEnvelope::Chat {
            author: message.author.as_str().to_string(),
            text: message.text.as_str().to_string(),
            timestamp: message.timestamp.value(),
        }
    }
}

impl From<&ChatMessage> for http_dto::ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            author: message.author.as_str().to_string(),
            text: message.text.as_str().to_string(),
            timestamp: message.timestamp.value(),
        }
    }
}

impl From<&SessionSnapshot> for http_dto::StreamSessionDto {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            session_id: snapshot.id.to_string(),
            username: DisplayName::from(&snapshot.owner).into_string(),
            status: snapshot.state.to_string(),
            rtmp_url: snapshot.endpoints.ingest_url.clone(),
            hls_url: snapshot.endpoints.playback_url.clone(),
            stream_key: snapshot.endpoints.stream_key.clone(),
            started_at: snapshot
                .started_at
                .map(|at| timestamp_to_rfc3339(at.value())),
            ended_at: snapshot.ended_at.map(|at| timestamp_to_rfc3339(at.value())),
            duration: snapshot.duration_label(),
            messages: snapshot.total_messages,
            peak_viewers: snapshot.peak_viewer_count,
            notifications_sent: snapshot.notifications_sent,
            viewers: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageText, Session, StreamEndpoints, Timestamp, Username};

    #[test]
    fn test_chat_message_to_envelope() {
        // テスト項目: ChatMessage が chat エンベロープに変換される
        // given (前提条件):
        let message = ChatMessage::new(
            DisplayName::parse("bob").unwrap(),
            MessageText::new("<b>hi</b>").unwrap(),
            Timestamp::new(2000),
        );

        // when (操作):
        let envelope: ws_dto::OutboundEnvelope = (&message).into();

        // then (期待する結果):
        assert_eq!(
            envelope,
            ws_dto::OutboundEnvelope::Chat {
                author: "bob".to_string(),
                text: "&lt;b&gt;hi&lt;&#x2F;b&gt;".to_string(),
                timestamp: 2000,
            }
        );
    }

    #[test]
    fn test_snapshot_to_session_dto() {
        // テスト項目: SessionSnapshot が HTTP 用 DTO に変換される
        // given (前提条件):
        let mut session = Session::new(
            Username::new("alice".to_string()).unwrap(),
            StreamEndpoints::for_media_server("http://localhost:8000"),
        );
        session.go_live(Timestamp::new(0)).unwrap();
        let snapshot = session.snapshot(Timestamp::new(61_000));

        // when (操作):
        let dto: http_dto::StreamSessionDto = (&snapshot).into();

        // then (期待する結果):
        assert_eq!(dto.username, "alice");
        assert_eq!(dto.status, "live");
        assert_eq!(dto.duration, "0h 1m 1s");
        assert_eq!(dto.hls_url, "http://localhost:8000/live/stream/index.m3u8");
        assert!(dto.started_at.is_some());
        assert!(dto.ended_at.is_none());
    }

    #[test]
    fn test_session_dto_escapes_owner() {
        // テスト項目: セッション DTO のユーザー名はチャットと同じくエスケープされる
        // given (前提条件):
        let session = Session::new(
            Username::new("<b>alice</b>".to_string()).unwrap(),
            StreamEndpoints::for_media_server("http://localhost:8000"),
        );

        // when (操作):
        let dto: http_dto::StreamSessionDto = (&session.snapshot(Timestamp::new(0))).into();

        // then (期待する結果):
        assert_eq!(dto.username, "&lt;b&gt;alice&lt;&#x2F;b&gt;");
    }
}
