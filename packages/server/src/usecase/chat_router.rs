//! UseCase: 受信イベントのルーティング（チャット / ping / identify）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ChatRouter::handle_chat_event() と handle_event()
//! - 投稿者名の解決、本文の検証・無害化、セッションへの記録、全接続への配信
//!
//! ### なぜこのテストが必要か
//! - 本文のエスケープはコンテンツ安全性のポリシーであり、必ず適用されること
//! - 検証エラーは状態を一切変更せず、送信元の接続にだけ返ること
//! - Live セッションがなくても配信は行われ、記録だけがスキップされること
//!
//! ### どのような状況を想定しているか
//! - 正常系：明示的な author 付きのチャット、接続ラベルを使うチャット
//! - 異常系：空の本文、壊れた JSON
//! - エッジケース：Live セッションなし、ログ書き込みの失敗

use std::{sync::Arc, time::Duration};

use metastream_shared::time::Clock;

use crate::{
    domain::{
        BroadcastReport, ChatMessage, ConnectionHub, ConnectionId, DisplayName, LogSink,
        MessageText, SessionError, SessionRegistry, Timestamp, ValueObjectError,
    },
    infrastructure::dto::websocket::{InboundEnvelope, OutboundEnvelope},
};

use super::{error::ChatError, spawn_best_effort};

/// Result of one accepted chat event
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub message: ChatMessage,
    /// `false` when no session was live to record into
    pub recorded: bool,
    pub report: BroadcastReport,
}

/// Routes decoded inbound events to the registry and the hub
pub struct ChatRouter {
    registry: Arc<dyn SessionRegistry>,
    hub: Arc<dyn ConnectionHub>,
    log_sink: Arc<dyn LogSink>,
    clock: Arc<dyn Clock>,
    external_timeout: Duration,
}

impl ChatRouter {
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        hub: Arc<dyn ConnectionHub>,
        log_sink: Arc<dyn LogSink>,
        clock: Arc<dyn Clock>,
        external_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            hub,
            log_sink,
            clock,
            external_timeout,
        }
    }

    /// Decode one text frame and dispatch it
    pub async fn handle_frame(&self, connection_id: &ConnectionId, raw: &str) {
        match serde_json::from_str::<InboundEnvelope>(raw) {
            Ok(event) => self.handle_event(connection_id, event).await,
            Err(e) => {
                tracing::warn!("Undecodable frame from {}: {}", connection_id, e);
                self.reject(connection_id, &ChatError::Decode(e.to_string()))
                    .await;
            }
        }
    }

    pub async fn handle_event(&self, connection_id: &ConnectionId, event: InboundEnvelope) {
        match event {
            InboundEnvelope::Chat { author, text } => {
                if let Err(e) = self
                    .handle_chat_event(Some(connection_id), author, text)
                    .await
                {
                    tracing::debug!("Rejected chat from {}: {}", connection_id, e);
                    self.reject(connection_id, &e).await;
                }
            }
            InboundEnvelope::Ping => {
                let pong = OutboundEnvelope::System {
                    data: "pong".to_string(),
                    timestamp: self.clock.now_millis(),
                };
                if let Err(e) = self.hub.push_to(connection_id, &pong.to_json()).await {
                    tracing::debug!("Failed to answer ping: {}", e);
                }
            }
            InboundEnvelope::Identify { username } => {
                if let Err(e) = self.identify(connection_id, username).await {
                    self.reject(connection_id, &e).await;
                }
            }
        }
    }

    /// Validate, record and broadcast one chat message
    ///
    /// `connection_id` is `None` for chat submitted over HTTP. Validation runs
    /// before anything is mutated.
    pub async fn handle_chat_event(
        &self,
        connection_id: Option<&ConnectionId>,
        raw_author: Option<String>,
        raw_text: Option<String>,
    ) -> Result<ChatOutcome, ChatError> {
        let text = MessageText::new(raw_text.as_deref().unwrap_or_default())?;

        let explicit_author = raw_author.as_deref().and_then(DisplayName::parse);
        let author = match (&explicit_author, connection_id) {
            (Some(author), _) => author.clone(),
            (None, Some(id)) => self.hub.label_of(id).await.unwrap_or_default(),
            (None, None) => DisplayName::default(),
        };

        if let (Some(explicit), Some(id)) = (explicit_author, connection_id)
            && !explicit.is_default()
            && let Err(e) = self.hub.relabel(id, explicit).await
        {
            tracing::debug!("Could not relabel {}: {}", id, e);
        }

        let message = ChatMessage::new(author, text, Timestamp::new(self.clock.now_millis()));

        let recorded = match self.registry.append_message(message.clone()).await {
            Ok(total) => {
                tracing::debug!("Recorded chat message #{}", total);
                true
            }
            Err(SessionError::NoActiveSession) => {
                tracing::debug!("No live session, chat message broadcast without recording");
                false
            }
            Err(e) => {
                tracing::warn!("Failed to record chat message: {}", e);
                false
            }
        };

        let log_sink = self.log_sink.clone();
        let logged = message.clone();
        spawn_best_effort("chat log write", self.external_timeout, async move {
            log_sink.append(&logged).await
        });

        let envelope = OutboundEnvelope::from(&message);
        let report = self.hub.broadcast(&envelope.to_json()).await;
        tracing::debug!(
            "Broadcast chat from '{}' ({} sent, {} failed)",
            message.author,
            report.sent,
            report.failed
        );

        Ok(ChatOutcome {
            message,
            recorded,
            report,
        })
    }

    /// Relabel the connection used as the default chat author
    pub async fn identify(
        &self,
        connection_id: &ConnectionId,
        username: Option<String>,
    ) -> Result<DisplayName, ChatError> {
        let name = username
            .as_deref()
            .and_then(DisplayName::parse)
            .ok_or(ValueObjectError::Empty("username"))?;
        if let Err(e) = self.hub.relabel(connection_id, name.clone()).await {
            tracing::debug!("Could not relabel {}: {}", connection_id, e);
        }
        tracing::info!("Connection {} identified as '{}'", connection_id, name);
        Ok(name)
    }

    /// Echo an error to the offending connection only
    pub async fn reject(&self, connection_id: &ConnectionId, error: &ChatError) {
        let envelope = OutboundEnvelope::Error {
            message: error.to_string(),
            timestamp: self.clock.now_millis(),
        };
        if let Err(e) = self.hub.push_to(connection_id, &envelope.to_json()).await {
            tracing::debug!("Failed to deliver error to {}: {}", connection_id, e);
        }
    }
}
