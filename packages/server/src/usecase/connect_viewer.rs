//! UseCase: 視聴者の接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectViewerUseCase::execute() メソッド
//! - 接続の登録、ウェルカムメッセージ、視聴者数の記録と配信
//!
//! ### なぜこのテストが必要か
//! - ウェルカムメッセージが新しい接続にだけ届くことを保証
//! - 視聴者数のピークがセッションに記録されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：Live セッション中の接続
//! - エッジケース：Live セッションがない状態での接続

use std::sync::Arc;

use metastream_shared::time::Clock;

use crate::{
    domain::{ConnectionChannel, ConnectionHub, ConnectionId, SessionError, SessionRegistry},
    infrastructure::dto::websocket::OutboundEnvelope,
};

use super::status_broadcaster::StatusBroadcaster;

/// Sent to each new connection on its own
pub const WELCOME_MESSAGE: &str = "Connected to MetaStream Live";

/// 視聴者接続のユースケース
pub struct ConnectViewerUseCase {
    registry: Arc<dyn SessionRegistry>,
    hub: Arc<dyn ConnectionHub>,
    status: Arc<StatusBroadcaster>,
    clock: Arc<dyn Clock>,
}

impl ConnectViewerUseCase {
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        hub: Arc<dyn ConnectionHub>,
        status: Arc<StatusBroadcaster>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            hub,
            status,
            clock,
        }
    }

    /// 接続を登録し、視聴者数を更新する
    ///
    /// # Arguments
    ///
    /// * `channel` - この接続への送信キュー
    pub async fn execute(&self, channel: ConnectionChannel) -> ConnectionId {
        let connection_id = self.hub.register(channel).await;

        let welcome = OutboundEnvelope::System {
            data: WELCOME_MESSAGE.to_string(),
            timestamp: self.clock.now_millis(),
        };
        if let Err(e) = self.hub.push_to(&connection_id, &welcome.to_json()).await {
            tracing::warn!("Failed to welcome {}: {}", connection_id, e);
        }

        sample_viewer_count(&*self.registry, &*self.hub, &self.status).await;
        connection_id
    }
}

/// Feed the current hub size into the session and announce it
pub(super) async fn sample_viewer_count(
    registry: &dyn SessionRegistry,
    hub: &dyn ConnectionHub,
    status: &StatusBroadcaster,
) -> usize {
    let count = hub.connection_count().await;
    match registry.record_viewer_sample(count).await {
        Ok(peak) => tracing::debug!("Viewers: {} (peak {})", count, peak),
        Err(SessionError::NoActiveSession) => tracing::debug!("Viewers: {} (no live session)", count),
        Err(e) => tracing::warn!("Failed to record viewer sample: {}", e),
    }
    status.announce_viewer_count(count).await;
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::MIN_OUTBOUND_BUFFER,
        domain::{StreamEndpoints, Username},
        infrastructure::{
            connection_hub::WebSocketConnectionHub, registry::InMemorySessionRegistry,
        },
    };
    use metastream_shared::time::FixedClock;
    use tokio::sync::mpsc;

    fn setup() -> (
        Arc<InMemorySessionRegistry>,
        Arc<WebSocketConnectionHub>,
        ConnectViewerUseCase,
    ) {
        let clock = Arc::new(FixedClock::new(0));
        let registry = Arc::new(InMemorySessionRegistry::new(clock.clone()));
        let hub = Arc::new(WebSocketConnectionHub::new());
        let status = Arc::new(StatusBroadcaster::new(hub.clone(), clock.clone()));
        let usecase = ConnectViewerUseCase::new(registry.clone(), hub.clone(), status, clock);
        (registry, hub, usecase)
    }

    fn decode(raw: &str) -> OutboundEnvelope {
        serde_json::from_str(raw).unwrap()
    }

    #[tokio::test]
    async fn test_connect_sends_welcome_then_viewer_count() {
        // テスト項目: 新しい接続にウェルカム → 視聴者数の順で届き、既存接続には視聴者数だけが届く
        // given (前提条件):
        let (_registry, _hub, usecase) = setup();
        let (tx1, mut rx1) = mpsc::channel(8);
        usecase.execute(tx1).await;
        let _ = rx1.recv().await; // welcome
        let _ = rx1.recv().await; // viewers: 1

        // when (操作):
        let (tx2, mut rx2) = mpsc::channel(8);
        usecase.execute(tx2).await;

        // then (期待する結果):
        assert_eq!(
            decode(&rx2.recv().await.unwrap()),
            OutboundEnvelope::System {
                data: WELCOME_MESSAGE.to_string(),
                timestamp: 0,
            }
        );
        assert_eq!(
            decode(&rx2.recv().await.unwrap()),
            OutboundEnvelope::Viewers { count: 2 }
        );
        assert_eq!(
            decode(&rx1.recv().await.unwrap()),
            OutboundEnvelope::Viewers { count: 2 }
        );
    }

    #[tokio::test]
    async fn test_connect_records_peak_viewers() {
        // テスト項目: Live セッション中の接続で視聴者数のピークが記録される
        // given (前提条件):
        let (registry, _hub, usecase) = setup();
        registry
            .start(
                Username::new("alice".to_string()).unwrap(),
                StreamEndpoints::for_media_server("http://localhost:8000"),
            )
            .await
            .unwrap();

        // when (操作):
        let mut receivers = Vec::new();
        for _ in 0..3 {
            let (tx, rx) = mpsc::channel(16);
            usecase.execute(tx).await;
            receivers.push(rx);
        }

        // then (期待する結果):
        assert_eq!(registry.active().await.unwrap().peak_viewer_count, 3);
    }

    #[tokio::test]
    async fn test_connect_with_minimum_buffer_keeps_connection() {
        // テスト項目: 最小容量の送信キューでも、接続時のメッセージで自分自身が切断されない
        // given (前提条件):
        let (_registry, hub, usecase) = setup();
        let (tx, mut rx) = mpsc::channel(MIN_OUTBOUND_BUFFER);

        // when (操作):
        usecase.execute(tx).await;

        // then (期待する結果):
        assert_eq!(hub.connection_count().await, 1);
        assert!(matches!(
            decode(&rx.recv().await.unwrap()),
            OutboundEnvelope::System { .. }
        ));
        assert_eq!(
            decode(&rx.recv().await.unwrap()),
            OutboundEnvelope::Viewers { count: 1 }
        );
    }
}
