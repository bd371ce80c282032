//! UseCase: 配信状態の取得

use std::sync::Arc;

use crate::domain::{ConnectionHub, SessionRegistry, SessionSnapshot};

/// Live session together with the current viewer count
#[derive(Debug, Clone)]
pub struct ActiveStream {
    pub snapshot: SessionSnapshot,
    pub viewers: usize,
}

/// 配信状態取得のユースケース
pub struct GetStreamStatusUseCase {
    registry: Arc<dyn SessionRegistry>,
    hub: Arc<dyn ConnectionHub>,
}

impl GetStreamStatusUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>, hub: Arc<dyn ConnectionHub>) -> Self {
        Self { registry, hub }
    }

    /// `None` when no session is live
    pub async fn execute(&self) -> Option<ActiveStream> {
        let snapshot = self.registry.active().await?;
        let viewers = self.hub.connection_count().await;
        Some(ActiveStream { snapshot, viewers })
    }

    /// Summary of the most recently ended session
    pub async fn last_ended(&self) -> Option<SessionSnapshot> {
        self.registry.last_ended().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{StreamEndpoints, Username},
        infrastructure::{
            connection_hub::WebSocketConnectionHub, registry::InMemorySessionRegistry,
        },
    };
    use metastream_shared::time::FixedClock;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_status_follows_session_lifecycle() {
        // テスト項目: Live 中は状態と視聴者数を返し、終了後は None と直近のサマリーを返す
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new(Arc::new(FixedClock::new(0))));
        let hub = Arc::new(WebSocketConnectionHub::new());
        let usecase = GetStreamStatusUseCase::new(registry.clone(), hub.clone());
        let (tx, _rx) = mpsc::channel(8);
        hub.register(tx).await;

        // when (操作) / then (期待する結果):
        assert!(usecase.execute().await.is_none());
        assert!(usecase.last_ended().await.is_none());

        registry
            .start(
                Username::new("alice".to_string()).unwrap(),
                StreamEndpoints::for_media_server("http://localhost:8000"),
            )
            .await
            .unwrap();
        let active = usecase.execute().await.unwrap();
        assert_eq!(active.snapshot.owner.as_str(), "alice");
        assert_eq!(active.viewers, 1);

        registry.stop().await.unwrap();
        assert!(usecase.execute().await.is_none());
        assert_eq!(
            usecase.last_ended().await.unwrap().id,
            active.snapshot.id
        );
    }
}
