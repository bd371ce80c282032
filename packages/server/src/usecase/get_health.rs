//! UseCase: ヘルスチェック

use std::{sync::Arc, time::Duration};

use crate::domain::{ConnectionHub, MediaHealthCheck, SessionRegistry};

/// Degraded-mode indicators for `/api/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    pub media_server: bool,
    pub active_session: bool,
    pub websocket_connections: usize,
}

/// ヘルスチェックのユースケース
pub struct GetHealthUseCase {
    registry: Arc<dyn SessionRegistry>,
    hub: Arc<dyn ConnectionHub>,
    media: Arc<dyn MediaHealthCheck>,
    external_timeout: Duration,
}

impl GetHealthUseCase {
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        hub: Arc<dyn ConnectionHub>,
        media: Arc<dyn MediaHealthCheck>,
        external_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            hub,
            media,
            external_timeout,
        }
    }

    pub async fn execute(&self) -> HealthReport {
        let media_server = tokio::time::timeout(self.external_timeout, self.media.is_healthy())
            .await
            .unwrap_or(false);
        HealthReport {
            media_server,
            active_session: self.registry.active().await.is_some(),
            websocket_connections: self.hub.connection_count().await,
        }
    }
}
