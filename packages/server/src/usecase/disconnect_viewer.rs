//! UseCase: 視聴者の切断処理

use std::sync::Arc;

use crate::domain::{ConnectionHub, ConnectionId, SessionRegistry};

use super::{connect_viewer::sample_viewer_count, status_broadcaster::StatusBroadcaster};

/// 視聴者切断のユースケース
pub struct DisconnectViewerUseCase {
    registry: Arc<dyn SessionRegistry>,
    hub: Arc<dyn ConnectionHub>,
    status: Arc<StatusBroadcaster>,
}

impl DisconnectViewerUseCase {
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        hub: Arc<dyn ConnectionHub>,
        status: Arc<StatusBroadcaster>,
    ) -> Self {
        Self {
            registry,
            hub,
            status,
        }
    }

    /// 接続を登録解除する。既に解除済みでも安全に呼べる。
    ///
    /// Returns `true` if the connection was still registered.
    pub async fn execute(&self, connection_id: &ConnectionId) -> bool {
        let removed = self.hub.unregister(connection_id).await;
        if removed {
            tracing::info!("Connection {} disconnected", connection_id);
        }
        sample_viewer_count(&*self.registry, &*self.hub, &self.status).await;
        removed
    }
}
