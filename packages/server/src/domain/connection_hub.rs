//! ConnectionHub trait 定義
//!
//! 接続中クライアントの集合を管理し、ペイロードを全員へ配信する。
//! 1 クライアントの送信失敗は他のクライアントへの配信に影響しません。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    error::HubError,
    value_object::{ConnectionId, DisplayName},
};

/// Outbound queue of one connection. The network layer drains the receiver.
pub type ConnectionChannel = mpsc::Sender<String>;

/// Aggregate result of one broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
}

/// Registry of live connections with isolated fan-out
#[async_trait]
pub trait ConnectionHub: Send + Sync {
    /// Add a connection with the default label
    async fn register(&self, channel: ConnectionChannel) -> ConnectionId;

    /// Remove a connection. Returns whether it was present.
    async fn unregister(&self, connection_id: &ConnectionId) -> bool;

    /// Update the display name used as default chat author
    async fn relabel(
        &self,
        connection_id: &ConnectionId,
        name: DisplayName,
    ) -> Result<(), HubError>;

    /// Current label of a connection
    async fn label_of(&self, connection_id: &ConnectionId) -> Option<DisplayName>;

    /// Deliver to one connection only. A failed send unregisters it.
    async fn push_to(&self, connection_id: &ConnectionId, payload: &str) -> Result<(), HubError>;

    /// Deliver to every registered connection
    ///
    /// Connections that fail are unregistered and counted in `failed`.
    async fn broadcast(&self, payload: &str) -> BroadcastReport;

    async fn connection_count(&self) -> usize;
}
