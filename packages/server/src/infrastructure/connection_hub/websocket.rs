//! WebSocket 接続を束ねる ConnectionHub 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信キュー（bounded `mpsc::Sender`）と表示名の管理
//! - 単一接続への送信（push_to）と全接続への配信（broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket 自体は UI 層（`ui/handler/websocket.rs`）が保持し、キューの受信側を
//! ソケットへ流し込みます。この Hub はキューへの投入だけを行うため、
//! ネットワーク I/O を待つことはありません。
//!
//! broadcast はロック中に送信先のスナップショットを取り、ロックを外してから
//! 送信します。キューが閉じている（切断済み）か満杯（遅いクライアント）の場合は
//! 回復不能な送信失敗として扱い、その接続だけを登録解除します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::domain::{
    BroadcastReport, ConnectionChannel, ConnectionHub, ConnectionId, DisplayName, HubError,
};

/// Registered connection
struct ConnectionEntry {
    channel: ConnectionChannel,
    label: DisplayName,
}

/// WebSocket 接続用の ConnectionHub 実装
///
/// ## 使用例
///
/// ```ignore
/// let hub = WebSocketConnectionHub::new();
/// let (tx, rx) = tokio::sync::mpsc::channel(256);
/// let connection_id = hub.register(tx).await;
/// let report = hub.broadcast(r#"{"type":"viewers","count":1}"#).await;
/// ```
#[derive(Default)]
pub struct WebSocketConnectionHub {
    connections: Mutex<HashMap<ConnectionId, ConnectionEntry>>,
}

impl WebSocketConnectionHub {
    /// 新しい WebSocketConnectionHub を作成
    pub fn new() -> Self {
        Self::default()
    }

    fn deliver(
        connection_id: &ConnectionId,
        channel: &ConnectionChannel,
        payload: &str,
    ) -> Result<(), HubError> {
        match channel.try_send(payload.to_string()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    "Outbound queue of connection '{}' is full, dropping connection",
                    connection_id
                );
                Err(HubError::Transport(connection_id.to_string()))
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!("Connection '{}' is closed, dropping it", connection_id);
                Err(HubError::Transport(connection_id.to_string()))
            }
        }
    }
}

#[async_trait]
impl ConnectionHub for WebSocketConnectionHub {
    async fn register(&self, channel: ConnectionChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        let mut connections = self.connections.lock().await;
        connections.insert(
            connection_id,
            ConnectionEntry {
                channel,
                label: DisplayName::default(),
            },
        );
        tracing::debug!("Connection '{}' registered to hub", connection_id);
        connection_id
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> bool {
        let mut connections = self.connections.lock().await;
        let removed = connections.remove(connection_id).is_some();
        if removed {
            tracing::debug!("Connection '{}' unregistered from hub", connection_id);
        }
        removed
    }

    async fn relabel(
        &self,
        connection_id: &ConnectionId,
        name: DisplayName,
    ) -> Result<(), HubError> {
        let mut connections = self.connections.lock().await;
        let entry = connections
            .get_mut(connection_id)
            .ok_or_else(|| HubError::ConnectionNotFound(connection_id.to_string()))?;
        tracing::debug!(
            "Connection '{}' relabeled '{}' -> '{}'",
            connection_id,
            entry.label,
            name
        );
        entry.label = name;
        Ok(())
    }

    async fn label_of(&self, connection_id: &ConnectionId) -> Option<DisplayName> {
        let connections = self.connections.lock().await;
        connections
            .get(connection_id)
            .map(|entry| entry.label.clone())
    }

    async fn push_to(&self, connection_id: &ConnectionId, payload: &str) -> Result<(), HubError> {
        let channel = {
            let connections = self.connections.lock().await;
            connections
                .get(connection_id)
                .map(|entry| entry.channel.clone())
                .ok_or_else(|| HubError::ConnectionNotFound(connection_id.to_string()))?
        };

        if let Err(e) = Self::deliver(connection_id, &channel, payload) {
            self.unregister(connection_id).await;
            return Err(e);
        }
        Ok(())
    }

    async fn broadcast(&self, payload: &str) -> BroadcastReport {
        // Copy-then-iterate: no lock is held while sending.
        let targets: Vec<(ConnectionId, ConnectionChannel)> = {
            let connections = self.connections.lock().await;
            connections
                .iter()
                .map(|(id, entry)| (*id, entry.channel.clone()))
                .collect()
        };

        let mut report = BroadcastReport::default();
        let mut failed_ids = Vec::new();
        for (connection_id, channel) in &targets {
            match Self::deliver(connection_id, channel, payload) {
                Ok(()) => report.sent += 1,
                Err(_) => {
                    report.failed += 1;
                    failed_ids.push(*connection_id);
                }
            }
        }

        if !failed_ids.is_empty() {
            let mut connections = self.connections.lock().await;
            for connection_id in &failed_ids {
                connections.remove(connection_id);
            }
        }

        tracing::debug!(
            "Broadcast delivered to {} connection(s), {} failed",
            report.sent,
            report.failed
        );
        report
    }

    async fn connection_count(&self) -> usize {
        self.connections.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - register / unregister / relabel の基本動作
    // - broadcast が全接続に同一ペイロードを届けること
    // - 一部の接続が失敗しても他の接続には届き、失敗した接続は除去されること
    //
    // 【どのようなシナリオをテストするか】
    // 1. 3 接続への broadcast
    // 2. 切断済み（受信側 drop）接続を含む broadcast
    // 3. キューが満杯の遅い接続を含む broadcast
    // 4. 冪等な unregister
    // ========================================

    #[tokio::test]
    async fn test_broadcast_to_all_connections() {
        // テスト項目: 3 接続すべてに同一のペイロードが届く
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();
        let mut receivers = Vec::new();
        for _ in 0..3 {
            let (tx, rx) = mpsc::channel(8);
            hub.register(tx).await;
            receivers.push(rx);
        }
        let payload = r#"{"type":"chat","author":"x","text":"hi"}"#;

        // when (操作):
        let report = hub.broadcast(payload).await;

        // then (期待する結果):
        assert_eq!(report, BroadcastReport { sent: 3, failed: 0 });
        for rx in receivers.iter_mut() {
            assert_eq!(rx.recv().await.as_deref(), Some(payload));
        }
    }

    #[tokio::test]
    async fn test_broadcast_isolates_closed_connections() {
        // テスト項目: 切断済みの接続があっても残りには届き、切断済みは除去される
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();
        let (tx_alive1, mut rx_alive1) = mpsc::channel(8);
        let (tx_dead, rx_dead) = mpsc::channel(8);
        let (tx_alive2, mut rx_alive2) = mpsc::channel(8);
        hub.register(tx_alive1).await;
        let dead_id = hub.register(tx_dead).await;
        hub.register(tx_alive2).await;
        drop(rx_dead);

        // when (操作):
        let report = hub.broadcast("payload").await;

        // then (期待する結果):
        assert_eq!(report, BroadcastReport { sent: 2, failed: 1 });
        assert_eq!(rx_alive1.recv().await.as_deref(), Some("payload"));
        assert_eq!(rx_alive2.recv().await.as_deref(), Some("payload"));
        assert_eq!(hub.connection_count().await, 2);
        assert!(hub.label_of(&dead_id).await.is_none());
    }

    #[tokio::test]
    async fn test_broadcast_evicts_full_queue() {
        // テスト項目: キューが満杯の遅い接続は除去され、他の接続には届く
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();
        let (tx_slow, _rx_slow) = mpsc::channel(1);
        let (tx_fast, mut rx_fast) = mpsc::channel(8);
        let slow_id = hub.register(tx_slow).await;
        hub.register(tx_fast).await;

        // when (操作):
        let first = hub.broadcast("one").await;
        let second = hub.broadcast("two").await;

        // then (期待する結果):
        assert_eq!(first, BroadcastReport { sent: 2, failed: 0 });
        assert_eq!(second, BroadcastReport { sent: 1, failed: 1 });
        assert_eq!(rx_fast.recv().await.as_deref(), Some("one"));
        assert_eq!(rx_fast.recv().await.as_deref(), Some("two"));
        assert!(hub.label_of(&slow_id).await.is_none());
    }

    #[tokio::test]
    async fn test_broadcast_empty_hub() {
        // テスト項目: 接続がなくてもエラーにならない
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();

        // when (操作):
        let report = hub.broadcast("nobody").await;

        // then (期待する結果):
        assert_eq!(report, BroadcastReport::default());
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        // テスト項目: 同じ接続を何度 unregister しても問題ない
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();
        let (tx, _rx) = mpsc::channel(8);
        let id = hub.register(tx).await;

        // when (操作):
        let first = hub.unregister(&id).await;
        let second = hub.unregister(&id).await;

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_relabel_and_label_of() {
        // テスト項目: 表示名は既定で Anonymous、relabel で更新される
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();
        let (tx, _rx) = mpsc::channel(8);
        let id = hub.register(tx).await;
        assert_eq!(hub.label_of(&id).await, Some(DisplayName::default()));

        // when (操作):
        let name = DisplayName::parse("carol").unwrap();
        hub.relabel(&id, name.clone()).await.unwrap();

        // then (期待する結果):
        assert_eq!(hub.label_of(&id).await, Some(name));
        let missing = hub
            .relabel(&ConnectionId::generate(), DisplayName::default())
            .await;
        assert!(matches!(missing, Err(HubError::ConnectionNotFound(_))));
    }

    #[tokio::test]
    async fn test_push_to_dead_connection_unregisters() {
        // テスト項目: 単一送信に失敗した接続は登録解除される
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();
        let (tx, rx) = mpsc::channel(8);
        let id = hub.register(tx).await;
        drop(rx);

        // when (操作):
        let result = hub.push_to(&id, "hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(HubError::Transport(_))));
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_register_and_broadcast() {
        // テスト項目: 登録と broadcast が並行しても破綻しない
        // given (前提条件):
        let hub = Arc::new(WebSocketConnectionHub::new());
        let mut receivers = Vec::new();
        let mut handles = Vec::new();

        // when (操作):
        for _ in 0..50 {
            let (tx, rx) = mpsc::channel(128);
            receivers.push(rx);
            let hub = hub.clone();
            handles.push(tokio::spawn(async move {
                hub.register(tx).await;
                hub.broadcast("tick").await
            }));
        }
        let mut total_sent = 0;
        for handle in handles {
            total_sent += handle.await.unwrap().sent;
        }

        // then (期待する結果):
        assert_eq!(hub.connection_count().await, 50);
        assert!(total_sent >= 50);
    }
}
