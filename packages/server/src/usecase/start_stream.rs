//! UseCase: 配信開始
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - StartStreamUseCase::execute() メソッド
//! - メディアサーバー確認 → セッション開始 → 開始通知 → 外部通知 の流れ
//!
//! ### なぜこのテストが必要か
//! - 同時に Live になれるセッションは 1 つだけであることを保証
//! - メディアサーバー停止時に開始を拒否できることを確認
//! - 外部通知の失敗が配信開始を妨げないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：配信開始と stream_status の配信
//! - 異常系：メディアサーバー停止、空のユーザー名、既に Live
//! - エッジケース：通知ゲートウェイの失敗

use std::{sync::Arc, time::Duration};

use crate::domain::{
    MediaHealthCheck, NotificationGateway, SessionRegistry, SessionSnapshot, StreamEndpoints,
    Username,
};

use super::{error::StartStreamError, spawn_best_effort, status_broadcaster::StatusBroadcaster};

/// Input for `StartStreamUseCase::execute`
pub struct StartStreamCommand {
    pub username: String,
    /// Gateways to notify once the session is live
    pub notifications: Vec<Arc<dyn NotificationGateway>>,
}

/// 配信開始のユースケース
pub struct StartStreamUseCase {
    registry: Arc<dyn SessionRegistry>,
    media: Arc<dyn MediaHealthCheck>,
    status: Arc<StatusBroadcaster>,
    media_server_url: String,
    /// `false` skips the media health check entirely
    require_media: bool,
    external_timeout: Duration,
}

impl StartStreamUseCase {
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        media: Arc<dyn MediaHealthCheck>,
        status: Arc<StatusBroadcaster>,
        media_server_url: String,
        require_media: bool,
        external_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            media,
            status,
            media_server_url,
            require_media,
            external_timeout,
        }
    }

    /// 配信開始を実行
    ///
    /// # Returns
    ///
    /// * `Ok(SessionSnapshot)` - 開始したセッション
    /// * `Err(StartStreamError)` - メディアサーバー停止 / ユーザー名不正 / 既に Live
    pub async fn execute(
        &self,
        command: StartStreamCommand,
    ) -> Result<SessionSnapshot, StartStreamError> {
        // 1. メディアサーバーの死活確認（ロック外、タイムアウト付き）
        if self.require_media {
            let healthy = tokio::time::timeout(self.external_timeout, self.media.is_healthy())
                .await
                .unwrap_or(false);
            if !healthy {
                tracing::warn!("Refusing to start stream: media server unavailable");
                return Err(StartStreamError::MediaUnavailable);
            }
        }

        // 2. ユーザー名の検証
        let owner = Username::new(command.username).map_err(StartStreamError::InvalidUsername)?;

        // 3. セッション開始（check-then-create は Registry 内で直列化）
        let endpoints = StreamEndpoints::for_media_server(&self.media_server_url);
        let snapshot = self.registry.start(owner, endpoints).await?;
        tracing::info!("Stream {} started by '{}'", snapshot.id, snapshot.owner);

        // 4. 接続中のクライアントへ通知
        self.status.announce_started(&snapshot.owner).await;

        // 5. 外部通知（ベストエフォート）
        let text = format!("{} is now live on MetaStream", snapshot.owner);
        for gateway in command.notifications {
            let registry = self.registry.clone();
            let session_id = snapshot.id;
            let text = text.clone();
            spawn_best_effort("stream notification", self.external_timeout, async move {
                gateway.notify(&text).await?;
                match registry.record_notification(&session_id).await {
                    Ok(total) => tracing::debug!(
                        "{} notification delivered ({} total)",
                        gateway.channel(),
                        total
                    ),
                    Err(_) => tracing::debug!(
                        "{} notification delivered after session {} ended",
                        gateway.channel(),
                        session_id
                    ),
                }
                Ok(())
            });
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ConnectionHub, ExternalError, NotificationChannel, SessionState,
            external::{MockMediaHealthCheck, MockNotificationGateway},
        },
        infrastructure::{
            connection_hub::WebSocketConnectionHub, registry::InMemorySessionRegistry,
        },
    };
    use metastream_shared::time::FixedClock;
    use tokio::sync::mpsc;

    struct Fixture {
        registry: Arc<InMemorySessionRegistry>,
        hub: Arc<WebSocketConnectionHub>,
        usecase: StartStreamUseCase,
    }

    fn fixture(healthy: bool) -> Fixture {
        let clock = Arc::new(FixedClock::new(0));
        let registry = Arc::new(InMemorySessionRegistry::new(clock.clone()));
        let hub = Arc::new(WebSocketConnectionHub::new());
        let mut media = MockMediaHealthCheck::new();
        media.expect_is_healthy().returning(move || healthy);
        let status = Arc::new(StatusBroadcaster::new(hub.clone(), clock));
        let usecase = StartStreamUseCase::new(
            registry.clone(),
            Arc::new(media),
            status,
            "http://localhost:8000".to_string(),
            true,
            Duration::from_secs(1),
        );
        Fixture {
            registry,
            hub,
            usecase,
        }
    }

    fn command(username: &str) -> StartStreamCommand {
        StartStreamCommand {
            username: username.to_string(),
            notifications: Vec::new(),
        }
    }

    async fn wait_for_notifications(registry: &InMemorySessionRegistry, expected: u32) -> bool {
        for _ in 0..50 {
            if let Some(active) = registry.active().await
                && active.notifications_sent == expected
            {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_start_stream_success() {
        // テスト項目: 配信開始に成功し、接続中のクライアントに started が届く
        // given (前提条件):
        let f = fixture(true);
        let (tx, mut rx) = mpsc::channel(8);
        f.hub.register(tx).await;

        // when (操作):
        let snapshot = f.usecase.execute(command("alice")).await.unwrap();

        // then (期待する結果):
        assert_eq!(snapshot.state, SessionState::Live);
        assert_eq!(snapshot.owner.as_str(), "alice");
        assert_eq!(snapshot.endpoints.ingest_url, "rtmp://localhost/live/stream");
        let payload = rx.recv().await.unwrap();
        assert!(payload.contains(r#""event":"started""#));
        assert!(payload.contains(r#""data":"alice""#));
    }

    #[tokio::test]
    async fn test_start_stream_conflict_names_owner() {
        // テスト項目: Live 中の開始は現在のオーナー名付きで拒否される
        // given (前提条件):
        let f = fixture(true);
        let first = f.usecase.execute(command("alice")).await.unwrap();

        // when (操作):
        let result = f.usecase.execute(command("bob")).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            StartStreamError::AlreadyLive {
                owner: "alice".to_string()
            }
        );
        assert_eq!(f.registry.active().await.unwrap().id, first.id);
    }

    #[tokio::test]
    async fn test_start_stream_media_unavailable() {
        // テスト項目: メディアサーバー停止時は開始できず、状態も作られない
        // given (前提条件):
        let f = fixture(false);

        // when (操作):
        let result = f.usecase.execute(command("alice")).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), StartStreamError::MediaUnavailable);
        assert!(f.registry.active().await.is_none());
    }

    #[tokio::test]
    async fn test_start_stream_media_not_required() {
        // テスト項目: require_media が false ならヘルスチェックは呼ばれない
        // given (前提条件):
        let clock = Arc::new(FixedClock::new(0));
        let registry = Arc::new(InMemorySessionRegistry::new(clock.clone()));
        let hub = Arc::new(WebSocketConnectionHub::new());
        let mut media = MockMediaHealthCheck::new();
        media.expect_is_healthy().never();
        let usecase = StartStreamUseCase::new(
            registry,
            Arc::new(media),
            Arc::new(StatusBroadcaster::new(hub, clock)),
            "http://localhost:8000".to_string(),
            false,
            Duration::from_secs(1),
        );

        // when (操作):
        let result = usecase.execute(command("alice")).await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_start_stream_empty_username() {
        // テスト項目: 空のユーザー名は InvalidUsername になる
        // given (前提条件):
        let f = fixture(true);

        // when (操作):
        let result = f.usecase.execute(command("  ")).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(StartStreamError::InvalidUsername(_))
        ));
        assert!(f.registry.active().await.is_none());
    }

    #[tokio::test]
    async fn test_notifications_are_counted_and_failures_ignored() {
        // テスト項目: 成功した通知だけがカウントされ、失敗しても開始は成功する
        // given (前提条件):
        let f = fixture(true);
        let mut ok_gateway = MockNotificationGateway::new();
        ok_gateway
            .expect_channel()
            .return_const(NotificationChannel::Tts);
        ok_gateway.expect_notify().times(1).returning(|_| Ok(()));
        let mut failing_gateway = MockNotificationGateway::new();
        failing_gateway
            .expect_channel()
            .return_const(NotificationChannel::Sms);
        failing_gateway
            .expect_notify()
            .times(1)
            .returning(|_| Err(ExternalError::Unavailable("no phone".to_string())));

        // when (操作):
        let result = f
            .usecase
            .execute(StartStreamCommand {
                username: "alice".to_string(),
                notifications: vec![Arc::new(ok_gateway), Arc::new(failing_gateway)],
            })
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(wait_for_notifications(&f.registry, 1).await);
    }
}
