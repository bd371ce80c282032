//! UseCase: 配信終了
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - StopStreamUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 終了後は必ず Live セッションが存在しない状態になること（ゴーストセッション防止）
//! - 2 回目の終了は NotLive を返し、状態を壊さないこと
//! - サマリーのログ書き込みが失敗しても終了処理が完了すること
//!
//! ### どのような状況を想定しているか
//! - 正常系：終了と ended の配信
//! - 異常系：Live セッションなしでの終了
//! - エッジケース：ログ書き込みの失敗

use std::{sync::Arc, time::Duration};

use crate::domain::{LogSink, SessionRegistry, SessionSnapshot};

use super::{error::StopStreamError, spawn_best_effort, status_broadcaster::StatusBroadcaster};

/// 配信終了のユースケース
pub struct StopStreamUseCase {
    registry: Arc<dyn SessionRegistry>,
    log_sink: Arc<dyn LogSink>,
    status: Arc<StatusBroadcaster>,
    external_timeout: Duration,
}

impl StopStreamUseCase {
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        log_sink: Arc<dyn LogSink>,
        status: Arc<StatusBroadcaster>,
        external_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            log_sink,
            status,
            external_timeout,
        }
    }

    /// 配信終了を実行
    ///
    /// The registry slot is cleared before any side effect runs, so a failure
    /// in logging or broadcasting cannot leave a session live.
    pub async fn execute(&self) -> Result<SessionSnapshot, StopStreamError> {
        let summary = self.registry.stop().await?;
        tracing::info!(
            "Stream {} by '{}' ended after {}",
            summary.id,
            summary.owner,
            summary.duration_label()
        );

        let log_sink = self.log_sink.clone();
        let logged = summary.clone();
        spawn_best_effort("session summary write", self.external_timeout, async move {
            log_sink.append_session_summary(&logged).await
        });

        self.status.announce_ended(&summary).await;

        Ok(summary)
    }
}
