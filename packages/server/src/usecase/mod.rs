//! UseCase layer: orchestrates the session registry, the connection hub and
//! the external collaborators.
//!
//! Calls to external collaborators (log sink, notification gateways) that
//! must not hold up the caller are detached with `spawn_best_effort`.

mod chat_router;
mod connect_viewer;
mod disconnect_viewer;
mod error;
mod get_chat_history;
mod get_health;
mod get_stream_status;
mod start_stream;
mod status_broadcaster;
mod stop_stream;

use std::{future::Future, time::Duration};

use tokio::task::JoinHandle;

use crate::domain::ExternalError;

pub use chat_router::{ChatOutcome, ChatRouter};
pub use connect_viewer::{ConnectViewerUseCase, WELCOME_MESSAGE};
pub use disconnect_viewer::DisconnectViewerUseCase;
pub use error::{ChatError, StartStreamError, StopStreamError};
pub use get_chat_history::{GetChatHistoryUseCase, MAX_HISTORY_MESSAGES};
pub use get_health::{GetHealthUseCase, HealthReport};
pub use get_stream_status::{ActiveStream, GetStreamStatusUseCase};
pub use start_stream::{StartStreamCommand, StartStreamUseCase};
pub use status_broadcaster::StatusBroadcaster;
pub use stop_stream::StopStreamUseCase;

/// Run an external call in a detached task, bounded by `timeout`
///
/// Failures and timeouts are logged, never propagated.
pub(crate) fn spawn_best_effort<F>(
    task_name: &'static str,
    timeout: Duration,
    task: F,
) -> JoinHandle<()>
where
    F: Future<Output = Result<(), ExternalError>> + Send + 'static,
{
    tokio::spawn(async move {
        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(())) => tracing::debug!("{} completed", task_name),
            Ok(Err(e)) => tracing::warn!("{} failed: {}", task_name, e),
            Err(_) => tracing::warn!(
                "{} timed out after {} ms",
                task_name,
                timeout.as_millis()
            ),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_best_effort_survives_failure_and_timeout() {
        // テスト項目: 失敗やタイムアウトしてもタスクはパニックせず完了する
        // when (操作):
        let failed = spawn_best_effort("failing call", Duration::from_secs(1), async {
            Err(ExternalError::Unavailable("down".to_string()))
        });
        let slow = spawn_best_effort("slow call", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        });

        // then (期待する結果):
        assert!(failed.await.is_ok());
        assert!(slow.await.is_ok());
    }
}
