//! InMemory SessionRegistry 実装
//!
//! Live セッション用のスロット 1 つと、直近に終了したセッションの記録を
//! 1 つの `Mutex` で保護します。クリティカルセクション内では I/O を行いません。
//!
//! stop は最初にスロットから `take()` するため、終了処理の途中で失敗しても
//! スロットに Live セッションが残ることはありません（ゴーストセッション防止）。

use std::sync::Arc;

use async_trait::async_trait;
use metastream_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, Session, SessionError, SessionId, SessionRegistry, SessionSnapshot,
    StreamEndpoints, Timestamp, Username,
};

/// A session that has ended, kept read-only for history queries
struct EndedSession {
    snapshot: SessionSnapshot,
    messages: Vec<ChatMessage>,
}

#[derive(Default)]
struct RegistryState {
    /// Invariant: `Some` only while the session is Live
    live: Option<Session>,
    last_ended: Option<EndedSession>,
}

/// インメモリ SessionRegistry 実装
pub struct InMemorySessionRegistry {
    state: Mutex<RegistryState>,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionRegistry {
    /// 新しい InMemorySessionRegistry を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            clock,
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn start(
        &self,
        owner: Username,
        endpoints: StreamEndpoints,
    ) -> Result<SessionSnapshot, SessionError> {
        let now = self.now();
        let mut state = self.state.lock().await;

        if let Some(current) = state.live.as_ref() {
            return Err(SessionError::Conflict {
                owner: current.owner().as_str().to_string(),
            });
        }

        let mut session = Session::new(owner, endpoints);
        session.go_live(now)?;
        let snapshot = session.snapshot(now);
        state.live = Some(session);

        tracing::info!(
            "Session '{}' is live for '{}'",
            snapshot.id,
            snapshot.owner
        );
        Ok(snapshot)
    }

    async fn stop(&self) -> Result<SessionSnapshot, SessionError> {
        let now = self.now();
        let mut state = self.state.lock().await;

        // Slot is cleared before anything else can fail.
        let Some(mut session) = state.live.take() else {
            return Err(SessionError::NotFound);
        };

        match session.end(now) {
            Ok(snapshot) => {
                tracing::info!(
                    "Session '{}' ended after {}",
                    snapshot.id,
                    snapshot.duration_label()
                );
                state.last_ended = Some(EndedSession {
                    snapshot: snapshot.clone(),
                    messages: session.into_messages(),
                });
                Ok(snapshot)
            }
            Err(e) => {
                tracing::error!(
                    "Session '{}' could not be ended cleanly, discarded: {}",
                    session.id(),
                    e
                );
                Err(e)
            }
        }
    }

    async fn active(&self) -> Option<SessionSnapshot> {
        let now = self.now();
        let state = self.state.lock().await;
        state.live.as_ref().map(|session| session.snapshot(now))
    }

    async fn append_message(&self, message: ChatMessage) -> Result<u64, SessionError> {
        let mut state = self.state.lock().await;
        match state.live.as_mut() {
            Some(session) => session.append_message(message),
            None => Err(SessionError::NoActiveSession),
        }
    }

    async fn record_viewer_sample(&self, count: usize) -> Result<usize, SessionError> {
        let mut state = self.state.lock().await;
        state
            .live
            .as_mut()
            .map(|session| session.record_viewer_sample(count))
            .ok_or(SessionError::NoActiveSession)
    }

    async fn record_notification(&self, session_id: &SessionId) -> Result<u32, SessionError> {
        let mut state = self.state.lock().await;
        match state.live.as_mut() {
            Some(session) if session.id() == *session_id => Ok(session.record_notification()),
            _ => Err(SessionError::NoActiveSession),
        }
    }

    async fn history(&self, limit: usize) -> Vec<ChatMessage> {
        let state = self.state.lock().await;
        let messages = match (state.live.as_ref(), state.last_ended.as_ref()) {
            (Some(session), _) => session.messages(),
            (None, Some(ended)) => ended.messages.as_slice(),
            (None, None) => return Vec::new(),
        };
        let skip = messages.len().saturating_sub(limit);
        messages[skip..].to_vec()
    }

    async fn last_ended(&self) -> Option<SessionSnapshot> {
        let state = self.state.lock().await;
        state.last_ended.as_ref().map(|ended| ended.snapshot.clone())
    }
}
