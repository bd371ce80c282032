//! SessionRegistry trait 定義
//!
//! 同時に Live になれるセッションは最大 1 つ。
//! start / stop / 追記 / 集計はすべてこの trait を経由し、実装側が
//! 1 箇所の排他制御で直列化します。具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;

use super::{
    entity::{ChatMessage, SessionSnapshot, StreamEndpoints},
    error::SessionError,
    value_object::{SessionId, Username},
};

/// Owner of the single active-session slot
///
/// Implementations must keep every critical section free of I/O.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Create a new live session, or `Conflict` naming the current owner
    async fn start(
        &self,
        owner: Username,
        endpoints: StreamEndpoints,
    ) -> Result<SessionSnapshot, SessionError>;

    /// End the live session, or `NotFound`
    ///
    /// The active slot is empty after this returns, whatever the outcome.
    async fn stop(&self) -> Result<SessionSnapshot, SessionError>;

    /// Snapshot of the live session, if any
    async fn active(&self) -> Option<SessionSnapshot>;

    /// Append to the live session's log. Returns the new total.
    async fn append_message(&self, message: ChatMessage) -> Result<u64, SessionError>;

    /// Feed a viewer count sample. Returns the peak.
    async fn record_viewer_sample(&self, count: usize) -> Result<usize, SessionError>;

    /// Count a delivered notification against `session_id`, if still live
    async fn record_notification(&self, session_id: &SessionId) -> Result<u32, SessionError>;

    /// Most recent `limit` messages of the live session, falling back to the
    /// last ended one
    async fn history(&self, limit: usize) -> Vec<ChatMessage>;

    /// Summary of the most recently ended session
    async fn last_ended(&self) -> Option<SessionSnapshot>;
}
