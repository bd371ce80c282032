//! Append-only text file log sink.

use std::path::PathBuf;

use async_trait::async_trait;
use metastream_shared::time::timestamp_to_rfc3339;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::domain::{ChatMessage, ExternalError, LogSink, SessionSnapshot};

/// Writes one line per chat message and per ended session
///
/// The file is opened in append mode for every write, so concurrent writers
/// never truncate each other and the file may be rotated externally.
pub struct FileLogSink {
    path: PathBuf,
}

impl FileLogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn append_line(&self, line: String) -> Result<(), ExternalError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

fn format_chat_line(message: &ChatMessage) -> String {
    format!(
        "[{}] {}: {}\n",
        timestamp_to_rfc3339(message.timestamp.value()),
        message.author,
        message.text.as_str()
    )
}

fn format_summary_line(snapshot: &SessionSnapshot) -> String {
    let at = snapshot
        .ended_at
        .or(snapshot.started_at)
        .map(|at| timestamp_to_rfc3339(at.value()))
        .unwrap_or_default();
    format!(
        "[{}] SESSION {} owner={} duration={} messages={} peak_viewers={} notifications={}\n",
        at,
        snapshot.id,
        snapshot.owner,
        snapshot.duration_label(),
        snapshot.total_messages,
        snapshot.peak_viewer_count,
        snapshot.notifications_sent
    )
}

#[async_trait]
impl LogSink for FileLogSink {
    async fn append(&self, message: &ChatMessage) -> Result<(), ExternalError> {
        self.append_line(format_chat_line(message)).await
    }

    async fn append_session_summary(
        &self,
        snapshot: &SessionSnapshot,
    ) -> Result<(), ExternalError> {
        self.append_line(format_summary_line(snapshot)).await
    }
}
