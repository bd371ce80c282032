//! Text-to-speech notifier.

use async_trait::async_trait;

use crate::domain::{ExternalError, NotificationChannel, NotificationGateway};

#[derive(Default)]
pub struct TtsNotifier;

impl TtsNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationGateway for TtsNotifier {
    fn channel(&self) -> NotificationChannel {
        NotificationChannel::Tts
    }

    async fn notify(&self, message: &str) -> Result<(), ExternalError> {
        tracing::info!("TTS announcement: {}", message);
        Ok(())
    }
}
