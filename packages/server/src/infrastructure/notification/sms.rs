//! SMS notifier.

use async_trait::async_trait;

use crate::domain::{ExternalError, NotificationChannel, NotificationGateway};

pub struct SmsNotifier {
    phone: Option<String>,
}

impl SmsNotifier {
    pub fn new(phone: Option<String>) -> Self {
        Self {
            phone: phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        }
    }
}

#[async_trait]
impl NotificationGateway for SmsNotifier {
    fn channel(&self) -> NotificationChannel {
        NotificationChannel::Sms
    }

    async fn notify(&self, message: &str) -> Result<(), ExternalError> {
        let Some(phone) = &self.phone else {
            return Err(ExternalError::Unavailable(
                "sms notification requires a phone number".to_string(),
            ));
        };
        tracing::info!("SMS to {}: {}", phone, message);
        Ok(())
    }
}
