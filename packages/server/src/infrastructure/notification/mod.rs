//! NotificationGateway の実装
//!
//! - `sms`: SMS 送信（電話番号が必要）
//! - `tts`: 音声読み上げ
//!
//! どちらも外部プロバイダには接続せず、配信をログに記録します。

pub mod sms;
pub mod tts;

use std::sync::Arc;

use crate::domain::{NotificationChannel, NotificationGateway};

pub use sms::SmsNotifier;
pub use tts::TtsNotifier;

/// Build one gateway per requested channel, skipping duplicates
pub fn build_gateways(
    channels: &[NotificationChannel],
    phone: Option<String>,
) -> Vec<Arc<dyn NotificationGateway>> {
    let mut gateways: Vec<Arc<dyn NotificationGateway>> = Vec::new();
    let mut seen = Vec::new();
    for channel in channels {
        if seen.contains(channel) {
            continue;
        }
        seen.push(*channel);
        match channel {
            NotificationChannel::Sms => gateways.push(Arc::new(SmsNotifier::new(phone.clone()))),
            NotificationChannel::Tts => gateways.push(Arc::new(TtsNotifier::new())),
        }
    }
    gateways
}
