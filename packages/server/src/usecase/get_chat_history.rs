//! UseCase: チャット履歴の取得

use std::sync::Arc;

use crate::domain::{ChatMessage, SessionRegistry};

/// Upper bound on messages returned by one history query
pub const MAX_HISTORY_MESSAGES: usize = 200;

/// チャット履歴取得のユースケース
pub struct GetChatHistoryUseCase {
    registry: Arc<dyn SessionRegistry>,
}

impl GetChatHistoryUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Messages of the live session, else of the last ended one, oldest first
    pub async fn execute(&self, limit: Option<usize>) -> Vec<ChatMessage> {
        let limit = limit
            .unwrap_or(MAX_HISTORY_MESSAGES)
            .min(MAX_HISTORY_MESSAGES);
        self.registry.history(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, MessageText, StreamEndpoints, Timestamp, Username},
        infrastructure::registry::InMemorySessionRegistry,
    };
    use metastream_shared::time::FixedClock;

    #[tokio::test]
    async fn test_history_is_capped_and_ordered() {
        // テスト項目: 履歴は古い順で、上限を超える limit は切り詰められる
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new(Arc::new(FixedClock::new(0))));
        registry
            .start(
                Username::new("alice".to_string()).unwrap(),
                StreamEndpoints::for_media_server("http://localhost:8000"),
            )
            .await
            .unwrap();
        for i in 0..(MAX_HISTORY_MESSAGES + 5) {
            registry
                .append_message(ChatMessage::new(
                    DisplayName::parse("bob").unwrap(),
                    MessageText::new(&format!("m{}", i)).unwrap(),
                    Timestamp::new(i as i64),
                ))
                .await
                .unwrap();
        }
        let usecase = GetChatHistoryUseCase::new(registry);

        // when (操作):
        let capped = usecase.execute(Some(10_000)).await;
        let last_two = usecase.execute(Some(2)).await;

        // then (期待する結果):
        assert_eq!(capped.len(), MAX_HISTORY_MESSAGES);
        assert_eq!(capped[0].text.as_str(), "m5");
        let texts: Vec<&str> = last_two.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["m203", "m204"]);
    }
}
