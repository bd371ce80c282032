//! HTTP health probe for the media server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::MediaHealthCheck;

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Calls `GET {base_url}/health` and expects `{"status":"ok"}`
pub struct HttpMediaHealthClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpMediaHealthClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }
}

#[async_trait]
impl MediaHealthCheck for HttpMediaHealthClient {
    async fn is_healthy(&self) -> bool {
        let url = self.health_url();
        let response = match self.client.get(&url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Media server health check failed ({}): {}", url, e);
                return false;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "Media server health check returned status {}",
                response.status()
            );
            return false;
        }

        match response.json::<HealthResponse>().await {
            Ok(health) => health.status == "ok",
            Err(e) => {
                tracing::warn!("Media server health response was not valid JSON: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_url_strips_trailing_slash() {
        // テスト項目: ベース URL の末尾スラッシュが除去される
        // given (前提条件):
        let client = HttpMediaHealthClient::new("http://localhost:8000/", Duration::from_secs(1));

        // then (期待する結果):
        assert_eq!(client.health_url(), "http://localhost:8000/health");
    }

    #[tokio::test]
    async fn test_unreachable_media_server_is_unhealthy() {
        // テスト項目: 到達不能なメディアサーバーは unhealthy として扱われる
        // given (前提条件): 何も listen していないポート
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client =
            HttpMediaHealthClient::new(&format!("http://{}", addr), Duration::from_millis(500));

        // when (操作):
        let healthy = client.is_healthy().await;

        // then (期待する結果):
        assert!(!healthy);
    }
}
