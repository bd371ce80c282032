//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{
    handler::{
        active_stream, chat_history, health_check, last_stream, post_chat, start_stream,
        stop_stream, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Build the application router
///
/// Exposed separately from `Server` so tests can serve it on an ephemeral port.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/stream/start", post(start_stream))
        .route("/api/stream/active", get(active_stream))
        .route("/api/stream/last", get(last_stream))
        .route("/api/stream/stop", post(stop_stream))
        .route("/api/chat", post(post_chat))
        .route("/api/chat/history", get(chat_history))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Live stream and chat server
///
/// # Example
///
/// ```ignore
/// let state = config.build_app_state(media, clock);
/// Server::new(state).run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Run the server until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = build_router(self.state);

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("MetaStream server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
