//! Server configuration and dependency wiring.

use std::{path::PathBuf, sync::Arc, time::Duration};

use metastream_shared::time::Clock;

use crate::{
    domain::{ConnectionHub, LogSink, MediaHealthCheck, SessionRegistry},
    infrastructure::{
        connection_hub::WebSocketConnectionHub, log_sink::FileLogSink,
        registry::InMemorySessionRegistry,
    },
    ui::AppState,
    usecase::{
        ChatRouter, ConnectViewerUseCase, DisconnectViewerUseCase, GetChatHistoryUseCase,
        GetHealthUseCase, GetStreamStatusUseCase, StartStreamUseCase, StatusBroadcaster,
        StopStreamUseCase,
    },
};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MEDIA_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_FILE: &str = "stream_log.txt";
pub const DEFAULT_OUTBOUND_BUFFER: usize = 256;
/// A new connection receives the welcome and the viewer count before its
/// queue is drained, so smaller queues evict every viewer on connect
pub const MIN_OUTBOUND_BUFFER: usize = 2;
pub const DEFAULT_EXTERNAL_TIMEOUT_MS: u64 = 3000;

/// Typed server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the media (transcoding) server
    pub media_server_url: String,
    /// Refuse to start a stream while the media server is unhealthy
    pub require_media: bool,
    pub log_file: PathBuf,
    /// Per-connection outbound queue capacity
    pub outbound_buffer: usize,
    /// Bound on every external call
    pub external_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            media_server_url: DEFAULT_MEDIA_SERVER_URL.to_string(),
            require_media: true,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            external_timeout: Duration::from_millis(DEFAULT_EXTERNAL_TIMEOUT_MS),
        }
    }
}

impl ServerConfig {
    /// Wire the registry, the hub and every usecase into an `AppState`
    ///
    /// The media health check and the clock are injected so tests can stub them.
    pub fn build_app_state(
        &self,
        media: Arc<dyn MediaHealthCheck>,
        clock: Arc<dyn Clock>,
    ) -> AppState {
        // 1. Registry / Hub / LogSink
        let registry: Arc<dyn SessionRegistry> =
            Arc::new(InMemorySessionRegistry::new(clock.clone()));
        let hub: Arc<dyn ConnectionHub> = Arc::new(WebSocketConnectionHub::new());
        let log_sink: Arc<dyn LogSink> = Arc::new(FileLogSink::new(self.log_file.clone()));
        let status = Arc::new(StatusBroadcaster::new(hub.clone(), clock.clone()));

        // 2. UseCases
        let connect_viewer_usecase = Arc::new(ConnectViewerUseCase::new(
            registry.clone(),
            hub.clone(),
            status.clone(),
            clock.clone(),
        ));
        let disconnect_viewer_usecase = Arc::new(DisconnectViewerUseCase::new(
            registry.clone(),
            hub.clone(),
            status.clone(),
        ));
        let chat_router = Arc::new(ChatRouter::new(
            registry.clone(),
            hub.clone(),
            log_sink.clone(),
            clock,
            self.external_timeout,
        ));
        let start_stream_usecase = Arc::new(StartStreamUseCase::new(
            registry.clone(),
            media.clone(),
            status.clone(),
            self.media_server_url.clone(),
            self.require_media,
            self.external_timeout,
        ));
        let stop_stream_usecase = Arc::new(StopStreamUseCase::new(
            registry.clone(),
            log_sink,
            status,
            self.external_timeout,
        ));
        let get_stream_status_usecase =
            Arc::new(GetStreamStatusUseCase::new(registry.clone(), hub.clone()));
        let get_health_usecase = Arc::new(GetHealthUseCase::new(
            registry.clone(),
            hub,
            media,
            self.external_timeout,
        ));
        let get_chat_history_usecase = Arc::new(GetChatHistoryUseCase::new(registry));

        // 3. AppState
        AppState {
            connect_viewer_usecase,
            disconnect_viewer_usecase,
            chat_router,
            start_stream_usecase,
            stop_stream_usecase,
            get_stream_status_usecase,
            get_health_usecase,
            get_chat_history_usecase,
            outbound_buffer: self.outbound_buffer.max(MIN_OUTBOUND_BUFFER),
        }
    }
}
