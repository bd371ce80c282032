//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ChatRouter, ConnectViewerUseCase, DisconnectViewerUseCase, GetChatHistoryUseCase,
    GetHealthUseCase, GetStreamStatusUseCase, StartStreamUseCase, StopStreamUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectViewerUseCase（視聴者接続のユースケース）
    pub connect_viewer_usecase: Arc<ConnectViewerUseCase>,
    /// DisconnectViewerUseCase（視聴者切断のユースケース）
    pub disconnect_viewer_usecase: Arc<DisconnectViewerUseCase>,
    /// ChatRouter（受信イベントのルーティング）
    pub chat_router: Arc<ChatRouter>,
    /// StartStreamUseCase（配信開始のユースケース）
    pub start_stream_usecase: Arc<StartStreamUseCase>,
    /// StopStreamUseCase（配信終了のユースケース）
    pub stop_stream_usecase: Arc<StopStreamUseCase>,
    /// GetStreamStatusUseCase（配信状態取得のユースケース）
    pub get_stream_status_usecase: Arc<GetStreamStatusUseCase>,
    /// GetHealthUseCase（ヘルスチェックのユースケース）
    pub get_health_usecase: Arc<GetHealthUseCase>,
    /// GetChatHistoryUseCase（チャット履歴取得のユースケース）
    pub get_chat_history_usecase: Arc<GetChatHistoryUseCase>,
    /// Capacity of each connection's outbound queue
    pub outbound_buffer: usize,
}
