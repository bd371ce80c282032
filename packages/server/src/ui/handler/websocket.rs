//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::ui::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains this connection's outbound queue into the WebSocket.
///
/// The loop ends when the socket rejects a write or when the hub drops the
/// queue's sender (disconnect or eviction).
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Register before reading so the welcome is the first frame queued
    let (tx, rx) = mpsc::channel(state.outbound_buffer);
    let connection_id = state.connect_viewer_usecase.execute(tx).await;
    tracing::info!("Connection {} opened", connection_id);

    let mut send_task = pusher_loop(rx, sender);

    let router = state.chat_router.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on {}: {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from {}: {}", connection_id, text.as_str());
                    router.handle_frame(&connection_id, text.as_str()).await;
                }
                Message::Ping(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Connection {} requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state
        .disconnect_viewer_usecase
        .execute(&connection_id)
        .await;
}
