//! ConnectionHub の実装
//!
//! - `websocket`: WebSocket 接続ごとの送信キュー（`mpsc::Sender`）を管理する実装

pub mod websocket;

pub use websocket::WebSocketConnectionHub;
