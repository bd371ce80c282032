//! Request handlers.

mod error;
mod http;
mod websocket;

pub use http::{
    active_stream, chat_history, health_check, last_stream, post_chat, start_stream, stop_stream,
};
pub use websocket::websocket_handler;
