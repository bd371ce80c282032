//! HTTP and WebSocket surface of the stream server.

mod handler;
mod server;
mod signal;
pub mod state; // UseCase の組み立て（config）からアクセスするため public

pub use server::{Server, build_router};
pub use state::AppState;
