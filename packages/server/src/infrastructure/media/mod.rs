//! MediaHealthCheck の実装
//!
//! - `http`: メディアサーバーの `/health` エンドポイントを叩く実装

pub mod http;

pub use http::HttpMediaHealthClient;
