//! LogSink の実装
//!
//! - `file`: テキストファイルへの追記による実装

pub mod file;

pub use file::FileLogSink;
