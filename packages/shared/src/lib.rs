//! Shared utilities for MetaStream Live crates.
//!
//! - `logger`: tracing subscriber setup
//! - `time`: clock abstraction and timestamp formatting

pub mod logger;
pub mod time;
