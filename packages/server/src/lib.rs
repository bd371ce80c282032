//! MetaStream Live server: a single live stream session with real-time chat.
//!
//! Layers, leaf-first:
//! - `domain`: value objects, the `Session` lifecycle and the ports
//! - `infrastructure`: in-memory registry, websocket hub, external adapters, DTOs
//! - `usecase`: start/stop, chat routing, viewer tracking, queries
//! - `ui`: axum routes and the websocket connection loop
//! - `config`: typed configuration and dependency wiring

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
