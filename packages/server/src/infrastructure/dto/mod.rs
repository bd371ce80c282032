//! Data Transfer Objects (DTOs) for the stream server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: inbound/outbound websocket envelopes
//! - `http`: HTTP API request and response bodies

pub mod conversion;
pub mod http;
pub mod websocket;
