//! Infrastructure layer: concrete implementations of the domain ports and
//! the wire DTOs.

pub mod connection_hub;
pub mod dto;
pub mod log_sink;
pub mod media;
pub mod notification;
pub mod registry;
