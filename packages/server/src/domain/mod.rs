//! Domain layer: value objects, entities, and the ports the rest of the
//! server depends on.
//!
//! Nothing in here performs I/O. Infrastructure provides the concrete
//! implementations of the traits declared in `registry`, `connection_hub`
//! and `external`.

pub mod connection_hub;
pub mod entity;
pub mod error;
pub mod external;
pub mod registry;
pub mod value_object;

pub use connection_hub::{BroadcastReport, ConnectionChannel, ConnectionHub};
pub use entity::{ChatMessage, Session, SessionSnapshot, SessionState, StreamEndpoints};
pub use error::{ExternalError, HubError, SessionError, ValueObjectError};
pub use external::{LogSink, MediaHealthCheck, NotificationChannel, NotificationGateway};
pub use registry::SessionRegistry;
pub use value_object::{
    ConnectionId, DEFAULT_DISPLAY_NAME, DisplayName, MAX_DISPLAY_NAME_CHARS, MAX_MESSAGE_CHARS,
    MessageText, SessionId, Timestamp, Username, escape_markup,
};
