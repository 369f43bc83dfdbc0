//! # fhircast-stream
//!
//! Notification channel sessions for FHIRcast hubs.
//!
//! After a successful subscribe, a hub hands out a WebSocket address. This
//! crate owns everything that happens on that channel:
//!
//! - [`transport`]: the [`Connector`] seam and its WebSocket implementation
//! - [`events`]: typed hub messages and the classifier that produces them
//! - [`session`]: the [`SessionManager`] state machine and its message history
//!
//! Frames are applied strictly one at a time in arrival order, so the event
//! history (newest first) always mirrors the order the hub emitted them in.
//!
//! ```rust,no_run
//! use fhircast_stream::{SessionManager, SessionUpdate, WebSocketConnector};
//!
//! # async fn run() -> Result<(), fhircast_stream::ConnectionError> {
//! let mut sessions = SessionManager::new(WebSocketConnector::new());
//! sessions.open_session("ws://localhost:5000/ws/7f3c").await?;
//!
//! while let Some(update) = sessions.next_update().await {
//!     match update {
//!         SessionUpdate::Event(event) => println!("{} {}", event.id, event.event_name()),
//!         SessionUpdate::Disconnected(reason) => println!("disconnected: {}", reason),
//!         _ => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod transport;

pub use config::SessionConfig;
pub use error::{ClassificationError, ConnectionError};
pub use events::{classify, ConnectMessage, ContextEntry, EventMessage, EventPayload, HubMessage};
pub use session::{
    DisconnectReason, MessageHistory, Session, SessionManager, SessionState, SessionUpdate,
};
pub use transport::{Connection, ConnectionDriver, Connector, TransportEvent, WebSocketConnector};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        classify, ConnectMessage, Connector, DisconnectReason, EventMessage, HubMessage, Session,
        SessionConfig, SessionManager, SessionState, SessionUpdate, WebSocketConnector,
    };
}
