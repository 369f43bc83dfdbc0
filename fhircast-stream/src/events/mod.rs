//! Hub messages received on the notification channel
//!
//! This module defines the typed messages a hub sends over the channel and the
//! classifier that turns raw text frames into them.

pub mod classifier;
pub mod types;

pub use classifier::classify;
pub use types::{ConnectMessage, ContextEntry, EventMessage, EventPayload, HubMessage};
