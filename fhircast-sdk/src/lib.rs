//! # FHIRcast SDK
//!
//! A client for FHIRcast hubs: discover what a hub supports, subscribe to a
//! topic, and follow the notifications it sends over a WebSocket channel.
//!
//! ```rust,no_run
//! use fhircast_sdk::{ClientConfig, FhircastClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fhircast_sdk::SdkError> {
//!     let mut client = FhircastClient::new(ClientConfig::default())?;
//!     client.parameters_mut().hub_url = "http://localhost:5000/api/hub".to_string();
//!
//!     let capabilities = client.load_capabilities().await?;
//!     println!("{}", capabilities.to_pretty_json());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! fhircast-sdk (FhircastClient facade)
//!     ↓
//! fhircast-discovery (well-known configuration, event selection)
//! fhircast-api       (subscribe / unsubscribe requests)
//! fhircast-stream    (notification channel sessions)
//! config-store       (persisted settings)
//! ```

pub use client::FhircastClient;
pub use config::ClientConfig;
pub use error::{Result, SdkError};
pub use settings::VisualMode;
pub use status::{StatusSink, TracingStatusSink};

// Re-export commonly used types from the component crates
pub use fhircast_api::{EventSelection, SubscriptionParameters};
pub use fhircast_discovery::CapabilitySet;
pub use fhircast_stream::{
    ConnectMessage, DisconnectReason, EventMessage, Session, SessionState, SessionUpdate,
};

mod client;
mod config;
mod error;
pub mod settings;
mod status;
