//! Type-safe FHIRcast hub subscription API
//!
//! This crate builds and sends the form-encoded subscribe and unsubscribe
//! requests a FHIRcast hub expects, and parses the hub's answer to find the
//! WebSocket channel the notifications will arrive on.
//!
//! Request construction ([`SubscriptionRequest`]) is separate from sending
//! ([`HubClient`]) so the exact wire format can be inspected and tested
//! without a hub.
//!
//! # Example
//! ```rust,no_run
//! use fhircast_api::{HubClient, SubscriptionParameters};
//! use fhircast_discovery::EventSelection;
//!
//! # async fn run() -> fhircast_api::Result<()> {
//! let mut params = SubscriptionParameters::new("http://localhost:5000/api/hub", "DrXRay");
//! params.lease_seconds = 300;
//! params.events = EventSelection::from_supported(&["patient-open", "patient-close"]);
//! params.events.set_all(true);
//!
//! let client = HubClient::new();
//! let channel = client.subscribe(&params).await?;
//! println!("notifications will arrive on {}", channel);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod params;
pub mod request;
pub mod response;

pub use client::HubClient;
pub use error::{Result, SubscriptionError};
pub use params::SubscriptionParameters;
pub use request::{HubMode, SubscriptionRequest};
pub use response::SubscribeResponse;

// Re-export so callers need not depend on the discovery crate directly
pub use fhircast_discovery::EventSelection;
