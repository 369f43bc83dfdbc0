//! FHIRcast hub capability discovery
//!
//! This crate fetches a hub's `.well-known/fhircast-configuration` document
//! and turns it into a [`CapabilitySet`]: the events the hub can emit and the
//! channel types it supports. It also provides [`EventSelection`], the
//! ordered event-name → selected mapping a client keeps in step with the
//! hub's capabilities.
//!
//! # Quick Start
//!
//! ```no_run
//! use fhircast_discovery::{CapabilityResolver, EventSelection};
//!
//! # async fn run() -> fhircast_discovery::Result<()> {
//! let resolver = CapabilityResolver::new();
//! let capabilities = resolver.resolve("http://localhost:5000/api/hub").await?;
//!
//! let mut selection = EventSelection::new();
//! selection.reconcile(&capabilities.events_supported);
//! selection.set("patient-open", true);
//!
//! println!("subscribing to {}", selection.joined());
//! # Ok(())
//! # }
//! ```

mod capability;
mod error;
mod resolver;
mod selection;

pub use capability::CapabilitySet;
pub use error::{DiscoveryError, Result};
pub use resolver::{discovery_url, CapabilityResolver};
pub use selection::EventSelection;

/// Path of the discovery document, relative to the hub base URL
pub const WELL_KNOWN_PATH: &str = ".well-known/fhircast-configuration";
