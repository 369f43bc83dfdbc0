//! Discovery document parsing.
//!
//! This module handles the hub's well-known configuration document, the
//! JSON body served at `.well-known/fhircast-configuration`.

use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};

/// What a hub advertises about itself.
///
/// `eventsSupported` is required; the remaining flags default to `false` /
/// empty when a hub omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitySet {
    /// Event names the hub can emit, in the hub's order
    pub events_supported: Vec<String>,
    #[serde(default)]
    pub websocket_support: bool,
    #[serde(default)]
    pub webhook_support: bool,
    /// FHIRcast version string, e.g. "STU3"
    #[serde(rename = "fhircastVersion", default)]
    pub protocol_version: String,
}

impl CapabilitySet {
    /// Parse a discovery document.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::ParseError` if the body is not JSON or is
    /// missing `eventsSupported`.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| {
            DiscoveryError::ParseError(format!("Failed to parse discovery document: {}", e))
        })
    }

    /// Pretty-printed document, for showing the user what the hub returned
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Whether the hub lists `event` in `eventsSupported`
    pub fn supports_event(&self, event: &str) -> bool {
        self.events_supported.iter().any(|e| e == event)
    }
}
