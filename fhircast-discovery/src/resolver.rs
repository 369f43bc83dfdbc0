//! Fetching the discovery document from a hub.

use std::time::Duration;

use url::Url;

use crate::capability::CapabilitySet;
use crate::error::{DiscoveryError, Result};
use crate::WELL_KNOWN_PATH;

/// Resolve the discovery document address for a hub.
///
/// The well-known path is joined relative to the hub URL with a trailing
/// slash appended first, so `http://host/api/hub` resolves to
/// `http://host/api/hub/.well-known/fhircast-configuration` rather than
/// replacing the `hub` segment.
///
/// # Errors
///
/// - `DiscoveryError::MissingHubUrl` when `hub_url` is empty
/// - `DiscoveryError::InvalidUrl` when it is not an absolute URL
pub fn discovery_url(hub_url: &str) -> Result<Url> {
    let hub_url = hub_url.trim();
    if hub_url.is_empty() {
        return Err(DiscoveryError::MissingHubUrl);
    }

    let base = if hub_url.ends_with('/') {
        hub_url.to_string()
    } else {
        format!("{}/", hub_url)
    };

    let base = Url::parse(&base).map_err(|e| DiscoveryError::InvalidUrl(format!("{}: {}", hub_url, e)))?;
    if base.cannot_be_a_base() {
        return Err(DiscoveryError::InvalidUrl(format!(
            "{}: not a hierarchical URL",
            hub_url
        )));
    }

    base.join(WELL_KNOWN_PATH)
        .map_err(|e| DiscoveryError::InvalidUrl(format!("{}: {}", hub_url, e)))
}

/// Fetches and parses hub discovery documents
#[derive(Debug, Clone)]
pub struct CapabilityResolver {
    http: reqwest::Client,
}

impl CapabilityResolver {
    /// Create a resolver with its own HTTP client (10 second timeout)
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { http }
    }

    /// Create a resolver sharing an existing HTTP client
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Fetch the hub's capabilities.
    ///
    /// The HTTP status is not checked on its own; a body that does not
    /// parse as a discovery document is what fails the call.
    pub async fn resolve(&self, hub_url: &str) -> Result<CapabilitySet> {
        let url = discovery_url(hub_url)?;
        tracing::debug!("Fetching discovery document from {}", url);

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DiscoveryError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Discovery request to {} returned HTTP {}", url, status);
        }

        let body = response
            .text()
            .await
            .map_err(|e| DiscoveryError::NetworkError(e.to_string()))?;

        let capabilities = CapabilitySet::from_json(&body)?;

        tracing::info!(
            "Hub at {} supports {} event(s) (websocket: {}, version: {})",
            hub_url,
            capabilities.events_supported.len(),
            capabilities.websocket_support,
            capabilities.protocol_version
        );

        Ok(capabilities)
    }
}

impl Default for CapabilityResolver {
    fn default() -> Self {
        Self::new()
    }
}
