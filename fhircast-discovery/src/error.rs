//! Error types for hub capability discovery.

use std::fmt;

/// Error type for discovery operations.
///
/// Represents the ways fetching a hub's discovery document can fail, from a
/// missing hub URL through network failures to an unexpected body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// No hub URL was configured
    MissingHubUrl,
    /// The hub URL, or the discovery address derived from it, is not a valid absolute URL
    InvalidUrl(String),
    /// The HTTP request could not be completed
    NetworkError(String),
    /// The response body does not match the discovery schema
    ParseError(String),
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::MissingHubUrl => {
                write!(f, "Cannot load well-known configuration without a hub url")
            }
            DiscoveryError::InvalidUrl(msg) => write!(f, "Invalid hub url: {}", msg),
            DiscoveryError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DiscoveryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for DiscoveryError {}

/// Convenience Result type alias for discovery operations.
///
/// Equivalent to `std::result::Result<T, DiscoveryError>`.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
