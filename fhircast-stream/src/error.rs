//! Error types for the fhircast-stream crate.

/// Errors from turning an inbound frame into a hub message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    /// The frame is not JSON
    #[error("Malformed frame: {0}")]
    Malformed(String),

    /// The frame was recognised but could not be turned into a message
    #[error("Invalid {kind} message: {message}")]
    Shape {
        /// Which kind of message the frame looked like
        kind: &'static str,
        /// What was wrong with it
        message: String,
    },
}

/// Errors from establishing a notification channel connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// The channel address is not a usable ws:// or wss:// URL
    #[error("Invalid channel address: {0}")]
    InvalidAddress(String),

    /// The handshake failed
    #[error("Failed to connect: {0}")]
    ConnectFailed(String),

    /// The handshake did not complete in time
    #[error("Connection attempt timed out after {0:?}")]
    Timeout(std::time::Duration),
}
