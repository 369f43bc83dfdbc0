use thiserror::Error;

/// Errors from subscribe and unsubscribe requests
///
/// Every variant carries the underlying cause as text so the caller can
/// show it to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// A required parameter is missing or malformed
    ///
    /// Raised before any request is sent: empty or non-absolute hub URL,
    /// empty topic.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Network communication error
    ///
    /// Connection refused, DNS failure, timeout, or the body could not be read.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Response parsing error
    ///
    /// The hub answered, but not with the JSON this client expects.
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Type alias for results that can return a SubscriptionError
pub type Result<T> = std::result::Result<T, SubscriptionError>;

impl From<reqwest::Error> for SubscriptionError {
    fn from(error: reqwest::Error) -> Self {
        SubscriptionError::NetworkError(error.to_string())
    }
}
