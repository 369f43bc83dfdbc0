//! Error types for the config store

use thiserror::Error;

/// Errors raised by storage backends
///
/// These never escape [`ConfigStore`](crate::ConfigStore); it logs them and
/// degrades to a no-op. Backends return them so the store can decide.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the underlying file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend cannot be used at all (no config directory, poisoned lock, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = StoreError::Unavailable("no config directory".to_string());
        assert_eq!(error.to_string(), "Storage unavailable: no config directory");

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let error: StoreError = io.into();
        assert!(matches!(error, StoreError::Io(_)));
        assert!(error.to_string().contains("read-only"));
    }
}
