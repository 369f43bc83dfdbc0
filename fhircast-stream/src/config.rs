//! Configuration for notification channel sessions

use std::time::Duration;

/// Configuration for the SessionManager and its WebSocket transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long the WebSocket handshake may take
    /// Default: 10 seconds
    pub connect_timeout: Duration,

    /// Maximum number of event messages kept in history (oldest dropped first)
    /// Default: None (unbounded)
    pub event_history_limit: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            event_history_limit: None,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<(), String> {
        if self.connect_timeout == Duration::ZERO {
            return Err("Connect timeout must be greater than 0".to_string());
        }
        if self.event_history_limit == Some(0) {
            return Err("Event history limit must be greater than 0 when set".to_string());
        }
        Ok(())
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_event_history_limit(mut self, limit: usize) -> Self {
        self.event_history_limit = Some(limit);
        self
    }
}
