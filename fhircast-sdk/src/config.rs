//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

use fhircast_stream::SessionConfig;

/// Configuration for [`FhircastClient`](crate::FhircastClient)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Timeout for discovery and subscription requests
    /// Default: 10 seconds
    pub request_timeout: Duration,

    /// Timeout for the notification channel handshake
    /// Default: 10 seconds
    pub connect_timeout: Duration,

    /// User-Agent sent with hub requests
    pub user_agent: String,

    /// Where settings are persisted
    /// Default: None (the platform config directory)
    pub settings_path: Option<PathBuf>,

    /// Maximum number of event messages kept per session
    /// Default: None (unbounded)
    pub event_history_limit: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("fhircast-client/{}", env!("CARGO_PKG_VERSION")),
            settings_path: None,
            event_history_limit: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout == Duration::ZERO {
            return Err("Request timeout must be greater than 0".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("User agent must not be empty".to_string());
        }

        self.session_config().validate()
    }

    /// Settings for the notification channel
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            connect_timeout: self.connect_timeout,
            event_history_limit: self.event_history_limit,
        }
    }

    /// Build the HTTP client shared by discovery and subscription requests
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .user_agent(self.user_agent.as_str())
            .build()
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn with_event_history_limit(mut self, limit: usize) -> Self {
        self.event_history_limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("fhircast-client/"));
        assert!(config.settings_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(ClientConfig::new()
            .with_request_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(ClientConfig::new().with_user_agent("  ").validate().is_err());
        assert!(ClientConfig::new()
            .with_connect_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(ClientConfig::new()
            .with_event_history_limit(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_session_config_follows_client_config() {
        let config = ClientConfig::new()
            .with_connect_timeout(Duration::from_secs(3))
            .with_event_history_limit(100);

        let session = config.session_config();
        assert_eq!(session.connect_timeout, Duration::from_secs(3));
        assert_eq!(session.event_history_limit, Some(100));
    }

    #[test]
    fn test_http_client_builds() {
        assert!(ClientConfig::default().http_client().is_ok());
    }
}
