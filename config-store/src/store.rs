//! Probed, failure-tolerant key/value store

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::StorageBackend;

const PROBE_KEY: &str = "__config_store_probe__";
const PROBE_VALUE: &str = "probe";

/// Key/value store whose availability is decided once, up front
///
/// All operations are infallible from the caller's point of view. When the
/// backend failed the initial probe, reads return `None` and writes are
/// ignored. Errors from an available backend are logged and swallowed.
pub struct ConfigStore {
    backend: Option<Box<dyn StorageBackend>>,
}

impl ConfigStore {
    /// Wrap `backend`, probing it with a write/read/remove cycle
    pub fn probe(backend: impl StorageBackend + 'static) -> Self {
        if Self::probe_backend(&backend) {
            tracing::debug!("Config store available");
            Self {
                backend: Some(Box::new(backend)),
            }
        } else {
            tracing::warn!("Config store unavailable, settings will not be persisted");
            Self::unavailable()
        }
    }

    /// A store with no backend; every operation is a no-op
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    fn probe_backend(backend: &dyn StorageBackend) -> bool {
        let result = backend
            .write(PROBE_KEY, PROBE_VALUE)
            .and_then(|_| backend.read(PROBE_KEY))
            .and_then(|value| backend.remove(PROBE_KEY).map(|_| value));

        match result {
            Ok(Some(value)) => value == PROBE_VALUE,
            Ok(None) => false,
            Err(e) => {
                tracing::debug!("Config store probe failed: {}", e);
                false
            }
        }
    }

    /// Whether the probe succeeded
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let backend = self.backend.as_ref()?;
        match backend.read(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read setting '{}': {}", key, e);
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: impl AsRef<str>) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        if let Err(e) = backend.write(key, value.as_ref()) {
            tracing::warn!("Failed to write setting '{}': {}", key, e);
        }
    }

    pub fn remove(&self, key: &str) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        if let Err(e) = backend.remove(key) {
            tracing::warn!("Failed to remove setting '{}': {}", key, e);
        }
    }

    /// Read a value and parse it with `FromStr`; unparseable values read as `None`
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::debug!("Ignoring unparseable setting '{}': {:?}", key, raw);
                None
            }
        }
    }

    /// Read a JSON-encoded value
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("Ignoring malformed JSON setting '{}': {}", key, e);
                None
            }
        }
    }

    /// Store a value JSON-encoded
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.set(key, json),
            Err(e) => tracing::warn!("Failed to encode setting '{}': {}", key, e),
        }
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("available", &self.is_available())
            .finish()
    }
}
