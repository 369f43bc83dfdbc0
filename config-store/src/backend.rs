//! Storage backends
//!
//! A backend is a flat string-to-string map. The store on top of it takes
//! care of availability and typed access.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use crate::error::{Result, StoreError};

const APP_DIR: &str = "fhircast-client";
const SETTINGS_FILE: &str = "settings.json";

/// A flat key/value persistence backend
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`, if any
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| StoreError::Unavailable("memory backend lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| StoreError::Unavailable("memory backend lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| StoreError::Unavailable("memory backend lock poisoned".to_string()))?;
        values.remove(key);
        Ok(())
    }
}

/// Backend persisting all keys as one JSON object on disk
///
/// The whole document is kept in memory and rewritten on every change.
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a crash never leaves a half-written settings file behind.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileBackend {
    /// Open (or lazily create) the settings file at `path`
    ///
    /// A missing file is treated as an empty document. An existing file that
    /// is not a JSON object of strings is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!("Opened settings file {} ({} keys)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Open the settings file at the platform default location
    pub fn open_default() -> Result<Self> {
        let path = Self::default_path().ok_or_else(|| {
            StoreError::Unavailable("no platform configuration directory".to_string())
        })?;
        Self::open(path)
    }

    /// `<config dir>/fhircast-client/settings.json`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let text = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, text)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl StorageBackend for JsonFileBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("settings file lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("settings file lock poisoned".to_string()))?;
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("settings file lock poisoned".to_string()))?;
        if entries.contains_key(key) {
            let mut updated = entries.clone();
            updated.remove(key);
            self.persist(&updated)?;
            *entries = updated;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_roundtrip() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.read("hubUrl").unwrap(), None);

        backend.write("hubUrl", "http://localhost:5000/api/hub").unwrap();
        assert_eq!(
            backend.read("hubUrl").unwrap().as_deref(),
            Some("http://localhost:5000/api/hub")
        );

        backend.remove("hubUrl").unwrap();
        assert_eq!(backend.read("hubUrl").unwrap(), None);

        // Removing twice is fine
        backend.remove("hubUrl").unwrap();
    }

    #[test]
    fn test_json_file_backend_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        {
            let backend = JsonFileBackend::open(&path).unwrap();
            backend.write("hubTopic", "DrXRay").unwrap();
            backend.write("leaseSeconds", "600").unwrap();
        }

        let reopened = JsonFileBackend::open(&path).unwrap();
        assert_eq!(reopened.read("hubTopic").unwrap().as_deref(), Some("DrXRay"));
        assert_eq!(reopened.read("leaseSeconds").unwrap().as_deref(), Some("600"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_json_file_backend_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json at all").unwrap();

        let result = JsonFileBackend::open(&path);
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[test]
    fn test_json_file_backend_empty_file_is_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "").unwrap();

        let backend = JsonFileBackend::open(&path).unwrap();
        assert_eq!(backend.read("anything").unwrap(), None);
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("nested");
        let backend = JsonFileBackend::open(parent.join("settings.json")).unwrap();
        backend.write("hubTopic", "DrXRay").unwrap();

        // Parent directory replaced by a plain file: nothing can be written
        fs::remove_dir_all(&parent).unwrap();
        fs::write(&parent, "blocker").unwrap();

        assert!(backend.write("hubTopic", "Other").is_err());
        assert!(backend.write("leaseSeconds", "600").is_err());
        assert!(backend.remove("hubTopic").is_err());

        assert_eq!(backend.read("hubTopic").unwrap().as_deref(), Some("DrXRay"));
        assert_eq!(backend.read("leaseSeconds").unwrap(), None);
    }
}
