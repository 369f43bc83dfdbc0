//! # config-store
//!
//! A small key/value persistence layer for client settings.
//!
//! The store is probed once when it is opened. If the backend cannot be
//! written to and read back, the store becomes unavailable and every later
//! operation turns into a no-op: reads return `None`, writes are dropped.
//! Nothing in this crate is fatal to the caller.
//!
//! ## Example
//!
//! ```rust
//! use config_store::{ConfigStore, MemoryBackend};
//!
//! let store = ConfigStore::probe(MemoryBackend::new());
//! assert!(store.is_available());
//!
//! store.set("hubUrl", "https://hub.example.org/api/hub");
//! assert_eq!(store.get("hubUrl").as_deref(), Some("https://hub.example.org/api/hub"));
//!
//! store.set("leaseSeconds", "300");
//! assert_eq!(store.get_parsed::<i64>("leaseSeconds"), Some(300));
//! ```
//!
//! ## Backends
//!
//! - [`MemoryBackend`]: process-local map, useful for tests and ephemeral sessions
//! - [`JsonFileBackend`]: a single JSON object on disk, written atomically

mod backend;
mod error;
mod store;

pub use backend::{JsonFileBackend, MemoryBackend, StorageBackend};
pub use error::{Result, StoreError};
pub use store::ConfigStore;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{ConfigStore, JsonFileBackend, MemoryBackend, StorageBackend, StoreError};
}
