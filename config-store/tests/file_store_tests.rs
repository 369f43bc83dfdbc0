//! End-to-end tests for the file-backed config store

use config_store::{ConfigStore, JsonFileBackend, StorageBackend};

#[test]
fn test_settings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fhircast-client").join("settings.json");

    {
        let store = ConfigStore::probe(JsonFileBackend::open(&path).unwrap());
        assert!(store.is_available());
        store.set("hubUrl", "http://localhost:5000/api/hub");
        store.set("useDarkMode", "true");
    }

    let store = ConfigStore::probe(JsonFileBackend::open(&path).unwrap());
    assert_eq!(
        store.get("hubUrl").as_deref(),
        Some("http://localhost:5000/api/hub")
    );
    assert_eq!(store.get_parsed::<bool>("useDarkMode"), Some(true));
}

#[test]
fn test_probe_does_not_leave_probe_key_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let _store = ConfigStore::probe(JsonFileBackend::open(&path).unwrap());

    let backend = JsonFileBackend::open(&path).unwrap();
    assert_eq!(backend.read("__config_store_probe__").unwrap(), None);
}

#[test]
fn test_unwritable_location_degrades_to_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the parent directory should be
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();
    let path = blocker.join("settings.json");

    let store = ConfigStore::probe(JsonFileBackend::open(&path).unwrap());
    assert!(!store.is_available());

    store.set("hubTopic", "ignored");
    assert_eq!(store.get("hubTopic"), None);
}
