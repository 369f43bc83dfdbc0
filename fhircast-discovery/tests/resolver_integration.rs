//! Discovery tests against a mock hub

use std::fs;
use std::path::PathBuf;

use fhircast_discovery::{CapabilityResolver, DiscoveryError, EventSelection};

fn load_fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);

    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

#[tokio::test]
async fn test_resolve_fixture_document() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/hub/.well-known/fhircast-configuration")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(load_fixture("fhircast_configuration.json"))
        .create_async()
        .await;

    let resolver = CapabilityResolver::new();
    let caps = resolver
        .resolve(&format!("{}/api/hub", server.url()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(caps.events_supported.len(), 8);
    assert_eq!(caps.events_supported[0], "patient-open");
    assert!(caps.websocket_support);
    assert!(caps.webhook_support);
    assert_eq!(caps.protocol_version, "STU3");
}

#[tokio::test]
async fn test_two_discoveries_reconcile_selection() {
    let resolver = CapabilityResolver::new();
    let mut selection = EventSelection::new();

    let mut first_hub = mockito::Server::new_async().await;
    let first = first_hub
        .mock("GET", "/hub/.well-known/fhircast-configuration")
        .with_body(r#"{"eventsSupported":["patient-open","patient-close"],"websocketSupport":true,"webhookSupport":false,"fhircastVersion":"STU3"}"#)
        .create_async()
        .await;

    let caps = resolver
        .resolve(&format!("{}/hub", first_hub.url()))
        .await
        .unwrap();
    selection.reconcile(&caps.events_supported);
    first.assert_async().await;

    assert_eq!(
        selection.iter().collect::<Vec<_>>(),
        vec![("patient-open", false), ("patient-close", false)]
    );
    selection.set("patient-open", true);

    // The hub was reconfigured and no longer emits patient-close
    let mut second_hub = mockito::Server::new_async().await;
    let _second = second_hub
        .mock("GET", "/hub/.well-known/fhircast-configuration")
        .with_body(r#"{"eventsSupported":["patient-open"],"websocketSupport":true,"webhookSupport":false,"fhircastVersion":"STU3"}"#)
        .create_async()
        .await;

    let caps = resolver
        .resolve(&format!("{}/hub", second_hub.url()))
        .await
        .unwrap();
    selection.reconcile(&caps.events_supported);

    assert_eq!(selection.iter().collect::<Vec<_>>(), vec![("patient-open", true)]);
}

#[tokio::test]
async fn test_error_page_is_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/.well-known/fhircast-configuration")
        .with_status(404)
        .with_body("<html><body>Not Found</body></html>")
        .create_async()
        .await;

    let resolver = CapabilityResolver::new();
    let err = resolver.resolve(&server.url()).await.unwrap_err();
    assert!(matches!(err, DiscoveryError::ParseError(_)));
}

#[tokio::test]
async fn test_unreachable_hub_is_network_error() {
    // Port 9 (discard) on localhost is reliably closed in test environments
    let resolver = CapabilityResolver::new();
    let err = resolver.resolve("http://127.0.0.1:9/hub").await.unwrap_err();
    assert!(matches!(err, DiscoveryError::NetworkError(_)));
}
