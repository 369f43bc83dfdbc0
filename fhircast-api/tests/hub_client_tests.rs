//! HubClient tests against a mock hub
//!
//! These verify the exact requests that go over the wire, including which
//! headers are present, and how hub responses map onto results.

use fhircast_api::{EventSelection, HubClient, SubscriptionError, SubscriptionParameters};
use mockito::Matcher;

fn params_for(server: &mockito::Server) -> SubscriptionParameters {
    let mut params = SubscriptionParameters::new(format!("{}/api/hub", server.url()), "DrXRay");
    params.events = EventSelection::from_supported(&["patient-open", "patient-close"]);
    params
}

#[tokio::test]
async fn test_subscribe_sends_exact_form_and_returns_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/hub")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_header("accept", "application/json")
        .match_header("authorization", Matcher::Missing)
        .match_body(
            "hub.channel.type=websocket&hub.mode=subscribe&hub.topic=DrXRay\
             &hub.events=patient-open%2Cpatient-close&hub.lease_seconds=300",
        )
        .with_status(202)
        .with_header("content-type", "application/json")
        .with_body(r#"{"hub.channel.endpoint":"ws://localhost:5000/ws/7f3c"}"#)
        .create_async()
        .await;

    let mut params = params_for(&server);
    params.events.set_all(true);
    params.lease_seconds = 300;

    let endpoint = HubClient::new().subscribe(&params).await.unwrap();

    mock.assert_async().await;
    assert_eq!(endpoint, "ws://localhost:5000/ws/7f3c");
}

#[tokio::test]
async fn test_bearer_token_sent_when_present() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/hub")
        .match_header("authorization", "Bearer secret-token")
        .with_body(r#"{"hub.channel.endpoint":"ws://localhost:5000/ws/1"}"#)
        .create_async()
        .await;

    let mut params = params_for(&server);
    params.bearer_token = "secret-token".to_string();

    HubClient::new().subscribe(&params).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unsubscribe_releases_channel() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/hub")
        .match_header("authorization", Matcher::Missing)
        .match_body(
            "hub.channel.type=websocket&hub.mode=unsubscribe&hub.topic=DrXRay\
             &hub.channel.endpoint=ws%3A%2F%2Flocalhost%3A5000%2Fws%2F7f3c",
        )
        .with_status(202)
        .create_async()
        .await;

    let mut params = params_for(&server);
    params.events.set_all(true);

    HubClient::new()
        .unsubscribe(&params, Some("ws://localhost:5000/ws/7f3c"))
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_json_subscribe_response_is_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/hub")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let err = HubClient::new()
        .subscribe(&params_for(&server))
        .await
        .unwrap_err();
    assert!(matches!(err, SubscriptionError::ParseError(_)));
}

#[tokio::test]
async fn test_non_json_unsubscribe_response_is_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/hub")
        .with_status(400)
        .with_body("unknown topic")
        .create_async()
        .await;

    let err = HubClient::new()
        .unsubscribe(&params_for(&server), None)
        .await
        .unwrap_err();
    assert!(matches!(err, SubscriptionError::ParseError(_)));
}

#[tokio::test]
async fn test_unreachable_hub_is_network_error() {
    let params = SubscriptionParameters::new("http://127.0.0.1:9/api/hub", "DrXRay");
    let err = HubClient::new().subscribe(&params).await.unwrap_err();
    assert!(matches!(err, SubscriptionError::NetworkError(_)));
}
