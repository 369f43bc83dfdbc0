//! Subscribe / unsubscribe request construction
//!
//! The form body is assembled by hand rather than through a generic form
//! serializer: hubs in the wild are sensitive to field order, and optional
//! fields must be left out entirely instead of sent empty.

use std::fmt;

use crate::params::SubscriptionParameters;

/// Value of the `hub.mode` form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HubMode {
    Subscribe,
    Unsubscribe,
}

impl HubMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HubMode::Subscribe => "subscribe",
            HubMode::Unsubscribe => "unsubscribe",
        }
    }
}

impl fmt::Display for HubMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request to a hub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRequest {
    pub hub_url: String,
    pub mode: HubMode,
    pub topic: String,
    /// Comma-joined selected events (subscribe only, omitted when none)
    pub events: Option<String>,
    /// Requested lease (subscribe only, omitted unless positive)
    pub lease_seconds: Option<u64>,
    /// Subscriber display name (subscribe only, omitted when empty)
    pub subscriber_name: Option<String>,
    /// Channel being released (unsubscribe only, omitted when unknown)
    pub channel_endpoint: Option<String>,
    pub bearer_token: Option<String>,
}

impl SubscriptionRequest {
    /// Build a subscribe request from the current parameters
    pub fn subscribe(params: &SubscriptionParameters) -> Self {
        let events = params.events.joined();

        Self {
            hub_url: params.hub_url.trim().to_string(),
            mode: HubMode::Subscribe,
            topic: params.topic.clone(),
            events: (!events.is_empty()).then_some(events),
            lease_seconds: params.lease(),
            subscriber_name: (!params.subscriber_name.is_empty())
                .then(|| params.subscriber_name.clone()),
            channel_endpoint: None,
            bearer_token: params.bearer_token().map(str::to_string),
        }
    }

    /// Build an unsubscribe request, releasing `channel_endpoint` when known
    pub fn unsubscribe(params: &SubscriptionParameters, channel_endpoint: Option<&str>) -> Self {
        Self {
            hub_url: params.hub_url.trim().to_string(),
            mode: HubMode::Unsubscribe,
            topic: params.topic.clone(),
            events: None,
            lease_seconds: None,
            subscriber_name: None,
            channel_endpoint: channel_endpoint
                .filter(|endpoint| !endpoint.is_empty())
                .map(str::to_string),
            bearer_token: params.bearer_token().map(str::to_string),
        }
    }

    /// The `application/x-www-form-urlencoded` body, fields in wire order
    pub fn form_body(&self) -> String {
        // Only RFC 3986 unreserved characters pass through, so `!'()*` are escaped too.
        let mut body = format!("hub.channel.type=websocket&hub.mode={}", self.mode);
        body.push_str(&format!("&hub.topic={}", urlencoding::encode(&self.topic)));

        match self.mode {
            HubMode::Subscribe => {
                if let Some(events) = &self.events {
                    body.push_str(&format!("&hub.events={}", urlencoding::encode(events)));
                }
                if let Some(lease) = self.lease_seconds {
                    body.push_str(&format!("&hub.lease_seconds={}", lease));
                }
                if let Some(name) = &self.subscriber_name {
                    body.push_str(&format!("&subscriber.name={}", urlencoding::encode(name)));
                }
            }
            HubMode::Unsubscribe => {
                if let Some(endpoint) = &self.channel_endpoint {
                    body.push_str(&format!(
                        "&hub.channel.endpoint={}",
                        urlencoding::encode(endpoint)
                    ));
                }
            }
        }

        body
    }

    /// Value for the `Authorization` header, when a token is set
    pub fn authorization(&self) -> Option<String> {
        self.bearer_token
            .as_ref()
            .map(|token| format!("Bearer {}", token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhircast_discovery::EventSelection;
    use proptest::prelude::*;
    use rstest::rstest;

    fn params() -> SubscriptionParameters {
        SubscriptionParameters::new("http://localhost:5000/api/hub", "DrXRay")
    }

    fn selection(selected: &[&str]) -> EventSelection {
        let mut events =
            EventSelection::from_supported(&["patient-open", "patient-close", "imagingstudy-open"]);
        for event in selected {
            events.set(event, true);
        }
        events
    }

    #[test]
    fn test_minimal_subscribe_body() {
        let request = SubscriptionRequest::subscribe(&params());
        assert_eq!(
            request.form_body(),
            "hub.channel.type=websocket&hub.mode=subscribe&hub.topic=DrXRay"
        );
        assert_eq!(request.authorization(), None);
    }

    #[test]
    fn test_full_subscribe_body_order() {
        let mut params = params();
        params.events = selection(&["patient-open", "patient-close"]);
        params.lease_seconds = 300;
        params.subscriber_name = "Reading Room 3".to_string();

        let request = SubscriptionRequest::subscribe(&params);
        assert_eq!(
            request.form_body(),
            "hub.channel.type=websocket&hub.mode=subscribe&hub.topic=DrXRay\
             &hub.events=patient-open%2Cpatient-close\
             &hub.lease_seconds=300\
             &subscriber.name=Reading%20Room%203"
        );
    }

    #[test]
    fn test_no_selected_events_omits_field() {
        let mut params = params();
        params.events = selection(&[]);

        let body = SubscriptionRequest::subscribe(&params).form_body();
        assert!(!body.contains("hub.events"));
    }

    #[test]
    fn test_single_event_is_not_comma_joined() {
        let mut params = params();
        params.events = selection(&["imagingstudy-open"]);

        let body = SubscriptionRequest::subscribe(&params).form_body();
        assert!(body.ends_with("&hub.events=imagingstudy-open"));
    }

    #[rstest]
    #[case("DrXRay", "DrXRay")]
    #[case("a b", "a%20b")]
    #[case("urn:topic/1?x=y&z", "urn%3Atopic%2F1%3Fx%3Dy%26z")]
    #[case("7jaa86kgdudewiaq0wtu", "7jaa86kgdudewiaq0wtu")]
    #[case("it's(1)!*", "it%27s%281%29%21%2A")]
    #[case("a-b_c.d~e", "a-b_c.d~e")]
    fn test_topic_is_encoded(#[case] topic: &str, #[case] expected: &str) {
        let mut params = params();
        params.topic = topic.to_string();

        let body = SubscriptionRequest::subscribe(&params).form_body();
        assert!(body.ends_with(&format!("&hub.topic={}", expected)));
    }

    #[test]
    fn test_unsubscribe_body_with_endpoint() {
        let mut params = params();
        // Subscribe-only fields never leak into an unsubscribe
        params.events = selection(&["patient-open"]);
        params.lease_seconds = 300;
        params.subscriber_name = "Reading Room 3".to_string();

        let request =
            SubscriptionRequest::unsubscribe(&params, Some("ws://localhost:5000/ws/abc123"));
        assert_eq!(
            request.form_body(),
            "hub.channel.type=websocket&hub.mode=unsubscribe&hub.topic=DrXRay\
             &hub.channel.endpoint=ws%3A%2F%2Flocalhost%3A5000%2Fws%2Fabc123"
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn test_unsubscribe_without_endpoint(#[case] endpoint: Option<&str>) {
        let request = SubscriptionRequest::unsubscribe(&params(), endpoint);
        assert_eq!(
            request.form_body(),
            "hub.channel.type=websocket&hub.mode=unsubscribe&hub.topic=DrXRay"
        );
    }

    #[test]
    fn test_authorization_header_value() {
        let mut params = params();
        params.bearer_token = "eyJhbGciOi".to_string();

        let request = SubscriptionRequest::subscribe(&params);
        assert_eq!(request.authorization().as_deref(), Some("Bearer eyJhbGciOi"));
    }

    proptest! {
        #[test]
        fn prop_non_positive_lease_is_omitted(lease in i64::MIN..=0i64) {
            let mut params = params();
            params.lease_seconds = lease;
            let body = SubscriptionRequest::subscribe(&params).form_body();
            prop_assert!(!body.contains("hub.lease_seconds"));
        }

        #[test]
        fn prop_positive_lease_is_sent(lease in 1i64..=i64::MAX) {
            let mut params = params();
            params.lease_seconds = lease;
            let body = SubscriptionRequest::subscribe(&params).form_body();
            let expected = format!("&hub.lease_seconds={}", lease);
            prop_assert!(body.contains(&expected));
        }

        #[test]
        fn prop_bearer_only_when_token_present(token in "[A-Za-z0-9._-]{0,24}") {
            let mut params = params();
            params.bearer_token = token.clone();
            let request = SubscriptionRequest::subscribe(&params);
            prop_assert_eq!(request.authorization().is_some(), !token.is_empty());
        }
    }
}
