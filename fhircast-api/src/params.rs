//! User-editable subscription parameters

use fhircast_discovery::EventSelection;

/// Everything needed to build a subscribe or unsubscribe request
///
/// Owned and mutated by the presentation layer; the client only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionParameters {
    /// Base address of the hub; subscription requests are POSTed here
    pub hub_url: String,
    /// Session identifier being subscribed to
    pub topic: String,
    /// Requested subscription duration; `<= 0` omits it from the request
    pub lease_seconds: i64,
    pub subscriber_name: String,
    /// Sent as `Authorization: Bearer <token>` when non-empty
    pub bearer_token: String,
    /// Supported events and which of them to request
    pub events: EventSelection,
}

impl SubscriptionParameters {
    pub fn new(hub_url: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            hub_url: hub_url.into(),
            topic: topic.into(),
            ..Default::default()
        }
    }

    /// The bearer token, if one is set
    pub fn bearer_token(&self) -> Option<&str> {
        if self.bearer_token.is_empty() {
            None
        } else {
            Some(&self.bearer_token)
        }
    }

    /// The lease to request, if any
    pub fn lease(&self) -> Option<u64> {
        if self.lease_seconds > 0 {
            Some(self.lease_seconds as u64)
        } else {
            None
        }
    }

    /// Selected event names, in selection order
    pub fn selected_events(&self) -> Vec<&str> {
        self.events.selected().collect()
    }
}
