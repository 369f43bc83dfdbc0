//! Persisted client settings
//!
//! Subscription parameters and the visual mode are stored under fixed keys in
//! the [`ConfigStore`]. Missing or unparseable values fall back to defaults.

use config_store::ConfigStore;
use fhircast_api::SubscriptionParameters;

pub const USE_DARK_MODE: &str = "useDarkMode";
pub const HUB_URL: &str = "hubUrl";
pub const HUB_TOPIC: &str = "hubTopic";
pub const LEASE_SECONDS: &str = "leaseSeconds";
pub const SUBSCRIBER_NAME: &str = "subscriberName";
pub const BEARER_TOKEN: &str = "bearerToken";
/// JSON object of event name to selected flag, in order
pub const SUPPORTED_EVENTS: &str = "supportedEvents";

/// Read subscription parameters, using defaults for anything not stored
pub fn load_parameters(store: &ConfigStore) -> SubscriptionParameters {
    SubscriptionParameters {
        hub_url: store.get(HUB_URL).unwrap_or_default(),
        topic: store.get(HUB_TOPIC).unwrap_or_default(),
        lease_seconds: store.get_parsed(LEASE_SECONDS).unwrap_or_default(),
        subscriber_name: store.get(SUBSCRIBER_NAME).unwrap_or_default(),
        bearer_token: store.get(BEARER_TOKEN).unwrap_or_default(),
        events: store.get_json(SUPPORTED_EVENTS).unwrap_or_default(),
    }
}

pub fn save_parameters(store: &ConfigStore, params: &SubscriptionParameters) {
    store.set(HUB_URL, &params.hub_url);
    store.set(HUB_TOPIC, &params.topic);
    store.set(LEASE_SECONDS, params.lease_seconds.to_string());
    store.set(SUBSCRIBER_NAME, &params.subscriber_name);
    store.set(BEARER_TOKEN, &params.bearer_token);
    store.set_json(SUPPORTED_EVENTS, &params.events);
}

/// Light or dark presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualMode {
    #[default]
    Light,
    Dark,
}

impl VisualMode {
    pub fn is_dark(self) -> bool {
        self == VisualMode::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            VisualMode::Light => VisualMode::Dark,
            VisualMode::Dark => VisualMode::Light,
        }
    }

    pub fn load(store: &ConfigStore) -> Self {
        match store.get_parsed::<bool>(USE_DARK_MODE) {
            Some(true) => VisualMode::Dark,
            _ => VisualMode::Light,
        }
    }

    pub fn save(self, store: &ConfigStore) {
        store.set(USE_DARK_MODE, self.is_dark().to_string());
    }
}
