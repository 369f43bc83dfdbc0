//! Typed hub messages

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A message received from the hub, after classification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HubMessage {
    /// Acknowledgment of a subscribe or unsubscribe action
    Connect(ConnectMessage),
    /// Notification of a context change
    Event(EventMessage),
}

impl HubMessage {
    /// Short name of the message kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            HubMessage::Connect(_) => "connect",
            HubMessage::Event(_) => "event",
        }
    }
}

/// Hub acknowledgment of a subscription request
///
/// Hubs send this as the first frame on a fresh channel, echoing the
/// subscription they accepted. Only `hub.mode` is required; other fields
/// fall back to empty values when missing or of an unexpected type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectMessage {
    #[serde(rename = "hub.mode")]
    pub mode: String,

    #[serde(rename = "hub.topic", default, deserialize_with = "or_default")]
    pub topic: String,

    /// Comma-joined event names
    #[serde(rename = "hub.events", default, deserialize_with = "or_default")]
    pub events: String,

    #[serde(
        rename = "hub.lease_seconds",
        default,
        deserialize_with = "lenient_lease",
        skip_serializing_if = "Option::is_none"
    )]
    pub lease_seconds: Option<i64>,
}

impl ConnectMessage {
    /// The acknowledged event names, split from the comma-joined list
    pub fn event_names(&self) -> Vec<&str> {
        self.events
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// A context-change notification
///
/// Only `id` is required; a missing or unreadable payload leaves an empty
/// event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,

    /// As sent by the hub; see [`EventMessage::received_at`]
    #[serde(default, deserialize_with = "or_default")]
    pub timestamp: String,

    #[serde(default, deserialize_with = "or_default")]
    pub event: EventPayload,
}

impl EventMessage {
    /// The `hub.event` name, e.g. `patient-open`
    pub fn event_name(&self) -> &str {
        &self.event.hub_event
    }

    /// Parse the timestamp as an RFC 3339 instant
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(
        rename = "hub.topic",
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub topic: Option<String>,

    #[serde(rename = "hub.event", default, deserialize_with = "or_default")]
    pub hub_event: String,

    #[serde(default, deserialize_with = "or_default")]
    pub context: Vec<ContextEntry>,
}

/// One resource in an event's context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub key: Option<String>,

    /// Opaque FHIR resource
    #[serde(default)]
    pub resource: Value,
}

impl ContextEntry {
    pub fn resource_type(&self) -> Option<&str> {
        self.resource.get("resourceType").and_then(Value::as_str)
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.resource.get("id").and_then(Value::as_str)
    }

    /// `ResourceType/id` reference, when both parts are present
    pub fn reference(&self) -> Option<String> {
        Some(format!("{}/{}", self.resource_type()?, self.resource_id()?))
    }
}

// Reads any JSON value and keeps it only if it fits the field's type.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

// Some hubs send the lease as a numeric string; anything else is no lease.
fn lenient_lease<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let lease = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    Ok(lease)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connect_message_fields() {
        let message: ConnectMessage = serde_json::from_value(json!({
            "hub.mode": "subscribe",
            "hub.topic": "DrXRay",
            "hub.events": "patient-open, patient-close",
            "hub.lease_seconds": 7200
        }))
        .unwrap();

        assert_eq!(message.mode, "subscribe");
        assert_eq!(message.topic, "DrXRay");
        assert_eq!(message.lease_seconds, Some(7200));
        assert_eq!(message.event_names(), vec!["patient-open", "patient-close"]);
    }

    #[test]
    fn test_connect_message_lease_as_string() {
        let message: ConnectMessage = serde_json::from_value(json!({
            "hub.mode": "subscribe",
            "hub.lease_seconds": "300"
        }))
        .unwrap();
        assert_eq!(message.lease_seconds, Some(300));
        assert!(message.event_names().is_empty());
    }

    #[test]
    fn test_connect_message_tolerates_odd_fields() {
        let message: ConnectMessage = serde_json::from_value(json!({
            "hub.mode": "subscribe",
            "hub.topic": 7,
            "hub.events": ["patient-open"],
            "hub.lease_seconds": "soon"
        }))
        .unwrap();

        assert_eq!(message.mode, "subscribe");
        assert_eq!(message.topic, "");
        assert!(message.event_names().is_empty());
        assert_eq!(message.lease_seconds, None);
    }

    #[test]
    fn test_event_message_without_payload() {
        let message: EventMessage = serde_json::from_value(json!({"id": "evt-1"})).unwrap();
        assert_eq!(message.event_name(), "");
        assert!(message.event.context.is_empty());

        let message: EventMessage = serde_json::from_value(json!({
            "id": "evt-2",
            "timestamp": 1685622600,
            "event": {"hub.event": "patient-open", "context": "none"}
        }))
        .unwrap();
        assert_eq!(message.event_name(), "patient-open");
        assert!(message.event.context.is_empty());
        assert!(message.received_at().is_none());
    }

    #[test]
    fn test_event_message_helpers() {
        let message: EventMessage = serde_json::from_value(json!({
            "id": "evt-1",
            "timestamp": "2023-06-01T12:30:00.000Z",
            "event": {
                "hub.topic": "DrXRay",
                "hub.event": "patient-open",
                "context": [
                    {"key": "patient", "resource": {"resourceType": "Patient", "id": "pat-1"}},
                    {"resource": {"resourceType": "Encounter"}}
                ]
            }
        }))
        .unwrap();

        assert_eq!(message.event_name(), "patient-open");
        assert_eq!(message.event.topic.as_deref(), Some("DrXRay"));
        assert_eq!(
            message.received_at().map(|ts| ts.to_rfc3339()),
            Some("2023-06-01T12:30:00+00:00".to_string())
        );

        let patient = &message.event.context[0];
        assert_eq!(patient.key.as_deref(), Some("patient"));
        assert_eq!(patient.resource_type(), Some("Patient"));
        assert_eq!(patient.reference(), Some("Patient/pat-1".to_string()));

        let encounter = &message.event.context[1];
        assert_eq!(encounter.key, None);
        assert_eq!(encounter.resource_id(), None);
        assert_eq!(encounter.reference(), None);
    }

    #[test]
    fn test_unparseable_timestamp() {
        let message: EventMessage = serde_json::from_value(json!({
            "id": "evt-1",
            "timestamp": "yesterday",
            "event": {"hub.event": "patient-close"}
        }))
        .unwrap();

        assert!(message.received_at().is_none());
        assert!(message.event.context.is_empty());
    }
}
