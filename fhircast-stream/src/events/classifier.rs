//! Frame classification
//!
//! A frame is a connect message when it carries a non-empty `hub.mode`,
//! otherwise an event message when it carries a non-empty `id`. Other fields
//! never change the kind: missing or mistyped ones decode to empty values.
//! Anything else that is valid JSON is not a hub message and yields `Ok(None)`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ClassificationError;
use crate::events::types::HubMessage;

/// Classify a raw text frame from the notification channel
pub fn classify(raw: &str) -> Result<Option<HubMessage>, ClassificationError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ClassificationError::Malformed(e.to_string()))?;

    let (is_connect, is_event) = match value.as_object() {
        Some(object) => (
            has_non_empty_string(object, "hub.mode"),
            has_non_empty_string(object, "id"),
        ),
        None => (false, false),
    };

    if is_connect {
        return decode(value, "connect").map(|m| Some(HubMessage::Connect(m)));
    }
    if is_event {
        return decode(value, "event").map(|m| Some(HubMessage::Event(m)));
    }

    debug!("Frame is neither a connect nor an event message");
    Ok(None)
}

fn has_non_empty_string(object: &Map<String, Value>, key: &str) -> bool {
    object
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

fn decode<T: DeserializeOwned>(value: Value, kind: &'static str) -> Result<T, ClassificationError> {
    serde_json::from_value(value).map_err(|e| ClassificationError::Shape {
        kind,
        message: e.to_string(),
    })
}
