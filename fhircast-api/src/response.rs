//! Hub responses

use serde::Deserialize;

use crate::error::{Result, SubscriptionError};

/// Body of a successful WebSocket subscribe response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubscribeResponse {
    /// Where the notification channel lives; used verbatim
    #[serde(rename = "hub.channel.endpoint")]
    pub channel_endpoint: String,
}

impl SubscribeResponse {
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| {
            SubscriptionError::ParseError(format!("Invalid subscribe response: {}", e))
        })
    }
}

/// Check that a non-empty unsubscribe response body is JSON
///
/// Hubs commonly answer unsubscribes with `202 Accepted` and no body at all,
/// which is fine. Anything else must at least parse.
pub fn check_unsubscribe_body(body: &str) -> Result<()> {
    if body.trim().is_empty() {
        return Ok(());
    }
    serde_json::from_str::<serde_json::Value>(body)
        .map(|_| ())
        .map_err(|e| SubscriptionError::ParseError(format!("Invalid unsubscribe response: {}", e)))
}
