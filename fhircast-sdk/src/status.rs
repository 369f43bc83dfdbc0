//! User-facing status messages

use serde_json::Value;

/// Receives status messages meant for the user
///
/// Failures of user-initiated operations end up here rather than being
/// returned to a caller who may not look at them.
#[cfg_attr(test, mockall::automock)]
pub trait StatusSink: Send {
    fn add_message(&self, message: &str, data: Option<Value>);
}

/// Writes status messages to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStatusSink;

impl StatusSink for TracingStatusSink {
    fn add_message(&self, message: &str, data: Option<Value>) {
        match data {
            Some(data) => tracing::warn!(data = %data, "{}", message),
            None => tracing::warn!("{}", message),
        }
    }
}
