//! Received message history for a session

use std::collections::VecDeque;

use crate::events::types::{ConnectMessage, EventMessage};

/// Messages received during the current session
///
/// Holds the latest connect message and the event messages, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageHistory {
    connect: Option<ConnectMessage>,
    events: VecDeque<EventMessage>,
    event_limit: Option<usize>,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that keeps at most `limit` events, dropping the oldest first
    pub fn with_event_limit(limit: Option<usize>) -> Self {
        Self {
            event_limit: limit,
            ..Self::default()
        }
    }

    /// Replace the connect message
    pub fn record_connect(&mut self, message: ConnectMessage) {
        self.connect = Some(message);
    }

    /// Prepend an event message
    pub fn record_event(&mut self, message: EventMessage) {
        self.events.push_front(message);
        if let Some(limit) = self.event_limit {
            self.events.truncate(limit);
        }
    }

    /// The connect list: at most one entry
    pub fn connect_messages(&self) -> &[ConnectMessage] {
        self.connect.as_slice()
    }

    pub fn latest_connect(&self) -> Option<&ConnectMessage> {
        self.connect.as_ref()
    }

    /// Event messages, newest first
    pub fn events(&self) -> impl DoubleEndedIterator<Item = &EventMessage> + ExactSizeIterator {
        self.events.iter()
    }

    pub fn latest_event(&self) -> Option<&EventMessage> {
        self.events.front()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn event_limit(&self) -> Option<usize> {
        self.event_limit
    }

    pub fn is_empty(&self) -> bool {
        self.connect.is_none() && self.events.is_empty()
    }

    /// Drop every message. The event limit is kept.
    pub fn clear(&mut self) {
        self.connect = None;
        self.events.clear();
    }
}
