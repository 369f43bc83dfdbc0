//! Notification channel session state
//!
//! Exactly one [`Session`] exists per [`SessionManager`]. It is reset on every
//! open and keeps its history after a close so it can still be displayed.

pub mod history;
pub mod manager;

use std::fmt;

pub use history::MessageHistory;
pub use manager::SessionManager;

use crate::events::types::{ConnectMessage, EventMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connected,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Disconnected => write!(f, "disconnected"),
            SessionState::Connected => write!(f, "connected"),
        }
    }
}

/// The current notification channel session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    state: SessionState,
    channel_address: Option<String>,
    history: MessageHistory,
    discarded_frames: u64,
}

impl Session {
    pub(crate) fn with_event_limit(limit: Option<usize>) -> Self {
        Self {
            history: MessageHistory::with_event_limit(limit),
            ..Self::default()
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Address of the open channel. `None` when disconnected.
    pub fn channel_address(&self) -> Option<&str> {
        self.channel_address.as_deref()
    }

    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    /// Frames dropped because they were not hub messages or failed to classify
    pub fn discarded_frames(&self) -> u64 {
        self.discarded_frames
    }

    pub(crate) fn reset(&mut self) {
        self.state = SessionState::Disconnected;
        self.channel_address = None;
        self.history.clear();
        self.discarded_frames = 0;
    }

    pub(crate) fn mark_connected(&mut self, address: &str) {
        self.state = SessionState::Connected;
        self.channel_address = Some(address.to_string());
    }

    pub(crate) fn mark_disconnected(&mut self) {
        self.state = SessionState::Disconnected;
        self.channel_address = None;
    }

    pub(crate) fn history_mut(&mut self) -> &mut MessageHistory {
        &mut self.history
    }

    pub(crate) fn count_discarded(&mut self) {
        self.discarded_frames += 1;
    }
}

/// Why a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// `close_session` was called
    Requested,
    /// The hub closed the channel
    Closed(String),
    /// The transport failed
    Error(String),
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisconnectReason::Requested => write!(f, "closed by client"),
            DisconnectReason::Closed(reason) => write!(f, "closed by hub ({})", reason),
            DisconnectReason::Error(error) => write!(f, "channel error: {}", error),
        }
    }
}

/// The outcome of applying one transport event to the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    /// A connect message replaced the previous one
    Connect(ConnectMessage),
    /// An event message was prepended to the history
    Event(EventMessage),
    /// A frame was dropped without changing the session
    Discarded,
    /// The session is now disconnected
    Disconnected(DisconnectReason),
}
