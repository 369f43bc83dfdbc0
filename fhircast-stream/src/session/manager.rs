//! Session lifecycle
//!
//! The SessionManager owns the single notification channel connection and the
//! session it feeds. All mutation goes through `&mut self`, so a second
//! connection can never be opened alongside the first and frames are applied
//! one at a time in arrival order.

use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::ConnectionError;
use crate::events::{classify, HubMessage};
use crate::session::{DisconnectReason, Session, SessionUpdate};
use crate::transport::{Connection, Connector, TransportEvent};

/// Opens, feeds and closes the notification channel session
///
/// # Example
///
/// ```rust,no_run
/// use fhircast_stream::{SessionManager, SessionUpdate, WebSocketConnector};
///
/// # async fn run() -> Result<(), fhircast_stream::ConnectionError> {
/// let mut sessions = SessionManager::new(WebSocketConnector::new());
/// sessions.open_session("ws://localhost:5000/ws/7f3c").await?;
///
/// if let Some(SessionUpdate::Connect(ack)) = sessions.next_update().await {
///     println!("subscribed to {}", ack.topic);
/// }
///
/// sessions.close_session();
/// # Ok(())
/// # }
/// ```
pub struct SessionManager<C: Connector> {
    connector: C,
    connection: Option<Connection>,
    session: Session,
}

impl<C: Connector> SessionManager<C> {
    pub fn new(connector: C) -> Self {
        Self::with_config(connector, &SessionConfig::default())
    }

    pub fn with_config(connector: C, config: &SessionConfig) -> Self {
        Self {
            connector,
            connection: None,
            session: Session::with_event_limit(config.event_history_limit),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Open a session on `address`, replacing any current one.
    ///
    /// The history is cleared before connecting, so a failed connect leaves
    /// an empty, disconnected session behind.
    pub async fn open_session(&mut self, address: &str) -> Result<(), ConnectionError> {
        if let Some(previous) = self.connection.take() {
            info!(
                address = self.session.channel_address().unwrap_or_default(),
                "Closing previous notification channel"
            );
            previous.close();
        }
        self.session.reset();

        let connection = match self.connector.connect(address).await {
            Ok(connection) => connection,
            Err(e) => {
                warn!(address = %address, error = %e, "Failed to open notification channel");
                return Err(e);
            }
        };

        self.connection = Some(connection);
        self.session.mark_connected(address);
        info!(address = %address, "Session connected");
        Ok(())
    }

    /// Close the current session.
    ///
    /// Returns false, and changes nothing, when there is no open session.
    /// The history is kept until the next open.
    pub fn close_session(&mut self) -> bool {
        if self.connection.is_none() && !self.session.is_connected() {
            return false;
        }

        if let Some(connection) = self.connection.take() {
            connection.close();
        }
        self.session.mark_disconnected();
        info!("Session closed");
        true
    }

    /// Wait for the next transport event and apply it.
    ///
    /// Returns `None` when no connection is open. A transport error or close
    /// ends the session and is returned as [`SessionUpdate::Disconnected`].
    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        let event = self.connection.as_mut()?.recv().await;
        Some(self.apply(event))
    }

    /// Apply every transport event already queued, without waiting.
    ///
    /// Lets a caller see a close or error the hub already sent before it
    /// decides anything from [`SessionManager::is_connected`].
    pub fn drain_pending(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Some(connection) = self.connection.as_mut() {
            let event = match connection.try_recv() {
                Ok(event) => Some(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => None,
            };
            updates.push(self.apply(event));
        }
        updates
    }

    fn apply(&mut self, event: Option<TransportEvent>) -> SessionUpdate {
        match event {
            Some(TransportEvent::Message(raw)) => self.handle_frame(&raw),
            Some(TransportEvent::Error(error)) => self.end_session(DisconnectReason::Error(error)),
            Some(TransportEvent::Closed(reason)) => {
                self.end_session(DisconnectReason::Closed(reason))
            }
            None => self.end_session(DisconnectReason::Closed("transport stopped".to_string())),
        }
    }

    /// Classify one raw frame and record it in the history
    pub fn handle_frame(&mut self, raw: &str) -> SessionUpdate {
        match classify(raw) {
            Ok(Some(HubMessage::Connect(message))) => {
                debug!(mode = %message.mode, topic = %message.topic, "Received connect message");
                self.session.history_mut().record_connect(message.clone());
                SessionUpdate::Connect(message)
            }
            Ok(Some(HubMessage::Event(message))) => {
                debug!(id = %message.id, event = %message.event_name(), "Received event message");
                self.session.history_mut().record_event(message.clone());
                SessionUpdate::Event(message)
            }
            Ok(None) => {
                debug!(len = raw.len(), "Discarding unrecognised frame");
                self.session.count_discarded();
                SessionUpdate::Discarded
            }
            Err(e) => {
                warn!(error = %e, "Discarding frame that failed to classify");
                self.session.count_discarded();
                SessionUpdate::Discarded
            }
        }
    }

    fn end_session(&mut self, reason: DisconnectReason) -> SessionUpdate {
        if let Some(connection) = self.connection.take() {
            connection.close();
        }
        self.session.mark_disconnected();
        info!(reason = %reason, "Session ended");
        SessionUpdate::Disconnected(reason)
    }
}

impl<C: Connector> Drop for SessionManager<C> {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
        }
    }
}
