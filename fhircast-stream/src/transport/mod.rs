//! Notification channel transport
//!
//! A [`Connector`] turns a channel address into a [`Connection`]: the receiving
//! end of an ordered stream of [`TransportEvent`]s plus a close signal. The
//! producing end is a [`ConnectionDriver`], which a transport implementation
//! (or a test) feeds from its own task.

pub mod websocket;

use async_trait::async_trait;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};

use crate::error::ConnectionError;

pub use websocket::WebSocketConnector;

/// Something that happened on an open connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A text frame
    Message(String),
    /// The transport failed; no further events follow
    Error(String),
    /// The peer closed the connection; no further events follow
    Closed(String),
}

/// Opens notification channel connections
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, address: &str) -> Result<Connection, ConnectionError>;
}

/// The consuming side of an open connection
#[derive(Debug)]
pub struct Connection {
    events: mpsc::UnboundedReceiver<TransportEvent>,
    close: Option<oneshot::Sender<()>>,
}

/// The producing side of an open connection
#[derive(Debug)]
pub struct ConnectionDriver {
    events: mpsc::UnboundedSender<TransportEvent>,
    close: Option<oneshot::Receiver<()>>,
}

impl Connection {
    /// Create a connected pair
    pub fn pair() -> (Connection, ConnectionDriver) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (close_tx, close_rx) = oneshot::channel();

        (
            Connection {
                events: event_rx,
                close: Some(close_tx),
            },
            ConnectionDriver {
                events: event_tx,
                close: Some(close_rx),
            },
        )
    }

    /// Wait for the next event, in the order the driver produced them.
    ///
    /// Returns `None` once the driver is gone and every queued event has
    /// been received.
    pub async fn recv(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }

    /// Take the next queued event without waiting.
    ///
    /// `TryRecvError::Disconnected` means the driver is gone and nothing is
    /// left in the queue.
    pub fn try_recv(&mut self) -> Result<TransportEvent, TryRecvError> {
        self.events.try_recv()
    }

    /// Stop receiving and ask the transport to close.
    ///
    /// The receiver is dropped before the signal is sent, so nothing queued
    /// after this point is ever observed.
    pub fn close(self) {
        let Connection { events, close } = self;
        drop(events);
        if let Some(close) = close {
            let _ = close.send(());
        }
    }
}

impl ConnectionDriver {
    /// Queue an event. Returns false when the connection side is gone.
    pub fn send(&self, event: TransportEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn message(&self, text: impl Into<String>) -> bool {
        self.send(TransportEvent::Message(text.into()))
    }

    pub fn error(&self, description: impl Into<String>) -> bool {
        self.send(TransportEvent::Error(description.into()))
    }

    pub fn closed(&self, reason: impl Into<String>) -> bool {
        self.send(TransportEvent::Closed(reason.into()))
    }

    /// Whether the connection side has been closed or dropped
    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }

    /// Take the close signal. It resolves when the connection side asks to
    /// close or is dropped. Can only be taken once.
    pub fn take_close_signal(&mut self) -> Option<oneshot::Receiver<()>> {
        self.close.take()
    }
}
