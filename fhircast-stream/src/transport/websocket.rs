//! WebSocket transport built on tokio-tungstenite

use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::time;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::SessionConfig;
use crate::error::ConnectionError;
use crate::transport::{Connection, ConnectionDriver, Connector};

/// Connects to ws:// and wss:// channel addresses.
///
/// Each connection gets a pump task that forwards text frames, in order, to
/// the [`Connection`]. Ping, pong and binary frames are not forwarded.
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    connect_timeout: Duration,
}

impl WebSocketConnector {
    pub fn new() -> Self {
        Self::with_config(&SessionConfig::default())
    }

    pub fn with_config(config: &SessionConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

impl Default for WebSocketConnector {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that an address is an absolute ws:// or wss:// URL
pub fn parse_channel_address(address: &str) -> Result<Url, ConnectionError> {
    let url = Url::parse(address.trim())
        .map_err(|e| ConnectionError::InvalidAddress(format!("{}: {}", address, e)))?;

    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(ConnectionError::InvalidAddress(format!(
            "{}: unsupported scheme '{}'",
            address, other
        ))),
    }
}

#[async_trait]
impl Connector for WebSocketConnector {
    async fn connect(&self, address: &str) -> Result<Connection, ConnectionError> {
        let url = parse_channel_address(address)?;
        debug!(address = %url, "Opening notification channel");

        let (stream, _response) =
            time::timeout(self.connect_timeout, tokio_tungstenite::connect_async(url.as_str()))
                .await
                .map_err(|_| ConnectionError::Timeout(self.connect_timeout))?
                .map_err(|e| ConnectionError::ConnectFailed(e.to_string()))?;

        info!(address = %url, "Notification channel connected");

        let (connection, driver) = Connection::pair();
        tokio::spawn(pump(stream, driver));
        Ok(connection)
    }
}

async fn pump<S>(stream: tokio_tungstenite::WebSocketStream<S>, mut driver: ConnectionDriver)
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send,
{
    let (mut write, mut read) = stream.split();
    let Some(mut close_signal) = driver.take_close_signal() else {
        return;
    };

    loop {
        tokio::select! {
            _ = &mut close_signal => {
                debug!("Closing notification channel");
                let _ = write.send(Message::Close(None)).await;
                let _ = write.close().await;
                break;
            }
            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if !driver.message(text.as_str()) {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let reason = frame
                            .map(|f| format!("{} {}", u16::from(f.code), f.reason))
                            .unwrap_or_else(|| "closed by hub".to_string());
                        info!(reason = %reason, "Notification channel closed by peer");
                        driver.closed(reason);
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "Notification channel error");
                        driver.error(e.to_string());
                        break;
                    }
                    None => {
                        driver.closed("connection ended");
                        break;
                    }
                }
            }
        }
    }
}
