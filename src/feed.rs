//! Telemetry feed: websocket transport into the [`StateSynchronizer`].
//!
//! DESIGN
//! ======
//! The feed owns the connection lifecycle and is the only writer of connection
//! state. A first connect that fails ends the session as `Disconnected`. Once
//! connected, a dropped socket moves to `Reconnecting` and retries with
//! exponential backoff; after `max_reconnects` failed attempts the session
//! ends as `Disconnected`. A successful reconnect resets the backoff. Every
//! handshake is bounded by `connect_timeout` and abandoned on shutdown.
//!
//! Pushes are decoded per frame: binary frames carry the protobuf encoding,
//! text frames the JSON encoding. A push that fails to decode is logged and
//! dropped without closing the socket.

#[cfg(test)]
#[path = "feed_test.rs"]
mod feed_test;

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use radar::sync::{ApplyOutcome, ConnectionState, StateSynchronizer, SyncError};
use telemetry::{CodecError, Push};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("websocket connect failed: {0}")]
    Connect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket handshake timed out after {0:?}")]
    ConnectTimeout(Duration),
    #[error("websocket error: {0}")]
    Socket(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("gave up after {attempts} reconnect attempts")]
    ReconnectLimit { attempts: u32 },
    #[error(transparent)]
    State(#[from] SyncError),
}

/// Connection settings for [`run`].
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub url: Url,
    pub max_reconnects: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub connect_timeout: Duration,
}

impl FeedConfig {
    #[must_use]
    pub fn new(url: Url, max_reconnects: u32) -> Self {
        Self {
            url,
            max_reconnects,
            initial_backoff: INITIAL_BACKOFF,
            max_backoff: MAX_BACKOFF,
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

/// What a single websocket message did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    Applied(ApplyOutcome),
    /// Control frames and anything else with no payload.
    Ignored,
    /// The peer sent a close frame.
    Closed,
}

/// Decode one websocket message and offer its snapshot to `sync`.
///
/// # Errors
///
/// Returns the codec error for a payload that does not decode.
pub fn handle_message(msg: Message, sync: &StateSynchronizer) -> Result<MessageOutcome, CodecError> {
    let push = match msg {
        Message::Binary(bytes) => telemetry::decode_push(&bytes)?,
        Message::Text(text) => telemetry::decode_push_json(text.as_str())?,
        Message::Close(_) => return Ok(MessageOutcome::Closed),
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => return Ok(MessageOutcome::Ignored),
    };
    let Push::RadarUpdate(snapshot) = push;
    let outcome = sync.apply(snapshot);
    if let ApplyOutcome::Stale { version, committed } = outcome {
        tracing::trace!(version, committed, "stale snapshot dropped");
    }
    Ok(MessageOutcome::Applied(outcome))
}

/// Run the feed until shutdown, a failed first connect, or the reconnect
/// limit. Leaves `sync` in `Disconnected` on every exit path.
///
/// # Errors
///
/// Returns `Err` when the first connect fails or reconnecting gives up.
pub async fn run(
    config: FeedConfig,
    sync: Arc<StateSynchronizer>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), FeedError> {
    sync.set_state(ConnectionState::Connecting)?;
    tracing::info!(host = config.url.host_str().unwrap_or_default(), "connecting to telemetry hub");
    let connected = tokio::select! {
        result = connect(&config) => result,
        _ = shutdown.changed() => {
            tracing::info!("shutdown before the hub answered");
            sync.set_state(ConnectionState::Disconnected)?;
            return Ok(());
        }
    };
    let mut socket = match connected {
        Ok(socket) => socket,
        Err(e) => {
            sync.set_state(ConnectionState::Disconnected)?;
            return Err(e);
        }
    };
    sync.set_state(ConnectionState::Connected)?;
    tracing::info!("telemetry hub connected");

    loop {
        tokio::select! {
            result = pump(&mut socket, &sync) => match result {
                Ok(()) => {
                    tracing::info!("telemetry hub closed the connection");
                    // Flushes the queued close reply; the socket is not read again.
                    if let Err(e) = SinkExt::close(&mut socket).await {
                        tracing::debug!(error = %e, "close reply failed");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "telemetry connection lost"),
            },
            _ = shutdown.changed() => {
                if let Err(e) = socket.close(None).await {
                    tracing::debug!(error = %e, "close on shutdown failed");
                }
                sync.set_state(ConnectionState::Disconnected)?;
                return Ok(());
            }
        }

        sync.set_state(ConnectionState::Reconnecting)?;
        match reconnect(&config, &mut shutdown).await {
            Reconnect::Connected(next) => {
                socket = next;
                sync.set_state(ConnectionState::Connected)?;
                tracing::info!("telemetry hub reconnected");
            }
            Reconnect::Shutdown => {
                sync.set_state(ConnectionState::Disconnected)?;
                return Ok(());
            }
            Reconnect::GaveUp { attempts } => {
                sync.set_state(ConnectionState::Disconnected)?;
                return Err(FeedError::ReconnectLimit { attempts });
            }
        }
    }
}

enum Reconnect {
    Connected(Socket),
    Shutdown,
    GaveUp { attempts: u32 },
}

async fn reconnect(config: &FeedConfig, shutdown: &mut watch::Receiver<bool>) -> Reconnect {
    let mut backoff = config.initial_backoff;
    for attempt in 1..=config.max_reconnects {
        tokio::select! {
            () = tokio::time::sleep(backoff) => {}
            _ = shutdown.changed() => return Reconnect::Shutdown,
        }
        backoff = (backoff * 2).min(config.max_backoff);

        let result = tokio::select! {
            result = connect(config) => result,
            _ = shutdown.changed() => return Reconnect::Shutdown,
        };
        match result {
            Ok(socket) => return Reconnect::Connected(socket),
            Err(e) => tracing::warn!(attempt, max = config.max_reconnects, error = %e, "reconnect failed"),
        }
    }
    Reconnect::GaveUp { attempts: config.max_reconnects }
}

async fn connect(config: &FeedConfig) -> Result<Socket, FeedError> {
    let (socket, _) = tokio::time::timeout(config.connect_timeout, connect_async(config.url.as_str()))
        .await
        .map_err(|_| FeedError::ConnectTimeout(config.connect_timeout))?
        .map_err(|e| FeedError::Connect(Box::new(e)))?;
    Ok(socket)
}

/// Read until the socket closes or errors.
async fn pump(socket: &mut Socket, sync: &StateSynchronizer) -> Result<(), FeedError> {
    while let Some(msg) = socket.next().await {
        let msg = msg.map_err(|e| FeedError::Socket(Box::new(e)))?;
        match handle_message(msg, sync) {
            Ok(MessageOutcome::Closed) => return Ok(()),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "dropping undecodable push"),
        }
    }
    Ok(())
}
