//! WebSocket connection and event loop.
//!
//! This module dials the remote end over WebSocket and correlates responses
//! with the requests that caused them.
//!
//! # Event Loop
//!
//! The connection spawns a tokio task that handles:
//!
//! - Incoming responses from the remote end
//! - Outgoing commands from the Rust API
//! - Request/response correlation by UUID

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{Value, from_str, to_string};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::RequestId;
use crate::protocol::{Command, Request, Response};

use super::Transport;

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for command execution.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum pending requests before rejecting new ones.
const MAX_PENDING_REQUESTS: usize = 100;

/// Timeout for the WebSocket handshake.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Types
// ============================================================================

/// WebSocket stream to the remote end.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Map of request IDs to response channels.
type CorrelationMap = FxHashMap<RequestId, oneshot::Sender<Result<Response>>>;

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    /// Send a request and wait for response.
    Send {
        request: Request,
        response_tx: oneshot::Sender<Result<Response>>,
    },
    /// Remove a correlation entry whose waiter is gone.
    RemoveCorrelation(RequestId),
    /// Shutdown the connection.
    Shutdown,
}

// ============================================================================
// PendingGuard
// ============================================================================

/// Removes a correlation entry when its waiter goes away unanswered.
///
/// Fires on the local timeout and when the caller drops the send future
/// (an outer timeout or a cancellation), so the entry never outlives the
/// waiter.
struct PendingGuard<'a> {
    command_tx: &'a mpsc::UnboundedSender<ConnectionCommand>,
    request_id: RequestId,
    armed: bool,
}

impl<'a> PendingGuard<'a> {
    fn new(command_tx: &'a mpsc::UnboundedSender<ConnectionCommand>, request_id: RequestId) -> Self {
        Self {
            command_tx,
            request_id,
            armed: true,
        }
    }

    /// The answer arrived; the event loop already removed the entry.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self
                .command_tx
                .send(ConnectionCommand::RemoveCorrelation(self.request_id));
        }
    }
}

// ============================================================================
// Connection
// ============================================================================

/// WebSocket connection to a remote end.
///
/// Handles request/response correlation. The connection spawns an internal
/// event loop task; clones share that task.
///
/// # Thread Safety
///
/// `Connection` is `Send + Sync` and can be shared across tasks.
#[derive(Clone)]
pub struct Connection {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    /// Correlation map (shared with event loop).
    correlation: Arc<Mutex<CorrelationMap>>,
    /// Timeout used when the caller supplies none.
    command_timeout: Duration,
}

impl Connection {
    /// Dials the remote end and starts the event loop.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if the handshake does not finish within 30s
    /// - [`Error::WebSocket`] if the handshake fails
    pub async fn connect(url: &Url, command_timeout: Duration) -> Result<Self> {
        debug!(url = %url, "Connecting to remote end");

        let (ws_stream, _) = timeout(CONNECT_TIMEOUT, connect_async(url.as_str()))
            .await
            .map_err(|_| Error::connection_timeout(CONNECT_TIMEOUT.as_millis() as u64))??;

        info!(url = %url, "WebSocket connection established");

        Ok(Self::from_stream(ws_stream, command_timeout))
    }

    /// Wraps an established WebSocket stream.
    ///
    /// Spawns the event loop task internally.
    pub(crate) fn from_stream(ws_stream: WsStream, command_timeout: Duration) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let correlation = Arc::new(Mutex::new(CorrelationMap::default()));

        tokio::spawn(Self::run_event_loop(
            ws_stream,
            command_rx,
            Arc::clone(&correlation),
        ));

        Self {
            command_tx,
            correlation,
            command_timeout,
        }
    }

    /// Sends a request and waits for response with the configured timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if connection is closed
    /// - [`Error::RequestTimeout`] if response not received within timeout
    /// - [`Error::Protocol`] if too many pending requests
    pub async fn send_request(&self, request: Request) -> Result<Response> {
        self.send_with_timeout(request, self.command_timeout).await
    }

    /// Sends a request and waits for response with custom timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if connection is closed
    /// - [`Error::RequestTimeout`] if response not received within timeout
    /// - [`Error::Protocol`] if too many pending requests
    pub async fn send_with_timeout(
        &self,
        request: Request,
        request_timeout: Duration,
    ) -> Result<Response> {
        let request_id = request.id;

        {
            let correlation = self.correlation.lock();
            if correlation.len() >= MAX_PENDING_REQUESTS {
                warn!(
                    pending = correlation.len(),
                    max = MAX_PENDING_REQUESTS,
                    "Too many pending requests"
                );
                return Err(Error::protocol(format!(
                    "Too many pending requests: {}/{}",
                    correlation.len(),
                    MAX_PENDING_REQUESTS
                )));
            }
        }

        let (response_tx, response_rx) = oneshot::channel();

        self.command_tx
            .send(ConnectionCommand::Send {
                request,
                response_tx,
            })
            .map_err(|_| Error::ConnectionClosed)?;

        let guard = PendingGuard::new(&self.command_tx, request_id);

        match timeout(request_timeout, response_rx).await {
            Ok(Ok(result)) => {
                guard.disarm();
                result
            }
            Ok(Err(_)) => {
                guard.disarm();
                Err(Error::ConnectionClosed)
            }
            Err(_) => Err(Error::request_timeout(
                request_id,
                request_timeout.as_millis() as u64,
            )),
        }
    }

    /// Shuts down the connection.
    ///
    /// Pending requests fail with [`Error::ConnectionClosed`].
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop(
        ws_stream: WsStream,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        correlation: Arc<Mutex<CorrelationMap>>,
    ) {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            Self::handle_incoming_message(&text, &correlation);
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!("WebSocket closed by remote");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Binary, Ping, Pong
                        _ => {}
                    }
                }

                command = command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send { request, response_tx }) => {
                            Self::handle_send_command(
                                request,
                                response_tx,
                                &mut ws_write,
                                &correlation,
                            ).await;
                        }

                        Some(ConnectionCommand::RemoveCorrelation(request_id)) => {
                            if correlation.lock().remove(&request_id).is_some() {
                                debug!(%request_id, "Removed abandoned correlation");
                            }
                        }

                        Some(ConnectionCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        Self::fail_pending_requests(&correlation);

        debug!("Event loop terminated");
    }

    /// Handles an incoming text message from the remote end.
    fn handle_incoming_message(text: &str, correlation: &Arc<Mutex<CorrelationMap>>) {
        trace!(len = text.len(), "Message received");

        match from_str::<Response>(text) {
            Ok(response) => {
                let tx = correlation.lock().remove(&response.id);

                if let Some(tx) = tx {
                    let _ = tx.send(Ok(response));
                } else {
                    debug!(id = %response.id, "Discarding late or unknown response");
                }
            }
            Err(e) => {
                warn!(error = %e, text = %text, "Failed to parse incoming message");
            }
        }
    }

    /// Handles a send command from the Rust API.
    async fn handle_send_command(
        request: Request,
        response_tx: oneshot::Sender<Result<Response>>,
        ws_write: &mut SplitSink<WsStream, Message>,
        correlation: &Arc<Mutex<CorrelationMap>>,
    ) {
        let request_id = request.id;

        let json = match to_string(&request) {
            Ok(j) => j,
            Err(e) => {
                let _ = response_tx.send(Err(Error::Json(e)));
                return;
            }
        };

        // Register before sending so a fast response always finds its waiter
        correlation.lock().insert(request_id, response_tx);

        if let Err(e) = ws_write.send(Message::Text(json.into())).await {
            if let Some(tx) = correlation.lock().remove(&request_id) {
                let _ = tx.send(Err(Error::connection(e.to_string())));
            }
            return;
        }

        trace!(%request_id, "Request sent");
    }

    /// Fails all pending requests with ConnectionClosed error.
    fn fail_pending_requests(correlation: &Arc<Mutex<CorrelationMap>>) {
        let pending: Vec<_> = correlation.lock().drain().collect();
        let count = pending.len();

        for (_, tx) in pending {
            let _ = tx.send(Err(Error::ConnectionClosed));
        }

        if count > 0 {
            debug!(count, "Failed pending requests on shutdown");
        }
    }
}

// ============================================================================
// Connection - Transport
// ============================================================================

#[async_trait]
impl Transport for Connection {
    async fn send(&self, command: Command, timeout: Option<Duration>) -> Result<Value> {
        let request = Request::new(command);
        let response = match timeout {
            Some(limit) => self.send_with_timeout(request, limit).await?,
            None => self.send_request(request).await?,
        };
        response.into_result()
    }

    async fn close(&self) -> Result<()> {
        self.shutdown();
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_COMMAND_TIMEOUT.as_secs(), 30);
        assert_eq!(MAX_PENDING_REQUESTS, 100);
        assert_eq!(CONNECT_TIMEOUT.as_secs(), 30);
    }

    #[test]
    fn test_connection_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Connection>();
    }

    #[tokio::test]
    async fn test_unknown_response_is_ignored() {
        let correlation = Arc::new(Mutex::new(CorrelationMap::default()));
        let text = format!(
            r#"{{"id":"{}","type":"success","result":null}}"#,
            RequestId::generate()
        );

        Connection::handle_incoming_message(&text, &correlation);
        assert!(correlation.lock().is_empty());
    }

    #[tokio::test]
    async fn test_response_resolves_waiter() {
        let correlation = Arc::new(Mutex::new(CorrelationMap::default()));
        let id = RequestId::generate();
        let (tx, rx) = oneshot::channel();
        correlation.lock().insert(id, tx);

        let text = format!(r#"{{"id":"{id}","type":"success","result":"ok"}}"#);
        Connection::handle_incoming_message(&text, &correlation);

        let response = rx.await.expect("sent").expect("ok");
        assert_eq!(response.into_result().expect("success"), "ok");
        assert!(correlation.lock().is_empty());
    }

    #[test]
    fn test_guard_removes_abandoned_entry() {
        let (command_tx, mut command_rx) = mpsc::unbounded_channel();
        let id = RequestId::generate();

        drop(PendingGuard::new(&command_tx, id));

        assert!(matches!(
            command_rx.try_recv(),
            Ok(ConnectionCommand::RemoveCorrelation(removed)) if removed == id
        ));
    }

    #[test]
    fn test_disarmed_guard_sends_nothing() {
        let (command_tx, mut command_rx) = mpsc::unbounded_channel();

        PendingGuard::new(&command_tx, RequestId::generate()).disarm();

        assert!(command_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dropped_send_future_removes_entry() {
        let (command_tx, mut command_rx) = mpsc::unbounded_channel();
        let connection = Connection {
            command_tx,
            correlation: Arc::new(Mutex::new(CorrelationMap::default())),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        };
        let request = Request::new(Command::BrowsingContext(
            crate::protocol::BrowsingContextCommand::GetTitle,
        ));
        let id = request.id;

        let outcome = timeout(
            Duration::from_millis(10),
            connection.send_with_timeout(request, Duration::from_secs(5)),
        )
        .await;
        assert!(outcome.is_err());

        assert!(matches!(
            command_rx.try_recv(),
            Ok(ConnectionCommand::Send { request, .. }) if request.id == id
        ));
        assert!(matches!(
            command_rx.try_recv(),
            Ok(ConnectionCommand::RemoveCorrelation(removed)) if removed == id
        ));
    }

    #[tokio::test]
    async fn test_fail_pending_requests() {
        let correlation = Arc::new(Mutex::new(CorrelationMap::default()));
        let (tx, rx) = oneshot::channel();
        correlation.lock().insert(RequestId::generate(), tx);

        Connection::fail_pending_requests(&correlation);

        let result = rx.await.expect("sent");
        assert!(matches!(result, Err(Error::ConnectionClosed)));
    }
}
