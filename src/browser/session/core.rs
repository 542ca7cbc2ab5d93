//! Core Session struct and command dispatch.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::driver::{Dialect, SessionBuilder, SessionConfig};
use crate::error::{Error, Result};
use crate::protocol::Command;
use crate::transport::Transport;

// ============================================================================
// Types
// ============================================================================

/// Per-call limits layered over the session command timeout.
#[derive(Debug, Clone, Default)]
pub(crate) struct Bounds {
    /// Overrides the session command timeout when set.
    pub timeout: Option<Duration>,
    /// Aborts the call when fired.
    pub cancel: Option<CancellationToken>,
}

/// Internal shared state for a session.
pub(crate) struct SessionInner {
    /// Command transport.
    pub transport: Arc<dyn Transport>,
    /// Session options.
    pub config: SessionConfig,
}

// ============================================================================
// Session
// ============================================================================

/// A handle to a remote browser session.
///
/// The session is the root search context: lookups through it search the
/// whole document. Cloning is cheap and all clones share the transport.
#[derive(Clone)]
pub struct Session {
    pub(crate) inner: Arc<SessionInner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("dialect", &self.inner.config.dialect)
            .field("command_timeout", &self.inner.config.command_timeout)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session over a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: SessionConfig) -> Self {
        Self {
            inner: Arc::new(SessionInner { transport, config }),
        }
    }

    /// Returns a new session builder.
    #[inline]
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Rebuilds a handle from a back-reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`] once every session handle is gone.
    pub(crate) fn upgrade(weak: &Weak<SessionInner>) -> Result<Self> {
        weak.upgrade()
            .map(|inner| Self { inner })
            .ok_or(Error::SessionClosed)
    }

    /// Returns a non-owning back-reference.
    #[inline]
    pub(crate) fn downgrade(&self) -> Weak<SessionInner> {
        Arc::downgrade(&self.inner)
    }
}

// ============================================================================
// Session - Accessors
// ============================================================================

impl Session {
    /// Returns the protocol dialect.
    #[inline]
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.inner.config.dialect
    }

    /// Returns the session options.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }
}

// ============================================================================
// Session - Internal
// ============================================================================

impl Session {
    /// Sends a command bounded by the session command timeout.
    pub(crate) async fn send(&self, command: Command) -> Result<Value> {
        self.send_bounded(command, "command", &Bounds::default())
            .await
    }

    /// Sends a command bounded by `bounds`.
    ///
    /// Whichever of completion, timeout or cancellation comes first wins.
    /// The effective limit is passed down to the transport. Expiry of an
    /// explicit timeout is reported as [`Error::Timeout`]; expiry of the
    /// session command timeout stays [`Error::RequestTimeout`].
    pub(crate) async fn send_bounded(
        &self,
        command: Command,
        operation: &str,
        bounds: &Bounds,
    ) -> Result<Value> {
        let transport = &self.inner.transport;
        let explicit = bounds.timeout.is_some();
        let limit = bounds.timeout.unwrap_or(self.inner.config.command_timeout);

        let call = async move {
            let sent = transport.send(command, Some(limit));
            if !explicit {
                return sent.await;
            }

            match tokio::time::timeout(limit, sent).await {
                Ok(Err(Error::RequestTimeout { .. })) | Err(_) => {
                    let timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                    debug!(operation, timeout_ms, "Command timed out");
                    Err(Error::timeout(operation, timeout_ms))
                }
                Ok(result) => result,
            }
        };

        match &bounds.cancel {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!(operation, "Command cancelled");
                    Err(Error::cancelled(operation))
                }
                result = call => result,
            },
            None => call.await,
        }
    }

    /// Closes the underlying transport.
    ///
    /// # Errors
    ///
    /// Propagates transport close failures.
    pub async fn close(&self) -> Result<()> {
        debug!("Closing session");
        self.inner.transport.close().await
    }
}

// ============================================================================
// Tests
// ============================================================================
