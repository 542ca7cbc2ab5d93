//! Builder pattern for session configuration.
//!
//! Provides a fluent API for configuring and creating [`Session`] instances.
//!
//! # Example
//!
//! ```no_run
//! use remote_webdriver::{Dialect, Session};
//!
//! # async fn example() -> remote_webdriver::Result<()> {
//! let session = Session::builder()
//!     .endpoint("ws://127.0.0.1:4444/session")
//!     .dialect(Dialect::W3c)
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::browser::Session;
use crate::error::{Error, Result};
use crate::transport::{Connection, Transport};

use super::options::{Dialect, SessionConfig};

// ============================================================================
// SessionBuilder
// ============================================================================

/// Builder for configuring a [`Session`] instance.
///
/// Use [`Session::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct SessionBuilder {
    /// Remote end WebSocket URL.
    endpoint: Option<String>,
    /// Session options.
    config: SessionConfig,
}

// ============================================================================
// SessionBuilder Implementation
// ============================================================================

impl SessionBuilder {
    /// Creates a new builder with default options and no endpoint.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the remote end URL (`ws://`).
    #[inline]
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Sets the protocol dialect.
    #[inline]
    #[must_use]
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = dialect;
        self
    }

    /// Sets the default command timeout.
    #[inline]
    #[must_use]
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.config.command_timeout = timeout;
        self
    }

    /// Replaces all options at once.
    #[inline]
    #[must_use]
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Connects to the endpoint and creates the session.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the endpoint is missing or not a `ws://` URL
    /// - [`Error::ConnectionTimeout`] if the handshake does not complete
    /// - [`Error::Connection`] if the connection is refused
    pub async fn connect(self) -> Result<Session> {
        let endpoint = self.validate_endpoint()?;
        let connection = Connection::connect(&endpoint, self.config.command_timeout).await?;

        debug!(endpoint = %endpoint, dialect = ?self.config.dialect, "Session connected");

        Ok(Session::new(Arc::new(connection), self.config))
    }

    /// Creates the session over an existing transport.
    ///
    /// The endpoint, if set, is ignored.
    #[must_use]
    pub fn build_with(self, transport: Arc<dyn Transport>) -> Session {
        Session::new(transport, self.config)
    }
}

// ============================================================================
// Validation
// ============================================================================

impl SessionBuilder {
    /// Validates the endpoint configuration.
    fn validate_endpoint(&self) -> Result<Url> {
        let raw = self.endpoint.as_deref().ok_or_else(|| {
            Error::config(
                "Endpoint is required. Use .endpoint() to set it.\n\
                 Example: Session::builder().endpoint(\"ws://127.0.0.1:4444/session\")",
            )
        })?;

        let url = Url::parse(raw)
            .map_err(|e| Error::config(format!("Invalid endpoint URL {raw:?}: {e}")))?;

        match url.scheme() {
            "ws" => Ok(url),
            "wss" => Err(Error::config(format!(
                "TLS endpoints are not supported: {raw}; use a ws:// endpoint"
            ))),
            scheme => Err(Error::config(format!(
                "Unsupported endpoint scheme {scheme:?}; expected ws"
            ))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::transport::testing::RecordingTransport;

    #[test]
    fn test_new_creates_empty_builder() {
        let builder = SessionBuilder::new();
        assert!(builder.endpoint.is_none());
        assert_eq!(builder.config, SessionConfig::default());
    }

    #[test]
    fn test_setters() {
        let builder = SessionBuilder::new()
            .endpoint("ws://localhost:4444")
            .dialect(Dialect::Legacy)
            .command_timeout(Duration::from_millis(1500));

        assert_eq!(builder.endpoint.as_deref(), Some("ws://localhost:4444"));
        assert_eq!(builder.config.dialect, Dialect::Legacy);
        assert_eq!(builder.config.command_timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_validate_requires_endpoint() {
        let err = SessionBuilder::new().validate_endpoint().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("Endpoint"));
    }

    #[test]
    fn test_validate_rejects_http_scheme() {
        let err = SessionBuilder::new()
            .endpoint("http://localhost:4444")
            .validate_endpoint()
            .unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let err = SessionBuilder::new()
            .endpoint("not a url")
            .validate_endpoint()
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_validate_accepts_ws() {
        let raw = "ws://127.0.0.1:4444/session";
        let url = SessionBuilder::new().endpoint(raw).validate_endpoint().expect("valid");
        assert_eq!(url.as_str(), raw);
    }

    #[test]
    fn test_wss_rejected_before_dialing() {
        let err = tokio_test::assert_err!(tokio_test::block_on(
            SessionBuilder::new()
                .endpoint("wss://grid.local/session")
                .connect()
        ));
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("TLS"));
    }

    #[test]
    fn test_connect_without_endpoint_fails() {
        let err = tokio_test::assert_err!(tokio_test::block_on(SessionBuilder::new().connect()));
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_build_with_transport_keeps_dialect() {
        let session = SessionBuilder::new()
            .dialect(Dialect::Legacy)
            .build_with(Arc::new(RecordingTransport::new()));
        assert_eq!(session.dialect(), Dialect::Legacy);
    }
}
