//! Error types for the WebDriver client.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use remote_webdriver::{By, Result, SearchContext};
//!
//! async fn example(session: &Session) -> Result<()> {
//!     let element = session.find_element(By::css("#submit")).await?;
//!     element.click().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Resolution | [`Error::ElementNotFound`], [`Error::InvalidSelector`], [`Error::StaleElement`] |
//! | Scripting | [`Error::InvalidArgument`] |
//! | Bounds | [`Error::Timeout`], [`Error::Cancelled`] |
//! | Transport | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::ConnectionClosed`], [`Error::RequestTimeout`], [`Error::Remote`], [`Error::Protocol`], [`Error::SessionClosed`] |
//! | External | [`Error::Json`], [`Error::WebSocket`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::{ElementId, RequestId};

// ============================================================================
// Remote Error Codes
// ============================================================================

/// Remote error code for a lookup that matched nothing.
pub const NO_SUCH_ELEMENT: &str = "no such element";

/// Remote error code for a reference to a node that no longer exists.
pub const STALE_ELEMENT_REFERENCE: &str = "stale element reference";

/// Remote error code for a selector the remote end cannot evaluate.
pub const INVALID_SELECTOR: &str = "invalid selector";

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Every throwing operation fails with exactly one variant.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when session configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Resolution Errors
    // ========================================================================
    /// Element lookup yielded no element.
    #[error("Element not found: {locator}")]
    ElementNotFound {
        /// Human-readable locator that was searched for.
        locator: String,
    },

    /// Locator cannot be expressed on the wire.
    ///
    /// Returned before any wire call, e.g. for a compound class name.
    #[error("Invalid selector: {message}")]
    InvalidSelector {
        /// Description of the rejected selector.
        message: String,
    },

    /// Element is stale (no longer in the DOM).
    #[error("Stale element: {element_id}")]
    StaleElement {
        /// The stale element's id.
        element_id: ElementId,
    },

    // ========================================================================
    // Scripting Errors
    // ========================================================================
    /// Script argument cannot be encoded for the wire.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description naming the offending value.
        message: String,
    },

    // ========================================================================
    // Bounds
    // ========================================================================
    /// Operation exceeded its timeout.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Cooperative cancellation fired before the operation completed.
    #[error("Cancelled: {operation}")]
    Cancelled {
        /// Description of the cancelled operation.
        operation: String,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// WebSocket connection failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Timed out while establishing the connection.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// WebSocket connection closed unexpectedly.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Command request timed out waiting for its response.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request id that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Error response reported by the remote end.
    #[error("Remote error ({code}): {message}")]
    Remote {
        /// Remote error code (e.g. `"no such element"`).
        code: String,
        /// Remote error message.
        message: String,
    },

    /// Protocol violation or unexpected response shape.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// The session owning a handle has been dropped.
    #[error("Session closed")]
    SessionClosed,

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an element not found error.
    #[inline]
    pub fn element_not_found(locator: impl Into<String>) -> Self {
        Self::ElementNotFound {
            locator: locator.into(),
        }
    }

    /// Creates an invalid selector error.
    #[inline]
    pub fn invalid_selector(message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            message: message.into(),
        }
    }

    /// Creates a stale element error.
    #[inline]
    pub fn stale_element(element_id: ElementId) -> Self {
        Self::StaleElement { element_id }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates a cancellation error.
    #[inline]
    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms,
        }
    }

    /// Creates a remote error from an error response.
    #[inline]
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns the remote error code, if this is a remote error.
    #[inline]
    #[must_use]
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            Self::Remote { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout { .. } | Self::Timeout { .. } | Self::RequestTimeout { .. }
        )
    }

    /// Returns `true` if this error came from cooperative cancellation.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Returns `true` if this is an element error.
    #[inline]
    #[must_use]
    pub fn is_element_error(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::StaleElement { .. } | Self::InvalidSelector { .. }
        )
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionTimeout { .. }
                | Self::ConnectionClosed
                | Self::SessionClosed
                | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors may succeed when the caller retries.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. }
                | Self::ConnectionTimeout { .. }
                | Self::Timeout { .. }
                | Self::RequestTimeout { .. }
                | Self::StaleElement { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "Connection failed: failed to connect");
    }

    #[test]
    fn test_element_not_found_display() {
        let err = Error::element_not_found("By.Id: login");
        assert_eq!(err.to_string(), "Element not found: By.Id: login");
    }

    #[test]
    fn test_remote_display_and_code() {
        let err = Error::remote(NO_SUCH_ELEMENT, "nothing matched");
        assert_eq!(err.to_string(), "Remote error (no such element): nothing matched");
        assert_eq!(err.remote_code(), Some(NO_SUCH_ELEMENT));
        assert_eq!(Error::ConnectionClosed.remote_code(), None);
    }

    #[test]
    fn test_is_timeout() {
        let timeout_err = Error::timeout("find", 500);
        let cancelled = Error::cancelled("find");

        assert!(timeout_err.is_timeout());
        assert!(!cancelled.is_timeout());
        assert!(cancelled.is_cancelled());
    }

    #[test]
    fn test_is_element_error() {
        assert!(Error::element_not_found("x").is_element_error());
        assert!(Error::invalid_selector("x").is_element_error());
        assert!(Error::stale_element(ElementId::new("a")).is_element_error());
        assert!(!Error::invalid_argument("x").is_element_error());
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::connection("test").is_connection_error());
        assert!(Error::ConnectionClosed.is_connection_error());
        assert!(Error::SessionClosed.is_connection_error());
        assert!(!Error::config("test").is_connection_error());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::timeout("test", 1000).is_recoverable());
        assert!(!Error::config("test").is_recoverable());
        assert!(!Error::cancelled("test").is_recoverable());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
