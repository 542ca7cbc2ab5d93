//! Transport layer.
//!
//! The resolver, codec and script marshaler only ever talk to a
//! [`Transport`]: something that accepts a [`Command`] and answers with the
//! decoded JSON result. How the command reaches the browser is not their
//! concern.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Session (Rust) │                              │  Remote end     │
//! │                 │         WebSocket            │  (browser       │
//! │  Connection     │─────────────────────────────►│   control       │
//! │  (event loop)   │◄─────────────────────────────│   endpoint)     │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket client connection and event loop |

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::protocol::Command;

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket client connection and event loop.
pub mod connection;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::Connection;

// ============================================================================
// Transport
// ============================================================================

/// Sends commands to a remote end.
///
/// Implementations own their synchronization; the session shares one
/// transport between all handles and never assumes exclusive access.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a command and returns its result value.
    ///
    /// `timeout` bounds the wait for the answer; `None` applies the
    /// transport's own default. A dropped call must not leave state behind.
    ///
    /// # Errors
    ///
    /// Connection failures, request timeouts and remote error responses.
    async fn send(&self, command: Command, timeout: Option<Duration>) -> Result<Value>;

    /// Closes the transport.
    ///
    /// The default implementation does nothing.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
