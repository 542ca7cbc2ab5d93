//! Session options.
//!
//! Provides the typed configuration shared by every handle of a session:
//! the protocol dialect the remote end speaks and the default command
//! timeout.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use remote_webdriver::{Dialect, SessionConfig};
//!
//! let config = SessionConfig::new()
//!     .with_dialect(Dialect::Legacy)
//!     .with_command_timeout(Duration::from_secs(10));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::transport::connection::DEFAULT_COMMAND_TIMEOUT;

// ============================================================================
// Dialect
// ============================================================================

/// Protocol dialect spoken by the remote end.
///
/// Decides how id, name, class name and tag name lookups are sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Standards-compliant remote end; legacy mechanisms become CSS.
    #[default]
    W3c,
    /// Legacy remote end; mechanisms are sent as-is.
    Legacy,
}

impl Dialect {
    /// Returns `true` for the standards-compliant dialect.
    #[inline]
    #[must_use]
    pub const fn is_compliant(self) -> bool {
        matches!(self, Self::W3c)
    }
}

// ============================================================================
// SessionConfig
// ============================================================================

/// Session-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Dialect used to rewrite locators.
    pub dialect: Dialect,

    /// Default bound for a single command round trip.
    pub command_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfig {
    /// Creates a configuration with W3C dialect and the default timeout.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dialect: Dialect::W3c,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Sets the dialect.
    #[inline]
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets the default command timeout.
    #[inline]
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
