//! Session configuration.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SessionBuilder`] | Fluent configuration builder |
//! | [`SessionConfig`] | Session-wide options |
//! | [`Dialect`] | Protocol dialect of the remote end |

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for session configuration.
pub mod builder;

/// Session options and protocol dialect.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::SessionBuilder;
pub use options::{Dialect, SessionConfig};
