//! Remote WebDriver - client binding for remote browser control.
//!
//! This library drives a browser through a remote end that speaks either
//! the W3C WebDriver dialect or the legacy JSON wire dialect.
//!
//! # Architecture
//!
//! The binding follows a client-server model:
//!
//! - **Local End (Rust)**: Builds commands, decodes results
//! - **Remote End**: Executes commands in the browser
//!
//! Key design principles:
//!
//! - One resolver serves every lookup; a [`Session`] searches the document,
//!   an [`Element`] searches its subtree
//! - Element references are decoded from either dialect and always encoded
//!   with both keys
//! - Locators are rewritten to CSS for W3C remote ends
//! - Protocol uses `module.methodName` format
//!
//! # Quick Start
//!
//! ```no_run
//! use remote_webdriver::{By, Result, SearchContext, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let session = Session::builder()
//!         .endpoint("ws://127.0.0.1:4444/session")
//!         .connect()
//!         .await?;
//!
//!     session.goto("https://example.com").await?;
//!     let links = session.find_elements(By::tag_name("a")).await?;
//!     println!("Found {} links", links.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`browser`] | Session, elements, locators, scripts |
//! | [`driver`] | Session configuration |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Wire message types and element reference codec |
//! | [`transport`] | Transport trait and WebSocket connection |

// ============================================================================
// Modules
// ============================================================================

/// Browser entities: Session, Element, locators, scripts.
pub mod browser;

/// Session configuration.
///
/// Use [`Session::builder()`] to create a configured session.
pub mod driver;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for remote entities.
pub mod identifiers;

/// Wire protocol message types.
pub mod protocol;

/// Transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Browser types
pub use browser::{
    By, Element, ElementRect, ElementReference, FrameTarget, Key, Mechanism, Query, ScriptArg,
    ScriptCall, ScriptValue, SearchContext, Session, WireLocator, css_escape, decode_result,
    encode_args,
};

// Driver types
pub use driver::{Dialect, SessionBuilder, SessionConfig};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ElementId, RequestId};

// Transport types
pub use transport::{Connection, Transport};
