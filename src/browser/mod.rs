//! Browser entities module.
//!
//! This module provides the core browser automation types:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Session`] | Remote session, root search context |
//! | [`Element`] | DOM element reference, scoped search context |
//! | [`By`] | Element locator |
//! | [`Query`] | Locator plus lookup options |
//! | [`ScriptArg`] / [`ScriptValue`] | Script arguments and results |
//!
//! # Example
//!
//! ```no_run
//! use remote_webdriver::{By, Result, SearchContext, Session};
//!
//! # async fn example() -> Result<()> {
//! let session = Session::builder()
//!     .endpoint("ws://127.0.0.1:4444/session")
//!     .connect()
//!     .await?;
//!
//! session.goto("https://example.com").await?;
//! let heading = session.find_element(By::tag_name("h1")).await?;
//! let text = heading.text().await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// DOM element interaction.
pub mod element;

/// Keyboard key definitions.
pub mod keyboard;

/// Script argument encoding and result decoding.
pub mod marshal;

/// Element lookup through a search context.
pub mod search;

/// Element locator strategies.
pub mod selector;

/// Remote browser session.
pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

pub use element::{Element, ElementRect, ElementReference};
pub use keyboard::Key;
pub use marshal::{ScriptArg, ScriptValue, decode_result, encode_args};
pub use search::{Query, SearchContext};
pub use selector::{By, Mechanism, WireLocator, css_escape};
pub use session::{FrameTarget, ScriptCall, Session};
