//! Remote browser session.
//!
//! A [`Session`] is the root search context and the owner of the transport.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Session struct and command dispatch |
//! | `navigation` | URL navigation, history, document queries |
//! | `frames` | Frame switching |
//! | `script` | JavaScript execution |
//! | `elements` | Document-root element search |
//!
//! # Example
//!
//! ```ignore
//! use remote_webdriver::{By, SearchContext, Session};
//!
//! let session = Session::builder()
//!     .endpoint("ws://127.0.0.1:4444/session")
//!     .connect()
//!     .await?;
//!
//! session.goto("https://example.com").await?;
//! let button = session.find_element(By::id("submit")).await?;
//! button.click().await?;
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod core;
mod elements;
mod frames;
pub(crate) mod navigation;
mod script;

// ============================================================================
// Re-exports
// ============================================================================

pub(crate) use core::{Bounds, SessionInner};
pub use core::Session;
pub use frames::FrameTarget;
pub use script::ScriptCall;
