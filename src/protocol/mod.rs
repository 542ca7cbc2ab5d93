//! Wire protocol message types.
//!
//! This module defines the messages exchanged between the local end (this
//! crate) and the remote end, and the element reference codec.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Request` | Local → Remote | Command request |
//! | `Response` | Remote → Local | Command response |
//!
//! # Command Naming
//!
//! Commands follow `module.methodName` format:
//!
//! - `browsingContext.navigate`
//! - `element.find`
//! - `script.execute`
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Command definitions by domain |
//! | `reference` | Element reference encoding and decoding |
//! | `request` | Request and Response types |

// ============================================================================
// Submodules
// ============================================================================

/// Command definitions organized by module.
pub mod command;

/// Element reference codec.
pub mod reference;

/// Request and Response message types.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{BrowsingContextCommand, Command, ElementCommand, ScriptCommand};
pub use reference::{LEGACY_ELEMENT_KEY, Reference, W3C_ELEMENT_KEY};
pub use request::{Request, Response, ResponseType};
