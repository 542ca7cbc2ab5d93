//! Command definitions organized by module.
//!
//! Commands follow the `module.methodName` naming.
//!
//! # Command Modules
//!
//! | Module | Commands |
//! |--------|----------|
//! | `browsingContext` | Navigation, document queries, frames |
//! | `element` | Lookup and element commands |
//! | `script` | JavaScript execution |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifiers::ElementId;

// ============================================================================
// Command Wrapper
// ============================================================================

/// All protocol commands organized by module.
///
/// This enum wraps module-specific command enums for unified serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// BrowsingContext module commands.
    BrowsingContext(BrowsingContextCommand),
    /// Element module commands.
    Element(ElementCommand),
    /// Script module commands.
    Script(ScriptCommand),
}

// ============================================================================
// BrowsingContext Commands
// ============================================================================

/// BrowsingContext module commands for navigation and frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum BrowsingContextCommand {
    /// Navigate to URL.
    #[serde(rename = "browsingContext.navigate")]
    Navigate {
        /// URL to navigate to.
        url: String,
    },

    /// Navigate back in history.
    #[serde(rename = "browsingContext.back")]
    Back,

    /// Navigate forward in history.
    #[serde(rename = "browsingContext.forward")]
    Forward,

    /// Reload current page.
    #[serde(rename = "browsingContext.refresh")]
    Refresh,

    /// Get page title.
    #[serde(rename = "browsingContext.getTitle")]
    GetTitle,

    /// Get current URL.
    #[serde(rename = "browsingContext.getUrl")]
    GetUrl,

    /// Get serialized page source.
    #[serde(rename = "browsingContext.getPageSource")]
    GetPageSource,

    /// Switch to a frame.
    ///
    /// `id` is an encoded element reference, a frame index, or `null` for
    /// the top-level document.
    #[serde(rename = "browsingContext.switchToFrame")]
    SwitchToFrame {
        /// Frame target.
        id: Value,
    },

    /// Switch to parent frame.
    #[serde(rename = "browsingContext.switchToParentFrame")]
    SwitchToParentFrame,
}

// ============================================================================
// Element Commands
// ============================================================================

/// Element module commands for lookup and DOM interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum ElementCommand {
    /// Find a single element.
    #[serde(rename = "element.find", rename_all = "camelCase")]
    Find {
        /// Wire mechanism name (e.g. `"css selector"`).
        using: String,
        /// Mechanism value.
        value: String,
        /// Element to search under (document root when absent).
        #[serde(skip_serializing_if = "Option::is_none", default)]
        context_id: Option<ElementId>,
        /// Element id the match must not be.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        exclude_id: Option<ElementId>,
        /// Lookup bound in milliseconds.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        timeout: Option<u64>,
    },

    /// Find all matching elements.
    #[serde(rename = "element.findAll", rename_all = "camelCase")]
    FindAll {
        /// Wire mechanism name (e.g. `"css selector"`).
        using: String,
        /// Mechanism value.
        value: String,
        /// Element to search under (document root when absent).
        #[serde(skip_serializing_if = "Option::is_none", default)]
        context_id: Option<ElementId>,
        /// Element id excluded from the matches.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        exclude_id: Option<ElementId>,
        /// Lookup bound in milliseconds.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        timeout: Option<u64>,
    },

    /// Click the element.
    #[serde(rename = "element.click")]
    Click {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
    },

    /// Clear an editable element.
    #[serde(rename = "element.clear")]
    Clear {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
    },

    /// Send a key sequence to the element.
    #[serde(rename = "element.sendKeys")]
    SendKeys {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
        /// Text including special-key code points.
        text: String,
    },

    /// Get rendered text.
    #[serde(rename = "element.getText")]
    GetText {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
    },

    /// Get an attribute value.
    #[serde(rename = "element.getAttribute")]
    GetAttribute {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
        /// Attribute name.
        name: String,
    },

    /// Get a DOM property value.
    #[serde(rename = "element.getProperty")]
    GetProperty {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
        /// Property name.
        name: String,
    },

    /// Get a computed CSS value.
    #[serde(rename = "element.getCssValue")]
    GetCssValue {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
        /// CSS property name.
        property: String,
    },

    /// Get the tag name.
    #[serde(rename = "element.getTagName")]
    GetTagName {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
    },

    /// Get the bounding rectangle.
    #[serde(rename = "element.getRect")]
    GetRect {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
    },

    /// Check visibility.
    #[serde(rename = "element.isDisplayed")]
    IsDisplayed {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
    },

    /// Check enabled state.
    #[serde(rename = "element.isEnabled")]
    IsEnabled {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
    },

    /// Check selected/checked state.
    #[serde(rename = "element.isSelected")]
    IsSelected {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
    },

    /// Capture a PNG screenshot of the element.
    #[serde(rename = "element.screenshot")]
    Screenshot {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
    },
}

// ============================================================================
// Script Commands
// ============================================================================

/// Script module commands for JavaScript execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum ScriptCommand {
    /// Execute synchronous script.
    #[serde(rename = "script.execute")]
    Execute {
        /// JavaScript function body.
        script: String,
        /// Encoded script arguments.
        #[serde(default)]
        args: Vec<Value>,
    },

    /// Execute asynchronous script.
    #[serde(rename = "script.executeAsync")]
    ExecuteAsync {
        /// JavaScript function body.
        script: String,
        /// Encoded script arguments.
        #[serde(default)]
        args: Vec<Value>,
    },
}

// ============================================================================
// Tests
// ============================================================================
