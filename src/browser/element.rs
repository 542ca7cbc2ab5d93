//! DOM element interaction.
//!
//! An [`Element`] is an opaque remote id plus a back-reference to the
//! session it was found through. The back-reference does not keep the
//! session alive; once every [`Session`] handle is dropped, element
//! commands fail with [`Error::SessionClosed`].
//!
//! # Example
//!
//! ```ignore
//! use remote_webdriver::{By, Key, SearchContext};
//!
//! let element = session.find_element(By::css("#submit-button")).await?;
//!
//! // Get properties
//! let text = element.text().await?;
//! let href = element.attribute("href").await?;
//!
//! // Interact
//! element.click().await?;
//! element.send_keys("Hello, World!").await?;
//! element.press(Key::Enter).await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64Standard;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result, STALE_ELEMENT_REFERENCE};
use crate::identifiers::ElementId;
use crate::protocol::{Command, ElementCommand, reference};

use super::keyboard::Key;
use super::search::SearchContext;
use super::session::{Session, SessionInner};
use super::session::navigation::expect_string;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for an element.
pub(crate) struct ElementInner {
    /// This element's remote ID.
    pub id: ElementId,

    /// Session the element was found through.
    pub session: Weak<SessionInner>,
}

/// Element position and size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ElementRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

// ============================================================================
// ElementReference
// ============================================================================

/// Anything that names a remote element.
///
/// Script arguments accept any implementor and send it as a wire reference.
pub trait ElementReference {
    /// Returns the remote element id.
    fn element_id(&self) -> &ElementId;

    /// Encodes the id as a wire reference carrying both element keys.
    fn to_wire(&self) -> Value {
        reference::encode(self.element_id())
    }
}

impl ElementReference for ElementId {
    fn element_id(&self) -> &ElementId {
        self
    }
}

// ============================================================================
// Element
// ============================================================================

/// A handle to a DOM element.
///
/// Two handles are equal when their ids are equal.
#[derive(Clone)]
pub struct Element {
    /// Shared inner state.
    pub(crate) inner: Arc<ElementInner>,
}

// ============================================================================
// Element - Traits
// ============================================================================

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.inner.id)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl ElementReference for Element {
    fn element_id(&self) -> &ElementId {
        &self.inner.id
    }
}

// ============================================================================
// Element - Constructor
// ============================================================================

impl Element {
    /// Creates a new element handle bound to `session`.
    pub(crate) fn new(id: ElementId, session: &Session) -> Self {
        Self {
            inner: Arc::new(ElementInner {
                id,
                session: session.downgrade(),
            }),
        }
    }
}

// ============================================================================
// Element - Accessors
// ============================================================================

impl Element {
    /// Returns this element's ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ElementId {
        &self.inner.id
    }

    /// Returns the owning session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`] if the session has been dropped.
    pub fn session(&self) -> Result<Session> {
        Session::upgrade(&self.inner.session)
    }
}

// ============================================================================
// Element - Actions
// ============================================================================

impl Element {
    /// Clicks the element.
    pub async fn click(&self) -> Result<()> {
        debug!(element_id = %self.inner.id, "Clicking element");
        self.send(ElementCommand::Click {
            element_id: self.inner.id.clone(),
        })
        .await?;
        Ok(())
    }

    /// Clears an editable element.
    pub async fn clear(&self) -> Result<()> {
        debug!(element_id = %self.inner.id, "Clearing element");
        self.send(ElementCommand::Clear {
            element_id: self.inner.id.clone(),
        })
        .await?;
        Ok(())
    }

    /// Sends a key sequence.
    ///
    /// Special keys are embedded as [`Key`] code points.
    pub async fn send_keys(&self, text: &str) -> Result<()> {
        debug!(element_id = %self.inner.id, text_len = text.len(), "Sending keys");
        self.send(ElementCommand::SendKeys {
            element_id: self.inner.id.clone(),
            text: text.to_string(),
        })
        .await?;
        Ok(())
    }

    /// Presses a single special key.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use remote_webdriver::Key;
    ///
    /// element.press(Key::Enter).await?;
    /// element.press(Key::Tab).await?;
    /// ```
    pub async fn press(&self, key: Key) -> Result<()> {
        self.send_keys(&key.to_string()).await
    }
}

// ============================================================================
// Element - Properties
// ============================================================================

impl Element {
    /// Returns the rendered text.
    pub async fn text(&self) -> Result<String> {
        let value = self
            .send(ElementCommand::GetText {
                element_id: self.inner.id.clone(),
            })
            .await?;
        expect_string(value, "text")
    }

    /// Returns the tag name.
    pub async fn tag_name(&self) -> Result<String> {
        let value = self
            .send(ElementCommand::GetTagName {
                element_id: self.inner.id.clone(),
            })
            .await?;
        expect_string(value, "tag name")
    }

    /// Returns an attribute value, or `None` if the attribute is absent.
    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        let value = self
            .send(ElementCommand::GetAttribute {
                element_id: self.inner.id.clone(),
                name: name.to_string(),
            })
            .await?;

        Ok(match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }

    /// Returns a DOM property value.
    pub async fn property(&self, name: &str) -> Result<Value> {
        self.send(ElementCommand::GetProperty {
            element_id: self.inner.id.clone(),
            name: name.to_string(),
        })
        .await
    }

    /// Returns a computed CSS value.
    pub async fn css_value(&self, property: &str) -> Result<String> {
        let value = self
            .send(ElementCommand::GetCssValue {
                element_id: self.inner.id.clone(),
                property: property.to_string(),
            })
            .await?;
        expect_string(value, "css value")
    }

    /// Returns the bounding rectangle.
    pub async fn rect(&self) -> Result<ElementRect> {
        let value = self
            .send(ElementCommand::GetRect {
                element_id: self.inner.id.clone(),
            })
            .await?;
        serde_json::from_value(value).map_err(|e| Error::protocol(format!("Invalid rect: {e}")))
    }
}

// ============================================================================
// Element - State
// ============================================================================

impl Element {
    /// Checks if the element is displayed.
    pub async fn is_displayed(&self) -> Result<bool> {
        self.send_flag(ElementCommand::IsDisplayed {
            element_id: self.inner.id.clone(),
        })
        .await
    }

    /// Checks if the element is enabled.
    pub async fn is_enabled(&self) -> Result<bool> {
        self.send_flag(ElementCommand::IsEnabled {
            element_id: self.inner.id.clone(),
        })
        .await
    }

    /// Checks if the element is selected or checked.
    pub async fn is_selected(&self) -> Result<bool> {
        self.send_flag(ElementCommand::IsSelected {
            element_id: self.inner.id.clone(),
        })
        .await
    }
}

// ============================================================================
// Element - Screenshot
// ============================================================================

impl Element {
    /// Captures a PNG screenshot of the element as base64.
    pub async fn screenshot(&self) -> Result<String> {
        debug!(element_id = %self.inner.id, "Capturing element screenshot");
        let value = self
            .send(ElementCommand::Screenshot {
                element_id: self.inner.id.clone(),
            })
            .await?;
        expect_string(value, "screenshot")
    }

    /// Captures a PNG screenshot and returns raw bytes.
    pub async fn screenshot_bytes(&self) -> Result<Vec<u8>> {
        let base64_data = self.screenshot().await?;
        Base64Standard
            .decode(&base64_data)
            .map_err(|e| Error::protocol(format!("Failed to decode base64: {e}")))
    }
}

// ============================================================================
// Element - SearchContext
// ============================================================================

#[async_trait]
impl SearchContext for Element {
    fn session(&self) -> Result<Session> {
        Element::session(self)
    }

    fn scope(&self) -> Option<&ElementId> {
        Some(&self.inner.id)
    }
}

// ============================================================================
// Element - Internal
// ============================================================================

impl Element {
    /// Sends an element command, reporting stale references.
    async fn send(&self, command: ElementCommand) -> Result<Value> {
        let session = self.session()?;

        match session.send(Command::Element(command)).await {
            Err(e) if e.remote_code() == Some(STALE_ELEMENT_REFERENCE) => {
                debug!(element_id = %self.inner.id, "Element is stale");
                Err(Error::stale_element(self.inner.id.clone()))
            }
            other => other,
        }
    }

    /// Sends an element command expecting a boolean.
    async fn send_flag(&self, command: ElementCommand) -> Result<bool> {
        match self.send(command).await? {
            Value::Bool(b) => Ok(b),
            other => Err(Error::protocol(format!("Expected boolean, got {other}"))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
