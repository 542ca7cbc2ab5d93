//! Frame switching methods.

use serde_json::Value;
use tracing::debug;

use crate::browser::Element;
use crate::error::Result;
use crate::protocol::{BrowsingContextCommand, Command, reference};

use super::Session;

// ============================================================================
// FrameTarget
// ============================================================================

/// Frame to switch the session into.
#[derive(Debug, Clone, Copy)]
pub enum FrameTarget<'a> {
    /// The top-level document.
    Top,
    /// Zero-based index among the current document's frames.
    Index(u16),
    /// An `<iframe>` or `<frame>` element.
    Element(&'a Element),
}

impl FrameTarget<'_> {
    /// Encodes the frame id sent on the wire.
    fn to_wire(self) -> Value {
        match self {
            Self::Top => Value::Null,
            Self::Index(index) => Value::from(index),
            Self::Element(element) => reference::encode(element.id()),
        }
    }
}

impl<'a> From<&'a Element> for FrameTarget<'a> {
    fn from(element: &'a Element) -> Self {
        Self::Element(element)
    }
}

impl From<u16> for FrameTarget<'_> {
    fn from(index: u16) -> Self {
        Self::Index(index)
    }
}

// ============================================================================
// Session - Frame Switching
// ============================================================================

impl Session {
    /// Switches the session into a frame.
    ///
    /// Later lookups through the session search the new frame's document.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let iframe = session.find_element(By::css("iframe#content")).await?;
    /// session.switch_to_frame(&iframe).await?;
    /// ```
    pub async fn switch_to_frame<'a>(&self, target: impl Into<FrameTarget<'a>>) -> Result<()> {
        let target = target.into();
        debug!(frame = ?target, "Switching to frame");

        let command = Command::BrowsingContext(BrowsingContextCommand::SwitchToFrame {
            id: target.to_wire(),
        });
        self.send(command).await?;
        Ok(())
    }

    /// Switches to the parent of the current frame.
    pub async fn switch_to_parent_frame(&self) -> Result<()> {
        debug!("Switching to parent frame");

        self.send(Command::BrowsingContext(
            BrowsingContextCommand::SwitchToParentFrame,
        ))
        .await?;
        Ok(())
    }

    /// Switches back to the top-level document.
    pub async fn switch_to_default_content(&self) -> Result<()> {
        self.switch_to_frame(FrameTarget::Top).await
    }
}

// ============================================================================
// Tests
// ============================================================================
