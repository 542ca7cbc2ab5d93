//! Session navigation and document queries.

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::{BrowsingContextCommand, Command};

use super::Session;

// ============================================================================
// Session - Navigation
// ============================================================================

impl Session {
    /// Navigates to a URL.
    ///
    /// # Errors
    ///
    /// Returns an error if navigation fails.
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!(url = %url, "Navigating");

        let command = Command::BrowsingContext(BrowsingContextCommand::Navigate {
            url: url.to_string(),
        });

        self.send(command).await?;
        Ok(())
    }

    /// Navigates back in history.
    pub async fn back(&self) -> Result<()> {
        debug!("Navigating back");
        self.send(Command::BrowsingContext(BrowsingContextCommand::Back))
            .await?;
        Ok(())
    }

    /// Navigates forward in history.
    pub async fn forward(&self) -> Result<()> {
        debug!("Navigating forward");
        self.send(Command::BrowsingContext(BrowsingContextCommand::Forward))
            .await?;
        Ok(())
    }

    /// Reloads the current page.
    pub async fn refresh(&self) -> Result<()> {
        debug!("Reloading page");
        self.send(Command::BrowsingContext(BrowsingContextCommand::Refresh))
            .await?;
        Ok(())
    }
}

// ============================================================================
// Session - Document
// ============================================================================

impl Session {
    /// Returns the page title.
    pub async fn title(&self) -> Result<String> {
        let value = self
            .send(Command::BrowsingContext(BrowsingContextCommand::GetTitle))
            .await?;
        expect_string(value, "title")
    }

    /// Returns the current URL.
    pub async fn current_url(&self) -> Result<String> {
        let value = self
            .send(Command::BrowsingContext(BrowsingContextCommand::GetUrl))
            .await?;
        expect_string(value, "url")
    }

    /// Returns the serialized page source.
    pub async fn page_source(&self) -> Result<String> {
        let value = self
            .send(Command::BrowsingContext(
                BrowsingContextCommand::GetPageSource,
            ))
            .await?;
        expect_string(value, "page source")
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Extracts a string result, treating `null` as empty.
pub(crate) fn expect_string(value: Value, what: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => Err(Error::protocol(format!(
            "Expected {what} to be a string, got {other}"
        ))),
    }
}

// ============================================================================
// Tests
// ============================================================================
