//! Document-root element search.

use async_trait::async_trait;

use crate::browser::search::SearchContext;
use crate::error::Result;
use crate::identifiers::ElementId;

use super::Session;

// ============================================================================
// Session - SearchContext
// ============================================================================

#[async_trait]
impl SearchContext for Session {
    fn session(&self) -> Result<Session> {
        Ok(self.clone())
    }

    fn scope(&self) -> Option<&ElementId> {
        None
    }
}
