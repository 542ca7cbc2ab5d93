//! Element lookup.
//!
//! Every lookup, whether from the session (document root) or from an
//! element (its subtree), goes through the same resolver:
//!
//! 1. Rewrite the locator for the session [`Dialect`](crate::Dialect).
//! 2. Short-circuit when the rewritten selector is empty.
//! 3. Send `element.find` / `element.findAll`, bounded by the query timeout
//!    and cancellation token.
//! 4. Decode the reply with the element reference codec.
//!
//! The `*_or_default` variants suppress every failure, log it at debug
//! level, and return `None` or an empty vector instead.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, INVALID_SELECTOR, NO_SUCH_ELEMENT, Result};
use crate::identifiers::ElementId;
use crate::protocol::{Command, ElementCommand, reference};

use super::element::{Element, ElementReference};
use super::selector::By;
use super::session::{Bounds, Session};

// ============================================================================
// Query
// ============================================================================

/// A locator plus lookup options.
///
/// A [`By`] or a CSS selector string converts to a query with no options.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use remote_webdriver::{By, Query, SearchContext};
///
/// let next = session
///     .find_element(
///         Query::new(By::css("li.item"))
///             .excluding(&current)
///             .timeout(Duration::from_secs(2)),
///     )
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    /// Locator.
    by: By,
    /// Element that must not be returned.
    exclude: Option<ElementId>,
    /// Upper bound on the lookup.
    timeout: Option<Duration>,
    /// Aborts the lookup when fired.
    cancel: Option<CancellationToken>,
}

impl Query {
    /// Creates a query with no options.
    #[inline]
    #[must_use]
    pub fn new(by: By) -> Self {
        Self {
            by,
            exclude: None,
            timeout: None,
            cancel: None,
        }
    }

    /// Excludes an element from the matches.
    #[inline]
    #[must_use]
    pub fn excluding(mut self, element: &impl ElementReference) -> Self {
        self.exclude = Some(element.element_id().clone());
        self
    }

    /// Bounds the lookup.
    ///
    /// The bound is enforced locally and also sent to the remote end.
    #[inline]
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Aborts the lookup when `token` is cancelled.
    #[inline]
    #[must_use]
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the locator.
    #[inline]
    #[must_use]
    pub fn by(&self) -> &By {
        &self.by
    }
}

impl From<By> for Query {
    fn from(by: By) -> Self {
        Self::new(by)
    }
}

impl From<&str> for Query {
    /// Converts a string to a CSS selector query.
    fn from(selector: &str) -> Self {
        Self::new(By::css(selector))
    }
}

impl From<String> for Query {
    /// Converts a string to a CSS selector query.
    fn from(selector: String) -> Self {
        Self::new(By::css(selector))
    }
}

// ============================================================================
// SearchContext
// ============================================================================

/// A scope elements can be looked up in.
///
/// Implemented by [`Session`] (the whole document) and [`Element`] (its
/// subtree). Both share one resolver, so they behave identically apart
/// from scope.
#[async_trait]
pub trait SearchContext: Send + Sync {
    /// Returns the session commands are sent through.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`] if the session is gone.
    fn session(&self) -> Result<Session>;

    /// Returns the element the lookup is scoped to, or `None` for the
    /// document root.
    fn scope(&self) -> Option<&ElementId>;

    /// Finds the first matching element.
    ///
    /// # Errors
    ///
    /// - [`Error::ElementNotFound`] if nothing matches
    /// - [`Error::InvalidSelector`] for a compound class name or a selector
    ///   the remote end rejects
    /// - [`Error::Timeout`] / [`Error::Cancelled`] when the query bounds fire
    async fn find_element<Q>(&self, query: Q) -> Result<Element>
    where
        Q: Into<Query> + Send,
    {
        let session = self.session()?;
        resolve_one(&session, self.scope(), query.into()).await
    }

    /// Finds all matching elements, in document order.
    ///
    /// Zero matches is an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Same as [`find_element`](Self::find_element), except that nothing
    /// matching is not an error.
    async fn find_elements<Q>(&self, query: Q) -> Result<Vec<Element>>
    where
        Q: Into<Query> + Send,
    {
        let session = self.session()?;
        resolve_many(&session, self.scope(), query.into()).await
    }

    /// Finds the first matching element, returning `None` on any failure.
    async fn find_element_or_default<Q>(&self, query: Q) -> Option<Element>
    where
        Q: Into<Query> + Send,
    {
        suppress(self.find_element(query).await.map(Some))
    }

    /// Finds all matching elements, returning an empty vector on any
    /// failure.
    async fn find_elements_or_default<Q>(&self, query: Q) -> Vec<Element>
    where
        Q: Into<Query> + Send,
    {
        suppress(self.find_elements(query).await)
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Resolves a query to exactly one element.
async fn resolve_one(session: &Session, scope: Option<&ElementId>, query: Query) -> Result<Element> {
    let Query {
        by,
        exclude,
        timeout,
        cancel,
    } = query;
    let locator = by.to_string();

    let Some(wire) = by.to_wire(session.dialect())? else {
        debug!(locator = %locator, "Empty selector, nothing can match");
        return Err(Error::element_not_found(locator));
    };

    debug!(locator = %locator, using = wire.using, scope = ?scope, "Finding element");

    let command = Command::Element(ElementCommand::Find {
        using: wire.using.to_string(),
        value: wire.value,
        context_id: scope.cloned(),
        exclude_id: exclude,
        timeout: timeout.map(as_millis),
    });

    let raw = session
        .send_bounded(command, &locator, &Bounds { timeout, cancel })
        .await
        .map_err(|e| classify(e, &locator))?;

    let id = reference::decode_one(&raw).require(locator)?;
    Ok(Element::new(id, session))
}

/// Resolves a query to every matching element.
async fn resolve_many(
    session: &Session,
    scope: Option<&ElementId>,
    query: Query,
) -> Result<Vec<Element>> {
    let Query {
        by,
        exclude,
        timeout,
        cancel,
    } = query;
    let locator = by.to_string();

    let Some(wire) = by.to_wire(session.dialect())? else {
        debug!(locator = %locator, "Empty selector, nothing can match");
        return Ok(Vec::new());
    };

    debug!(locator = %locator, using = wire.using, scope = ?scope, "Finding elements");

    let command = Command::Element(ElementCommand::FindAll {
        using: wire.using.to_string(),
        value: wire.value,
        context_id: scope.cloned(),
        exclude_id: exclude,
        timeout: timeout.map(as_millis),
    });

    let raw = match session
        .send_bounded(command, &locator, &Bounds { timeout, cancel })
        .await
    {
        Ok(raw) => raw,
        Err(e) if e.remote_code() == Some(NO_SUCH_ELEMENT) => return Ok(Vec::new()),
        Err(e) => return Err(classify(e, &locator)),
    };

    let elements: Vec<_> = reference::decode_many(&raw)
        .into_iter()
        .map(|id| Element::new(id, session))
        .collect();

    debug!(locator = %locator, count = elements.len(), "Found elements");
    Ok(elements)
}

/// Maps remote lookup error codes onto crate errors.
fn classify(error: Error, locator: &str) -> Error {
    if error.remote_code() == Some(NO_SUCH_ELEMENT) {
        return Error::element_not_found(locator);
    }
    if error.remote_code() == Some(INVALID_SELECTOR) {
        return Error::invalid_selector(error.to_string());
    }
    error
}

/// Returns the value, or its default after logging the failure.
pub(crate) fn suppress<T: Default>(result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        debug!(error = %e, "Suppressed lookup failure");
        T::default()
    })
}

#[inline]
fn as_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use serde_json::{Value, json};

    use crate::driver::{Dialect, SessionConfig};
    use crate::protocol::{LEGACY_ELEMENT_KEY, W3C_ELEMENT_KEY};
    use crate::transport::testing::RecordingTransport;

    fn setup(dialect: Dialect) -> (Arc<RecordingTransport>, Session) {
        let transport = Arc::new(RecordingTransport::new());
        let config = SessionConfig::new().with_dialect(dialect);
        let session = Session::new(transport.clone(), config);
        (transport, session)
    }

    /// Extracts (method, using, value, context, exclude, timeout) of find commands.
    fn finds(
        transport: &RecordingTransport,
    ) -> Vec<(&'static str, String, String, Option<String>, Option<String>, Option<u64>)> {
        transport
            .commands()
            .into_iter()
            .filter_map(|command| match command {
                Command::Element(ElementCommand::Find {
                    using,
                    value,
                    context_id,
                    exclude_id,
                    timeout,
                }) => Some(("find", using, value, context_id, exclude_id, timeout)),
                Command::Element(ElementCommand::FindAll {
                    using,
                    value,
                    context_id,
                    exclude_id,
                    timeout,
                }) => Some(("findAll", using, value, context_id, exclude_id, timeout)),
                _ => None,
            })
            .map(|(method, using, value, context, exclude, timeout)| {
                (
                    method,
                    using,
                    value,
                    context.map(ElementId::into_inner),
                    exclude.map(ElementId::into_inner),
                    timeout,
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_find_element_decodes_reference() {
        let (transport, session) = setup(Dialect::W3c);
        transport.reply(json!({ W3C_ELEMENT_KEY: "abc" }));

        let element = session.find_element(By::id("main")).await.expect("found");

        assert_eq!(element.id().as_str(), "abc");
        let sent = finds(&transport);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, "css selector");
        assert_eq!(sent[0].2, "#main");
        assert_eq!(sent[0].3, None);
    }

    #[tokio::test]
    async fn test_find_elements_mixed_dialect_replies() {
        let (transport, session) = setup(Dialect::W3c);
        transport.reply(json!([
            { W3C_ELEMENT_KEY: "abc" },
            { LEGACY_ELEMENT_KEY: "def" },
            "ghi",
        ]));

        let elements = session.find_elements(By::css("li")).await.expect("found");

        let ids: Vec<_> = elements.iter().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, vec!["abc", "def", "ghi"]);
    }

    #[tokio::test]
    async fn test_find_element_null_reply_is_not_found() {
        let (transport, session) = setup(Dialect::W3c);
        transport.reply(Value::Null);

        let err = session.find_element(By::css("x")).await.unwrap_err();
        assert!(
            matches!(err, Error::ElementNotFound { ref locator } if locator == "By.CssSelector: x")
        );
    }

    #[tokio::test]
    async fn test_find_elements_empty_reply() {
        let (transport, session) = setup(Dialect::W3c);
        transport.reply(json!([]));

        let elements = session.find_elements(By::css("x")).await.expect("empty");
        assert!(elements.is_empty());
    }

    #[tokio::test]
    async fn test_tag_name_sent_per_dialect() {
        let (transport, session) = setup(Dialect::W3c);
        transport.reply(json!([]));
        session.find_elements(By::tag_name("div")).await.expect("w3c");
        assert_eq!(finds(&transport)[0].1, "css selector");
        assert_eq!(finds(&transport)[0].2, "div");

        let (transport, session) = setup(Dialect::Legacy);
        transport.reply(json!([]));
        session.find_elements(By::tag_name("div")).await.expect("legacy");
        assert_eq!(finds(&transport)[0].1, "tag name");
        assert_eq!(finds(&transport)[0].2, "div");
    }

    #[tokio::test]
    async fn test_compound_class_name_fails_before_sending() {
        for dialect in [Dialect::W3c, Dialect::Legacy] {
            let (transport, session) = setup(dialect);

            let err = session
                .find_element(By::class_name("foo bar"))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidSelector { .. }));

            let err = session
                .find_elements(By::class_name("foo bar"))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidSelector { .. }));

            assert_eq!(transport.sent(), 0);
        }
    }

    #[tokio::test]
    async fn test_empty_id_short_circuits() {
        let (transport, session) = setup(Dialect::W3c);

        let elements = session.find_elements(By::id("")).await.expect("empty");
        assert!(elements.is_empty());

        let err = session.find_element(By::class_name("")).await.unwrap_err();
        assert!(matches!(err, Error::ElementNotFound { .. }));

        assert_eq!(transport.sent(), 0);
    }

    #[tokio::test]
    async fn test_element_scope_and_options_forwarded() {
        let (transport, session) = setup(Dialect::W3c);
        transport
            .reply(json!({ W3C_ELEMENT_KEY: "parent" }))
            .reply(json!({ W3C_ELEMENT_KEY: "child" }));

        let parent = session.find_element(By::css("ul")).await.expect("parent");
        let excluded = ElementId::new("skip");
        let child = parent
            .find_element(
                Query::new(By::xpath(".//li"))
                    .excluding(&excluded)
                    .timeout(Duration::from_millis(250)),
            )
            .await
            .expect("child");

        assert_eq!(child.id().as_str(), "child");
        let sent = finds(&transport);
        assert_eq!(
            sent[1],
            (
                "find",
                "xpath".to_string(),
                ".//li".to_string(),
                Some("parent".to_string()),
                Some("skip".to_string()),
                Some(250),
            )
        );
    }

    #[tokio::test]
    async fn test_find_all_forwards_scope_and_options() {
        let (transport, session) = setup(Dialect::Legacy);
        transport
            .reply(json!({ LEGACY_ELEMENT_KEY: "list" }))
            .reply(json!([{ LEGACY_ELEMENT_KEY: "one" }]));

        let list = session.find_element(By::tag_name("ul")).await.expect("list");
        let excluded = Element::new(ElementId::new("skip"), &session);
        let items = list
            .find_elements(
                Query::new(By::class_name("item"))
                    .excluding(&excluded)
                    .timeout(Duration::from_millis(400)),
            )
            .await
            .expect("items");

        assert_eq!(items.len(), 1);
        let sent = finds(&transport);
        assert_eq!(
            sent[1],
            (
                "findAll",
                "class name".to_string(),
                "item".to_string(),
                Some("list".to_string()),
                Some("skip".to_string()),
                Some(400),
            )
        );
        assert_eq!(transport.timeouts()[1], Some(Duration::from_millis(400)));
    }

    #[tokio::test]
    async fn test_remote_no_such_element() {
        let (transport, session) = setup(Dialect::W3c);
        transport
            .fail(Error::remote(NO_SUCH_ELEMENT, "nothing"))
            .fail(Error::remote(NO_SUCH_ELEMENT, "nothing"));

        let err = session.find_element(By::css("x")).await.unwrap_err();
        assert!(matches!(err, Error::ElementNotFound { .. }));

        let elements = session.find_elements(By::css("x")).await.expect("empty");
        assert!(elements.is_empty());
    }

    #[tokio::test]
    async fn test_remote_invalid_selector() {
        let (transport, session) = setup(Dialect::W3c);
        transport.fail(Error::remote(INVALID_SELECTOR, "bad"));

        let err = session.find_element(By::xpath("//[")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidSelector { .. }));
    }

    #[tokio::test]
    async fn test_or_default_variants_suppress() {
        let (transport, session) = setup(Dialect::W3c);
        transport
            .reply(Value::Null)
            .fail(Error::connection("reset"));

        assert!(session.find_element_or_default(By::css("x")).await.is_none());
        assert!(session.find_elements_or_default(By::css("x")).await.is_empty());
        assert!(
            session
                .find_element_or_default(By::class_name("a b"))
                .await
                .is_none()
        );
        assert_eq!(transport.sent(), 2);
    }

    #[tokio::test]
    async fn test_or_default_returns_match() {
        let (transport, session) = setup(Dialect::W3c);
        transport.reply(json!({ W3C_ELEMENT_KEY: "a" }));

        let element = session.find_element_or_default(By::css("a")).await;
        assert_eq!(element.map(|e| e.id().as_str().to_string()).as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_timeout_fires() {
        let (transport, session) = setup(Dialect::W3c);
        transport.hang();

        let err = session
            .find_element(Query::new(By::css("x")).timeout(Duration::from_millis(20)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_cancellation_fires() {
        let (transport, session) = setup(Dialect::W3c);
        transport.hang();

        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let err = session
            .find_elements(Query::new(By::css("x")).cancel_on(token))
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_by_find_helpers() {
        let (transport, session) = setup(Dialect::W3c);
        transport
            .reply(json!({ W3C_ELEMENT_KEY: "one" }))
            .reply(json!([{ W3C_ELEMENT_KEY: "one" }, { W3C_ELEMENT_KEY: "two" }]));

        let by = By::css("p");
        assert_eq!(by.find_one(&session).await.expect("one").id().as_str(), "one");
        assert_eq!(by.find_all(&session).await.expect("all").len(), 2);
    }

    #[tokio::test]
    async fn test_string_converts_to_css_query() {
        let (transport, session) = setup(Dialect::W3c);
        transport.reply(json!([]));

        session.find_elements("div > p").await.expect("found");
        assert_eq!(finds(&transport)[0].1, "css selector");
    }

    #[test]
    fn test_suppress() {
        assert_eq!(suppress::<u8>(Ok(3)), 3);
        assert_eq!(suppress::<u8>(Err(Error::SessionClosed)), 0);
    }
}
