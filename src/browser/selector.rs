//! Element locator strategies.
//!
//! Provides Selenium-like `By` locators and the rules that turn them into
//! the (mechanism, value) pair sent on the wire.
//!
//! # Example
//!
//! ```ignore
//! use remote_webdriver::{By, SearchContext};
//!
//! let btn = session.find_element(By::css("#submit")).await?;
//! let form = session.find_element(By::id("login-form")).await?;
//! let link = session.find_element(By::link_text("Click here")).await?;
//! let inputs = form.find_elements(By::tag_name("input")).await?;
//! ```
//!
//! # Dialects
//!
//! | Mechanism | [`Dialect::W3c`] | [`Dialect::Legacy`] |
//! |-----------|------------------|---------------------|
//! | Id | `css selector` `#<escaped>` | `id` |
//! | Name | `css selector` `*[name="<value>"]` | `name` |
//! | ClassName | `css selector` `.<escaped>` | `class name` |
//! | TagName | `css selector` `<value>` | `tag name` |
//! | others | unchanged | unchanged |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::driver::Dialect;
use crate::error::{Error, Result};

use super::element::Element;
use super::search::SearchContext;

// ============================================================================
// Constants
// ============================================================================

/// Characters that must be backslash-escaped inside a CSS identifier.
const CSS_SPECIAL_CHARS: &[char] = &[
    '\'', '"', '\\', '#', '.', ':', ';', ',', '!', '?', '+', '<', '>', '=', '~', '*', '^', '$',
    '|', '%', '&', '@', '`', '{', '}', '-', '/', '[', ']', '(', ')',
];

// ============================================================================
// Mechanism
// ============================================================================

/// Search mechanism of a locator.
///
/// Serializes to the legacy wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mechanism {
    /// Element `id` attribute.
    #[serde(rename = "id")]
    Id,
    /// Element `name` attribute.
    #[serde(rename = "name")]
    Name,
    /// Single class name.
    #[serde(rename = "class name")]
    ClassName,
    /// Tag name.
    #[serde(rename = "tag name")]
    TagName,
    /// CSS selector.
    #[serde(rename = "css selector")]
    CssSelector,
    /// XPath expression.
    #[serde(rename = "xpath")]
    XPath,
    /// Exact link text of an `<a>` element.
    #[serde(rename = "link text")]
    LinkText,
    /// Partial link text of an `<a>` element.
    #[serde(rename = "partial link text")]
    PartialLinkText,
}

impl Mechanism {
    /// Returns the legacy wire name.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::ClassName => "class name",
            Self::TagName => "tag name",
            Self::CssSelector => "css selector",
            Self::XPath => "xpath",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
        }
    }

    /// Returns the label used in locator descriptions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::Name => "Name",
            Self::ClassName => "ClassName",
            Self::TagName => "TagName",
            Self::CssSelector => "CssSelector",
            Self::XPath => "XPath",
            Self::LinkText => "LinkText",
            Self::PartialLinkText => "PartialLinkText",
        }
    }
}

// ============================================================================
// WireLocator
// ============================================================================

/// Mechanism and value exactly as sent in a find command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireLocator {
    /// Wire mechanism name.
    pub using: &'static str,
    /// Wire value.
    pub value: String,
}

impl WireLocator {
    fn css(value: String) -> Self {
        Self {
            using: Mechanism::CssSelector.wire_name(),
            value,
        }
    }
}

// ============================================================================
// By
// ============================================================================

/// Element locator (like Selenium's `By`).
///
/// A pure value: a [`Mechanism`] plus its string value. Two locators are
/// equal when their descriptions (`By.Id: login`) are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct By {
    /// Search mechanism.
    #[serde(rename = "using")]
    mechanism: Mechanism,
    /// Mechanism value.
    value: String,
}

impl By {
    /// Creates a locator from a mechanism and value.
    #[inline]
    pub fn new(mechanism: Mechanism, value: impl Into<String>) -> Self {
        Self {
            mechanism,
            value: value.into(),
        }
    }

    /// Locates by `id` attribute.
    #[inline]
    pub fn id(id: impl Into<String>) -> Self {
        Self::new(Mechanism::Id, id)
    }

    /// Locates by `name` attribute.
    #[inline]
    pub fn name(name: impl Into<String>) -> Self {
        Self::new(Mechanism::Name, name)
    }

    /// Locates by a single class name.
    ///
    /// Compound class names (`"btn primary"`) are rejected at lookup time;
    /// use [`By::css`] with `.btn.primary` instead.
    #[inline]
    pub fn class_name(class: impl Into<String>) -> Self {
        Self::new(Mechanism::ClassName, class)
    }

    /// Locates by tag name.
    #[inline]
    pub fn tag_name(tag: impl Into<String>) -> Self {
        Self::new(Mechanism::TagName, tag)
    }

    /// Locates by CSS selector.
    #[inline]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Mechanism::CssSelector, selector)
    }

    /// Locates by XPath expression.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::new(Mechanism::XPath, expr)
    }

    /// Locates `<a>` elements by exact text.
    #[inline]
    pub fn link_text(text: impl Into<String>) -> Self {
        Self::new(Mechanism::LinkText, text)
    }

    /// Locates `<a>` elements by partial text.
    #[inline]
    pub fn partial_link_text(text: impl Into<String>) -> Self {
        Self::new(Mechanism::PartialLinkText, text)
    }

    /// Returns the mechanism.
    #[inline]
    #[must_use]
    pub fn mechanism(&self) -> Mechanism {
        self.mechanism
    }

    /// Returns the locator value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Resolves the wire (mechanism, value) pair for a dialect.
    ///
    /// Returns `Ok(None)` when an id or class name escapes to an empty
    /// string, in which case nothing can match and no command is needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] for a class name containing
    /// whitespace.
    pub fn to_wire(&self, dialect: Dialect) -> Result<Option<WireLocator>> {
        if self.mechanism == Mechanism::ClassName && self.value.chars().any(char::is_whitespace) {
            return Err(Error::invalid_selector(format!(
                "compound class names are not permitted: {:?}",
                self.value
            )));
        }

        if dialect == Dialect::Legacy {
            return Ok(Some(WireLocator {
                using: self.mechanism.wire_name(),
                value: self.value.clone(),
            }));
        }

        let wire = match self.mechanism {
            Mechanism::Id => prefixed_identifier('#', &self.value),
            Mechanism::ClassName => prefixed_identifier('.', &self.value),
            Mechanism::Name => Some(WireLocator::css(format!("*[name=\"{}\"]", self.value))),
            Mechanism::TagName => Some(WireLocator::css(self.value.clone())),
            Mechanism::CssSelector
            | Mechanism::XPath
            | Mechanism::LinkText
            | Mechanism::PartialLinkText => Some(WireLocator {
                using: self.mechanism.wire_name(),
                value: self.value.clone(),
            }),
        };

        Ok(wire)
    }

    /// Finds the first match in `context`.
    ///
    /// # Errors
    ///
    /// See [`SearchContext::find_element`].
    pub async fn find_one<C>(&self, context: &C) -> Result<Element>
    where
        C: SearchContext + ?Sized,
    {
        context.find_element(self.clone()).await
    }

    /// Finds all matches in `context`.
    ///
    /// # Errors
    ///
    /// See [`SearchContext::find_elements`].
    pub async fn find_all<C>(&self, context: &C) -> Result<Vec<Element>>
    where
        C: SearchContext + ?Sized,
    {
        context.find_elements(self.clone()).await
    }
}

/// Builds `<prefix><escaped>` as a CSS locator, or `None` if nothing is left.
fn prefixed_identifier(prefix: char, value: &str) -> Option<WireLocator> {
    let escaped = css_escape(value);
    if escaped.is_empty() {
        return None;
    }

    let mut selector = String::with_capacity(escaped.len() + 1);
    selector.push(prefix);
    selector.push_str(&escaped);
    Some(WireLocator::css(selector))
}

// ============================================================================
// By - Traits
// ============================================================================

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "By.{}: {}", self.mechanism.label(), self.value)
    }
}

impl PartialEq for By {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for By {}

impl Hash for By {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl From<&str> for By {
    /// Converts a string to CSS selector (default).
    fn from(s: &str) -> Self {
        Self::css(s)
    }
}

impl From<String> for By {
    /// Converts a string to CSS selector (default).
    fn from(s: String) -> Self {
        Self::css(s)
    }
}

// ============================================================================
// CSS Escaping
// ============================================================================

/// Escapes a value for use as a CSS identifier.
///
/// Every special character is backslash-escaped. A leading decimal digit `d`
/// becomes the numeric escape `\3d ` followed by the rest of the value.
///
/// # Example
///
/// ```
/// use remote_webdriver::css_escape;
///
/// assert_eq!(css_escape("a.b"), r"a\.b");
/// assert_eq!(css_escape("3col"), r"\33 col");
/// ```
#[must_use]
pub fn css_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() * 2);
    for c in value.chars() {
        if CSS_SPECIAL_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    // Digits are never escaped above, so the first byte is the digit itself
    if let Some(digit) = value.chars().next().and_then(|c| c.to_digit(10)) {
        return format!("\\{} {}", 30 + digit, &escaped[1..]);
    }

    escaped
}

// ============================================================================
// Tests
// ============================================================================
