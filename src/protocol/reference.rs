//! Element reference encoding and decoding.
//!
//! Remote ends have shipped three shapes for an element reference over the
//! years:
//!
//! | Shape | Example |
//! |-------|---------|
//! | W3C map | `{"element-6066-11e4-a52e-4f735466cecf": "abc"}` |
//! | Legacy map | `{"ELEMENT": "abc"}` |
//! | Bare id | `"abc"` |
//!
//! Decoding checks the W3C key first, then the legacy key, then treats the
//! value itself as the id. Encoding always writes both keys because the
//! dialect of the remote end is not known up front.
//!
//! Decoding is permissive: malformed input degrades to [`Reference::Empty`]
//! or [`Reference::Missing`] and never produces an error on its own.

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::identifiers::ElementId;

// ============================================================================
// Constants
// ============================================================================

/// W3C WebDriver element reference key.
pub const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Legacy (JSON wire protocol) element reference key.
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

// ============================================================================
// Reference
// ============================================================================

/// Outcome of decoding a single element reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// A usable element id.
    Id(ElementId),
    /// The reference was present but its id was null, empty or blank.
    Empty,
    /// No reference could be found in the value.
    Missing,
}

impl Reference {
    /// Returns the id, discarding the reason when there is none.
    #[inline]
    #[must_use]
    pub fn id(self) -> Option<ElementId> {
        match self {
            Self::Id(id) => Some(id),
            Self::Empty | Self::Missing => None,
        }
    }

    /// Returns `true` if an id was decoded.
    #[inline]
    #[must_use]
    pub fn is_id(&self) -> bool {
        matches!(self, Self::Id(_))
    }

    /// Converts the outcome into a result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementNotFound`] carrying `locator` when no id was
    /// decoded.
    pub fn require(self, locator: impl Into<String>) -> Result<ElementId> {
        match self {
            Self::Id(id) => Ok(id),
            Self::Empty | Self::Missing => Err(Error::element_not_found(locator)),
        }
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decodes a value expected to denote zero or one element.
///
/// | Input | Outcome |
/// |-------|---------|
/// | `null` | [`Reference::Missing`] |
/// | map with W3C or legacy key | id from that key |
/// | map with neither key | [`Reference::Missing`] |
/// | blank string | [`Reference::Empty`] |
/// | other scalar | the scalar as id |
/// | array | [`Reference::Missing`] |
#[must_use]
pub fn decode_one(raw: &Value) -> Reference {
    match raw {
        Value::Null | Value::Array(_) => Reference::Missing,
        Value::Object(map) => match reference_value(map) {
            Some(value) => scalar_reference(value),
            None => Reference::Missing,
        },
        scalar => scalar_reference(scalar),
    }
}

/// Decodes a value expected to be an array of element references.
///
/// Returns an empty vector when `raw` is not an array. Items that do not
/// decode to an id are dropped; order is preserved.
#[must_use]
pub fn decode_many(raw: &Value) -> Vec<ElementId> {
    raw.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| decode_one(item).id())
                .collect()
        })
        .unwrap_or_default()
}

/// Returns `true` if the map carries either element reference key.
#[inline]
#[must_use]
pub fn is_element_reference(map: &Map<String, Value>) -> bool {
    map.contains_key(W3C_ELEMENT_KEY) || map.contains_key(LEGACY_ELEMENT_KEY)
}

/// Looks up the reference value, W3C key first.
fn reference_value(map: &Map<String, Value>) -> Option<&Value> {
    map.get(W3C_ELEMENT_KEY)
        .or_else(|| map.get(LEGACY_ELEMENT_KEY))
}

/// Interprets a scalar as an element id.
fn scalar_reference(value: &Value) -> Reference {
    match value {
        Value::String(s) if s.trim().is_empty() => Reference::Empty,
        Value::String(s) => Reference::Id(ElementId::new(s.as_str())),
        Value::Number(n) => Reference::Id(ElementId::new(n.to_string())),
        Value::Bool(b) => Reference::Id(ElementId::new(b.to_string())),
        Value::Null => Reference::Empty,
        Value::Array(_) | Value::Object(_) => Reference::Missing,
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Encodes an element id as a wire reference carrying both keys.
#[must_use]
pub fn encode(id: &ElementId) -> Value {
    let mut map = Map::with_capacity(2);
    map.insert(W3C_ELEMENT_KEY.to_string(), Value::String(id.as_str().to_string()));
    map.insert(LEGACY_ELEMENT_KEY.to_string(), Value::String(id.as_str().to_string()));
    Value::Object(map)
}

// ============================================================================
// Tests
// ============================================================================
