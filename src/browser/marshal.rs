//! Script argument encoding and result decoding.
//!
//! Arguments are built as [`ScriptArg`] trees and encoded into the JSON
//! sent with `script.execute`. Element handles travel as wire references
//! carrying both element keys. Results come back as [`ScriptValue`], with
//! element references turned into live [`Element`] handles.
//!
//! # Example
//!
//! ```ignore
//! use remote_webdriver::ScriptArg;
//!
//! let args = vec![
//!     ScriptArg::from(&button),
//!     ScriptArg::from("hello"),
//!     ScriptArg::from(vec![1, 2, 3]),
//! ];
//! let value = session.execute_script("return arguments[0].click()", args).await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::protocol::reference;

use super::element::{Element, ElementReference};
use super::session::Session;

// ============================================================================
// ScriptArg
// ============================================================================

/// A value that can be passed to a script.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptArg {
    /// JSON `null`.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point number; must be finite.
    Float(f64),
    /// String.
    String(String),
    /// Element handle, sent as a wire reference.
    Element(ElementId),
    /// Ordered sequence.
    List(Vec<ScriptArg>),
    /// Key/value mapping; keys must be scalars.
    Map(Vec<(ScriptArg, ScriptArg)>),
}

impl ScriptArg {
    /// Creates an argument referring to an element.
    #[inline]
    pub fn element(element: &impl ElementReference) -> Self {
        Self::Element(element.element_id().clone())
    }

    /// Converts any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `value` cannot be represented
    /// as JSON (for example a map with non-scalar keys).
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Self::from)
            .map_err(|e| Error::invalid_argument(format!("unserializable script argument: {e}")))
    }

    /// Encodes the argument into its wire form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for non-finite floats and for map
    /// keys that are not scalars.
    pub fn encode(&self) -> Result<Value> {
        match self {
            Self::Null => Ok(Value::Null),
            Self::Bool(b) => Ok(Value::Bool(*b)),
            Self::Int(i) => Ok(Value::from(*i)),
            Self::UInt(u) => Ok(Value::from(*u)),
            Self::Float(f) => Number::from_f64(*f).map(Value::Number).ok_or_else(|| {
                Error::invalid_argument(format!("non-finite number {f} cannot be sent to a script"))
            }),
            Self::String(s) => Ok(Value::String(s.clone())),
            Self::Element(id) => Ok(reference::encode(id)),
            Self::List(items) => items
                .iter()
                .map(Self::encode)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Self::Map(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.map_key()?, value.encode()?);
                }
                Ok(Value::Object(map))
            }
        }
    }

    /// Renders a scalar as a JSON object key.
    fn map_key(&self) -> Result<String> {
        match self {
            Self::String(s) => Ok(s.clone()),
            Self::Bool(b) => Ok(b.to_string()),
            Self::Int(i) => Ok(i.to_string()),
            Self::UInt(u) => Ok(u.to_string()),
            Self::Float(f) if f.is_finite() => Ok(f.to_string()),
            other => Err(Error::invalid_argument(format!(
                "{other:?} cannot be used as a script object key"
            ))),
        }
    }
}

/// Encodes a script argument list.
///
/// `None` encodes as a single `null` argument; `Some(&[])` encodes as no
/// arguments.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] naming the first offending value.
pub fn encode_args(args: Option<&[ScriptArg]>) -> Result<Vec<Value>> {
    match args {
        None => Ok(vec![Value::Null]),
        Some(items) => items.iter().map(ScriptArg::encode).collect(),
    }
}

// ============================================================================
// ScriptArg - Conversions
// ============================================================================

macro_rules! impl_from_int {
    ($variant:ident, $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for ScriptArg {
                #[inline]
                fn from(value: $source) -> Self {
                    Self::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

impl_from_int!(Int, i64: i8, i16, i32, i64);
impl_from_int!(UInt, u64: u8, u16, u32, u64);

impl From<usize> for ScriptArg {
    #[inline]
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<f32> for ScriptArg {
    #[inline]
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for ScriptArg {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ScriptArg {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ScriptArg {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ScriptArg {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&Element> for ScriptArg {
    #[inline]
    fn from(element: &Element) -> Self {
        Self::element(element)
    }
}

impl From<Element> for ScriptArg {
    #[inline]
    fn from(element: Element) -> Self {
        Self::element(&element)
    }
}

impl From<ElementId> for ScriptArg {
    #[inline]
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}

impl From<&ElementId> for ScriptArg {
    #[inline]
    fn from(id: &ElementId) -> Self {
        Self::Element(id.clone())
    }
}

impl<T: Into<ScriptArg>> From<Option<T>> for ScriptArg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<ScriptArg>> From<Vec<T>> for ScriptArg {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<K, V, S> From<HashMap<K, V, S>> for ScriptArg
where
    K: Into<ScriptArg>,
    V: Into<ScriptArg>,
    S: BuildHasher,
{
    fn from(map: HashMap<K, V, S>) -> Self {
        Self::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<ScriptArg>, V: Into<ScriptArg>> From<BTreeMap<K, V>> for ScriptArg {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<Value> for ScriptArg {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => number_arg(&n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (Self::String(k), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Picks the narrowest variant holding a JSON number.
fn number_arg(n: &Number) -> ScriptArg {
    if let Some(i) = n.as_i64() {
        ScriptArg::Int(i)
    } else if let Some(u) = n.as_u64() {
        ScriptArg::UInt(u)
    } else {
        ScriptArg::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

// ============================================================================
// ScriptValue
// ============================================================================

/// A decoded script result.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    /// JSON `null` or `undefined`.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(Number),
    /// String.
    String(String),
    /// A single element.
    Element(Element),
    /// A non-empty array made only of elements.
    Elements(Vec<Element>),
    /// Any other array.
    List(Vec<ScriptValue>),
    /// Object without element keys.
    Map(FxHashMap<String, ScriptValue>),
}

/// Decodes a raw script result, binding elements to `session`.
///
/// Total: every JSON value decodes. An object carrying an element key whose
/// id is blank decodes to [`ScriptValue::Null`].
#[must_use]
pub fn decode_result(raw: Value, session: &Session) -> ScriptValue {
    ScriptValue::decode(raw, session)
}

impl ScriptValue {
    fn decode(raw: Value, session: &Session) -> Self {
        match raw {
            Value::Object(ref map) if reference::is_element_reference(map) => {
                match reference::decode_one(&raw).id() {
                    Some(id) => Self::Element(Element::new(id, session)),
                    None => Self::Null,
                }
            }
            Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Self::decode(v, session)))
                    .collect(),
            ),
            Value::Array(items) => {
                let decoded: Vec<_> = items
                    .into_iter()
                    .map(|item| Self::decode(item, session))
                    .collect();

                if !decoded.is_empty() && decoded.iter().all(|v| matches!(v, Self::Element(_))) {
                    Self::Elements(
                        decoded
                            .into_iter()
                            .filter_map(|v| match v {
                                Self::Element(element) => Some(element),
                                _ => None,
                            })
                            .collect(),
                    )
                } else {
                    Self::List(decoded)
                }
            }
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
        }
    }

    /// Converts back to JSON, encoding elements as wire references.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Element(element) => reference::encode(element.id()),
            Self::Elements(elements) => Value::Array(
                elements
                    .iter()
                    .map(|element| reference::encode(element.id()))
                    .collect(),
            ),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

// ============================================================================
// ScriptValue - Accessors
// ============================================================================

impl ScriptValue {
    /// Returns `true` for `null`.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean, if this is one.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number as `i64`, if representable.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Returns the number as `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Returns the string, if this is one.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the element, if this is one.
    #[inline]
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the element list, if this is one.
    #[inline]
    #[must_use]
    pub fn as_elements(&self) -> Option<&[Element]> {
        match self {
            Self::Elements(elements) => Some(elements),
            _ => None,
        }
    }

    /// Returns the list items, if this is a mixed list.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[ScriptValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the map, if this is one.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&FxHashMap<String, ScriptValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Consumes the value and returns every element it holds at top level.
    ///
    /// An empty list yields no elements.
    #[must_use]
    pub fn into_elements(self) -> Vec<Element> {
        match self {
            Self::Element(element) => vec![element],
            Self::Elements(elements) => elements,
            _ => Vec::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use serde_json::json;

    use crate::driver::SessionConfig;
    use crate::protocol::{LEGACY_ELEMENT_KEY, W3C_ELEMENT_KEY};
    use crate::transport::testing::RecordingTransport;

    fn session() -> Session {
        Session::new(Arc::new(RecordingTransport::new()), SessionConfig::default())
    }

    #[test]
    fn test_absent_args_encode_single_null() {
        assert_eq!(encode_args(None).expect("encode"), vec![Value::Null]);
        assert!(encode_args(Some(&[])).expect("encode").is_empty());
    }

    #[test]
    fn test_element_arg_encodes_both_keys() {
        let session = session();
        let element = Element::new(ElementId::new("e1"), &session);

        let encoded = encode_args(Some(&[ScriptArg::from(&element)])).expect("encode");
        assert_eq!(
            encoded,
            vec![json!({ W3C_ELEMENT_KEY: "e1", LEGACY_ELEMENT_KEY: "e1" })]
        );
    }

    #[test]
    fn test_nested_structures_encode() {
        let mut inner = HashMap::new();
        inner.insert("id", ScriptArg::from(ElementId::new("x")));
        let arg = ScriptArg::from(vec![
            ScriptArg::from(1),
            ScriptArg::from("two"),
            ScriptArg::from(inner),
            ScriptArg::from(None::<bool>),
        ]);

        let encoded = arg.encode().expect("encode");
        assert_eq!(
            encoded,
            json!([1, "two", { "id": { W3C_ELEMENT_KEY: "x", LEGACY_ELEMENT_KEY: "x" } }, null])
        );
    }

    #[test]
    fn test_scalar_map_keys_are_stringified() {
        let arg = ScriptArg::Map(vec![
            (ScriptArg::from(1), ScriptArg::from("one")),
            (ScriptArg::from(true), ScriptArg::from("yes")),
        ]);
        assert_eq!(arg.encode().expect("encode"), json!({ "1": "one", "true": "yes" }));
    }

    #[test]
    fn test_non_scalar_map_key_rejected() {
        let arg = ScriptArg::Map(vec![(ScriptArg::List(vec![]), ScriptArg::Null)]);
        let err = arg.encode().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_non_finite_float_rejected() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = encode_args(Some(&[ScriptArg::from(f)])).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument { .. }));
        }
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }

        let arg = ScriptArg::from_serialize(&Point { x: 1, y: -2 }).expect("serialize");
        assert_eq!(arg.encode().expect("encode"), json!({ "x": 1, "y": -2 }));

        let mut bad = HashMap::new();
        bad.insert(vec![1u8], 1u8);
        let err = ScriptArg::from_serialize(&bad).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_decode_single_element() {
        let session = session();
        let value = decode_result(json!({ LEGACY_ELEMENT_KEY: "abc" }), &session);
        assert_eq!(value.as_element().map(|e| e.id().as_str()), Some("abc"));
    }

    #[test]
    fn test_decode_element_list() {
        let session = session();
        let value = decode_result(
            json!([
                { W3C_ELEMENT_KEY: "a" },
                { LEGACY_ELEMENT_KEY: "b" },
                { W3C_ELEMENT_KEY: "c", LEGACY_ELEMENT_KEY: "c" },
            ]),
            &session,
        );

        assert_eq!(value.as_elements().map(<[Element]>::len), Some(3));
        let ids: Vec<_> = value
            .into_elements()
            .iter()
            .map(|e| e.id().as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_decode_mixed_list_stays_list() {
        let session = session();
        let value = decode_result(json!([{ W3C_ELEMENT_KEY: "a" }, "text", 1]), &session);

        let items = value.as_list().expect("list");
        assert!(items[0].as_element().is_some());
        assert_eq!(items[1].as_str(), Some("text"));
        assert_eq!(items[2].as_i64(), Some(1));
    }

    #[test]
    fn test_decode_empty_list_is_list() {
        let value = decode_result(json!([]), &session());
        assert_eq!(value, ScriptValue::List(Vec::new()));
        assert!(value.into_elements().is_empty());
    }

    #[test]
    fn test_decode_map_recurses() {
        let session = session();
        let value = decode_result(json!({ "el": { W3C_ELEMENT_KEY: "a" }, "n": 2 }), &session);

        let map = value.as_map().expect("map");
        assert!(map["el"].as_element().is_some());
        assert_eq!(map["n"].as_i64(), Some(2));
    }

    #[test]
    fn test_decode_scalars() {
        let session = session();
        assert!(decode_result(Value::Null, &session).is_null());
        assert_eq!(decode_result(json!(true), &session).as_bool(), Some(true));
        assert_eq!(decode_result(json!("s"), &session).as_str(), Some("s"));
        assert_eq!(decode_result(json!(1.5), &session).as_f64(), Some(1.5));
    }

    #[test]
    fn test_decode_blank_element_is_null() {
        let value = decode_result(json!({ W3C_ELEMENT_KEY: "" }), &session());
        assert!(value.is_null());
    }

    #[test]
    fn test_to_json_encodes_elements() {
        let session = session();
        let raw = json!({ "items": [{ W3C_ELEMENT_KEY: "a" }], "ok": true });
        let value = decode_result(raw, &session);

        assert_eq!(
            value.to_json(),
            json!({
                "items": [{ W3C_ELEMENT_KEY: "a", LEGACY_ELEMENT_KEY: "a" }],
                "ok": true
            })
        );
    }
}
