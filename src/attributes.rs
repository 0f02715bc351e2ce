//! Flat attribute maps and the algebra over them.
//!
//! An attribute map is a set of formatting keys (`bold`, `link`, ...) with
//! scalar values. `Null` is meaningful: inside a retain it means "remove
//! this key", while on a document insert it means "no attribute". An empty
//! map and an absent map are the same thing, which is why `Attributes` has
//! no separate `None` state.
//!
//! The three functions at the bottom are pure and never mutate their inputs:
//!
//! - [`compose`]: layer `b` over `a`.
//! - [`diff`]: the smallest map that turns `a` into `b` under compose.
//! - [`transform`]: re-express `b` against a concurrent `a`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Number;

use crate::error::Error;

/// A scalar attribute value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Explicit removal inside retains, "unset" everywhere else.
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl AttrValue {
    /// Returns true for [`AttrValue::Null`].
    #[inline]
    pub fn is_null(&self) -> bool {
        return matches!(self, AttrValue::Null);
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        return AttrValue::Bool(value);
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        return AttrValue::Number(value.into());
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        return AttrValue::Number(value.into());
    }
}

impl From<u64> for AttrValue {
    fn from(value: u64) -> Self {
        return AttrValue::Number(value.into());
    }
}

impl From<f64> for AttrValue {
    /// Non-finite floats have no JSON representation and become `Null`.
    fn from(value: f64) -> Self {
        return match Number::from_f64(value) {
            Some(n) => AttrValue::Number(n),
            None => AttrValue::Null,
        };
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        return AttrValue::String(value.to_string());
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        return AttrValue::String(value);
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        return match value {
            Some(v) => v.into(),
            None => AttrValue::Null,
        };
    }
}

impl TryFrom<serde_json::Value> for AttrValue {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self, Error> {
        return match value {
            serde_json::Value::Null => Ok(AttrValue::Null),
            serde_json::Value::Bool(b) => Ok(AttrValue::Bool(b)),
            serde_json::Value::Number(n) => Ok(AttrValue::Number(n)),
            serde_json::Value::String(s) => Ok(AttrValue::String(s)),
            other => Err(Error::InvalidAttributes(format!(
                "attribute values must be scalars, got {}",
                other
            ))),
        };
    }
}

impl From<AttrValue> for serde_json::Value {
    fn from(value: AttrValue) -> serde_json::Value {
        return match value {
            AttrValue::Null => serde_json::Value::Null,
            AttrValue::Bool(b) => serde_json::Value::Bool(b),
            AttrValue::Number(n) => serde_json::Value::Number(n),
            AttrValue::String(s) => serde_json::Value::String(s),
        };
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            AttrValue::Null => write!(f, "null"),
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Number(n) => write!(f, "{}", n),
            AttrValue::String(s) => write!(f, "{:?}", s),
        };
    }
}

/// A flat map from attribute name to scalar value.
///
/// Keys are kept sorted so that equality, display and serialization are
/// independent of insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, AttrValue>);

/// Shared empty map, handed out for ops that cannot carry attributes.
pub(crate) static EMPTY_ATTRIBUTES: Attributes = Attributes(BTreeMap::new());

impl Attributes {
    /// Create an empty (absent) attribute map.
    pub fn new() -> Attributes {
        return Attributes(BTreeMap::new());
    }

    /// Builder-style insert, for literals like `Attributes::new().with("bold", true)`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Attributes {
        self.0.insert(key.into(), value.into());
        return self;
    }

    /// Set a key, returning the previous value if there was one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Option<AttrValue> {
        return self.0.insert(key.into(), value.into());
    }

    /// Remove a key entirely.
    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        return self.0.remove(key);
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        return self.0.get(key);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        return self.0.contains_key(key);
    }

    pub fn len(&self) -> usize {
        return self.0.len();
    }

    /// An empty map is indistinguishable from no map at all.
    pub fn is_empty(&self) -> bool {
        return self.0.is_empty();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
        return self.0.iter();
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        return self.0.keys();
    }

    /// Drop every key whose value is `Null`.
    fn without_nulls(mut self) -> Attributes {
        self.0.retain(|_, v| !v.is_null());
        return self;
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        return Attributes(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
    }
}

impl TryFrom<serde_json::Value> for Attributes {
    type Error = Error;

    /// Accepts `null` (absent) or a flat object of scalars.
    fn try_from(value: serde_json::Value) -> Result<Self, Error> {
        let map = match value {
            serde_json::Value::Null => return Ok(Attributes::new()),
            serde_json::Value::Object(map) => map,
            other => {
                return Err(Error::InvalidAttributes(format!("expected a map, got {}", other)));
            }
        };

        let mut attributes = Attributes::new();
        for (key, value) in map {
            attributes.0.insert(key, AttrValue::try_from(value)?);
        }
        return Ok(attributes);
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        return write!(f, "}}");
    }
}

/// Layer `b` over `a`: keys of `b` win, keys only in `a` are kept.
///
/// With `keep_null` false every `Null` is dropped from the result, which is
/// what an insert needs; retains keep them so the removal still applies to
/// whatever the retain lands on later.
pub fn compose(a: &Attributes, b: &Attributes, keep_null: bool) -> Attributes {
    let mut result = a.clone();
    for (key, value) in b.iter() {
        result.0.insert(key.clone(), value.clone());
    }

    if keep_null {
        return result;
    }
    return result.without_nulls();
}

/// Keys whose value differs between `a` and `b`, mapped to `b`'s value.
///
/// A key missing from `b` maps to `Null`. Missing and `Null` compare equal,
/// so `compose(a, &diff(a, b), false) == b` for any `b` without nulls.
pub fn diff(a: &Attributes, b: &Attributes) -> Attributes {
    let mut result = Attributes::new();
    let keys = a.keys().chain(b.keys());

    for key in keys {
        if result.contains_key(key) {
            continue;
        }
        let left = a.get(key).filter(|v| !v.is_null());
        let right = b.get(key).filter(|v| !v.is_null());
        if left != right {
            result.0.insert(key.clone(), right.cloned().unwrap_or(AttrValue::Null));
        }
    }

    return result;
}

/// Re-express `b` so it can be applied after a concurrent `a`.
///
/// When `a` has priority it wins every key both maps set, so only the keys
/// `a` does not mention survive. Without priority `b` is returned unchanged.
pub fn transform(a: &Attributes, b: &Attributes, priority: bool) -> Attributes {
    if !priority || a.is_empty() || b.is_empty() {
        return b.clone();
    }

    return b
        .iter()
        .filter(|(key, _)| !a.contains_key(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
}
