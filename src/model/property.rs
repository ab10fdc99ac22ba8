//! Typed property values and the insertion-ordered property map

use crate::error::{Error, Result};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// A single property value.
///
/// Every value is a byte string on disk; the tag records how it was
/// interpreted at decode time so untouched values re-encode unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    Text(String),
    Integer(i64),
    Float(f64),
    /// Bytes the player can't read as text (invalid UTF-8 or oversized)
    Bytes(Vec<u8>),
}

impl PropertyValue {
    /// Name of the variant, used in type mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Text(_) => "text",
            PropertyValue::Integer(_) => "integer",
            PropertyValue::Float(_) => "float",
            PropertyValue::Bytes(_) => "bytes",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            PropertyValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// On-disk representation
    pub fn to_wire(&self) -> Cow<'_, [u8]> {
        match self {
            PropertyValue::Text(s) => Cow::Borrowed(s.as_bytes()),
            PropertyValue::Integer(v) => Cow::Owned(v.to_string().into_bytes()),
            PropertyValue::Float(v) => Cow::Owned(v.to_string().into_bytes()),
            PropertyValue::Bytes(b) => Cow::Borrowed(b),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Integer(v) => write!(f, "{}", v),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Integer(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Integer(v.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(b: Vec<u8>) -> Self {
        PropertyValue::Bytes(b)
    }
}

/// Ordered key/value store with unique keys.
///
/// Blocks hold a few dozen entries at most, so lookups are linear scans.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropertyMap {
    entries: Vec<(String, PropertyValue)>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            entries: Vec::with_capacity(cap),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Set a value, keeping the existing type tag.
    ///
    /// New keys are appended. Existing keys keep their slot; a value of a
    /// different variant is rejected.
    pub fn set(&mut self, key: &str, value: PropertyValue) -> Result<()> {
        match self.position(key) {
            Some(i) => {
                let current = &mut self.entries[i].1;
                if std::mem::discriminant(current) != std::mem::discriminant(&value) {
                    return Err(Error::PropertyTypeMismatch {
                        key: key.to_string(),
                        expected: current.kind(),
                        found: value.kind(),
                    });
                }
                *current = value;
            }
            None => self.entries.push((key.to_string(), value)),
        }
        Ok(())
    }

    /// Set a value regardless of the current type tag, keeping the slot.
    pub fn replace(&mut self, key: &str, value: PropertyValue) -> Option<PropertyValue> {
        match self.position(key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key.to_string(), value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Append without the duplicate check; the reader validates keys first.
    pub(crate) fn push_unchecked(&mut self, key: String, value: PropertyValue) {
        self.entries.push((key, value));
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}
