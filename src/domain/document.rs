// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nested document model.
//!
//! A `NestedDocument` is the tree-shaped view of configuration that operators author and
//! read: an ordered mapping from string keys to scalars, sequences, or further mappings.
//! Documents are produced by parsers (see the YAML adapter) or by `unflatten`, and are
//! consumed by `flatten`.

use crate::domain::errors::{ConfigError, Result};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// An ordered mapping of document keys to values.
pub type Mapping = BTreeMap<String, DocValue>;

/// A single value inside a nested document.
///
/// The set of kinds is closed: every consumer matches on it exhaustively rather than
/// inspecting types at runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum DocValue {
    /// An explicit null or missing value
    Null,
    /// A boolean scalar
    Bool(bool),
    /// A signed integer scalar
    Integer(i64),
    /// A floating point scalar
    Float(f64),
    /// A string scalar
    String(String),
    /// An ordered list of values
    Sequence(Vec<DocValue>),
    /// A nested mapping
    Mapping(Mapping),
}

impl DocValue {
    /// Renders a scalar to its canonical string form.
    ///
    /// Returns `None` for sequences and mappings. `Null` renders as the empty string,
    /// which callers treat as absence.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvdoc::domain::DocValue;
    ///
    /// assert_eq!(DocValue::Integer(8080).canonical_scalar().as_deref(), Some("8080"));
    /// assert_eq!(DocValue::Float(0.5).canonical_scalar().as_deref(), Some("0.5"));
    /// assert_eq!(DocValue::Bool(true).canonical_scalar().as_deref(), Some("true"));
    /// assert_eq!(DocValue::Sequence(vec![]).canonical_scalar(), None);
    /// ```
    pub fn canonical_scalar(&self) -> Option<String> {
        match self {
            DocValue::Null => Some(String::new()),
            DocValue::Bool(b) => Some(b.to_string()),
            DocValue::Integer(i) => Some(i.to_string()),
            DocValue::Float(f) => Some(f.to_string()),
            DocValue::String(s) => Some(s.clone()),
            DocValue::Sequence(_) | DocValue::Mapping(_) => None,
        }
    }

    /// Returns the nested mapping if this value is one.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            DocValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the string contents if this value is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts the value to JSON. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            DocValue::Null => serde_json::Value::Null,
            DocValue::Bool(b) => serde_json::Value::Bool(*b),
            DocValue::Integer(i) => serde_json::Value::from(*i),
            DocValue::Float(f) => serde_json::Value::from(*f),
            DocValue::String(s) => serde_json::Value::String(s.clone()),
            DocValue::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(DocValue::to_json).collect())
            }
            DocValue::Mapping(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    /// Returns a short name for the kind of value, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            DocValue::Null => "null",
            DocValue::Bool(_) => "boolean",
            DocValue::Integer(_) => "integer",
            DocValue::Float(_) => "float",
            DocValue::String(_) => "string",
            DocValue::Sequence(_) => "sequence",
            DocValue::Mapping(_) => "mapping",
        }
    }
}

impl Serialize for DocValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            DocValue::Null => serializer.serialize_unit(),
            DocValue::Bool(b) => serializer.serialize_bool(*b),
            DocValue::Integer(i) => serializer.serialize_i64(*i),
            DocValue::Float(f) => serializer.serialize_f64(*f),
            DocValue::String(s) => serializer.serialize_str(s),
            DocValue::Sequence(items) => items.serialize(serializer),
            DocValue::Mapping(map) => map.serialize(serializer),
        }
    }
}

impl From<serde_json::Value> for DocValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => DocValue::Null,
            serde_json::Value::Bool(b) => DocValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => DocValue::Integer(i),
                // u64 values past i64::MAX land here
                None => n.as_f64().map(DocValue::Float).unwrap_or(DocValue::Null),
            },
            serde_json::Value::String(s) => DocValue::String(s),
            serde_json::Value::Array(items) => {
                DocValue::Sequence(items.into_iter().map(DocValue::from).collect())
            }
            serde_json::Value::Object(map) => DocValue::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, DocValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for DocValue {
    fn from(s: &str) -> Self {
        DocValue::String(s.to_string())
    }
}

impl From<String> for DocValue {
    fn from(s: String) -> Self {
        DocValue::String(s)
    }
}

impl From<i64> for DocValue {
    fn from(i: i64) -> Self {
        DocValue::Integer(i)
    }
}

impl From<f64> for DocValue {
    fn from(f: f64) -> Self {
        DocValue::Float(f)
    }
}

impl From<bool> for DocValue {
    fn from(b: bool) -> Self {
        DocValue::Bool(b)
    }
}

impl From<Mapping> for DocValue {
    fn from(map: Mapping) -> Self {
        DocValue::Mapping(map)
    }
}

/// A nested configuration document.
///
/// The root is always a mapping. Keys are kept in sorted order so that rendering and
/// flattening are deterministic.
///
/// # Examples
///
/// ```
/// use kvdoc::domain::{DocValue, NestedDocument};
///
/// let doc = NestedDocument::from_json_str(r#"{"app": {"name": "x", "port": 8080}}"#).unwrap();
/// assert_eq!(doc.get("/app/port"), Some(&DocValue::Integer(8080)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NestedDocument(Mapping);

impl NestedDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        NestedDocument(Mapping::new())
    }

    /// Returns the root mapping.
    pub fn root(&self) -> &Mapping {
        &self.0
    }

    /// Returns the root mapping mutably.
    pub fn root_mut(&mut self) -> &mut Mapping {
        &mut self.0
    }

    /// Consumes the document, returning its root mapping.
    pub fn into_mapping(self) -> Mapping {
        self.0
    }

    /// Inserts a top-level entry, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DocValue>) -> Option<DocValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns true if the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of top-level entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Looks up a value by slash-delimited path.
    ///
    /// Empty segments are ignored; the empty path addresses nothing.
    pub fn get(&self, path: &str) -> Option<&DocValue> {
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }

    /// Parses a JSON object into a document.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse JSON: {}", e),
                source: Some(Box::new(e)),
            })?;
        Self::try_from(value)
    }

    /// Renders the document as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to render JSON: {}", e),
            source: Some(Box::new(e)),
        })
    }
}

impl From<Mapping> for NestedDocument {
    fn from(map: Mapping) -> Self {
        NestedDocument(map)
    }
}

impl TryFrom<serde_json::Value> for NestedDocument {
    type Error = ConfigError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match DocValue::from(value) {
            DocValue::Mapping(map) => Ok(NestedDocument(map)),
            DocValue::Null => Ok(NestedDocument::new()),
            other => Err(ConfigError::ParseError {
                message: format!("Document root must be a mapping, found {}", other.kind()),
                source: None,
            }),
        }
    }
}
