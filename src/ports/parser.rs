// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document parser trait definition.
//!
//! This module defines the `DocumentParser` trait, which provides an interface for
//! decoding configuration files in different formats (YAML, JSON, etc.) into nested
//! documents, and for rendering documents back into that format.

use crate::domain::{NestedDocument, Result};

/// A trait for parsing and rendering configuration documents.
///
/// Parsers keep the document nested; flattening into store keys is done separately by
/// `flatten`, so every format shares the same key layout.
///
/// # Examples
///
/// ```rust
/// use kvdoc::ports::DocumentParser;
/// use kvdoc::domain::{NestedDocument, Result};
///
/// struct JsonParser;
///
/// impl DocumentParser for JsonParser {
///     fn parse(&self, content: &str) -> Result<NestedDocument> {
///         NestedDocument::from_json_str(content)
///     }
///
///     fn render(&self, doc: &NestedDocument) -> Result<String> {
///         doc.to_json_string()
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["json"]
///     }
/// }
///
/// let doc = JsonParser.parse(r#"{"a": {"b": 1}}"#).unwrap();
/// assert!(doc.get("/a/b").is_some());
/// ```
pub trait DocumentParser {
    /// Parses configuration content into a nested document.
    ///
    /// # Returns
    ///
    /// * `Ok(NestedDocument)` - The parsed document
    /// * `Err(ConfigError)` - The content is malformed or its root is not a mapping
    fn parse(&self, content: &str) -> Result<NestedDocument>;

    /// Renders a nested document in this parser's format.
    fn render(&self, doc: &NestedDocument) -> Result<String>;

    /// Returns the file extensions supported by this parser.
    ///
    /// Extensions are given without the leading dot.
    fn supported_extensions(&self) -> &[&str];
}
