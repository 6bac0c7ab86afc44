// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flattening nested documents into store pairs.

use crate::domain::document::{DocValue, Mapping, NestedDocument};
use crate::domain::{ConfigKey, ConfigPair, ConfigValue};

/// Flattens a nested document into slash-delimited key/value pairs.
///
/// Mappings are walked recursively, each level appending `/<key>` to the path. Scalars
/// are rendered to their canonical string form. Non-empty sequences are not descended
/// into: each is stored whole under its own key as compact JSON, so sequence items are
/// never addressable individually.
///
/// Nothing is emitted for nulls, empty sequences, empty mappings, or scalars whose
/// rendering is the empty string. Non-finite floats inside a sequence are encoded as
/// `null`, so every sequence has an encoding.
///
/// Callers must not rely on the order of the returned pairs.
///
/// # Examples
///
/// ```
/// use kvdoc::domain::{flatten, ConfigPair, NestedDocument};
///
/// let doc = NestedDocument::from_json_str(r#"{"app": {"name": "x", "port": 8080}}"#).unwrap();
/// let mut pairs = flatten(&doc);
/// pairs.sort_by(|a, b| a.key.cmp(&b.key));
///
/// assert_eq!(
///     pairs,
///     vec![ConfigPair::new("/app/name", "x"), ConfigPair::new("/app/port", "8080")]
/// );
/// ```
pub fn flatten(doc: &NestedDocument) -> Vec<ConfigPair> {
    let mut pairs = Vec::new();
    flatten_mapping(doc.root(), &ConfigKey::root(), &mut pairs);
    pairs
}

fn flatten_mapping(map: &Mapping, prefix: &ConfigKey, pairs: &mut Vec<ConfigPair>) {
    for (segment, value) in map {
        let key = prefix.child(segment);
        match value {
            DocValue::Mapping(child) => flatten_mapping(child, &key, pairs),
            DocValue::Sequence(items) if items.is_empty() => {}
            DocValue::Sequence(items) => {
                let json = serde_json::Value::Array(items.iter().map(DocValue::to_json).collect());
                pairs.push(ConfigPair::new(key, json.to_string()));
            }
            scalar => {
                if let Some(rendered) = scalar.canonical_scalar().filter(|s| !s.is_empty()) {
                    pairs.push(ConfigPair {
                        key,
                        value: ConfigValue::new(rendered),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn doc(json: &str) -> NestedDocument {
        NestedDocument::from_json_str(json).unwrap()
    }

    fn as_map(pairs: Vec<ConfigPair>) -> BTreeMap<String, String> {
        pairs
            .into_iter()
            .map(|p| (p.key.into_string(), p.value.into()))
            .collect()
    }

    #[test]
    fn test_flatten_nested_mapping() {
        let pairs = as_map(flatten(&doc(r#"{"app": {"name": "x", "port": 8080}}"#)));
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs["/app/name"], "x");
        assert_eq!(pairs["/app/port"], "8080");
    }

    #[test]
    fn test_flatten_scalar_kinds() {
        let pairs = as_map(flatten(&doc(
            r#"{"b": true, "f": 0.25, "i": -3, "s": "text", "whole": 2.0}"#,
        )));
        assert_eq!(pairs["/b"], "true");
        assert_eq!(pairs["/f"], "0.25");
        assert_eq!(pairs["/i"], "-3");
        assert_eq!(pairs["/s"], "text");
        assert_eq!(pairs["/whole"], "2");
    }

    #[test]
    fn test_flatten_skips_null_and_empty() {
        let pairs = as_map(flatten(&doc(
            r#"{"n": null, "e": "", "list": [], "m": {}, "keep": "y"}"#,
        )));
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs["/keep"], "y");
    }

    #[test]
    fn test_flatten_sequence_is_single_pair() {
        let pairs = as_map(flatten(&doc(
            r#"{"hosts": ["a", "b"], "mixed": [1, {"z": 1, "a": null}]}"#,
        )));
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs["/hosts"], r#"["a","b"]"#);
        assert_eq!(pairs["/mixed"], r#"[1,{"a":null,"z":1}]"#);
    }

    #[test]
    fn test_flatten_sequence_with_non_finite_float() {
        let mut doc = NestedDocument::new();
        doc.insert(
            "ratios",
            DocValue::Sequence(vec![DocValue::Float(f64::NAN), DocValue::Float(1.5)]),
        );
        let pairs = as_map(flatten(&doc));
        assert_eq!(pairs["/ratios"], "[null,1.5]");
    }

    #[test]
    fn test_flatten_empty_document() {
        assert!(flatten(&NestedDocument::new()).is_empty());
    }

    #[test]
    fn test_flatten_deep_path() {
        let pairs = flatten(&doc(r#"{"a": {"b": {"c": {"d": "deep"}}}}"#));
        assert_eq!(pairs, vec![ConfigPair::new("/a/b/c/d", "deep")]);
    }

    #[test]
    fn test_flatten_is_repeatable() {
        let d = doc(r#"{"x": {"y": 1, "z": [true]}, "w": "v"}"#);
        assert_eq!(as_map(flatten(&d)), as_map(flatten(&d)));
    }
}
