// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rebuilding nested documents from store pairs.

use crate::domain::document::{DocValue, Mapping, NestedDocument};
use crate::domain::errors::{ConfigError, Result};
use crate::domain::ConfigPair;

/// Rebuilds a nested document from slash-delimited key/value pairs.
///
/// Each key has one leading separator stripped and is split into segments, ignoring
/// empty ones, so `/a//b` and `/a/b` address the same leaf. Keys with no segments and
/// pairs with an empty value are skipped without creating any path. Values become string
/// leaves; when two pairs name the same leaf, the later one wins.
///
/// # Errors
///
/// Fails without returning a partial document when the pairs cannot form one tree:
///
/// - `ConfigError::ValueCollision` when a key descends through a path that already holds
///   a value, naming that path and the segment that could not be appended;
/// - `ConfigError::DirectoryCollision` when a key's leaf is already a directory for other
///   keys, naming the offending key.
///
/// # Examples
///
/// ```
/// use kvdoc::domain::{unflatten, ConfigError, ConfigPair, DocValue};
///
/// let doc = unflatten(&[ConfigPair::new("/app/name", "x")]).unwrap();
/// assert_eq!(doc.get("/app/name"), Some(&DocValue::from("x")));
///
/// let err = unflatten(&[ConfigPair::new("/a", "1"), ConfigPair::new("/a/b", "2")]).unwrap_err();
/// assert!(matches!(err, ConfigError::ValueCollision { ref path, .. } if path == "/a"));
/// ```
pub fn unflatten(pairs: &[ConfigPair]) -> Result<NestedDocument> {
    let mut root = Mapping::new();

    for pair in pairs {
        if pair.value.is_empty() {
            continue;
        }
        let segments: Vec<&str> = pair.key.segments().collect();
        let Some((leaf, parents)) = segments.split_last() else {
            continue;
        };

        let mut node = &mut root;
        for (depth, segment) in parents.iter().enumerate() {
            let child = node
                .entry((*segment).to_string())
                .or_insert_with(|| DocValue::Mapping(Mapping::new()));
            node = match child {
                DocValue::Mapping(map) => map,
                _ => {
                    return Err(ConfigError::ValueCollision {
                        path: format!("/{}", segments[..=depth].join("/")),
                        segment: segments[depth + 1].to_string(),
                    });
                }
            };
        }

        if let Some(DocValue::Mapping(_)) = node.get(*leaf) {
            return Err(ConfigError::DirectoryCollision {
                key: pair.key.to_string(),
            });
        }
        node.insert(
            (*leaf).to_string(),
            DocValue::String(pair.value.as_string()),
        );
    }

    Ok(NestedDocument::from(root))
}
