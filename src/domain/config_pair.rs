// SPDX-License-Identifier: MIT OR Apache-2.0

//! The unit of exchange between documents and the store.

use crate::domain::{ConfigKey, ConfigValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One key and its canonical value.
///
/// Pairs are produced by `flatten` or read from a store, and consumed by the batch
/// writer or by `unflatten`.
///
/// # Examples
///
/// ```
/// use kvdoc::domain::ConfigPair;
///
/// let pair = ConfigPair::new("/app/name", "x");
/// assert_eq!(pair.key.as_str(), "/app/name");
/// assert_eq!(pair.value.as_str(), "x");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPair {
    /// Slash-delimited path of the value
    pub key: ConfigKey,
    /// Canonical string form of the value
    pub value: ConfigValue,
}

impl ConfigPair {
    /// Creates a pair from anything convertible into a key and a value.
    pub fn new(key: impl Into<ConfigKey>, value: impl Into<ConfigValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ConfigPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl<K: Into<ConfigKey>, V: Into<ConfigValue>> From<(K, V)> for ConfigPair {
    fn from((key, value): (K, V)) -> Self {
        ConfigPair::new(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_from_tuple() {
        let pair: ConfigPair = ("/a/b", "1").into();
        assert_eq!(pair, ConfigPair::new("/a/b", "1"));
        assert_eq!(pair.to_string(), "/a/b=1");
    }
}
