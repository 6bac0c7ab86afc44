// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration key newtype for slash-delimited store paths.
//!
//! This module provides the `ConfigKey` type, which is a newtype wrapper around `String`
//! holding a path such as `/app/database/host`. It keeps keys from being confused with
//! values and provides the path helpers used when moving between documents and the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The separator between path segments in a key.
pub const SEPARATOR: char = '/';

/// A type-safe wrapper for slash-delimited configuration keys.
///
/// # Examples
///
/// ```
/// use kvdoc::domain::config_key::ConfigKey;
///
/// let key = ConfigKey::from("/database/host");
/// let key2 = ConfigKey::from("/database/port".to_string());
///
/// assert_eq!(key.as_str(), "/database/host");
/// assert_eq!(key2.segments().collect::<Vec<_>>(), vec!["database", "port"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new `ConfigKey` from a `String`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvdoc::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::new("/app/name".to_string());
    /// assert_eq!(key.as_str(), "/app/name");
    /// ```
    pub fn new(key: String) -> Self {
        ConfigKey(key)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Iterates over the non-empty path segments of the key.
    ///
    /// One leading separator is ignored and empty segments produced by doubled
    /// separators are dropped, so `/a//b` yields `a` then `b`. The root key `/`
    /// has no segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvdoc::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::from("/a//b/");
    /// assert_eq!(key.segments().collect::<Vec<_>>(), vec!["a", "b"]);
    /// assert_eq!(ConfigKey::from("/").segments().count(), 0);
    /// ```
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        let trimmed = self.0.strip_prefix(SEPARATOR).unwrap_or(self.0.as_str());
        trimmed.split(SEPARATOR).filter(|segment| !segment.is_empty())
    }

    /// Returns a new key with `segment` appended below this one.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvdoc::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::root().child("app").child("port");
    /// assert_eq!(key.as_str(), "/app/port");
    /// ```
    pub fn child(&self, segment: &str) -> Self {
        let mut path = String::with_capacity(self.0.len() + segment.len() + 1);
        path.push_str(self.0.trim_end_matches(SEPARATOR));
        path.push(SEPARATOR);
        path.push_str(segment);
        ConfigKey(path)
    }

    /// Returns the empty root key that `child` builds on.
    pub fn root() -> Self {
        ConfigKey(String::new())
    }

    /// Returns this key placed under a store namespace prefix.
    ///
    /// An empty prefix leaves the key unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvdoc::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::from("/db/host").with_prefix("/prod/");
    /// assert_eq!(key.as_str(), "/prod/db/host");
    /// ```
    pub fn with_prefix(&self, prefix: &str) -> Self {
        if prefix.is_empty() {
            return self.clone();
        }
        let prefix = prefix.trim_end_matches(SEPARATOR);
        if self.0.starts_with(SEPARATOR) {
            ConfigKey(format!("{}{}", prefix, self.0))
        } else {
            ConfigKey(format!("{}{}{}", prefix, SEPARATOR, self.0))
        }
    }

    /// Removes a store namespace prefix, returning `None` if the key is not under it.
    ///
    /// The remainder always starts with a separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvdoc::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::from("/prod/db/host");
    /// assert_eq!(key.strip_prefix("/prod").unwrap().as_str(), "/db/host");
    /// assert!(key.strip_prefix("/staging").is_none());
    /// ```
    pub fn strip_prefix(&self, prefix: &str) -> Option<Self> {
        let prefix = prefix.trim_end_matches(SEPARATOR);
        let rest = self.0.strip_prefix(prefix)?;
        if rest.is_empty() {
            return Some(ConfigKey(SEPARATOR.to_string()));
        }
        if !rest.starts_with(SEPARATOR) {
            return None;
        }
        Some(ConfigKey(rest.to_string()))
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey(s.to_string())
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Hash for ConfigKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
