// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value type with type-safe conversions.
//!
//! This module provides the `ConfigValue` type, which holds the canonical string form of
//! a value stored under a key, and provides type-safe conversion methods to various Rust
//! types.

use crate::domain::document::DocValue;
use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A type-safe wrapper for stored configuration values.
///
/// The store only holds strings, so `ConfigValue` keeps the canonical string rendering of
/// a scalar (or the compact JSON rendering of a sequence) and converts on demand.
///
/// # Examples
///
/// ```
/// use kvdoc::domain::config_value::ConfigValue;
///
/// let value = ConfigValue::new("42".to_string());
/// assert_eq!(value.as_str(), "42");
/// assert_eq!(value.as_i64("/app/port").unwrap(), 42);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue(String);

impl ConfigValue {
    /// Creates a new `ConfigValue` from a `String`.
    pub fn new(value: String) -> Self {
        ConfigValue(value)
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the value into a `String`.
    pub fn as_string(&self) -> String {
        self.0.clone()
    }

    /// Returns true if the value is the empty string.
    ///
    /// Empty values are treated as absent by both transforms.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the value to a boolean.
    ///
    /// Recognizes the following values (case-insensitive):
    /// - `true`: "true", "yes", "1", "on"
    /// - `false`: "false", "no", "0", "off"
    ///
    /// # Examples
    ///
    /// ```
    /// use kvdoc::domain::config_value::ConfigValue;
    ///
    /// let value = ConfigValue::from("yes");
    /// assert_eq!(value.as_bool("/feature/enabled").unwrap(), true);
    /// ```
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self.0.to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => self
                .0
                .parse::<bool>()
                .map_err(|e| ConfigError::from_parse_bool_error(key.to_string(), e)),
        }
    }

    /// Converts the value to an `i64`.
    pub fn as_i64(&self, key: &str) -> Result<i64> {
        self.0
            .parse::<i64>()
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
    }

    /// Converts the value to a `u32`.
    pub fn as_u32(&self, key: &str) -> Result<u32> {
        self.0
            .parse::<u32>()
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
    }

    /// Converts the value to a `u64`.
    pub fn as_u64(&self, key: &str) -> Result<u64> {
        self.0
            .parse::<u64>()
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
    }

    /// Converts the value to an `f64`.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        self.0
            .parse::<f64>()
            .map_err(|e| ConfigError::from_parse_float_error(key.to_string(), e))
    }

    /// Parses the value into any type that implements `FromStr`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvdoc::domain::config_value::ConfigValue;
    /// use std::net::IpAddr;
    ///
    /// let value = ConfigValue::from("127.0.0.1");
    /// let ip: IpAddr = value.parse("/server/bind").unwrap();
    /// assert!(ip.is_loopback());
    /// ```
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.0
            .parse::<T>()
            .map_err(|e| ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: std::any::type_name::<T>().to_string(),
                source: Box::new(e),
            })
    }

    /// Decodes a sequence that was stored in its compact JSON form.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvdoc::domain::{config_value::ConfigValue, DocValue};
    ///
    /// let value = ConfigValue::from(r#"["a",1]"#);
    /// let items = value.as_sequence("/hosts").unwrap();
    /// assert_eq!(items, vec![DocValue::from("a"), DocValue::Integer(1)]);
    /// ```
    pub fn as_sequence(&self, key: &str) -> Result<Vec<DocValue>> {
        let parsed: serde_json::Value =
            serde_json::from_str(&self.0).map_err(|e| ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: "sequence".to_string(),
                source: Box::new(e),
            })?;
        match DocValue::from(parsed) {
            DocValue::Sequence(items) => Ok(items),
            other => Err(ConfigError::ParseError {
                message: format!("Value of '{}' is a {}, not a sequence", key, other.kind()),
                source: None,
            }),
        }
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue(s.to_string())
    }
}

impl From<ConfigValue> for String {
    fn from(value: ConfigValue) -> Self {
        value.0
    }
}

impl AsRef<str> for ConfigValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_value_from_str() {
        let value = ConfigValue::from("test");
        assert_eq!(value.as_str(), "test");
        assert_eq!(value.as_string(), "test");
        assert!(!value.is_empty());
        assert!(ConfigValue::from("").is_empty());
    }

    #[test]
    fn test_as_bool_variants() {
        for val in ["true", "True", "YES", "1", "on"] {
            assert!(ConfigValue::from(val).as_bool("k").unwrap(), "{}", val);
        }
        for val in ["false", "No", "0", "OFF"] {
            assert!(!ConfigValue::from(val).as_bool("k").unwrap(), "{}", val);
        }
    }

    #[test]
    fn test_as_bool_invalid() {
        let err = ConfigValue::from("maybe").as_bool("/flag").unwrap_err();
        assert!(matches!(err, ConfigError::TypeConversionError { .. }));
        assert!(err.to_string().contains("/flag"));
    }

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(ConfigValue::from("-7").as_i64("k").unwrap(), -7);
        assert_eq!(ConfigValue::from("7").as_u32("k").unwrap(), 7);
        assert_eq!(ConfigValue::from("7").as_u64("k").unwrap(), 7);
        assert_eq!(ConfigValue::from("2.5").as_f64("k").unwrap(), 2.5);
        assert!(ConfigValue::from("-7").as_u32("k").is_err());
        assert!(ConfigValue::from("abc").as_f64("k").is_err());
    }

    #[test]
    fn test_parse_generic() {
        let port: u16 = ConfigValue::from("8080").parse("k").unwrap();
        assert_eq!(port, 8080);

        let err = ConfigValue::from("99999").parse::<u16>("k").unwrap_err();
        assert!(err.to_string().contains("u16"));
    }

    #[test]
    fn test_as_sequence_rejects_scalars() {
        assert!(ConfigValue::from("not json").as_sequence("k").is_err());
        let err = ConfigValue::from("{\"a\":1}").as_sequence("/m").unwrap_err();
        assert!(err.to_string().contains("mapping"));
    }

    #[test]
    fn test_serde_is_transparent_string() {
        let value = ConfigValue::from("x");
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"x\"");
    }
}
