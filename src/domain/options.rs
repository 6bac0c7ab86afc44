// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch write options.
//!
//! `BatchOptions` controls how the batch writer chunks, retries, and degrades. Options can
//! be built in code, deserialized from YAML or JSON, and overridden from environment
//! variables.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::ConfigValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Default number of retries after the first transaction attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Default upper bound on the delay between retries.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Default per-transaction operation ceiling, matching etcd's `--max-txn-ops`.
pub const DEFAULT_MAX_TXN_OPS: usize = 128;

/// Options for a batch write.
///
/// Durations are serialized as whole milliseconds (`initial_backoff_ms`,
/// `max_backoff_ms`). Missing fields take their defaults.
///
/// # Examples
///
/// ```
/// use kvdoc::domain::BatchOptions;
/// use std::time::Duration;
///
/// let options = BatchOptions::default()
///     .with_max_retries(5)
///     .with_fallback(true)
///     .with_max_txn_ops(64);
///
/// assert_eq!(options.backoff_for(0), Duration::from_millis(100));
/// assert_eq!(options.backoff_for(1), Duration::from_millis(200));
/// assert!(options.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Number of retries after the first attempt of each chunk
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each later retry
    #[serde(rename = "initial_backoff_ms", with = "duration_ms")]
    pub initial_backoff: Duration,
    /// Upper bound on the delay between retries
    #[serde(rename = "max_backoff_ms", with = "duration_ms")]
    pub max_backoff: Duration,
    /// Whether to write keys one by one once a chunk's retries are exhausted
    pub fallback_enabled: bool,
    /// Maximum number of operations the store accepts in one transaction
    pub max_txn_ops: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
            fallback_enabled: false,
            max_txn_ops: DEFAULT_MAX_TXN_OPS,
        }
    }
}

impl BatchOptions {
    /// Sets the number of retries after the first attempt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the initial and maximum retry delays.
    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Enables or disables the single-key fallback.
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }

    /// Sets the per-transaction operation ceiling.
    pub fn with_max_txn_ops(mut self, max_txn_ops: usize) -> Self {
        self.max_txn_ops = max_txn_ops;
        self
    }

    /// Returns the delay to wait before retry number `retry + 1`.
    ///
    /// The delay starts at `initial_backoff`, doubles per retry, and never exceeds
    /// `max_backoff`.
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }

    /// Checks that the options describe a usable write policy.
    pub fn validate(&self) -> Result<()> {
        if self.max_txn_ops == 0 {
            return Err(ConfigError::InvalidOptions {
                message: "max_txn_ops must be at least 1".to_string(),
            });
        }
        if self.max_backoff < self.initial_backoff {
            return Err(ConfigError::InvalidOptions {
                message: format!(
                    "max_backoff ({:?}) is shorter than initial_backoff ({:?})",
                    self.max_backoff, self.initial_backoff
                ),
            });
        }
        Ok(())
    }

    /// Loads options from a YAML document.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let options: Self = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse batch options: {}", e),
            source: Some(Box::new(e)),
        })?;
        options.validate()?;
        Ok(options)
    }

    /// Applies overrides from the process environment.
    ///
    /// Reads `<PREFIX>MAX_RETRIES`, `<PREFIX>INITIAL_BACKOFF_MS`, `<PREFIX>MAX_BACKOFF_MS`,
    /// `<PREFIX>FALLBACK_ENABLED` and `<PREFIX>MAX_TXN_OPS`.
    pub fn with_env_overrides(self, prefix: &str) -> Result<Self> {
        let vars: HashMap<String, String> = env::vars()
            .filter(|(key, _)| key.starts_with(prefix))
            .collect();
        self.apply_overrides(prefix, &vars)
    }

    /// Applies overrides from a map of variables named like the environment overrides.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvdoc::domain::BatchOptions;
    /// use std::collections::HashMap;
    ///
    /// let mut vars = HashMap::new();
    /// vars.insert("KVDOC_FALLBACK_ENABLED".to_string(), "yes".to_string());
    /// vars.insert("KVDOC_MAX_TXN_OPS".to_string(), "64".to_string());
    ///
    /// let options = BatchOptions::default().apply_overrides("KVDOC_", &vars).unwrap();
    /// assert!(options.fallback_enabled);
    /// assert_eq!(options.max_txn_ops, 64);
    /// ```
    pub fn apply_overrides(mut self, prefix: &str, vars: &HashMap<String, String>) -> Result<Self> {
        let lookup = |name: &str| {
            let key = format!("{}{}", prefix, name);
            vars.get(&key).map(|raw| (ConfigValue::from(raw.as_str()), key))
        };

        if let Some((value, key)) = lookup("MAX_RETRIES") {
            self.max_retries = value.as_u32(&key)?;
        }
        if let Some((value, key)) = lookup("INITIAL_BACKOFF_MS") {
            self.initial_backoff = Duration::from_millis(value.as_u64(&key)?);
        }
        if let Some((value, key)) = lookup("MAX_BACKOFF_MS") {
            self.max_backoff = Duration::from_millis(value.as_u64(&key)?);
        }
        if let Some((value, key)) = lookup("FALLBACK_ENABLED") {
            self.fallback_enabled = value.as_bool(&key)?;
        }
        if let Some((value, key)) = lookup("MAX_TXN_OPS") {
            self.max_txn_ops = value.parse::<usize>(&key)?;
        }

        tracing::debug!("Batch options after overrides: {:?}", self);
        self.validate()?;
        Ok(self)
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
