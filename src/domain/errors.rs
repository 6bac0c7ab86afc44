// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the kvdoc crate.
//!
//! This module defines the error types that can occur while transforming documents,
//! talking to a key-value store, or running a batch write. All errors use `thiserror`
//! for proper error handling and conversion.

use crate::domain::batch_result::BatchResult;
use std::num::{ParseFloatError, ParseIntError};
use std::str::ParseBoolError;
use thiserror::Error;

/// The main error type for kvdoc operations.
///
/// The variants fall into four families:
///
/// - **Structural collisions** (`ValueCollision`, `DirectoryCollision`): the input pairs
///   cannot be arranged into a single tree. These are never retried.
/// - **Transient write failures** (`StoreError`, `TransactionRejected`, and any other
///   error a store returns, such as `IoError`): retried by the batch writer according
///   to its options.
/// - **Terminal batch failures** (`ChunkFailed`, `FallbackFailed`): retries and, where
///   enabled, the per-key fallback have been exhausted.
/// - **Cancellation** (`Cancelled`, `DeadlineExceeded`): the caller gave up. These pre-empt
///   any remaining retries, fallback writes, and chunks.
///
/// # Examples
///
/// ```
/// use kvdoc::domain::errors::ConfigError;
///
/// fn place_value() -> Result<(), ConfigError> {
///     Err(ConfigError::ValueCollision {
///         path: "/app".to_string(),
///         segment: "name".to_string(),
///     })
/// }
///
/// assert!(place_value().unwrap_err().is_collision());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A key tried to descend through a path that already holds a scalar value.
    #[error("Key '{path}' is already a value, cannot append '{segment}' to it")]
    ValueCollision {
        /// The path that already holds a value
        path: String,
        /// The segment that could not be appended below it
        segment: String,
    },

    /// A key tried to store a value at a path that other keys use as a directory.
    #[error("Key '{key}' is implicitly a directory and cannot hold a value")]
    DirectoryCollision {
        /// The original key of the offending pair
        key: String,
    },

    /// The key-value store reported an error.
    #[error("Store '{store_name}' error: {message}")]
    StoreError {
        /// The name of the store that encountered the error
        store_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The store evaluated a transaction but did not apply it.
    #[error("Transaction with {count} operations was not applied")]
    TransactionRejected {
        /// Number of operations in the rejected transaction
        count: usize,
    },

    /// A chunk could not be committed after all retries and the batch was aborted.
    #[error("Failed to write items {start}-{end}: {source}")]
    ChunkFailed {
        /// 1-based index of the first item in the chunk
        start: usize,
        /// 1-based index of the last item in the chunk
        end: usize,
        /// The last transaction error observed for the chunk
        #[source]
        source: Box<ConfigError>,
    },

    /// A single-key write in fallback mode failed and the batch was aborted.
    #[error("Fallback write of key '{key}' failed: {source}")]
    FallbackFailed {
        /// The key that could not be written
        key: String,
        /// The underlying store error
        #[source]
        source: Box<ConfigError>,
    },

    /// An error occurred reading a document source such as a file.
    #[error("Document source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,

    /// The caller's deadline passed before the operation finished.
    #[error("Operation deadline exceeded")]
    DeadlineExceeded,

    /// Batch options failed validation.
    #[error("Invalid batch options: {message}")]
    InvalidOptions {
        /// What is wrong with the options
        message: String,
    },

    /// Failed to convert a configuration value to the requested type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse or render a document.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a StoreError for the named store.
    pub fn store<E>(store_name: &str, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::StoreError {
            store_name: store_name.to_string(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns true for errors caused by conflicting paths in the input pairs.
    pub fn is_collision(&self) -> bool {
        matches!(
            self,
            ConfigError::ValueCollision { .. } | ConfigError::DirectoryCollision { .. }
        )
    }

    /// Returns true if the caller cancelled the operation or its deadline passed.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ConfigError::Cancelled | ConfigError::DeadlineExceeded)
    }

    /// Returns true if a write that failed with this error may succeed when retried.
    ///
    /// Every store failure is retryable except cancellation, collisions, invalid
    /// options, and the terminal batch errors.
    pub fn is_retryable(&self) -> bool {
        !(self.is_cancellation()
            || self.is_collision()
            || matches!(
                self,
                ConfigError::InvalidOptions { .. }
                    | ConfigError::ChunkFailed { .. }
                    | ConfigError::FallbackFailed { .. }
            ))
    }

    /// Creates a TypeConversionError from a ParseIntError.
    pub fn from_parse_int_error(key: String, err: ParseIntError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "integer".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseFloatError.
    pub fn from_parse_float_error(key: String, err: ParseFloatError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "float".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseBoolError.
    pub fn from_parse_bool_error(key: String, err: ParseBoolError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "boolean".to_string(),
            source: Box::new(err),
        }
    }
}

/// A specialized Result type for kvdoc operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// A batch write that did not finish.
///
/// Carries the ledger accumulated up to the point of failure alongside the error that
/// stopped the batch, so callers can report exactly how much work was committed.
#[derive(Debug, Error)]
#[error(
    "Batch write stopped after {}/{} keys: {source}",
    .result.succeeded,
    .result.total
)]
pub struct BatchError {
    /// Counters and failed keys accumulated before the batch stopped
    pub result: BatchResult,
    /// The error that stopped the batch
    #[source]
    pub source: ConfigError,
}

impl BatchError {
    /// Splits the error into its ledger and its cause.
    pub fn into_parts(self) -> (BatchResult, ConfigError) {
        (self.result, self.source)
    }
}
