// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module contains the document and pair types, the pure transforms between them,
//! and the options, context and result types used by the batch writer. It is independent
//! of any particular store or file format.

pub mod batch_result;
pub mod config_key;
pub mod config_pair;
pub mod config_value;
pub mod context;
pub mod document;
pub mod errors;
pub mod flatten;
pub mod options;
pub mod unflatten;

// Re-export commonly used types
pub use batch_result::BatchResult;
pub use config_key::ConfigKey;
pub use config_pair::ConfigPair;
pub use config_value::ConfigValue;
pub use context::{CallContext, CancelToken};
pub use document::{DocValue, Mapping, NestedDocument};
pub use errors::{BatchError, ConfigError, Result};
pub use flatten::flatten;
pub use options::BatchOptions;
pub use unflatten::unflatten;
