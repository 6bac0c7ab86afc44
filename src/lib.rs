// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bidirectional bridge between nested documents and flat key-value stores.
//!
//! This crate converts hierarchical documents (YAML, JSON, or any tree of mappings and
//! scalars) into slash-delimited `(key, value)` pairs, rebuilds documents from such
//! pairs, and pushes large pair sets into a transactional store such as etcd under its
//! transaction-size limit, with retries, exponential backoff and an optional per-key
//! fallback.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and pure transforms (`ConfigPair`, `NestedDocument`,
//!   `flatten`, `unflatten`, `BatchOptions`, errors)
//! - **Ports**: Trait definitions for the outside world (`KvStore`, `DocumentParser`,
//!   `Logger`)
//! - **Adapters**: Implementations for specific backends (in-memory, etcd, YAML, tracing)
//! - **Service**: The batch writer and the document service that drive everything
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML document support (default)
//! - `etcd`: Enable the etcd store adapter
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use kvdoc::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let doc = NestedDocument::from_json_str(r#"{"app": {"name": "x", "tags": ["a", "b"]}}"#)?;
//!
//! let mut pairs = flatten(&doc);
//! pairs.sort_by(|a, b| a.key.cmp(&b.key));
//! assert_eq!(pairs[0], ConfigPair::new("/app/name", "x"));
//! assert_eq!(pairs[1], ConfigPair::new("/app/tags", r#"["a","b"]"#));
//!
//! let store = MemoryStore::new();
//! let result = write_batch(&store, &CallContext::new(), &pairs, None, &BatchOptions::default())
//!     .await?;
//! assert!(result.is_success());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        flatten, unflatten, BatchError, BatchOptions, BatchResult, CallContext, CancelToken,
        ConfigError, ConfigKey, ConfigPair, ConfigValue, DocValue, NestedDocument, Result,
    };
    pub use crate::ports::{DocumentParser, KvStore, Logger, NoopLogger};
    pub use crate::service::{write_batch, BatchWriter, DocumentService, ProgressCallback};

    pub use crate::adapters::{MemoryStore, TracingLogger};
    #[cfg(feature = "etcd")]
    pub use crate::adapters::EtcdStore;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::{YamlFileAdapter, YamlParser};
}
