// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing store, parser and logging implementations.
//!
//! This module contains concrete implementations of the traits defined in the ports
//! layer: key-value stores (`KvStore`), document formats (`DocumentParser`), and logging
//! sinks (`Logger`).

#[cfg(feature = "etcd")]
pub mod etcd;
pub mod memory;
pub mod tracing_logger;
#[cfg(feature = "yaml")]
pub mod yaml_file;

// Re-export adapters based on feature flags
#[cfg(feature = "etcd")]
pub use etcd::EtcdStore;
pub use memory::MemoryStore;
pub use tracing_logger::TracingLogger;
#[cfg(feature = "yaml")]
pub use yaml_file::{YamlFileAdapter, YamlParser};
