// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! to the collaborators of the core: the key-value store, document parsers, and the
//! logging sink. These traits are implemented by adapters in the adapters layer.

pub mod logger;
pub mod parser;
pub mod store;

// Re-export commonly used types
pub use logger::{Logger, NoopLogger};
pub use parser::DocumentParser;
pub use store::KvStore;
