// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer orchestrating the domain transforms against a store.
//!
//! `BatchWriter` pushes pair lists through the transaction, retry and fallback policy.
//! `DocumentService` wraps it with flattening on the way in and unflattening on the way
//! out.

pub mod batch_writer;
pub mod document_service;

pub use batch_writer::{write_batch, BatchWriter, ProgressCallback};
pub use document_service::{DocumentService, DocumentServiceBuilder};
