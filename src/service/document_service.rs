// SPDX-License-Identifier: MIT OR Apache-2.0

//! Moves whole documents in and out of a key-value store.
//!
//! `DocumentService` joins the two directions under an optional key namespace:
//!
//! - **push**: flatten the document, place every key under the prefix, sort by key, and
//!   hand the pairs to a `BatchWriter`.
//! - **pull**: list every key under the prefix, strip the prefix, and rebuild the tree.

use crate::domain::{
    flatten, unflatten, BatchError, BatchOptions, BatchResult, CallContext, ConfigPair,
    NestedDocument, Result,
};
use crate::ports::{KvStore, Logger, NoopLogger};
use crate::service::batch_writer::{BatchWriter, ProgressCallback};
use std::sync::Arc;

/// Reads and writes nested documents under a key prefix.
///
/// # Examples
///
/// ```rust
/// use kvdoc::adapters::MemoryStore;
/// use kvdoc::domain::{CallContext, NestedDocument};
/// use kvdoc::service::DocumentService;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let service = DocumentService::builder(MemoryStore::new())
///     .with_prefix("/prod")
///     .build()?;
///
/// let doc = NestedDocument::from_json_str(r#"{"db": {"host": "h", "port": 5432}}"#)?;
/// let ctx = CallContext::new();
/// service.push(&ctx, &doc, None).await?;
///
/// assert_eq!(service.store().get("/prod/db/port").unwrap().as_str(), "5432");
/// assert_eq!(service.pull(&ctx).await?.get("db/host").and_then(|v| v.as_str()), Some("h"));
/// # Ok(())
/// # }
/// ```
pub struct DocumentService<S> {
    writer: BatchWriter<S>,
    prefix: String,
    logger: Arc<dyn Logger>,
}

impl<S: KvStore> DocumentService<S> {
    /// Creates a service with default options and no prefix.
    pub fn new(store: S) -> Self {
        Self {
            writer: BatchWriter::new(store, BatchOptions::default()),
            prefix: String::new(),
            logger: Arc::new(NoopLogger),
        }
    }

    /// Creates a builder for a service over `store`.
    pub fn builder(store: S) -> DocumentServiceBuilder<S> {
        DocumentServiceBuilder::new(store)
    }

    /// Returns the key prefix, empty when keys are written as-is.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        self.writer.store()
    }

    /// Returns the write options.
    pub fn options(&self) -> &BatchOptions {
        self.writer.options()
    }

    /// Flattens `doc` into the pairs `push` would write, prefixed and sorted by key.
    pub fn pairs_for(&self, doc: &NestedDocument) -> Vec<ConfigPair> {
        let mut pairs: Vec<ConfigPair> = flatten(doc)
            .into_iter()
            .map(|pair| ConfigPair {
                key: pair.key.with_prefix(&self.prefix),
                value: pair.value,
            })
            .collect();
        pairs.sort_by(|a, b| a.key.cmp(&b.key));
        pairs
    }

    /// Writes `doc` to the store.
    ///
    /// # Errors
    ///
    /// Fails with the writer's `BatchError` if any chunk cannot be written.
    pub async fn push(
        &self,
        ctx: &CallContext,
        doc: &NestedDocument,
        progress: Option<&ProgressCallback>,
    ) -> std::result::Result<BatchResult, BatchError> {
        let pairs = self.pairs_for(doc);
        self.logger.info(&format!(
            "Pushing {} keys under '{}' to '{}'",
            pairs.len(),
            self.prefix,
            self.store().name()
        ));
        self.writer.write(ctx, &pairs, progress).await
    }

    /// Reads every key under the prefix and rebuilds the document.
    ///
    /// Keys that share the prefix text without sitting below it (such as
    /// `/production/x` for the prefix `/prod`) are ignored.
    ///
    /// # Errors
    ///
    /// Returns the store's error if listing fails, or a collision error if the stored
    /// keys cannot form one tree.
    pub async fn pull(&self, ctx: &CallContext) -> Result<NestedDocument> {
        let listed = self.store().list(ctx, &self.prefix).await?;
        let pairs: Vec<ConfigPair> = listed
            .into_iter()
            .filter_map(|pair| {
                let key = pair.key.strip_prefix(&self.prefix)?;
                Some(ConfigPair {
                    key,
                    value: pair.value,
                })
            })
            .collect();

        self.logger.debug(&format!(
            "Pulled {} keys under '{}' from '{}'",
            pairs.len(),
            self.prefix,
            self.store().name()
        ));
        unflatten(&pairs)
    }
}

/// Builder for constructing a `DocumentService`.
pub struct DocumentServiceBuilder<S> {
    store: S,
    options: BatchOptions,
    prefix: String,
    logger: Option<Arc<dyn Logger>>,
}

impl<S: KvStore> DocumentServiceBuilder<S> {
    /// Creates a builder with default options and no prefix.
    pub fn new(store: S) -> Self {
        Self {
            store,
            options: BatchOptions::default(),
            prefix: String::new(),
            logger: None,
        }
    }

    /// Sets the batch write options.
    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Places every key under `prefix` in the store.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Routes the service's diagnostics, and its writer's, to `logger`.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Builds the service.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidOptions` if the batch options do not validate.
    pub fn build(self) -> Result<DocumentService<S>> {
        self.options.validate()?;
        let logger = self.logger.unwrap_or_else(|| Arc::new(NoopLogger));
        Ok(DocumentService {
            writer: BatchWriter::new(self.store, self.options).with_logger(Arc::clone(&logger)),
            prefix: self.prefix,
            logger,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::domain::{ConfigError, DocValue};

    fn sample() -> NestedDocument {
        NestedDocument::from_json_str(
            r#"{"b": {"x": 1}, "a-c": "dash", "a": {"b": "slash"}, "flag": true}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_pairs_are_prefixed_and_sorted() {
        let service = DocumentService::builder(MemoryStore::new())
            .with_prefix("/env/")
            .build()
            .unwrap();
        let keys: Vec<String> = service
            .pairs_for(&sample())
            .into_iter()
            .map(|pair| pair.key.into_string())
            .collect();
        assert_eq!(
            keys,
            vec!["/env/a-c", "/env/a/b", "/env/b/x", "/env/flag"]
        );
    }

    #[tokio::test]
    async fn test_push_then_pull() {
        let service = DocumentService::builder(MemoryStore::new())
            .with_prefix("/env")
            .build()
            .unwrap();
        let ctx = CallContext::new();

        let result = service.push(&ctx, &sample(), None).await.unwrap();
        assert_eq!(result.succeeded, 4);

        let pulled = service.pull(&ctx).await.unwrap();
        assert_eq!(pulled.get("b/x"), Some(&DocValue::from("1")));
        assert_eq!(pulled.get("flag"), Some(&DocValue::from("true")));
    }

    #[tokio::test]
    async fn test_pull_ignores_sibling_prefix() {
        let store = MemoryStore::new();
        let ctx = CallContext::new();
        store.put(&ctx, &ConfigPair::new("/prod/a", "1")).await.unwrap();
        store
            .put(&ctx, &ConfigPair::new("/production/a", "2"))
            .await
            .unwrap();

        let service = DocumentService::builder(store)
            .with_prefix("/prod")
            .build()
            .unwrap();
        let pulled = service.pull(&ctx).await.unwrap();
        assert_eq!(pulled.len(), 1);
        assert_eq!(pulled.get("a"), Some(&DocValue::from("1")));
    }

    #[tokio::test]
    async fn test_pull_reports_collision() {
        let store = MemoryStore::new();
        let ctx = CallContext::new();
        store.put(&ctx, &ConfigPair::new("/a", "1")).await.unwrap();
        store.put(&ctx, &ConfigPair::new("/a/b", "2")).await.unwrap();

        let err = DocumentService::new(store).pull(&ctx).await.unwrap_err();
        assert!(err.is_collision());
    }

    #[test]
    fn test_builder_rejects_invalid_options() {
        let result = DocumentService::builder(MemoryStore::new())
            .with_options(BatchOptions::default().with_max_txn_ops(0))
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidOptions { .. })));
    }
}
