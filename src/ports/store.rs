// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value store trait definition.
//!
//! This module defines the `KvStore` trait, the port through which the batch writer and
//! the document service reach a transactional key-value store such as etcd.

use crate::domain::{CallContext, ConfigPair, Result};
use async_trait::async_trait;

/// A transactional key-value store.
///
/// Implementations provide an atomic multi-key write bounded by the store's own
/// transaction size, a single-key write, and a prefix read. Every call receives the
/// caller's `CallContext` and should stop promptly once it is cancelled.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so that independent batch writes can share one
/// client.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use kvdoc::domain::{CallContext, ConfigPair, Result};
/// use kvdoc::ports::KvStore;
///
/// struct NullStore;
///
/// #[async_trait]
/// impl KvStore for NullStore {
///     fn name(&self) -> &str {
///         "null"
///     }
///
///     async fn commit(&self, _ctx: &CallContext, _writes: &[ConfigPair]) -> Result<bool> {
///         Ok(true)
///     }
///
///     async fn put(&self, _ctx: &CallContext, _pair: &ConfigPair) -> Result<()> {
///         Ok(())
///     }
///
///     async fn list(&self, _ctx: &CallContext, _prefix: &str) -> Result<Vec<ConfigPair>> {
///         Ok(vec![])
///     }
/// }
/// ```
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the name of this store, used in logs and error messages.
    fn name(&self) -> &str;

    /// Writes all pairs in one atomic transaction.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The transaction was applied
    /// * `Ok(false)` - The store evaluated the transaction but did not apply it
    /// * `Err(ConfigError)` - The transaction could not be submitted or failed
    async fn commit(&self, ctx: &CallContext, writes: &[ConfigPair]) -> Result<bool>;

    /// Writes a single pair.
    async fn put(&self, ctx: &CallContext, pair: &ConfigPair) -> Result<()>;

    /// Reads every pair whose key starts with `prefix`, in key order.
    async fn list(&self, ctx: &CallContext, prefix: &str) -> Result<Vec<ConfigPair>>;
}

#[async_trait]
impl<S: KvStore + ?Sized> KvStore for std::sync::Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn commit(&self, ctx: &CallContext, writes: &[ConfigPair]) -> Result<bool> {
        (**self).commit(ctx, writes).await
    }

    async fn put(&self, ctx: &CallContext, pair: &ConfigPair) -> Result<()> {
        (**self).put(ctx, pair).await
    }

    async fn list(&self, ctx: &CallContext, prefix: &str) -> Result<Vec<ConfigPair>> {
        (**self).list(ctx, prefix).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct RejectingStore;

    #[async_trait]
    impl KvStore for RejectingStore {
        fn name(&self) -> &str {
            "rejecting"
        }

        async fn commit(&self, _ctx: &CallContext, _writes: &[ConfigPair]) -> Result<bool> {
            Ok(false)
        }

        async fn put(&self, _ctx: &CallContext, _pair: &ConfigPair) -> Result<()> {
            Ok(())
        }

        async fn list(&self, _ctx: &CallContext, _prefix: &str) -> Result<Vec<ConfigPair>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn KvStore>>();
    }

    #[tokio::test]
    async fn test_arc_store_delegates() {
        let store: Arc<dyn KvStore> = Arc::new(RejectingStore);
        let ctx = CallContext::new();
        assert_eq!(store.name(), "rejecting");
        assert!(!store.commit(&ctx, &[ConfigPair::new("/a", "1")]).await.unwrap());
        assert!(store.list(&ctx, "/").await.unwrap().is_empty());
    }
}
