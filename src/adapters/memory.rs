// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory key-value store adapter.
//!
//! This module provides a `KvStore` that keeps everything in process memory. It is not
//! durable; it exists for tests, dry runs, and as a reference for store semantics.

use crate::domain::{CallContext, ConfigError, ConfigPair, ConfigValue, Result};
use crate::ports::KvStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

const STORE_NAME: &str = "memory";

/// In-memory implementation of `KvStore`.
///
/// Keys are kept in a `BTreeMap` so prefix reads come back in key order. Like etcd, the
/// store enforces a ceiling on the number of operations in one transaction; commits
/// above it fail without applying anything.
///
/// # Examples
///
/// ```rust
/// use kvdoc::adapters::MemoryStore;
/// use kvdoc::domain::{CallContext, ConfigPair};
/// use kvdoc::ports::KvStore;
///
/// # #[tokio::main]
/// # async fn main() -> kvdoc::domain::Result<()> {
/// let store = MemoryStore::new();
/// let ctx = CallContext::new();
/// store.commit(&ctx, &[ConfigPair::new("/app/name", "x")]).await?;
///
/// let pairs = store.list(&ctx, "/app").await?;
/// assert_eq!(pairs.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    /// Stored values by key
    data: RwLock<BTreeMap<String, ConfigValue>>,
    /// Maximum operations accepted in one transaction
    max_txn_ops: usize,
}

impl MemoryStore {
    /// Creates an empty store with etcd's default transaction ceiling of 128.
    pub fn new() -> Self {
        Self::with_max_txn_ops(crate::domain::options::DEFAULT_MAX_TXN_OPS)
    }

    /// Creates an empty store with a custom transaction ceiling.
    pub fn with_max_txn_ops(max_txn_ops: usize) -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
            max_txn_ops,
        }
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        self.read().ok()?.get(key).cloned()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.read().map(|data| data.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, ConfigValue>>> {
        self.data.read().map_err(|_| ConfigError::StoreError {
            store_name: STORE_NAME.to_string(),
            message: "store lock poisoned".to_string(),
            source: None,
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, ConfigValue>>> {
        self.data.write().map_err(|_| ConfigError::StoreError {
            store_name: STORE_NAME.to_string(),
            message: "store lock poisoned".to_string(),
            source: None,
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    async fn commit(&self, ctx: &CallContext, writes: &[ConfigPair]) -> Result<bool> {
        ctx.check()?;
        if writes.len() > self.max_txn_ops {
            return Err(ConfigError::StoreError {
                store_name: STORE_NAME.to_string(),
                message: format!(
                    "too many operations in txn request: {} > {}",
                    writes.len(),
                    self.max_txn_ops
                ),
                source: None,
            });
        }

        let mut data = self.write()?;
        for pair in writes {
            data.insert(pair.key.to_string(), pair.value.clone());
        }
        Ok(true)
    }

    async fn put(&self, ctx: &CallContext, pair: &ConfigPair) -> Result<()> {
        ctx.check()?;
        self.write()?
            .insert(pair.key.to_string(), pair.value.clone());
        Ok(())
    }

    async fn list(&self, ctx: &CallContext, prefix: &str) -> Result<Vec<ConfigPair>> {
        ctx.check()?;
        let data = self.read()?;
        Ok(data
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| ConfigPair::new(key.as_str(), value.clone()))
            .collect())
    }
}
