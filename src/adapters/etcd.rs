// SPDX-License-Identifier: MIT OR Apache-2.0

//! etcd key-value store adapter.
//!
//! This module provides a `KvStore` backed by an etcd cluster. Multi-key writes are sent
//! as a single etcd transaction, so a commit is subject to the cluster's `--max-txn-ops`
//! limit (128 by default).

use crate::domain::{CallContext, ConfigError, ConfigPair, Result};
use crate::ports::KvStore;
use async_trait::async_trait;
use etcd_client::{Client, GetOptions, Txn, TxnOp};

const STORE_NAME: &str = "etcd";

/// Key-value store adapter for etcd.
///
/// # Examples
///
/// ```rust,no_run
/// use kvdoc::adapters::EtcdStore;
/// use kvdoc::domain::{CallContext, ConfigPair};
/// use kvdoc::ports::KvStore;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = EtcdStore::connect(vec!["localhost:2379"]).await?;
/// let ctx = CallContext::new();
/// store.put(&ctx, &ConfigPair::new("/app/name", "x")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EtcdStore {
    /// etcd client; clones share one connection
    client: Client,
    /// Endpoints the client was connected to
    endpoints: Vec<String>,
}

impl EtcdStore {
    /// Connects to an etcd cluster.
    ///
    /// # Arguments
    ///
    /// * `endpoints` - List of etcd endpoints (e.g., `["localhost:2379"]`)
    pub async fn connect<S: AsRef<str>>(endpoints: Vec<S>) -> Result<Self> {
        let endpoints: Vec<String> = endpoints.iter().map(|s| s.as_ref().to_string()).collect();

        let client = Client::connect(&endpoints, None)
            .await
            .map_err(|e| ConfigError::store(STORE_NAME, format!("Failed to connect to etcd: {}", e), e))?;

        tracing::debug!("Connected to etcd at {:?}", endpoints);
        Ok(Self { client, endpoints })
    }

    /// Wraps an already connected client.
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            endpoints: Vec::new(),
        }
    }

    /// Returns the endpoints this store was connected to.
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }
}

impl std::fmt::Debug for EtcdStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtcdStore")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl KvStore for EtcdStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    async fn commit(&self, ctx: &CallContext, writes: &[ConfigPair]) -> Result<bool> {
        let ops: Vec<TxnOp> = writes
            .iter()
            .map(|pair| TxnOp::put(pair.key.as_str(), pair.value.as_str(), None))
            .collect();
        let txn = Txn::new().and_then(ops);

        let mut client = self.client.clone();
        let response = ctx
            .run(async move {
                client.txn(txn).await.map_err(|e| {
                    ConfigError::store(STORE_NAME, format!("Transaction failed: {}", e), e)
                })
            })
            .await?;

        Ok(response.succeeded())
    }

    async fn put(&self, ctx: &CallContext, pair: &ConfigPair) -> Result<()> {
        let mut client = self.client.clone();
        let key = pair.key.as_str().to_string();
        let value = pair.value.as_str().to_string();

        ctx.run(async move {
            client.put(key.as_str(), value, None).await.map_err(|e| {
                ConfigError::store(STORE_NAME, format!("Failed to put '{}': {}", key, e), e)
            })
        })
        .await?;
        Ok(())
    }

    async fn list(&self, ctx: &CallContext, prefix: &str) -> Result<Vec<ConfigPair>> {
        let mut client = self.client.clone();
        let options = GetOptions::new().with_prefix();

        let response = ctx
            .run(async move {
                client.get(prefix, Some(options)).await.map_err(|e| {
                    ConfigError::store(STORE_NAME, format!("Failed to fetch keys from etcd: {}", e), e)
                })
            })
            .await?;

        let mut pairs = Vec::with_capacity(response.kvs().len());
        for kv in response.kvs() {
            match (kv.key_str(), kv.value_str()) {
                (Ok(key), Ok(value)) => pairs.push(ConfigPair::new(key, value)),
                _ => tracing::warn!("Skipping etcd entry with non UTF-8 key or value"),
            }
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_etcd_connect_error_is_store_error() {
        if let Err(err) = EtcdStore::connect(vec!["127.0.0.1:1"]).await {
            assert!(matches!(err, ConfigError::StoreError { .. }));
            assert!(err.is_retryable());
        }
    }
}
