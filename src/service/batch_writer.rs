// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batched, retrying writes of pairs into a transactional store.
//!
//! Pairs are split into contiguous chunks no larger than the store's transaction
//! ceiling and committed one chunk at a time, in input order. Each chunk moves through
//! an explicit state machine:
//!
//! ```text
//! Attempt ──ok──────────────────────────────▶ Committed
//!    │ failed, retries left                       ▲
//!    ▼                                            │
//! RetryWait ──backoff elapsed──▶ Attempt ─────────┘
//!    │ failed, no retries left
//!    ▼
//! Exhausted ──fallback enabled──▶ Fallback (one key at a time, abort on first failure)
//!    │ fallback disabled
//!    ▼
//! abort batch (whole chunk recorded as failed)
//! ```
//!
//! Chunks committed before an abort stay in the store; there is no rollback across
//! chunks.

use crate::domain::{
    BatchError, BatchOptions, BatchResult, CallContext, ConfigError, ConfigPair, Result,
};
use crate::ports::{KvStore, Logger, NoopLogger};
use std::sync::Arc;

/// Callback fired once per written key with `(current_index, total, key)`.
///
/// `current_index` is the 1-based position of the key in the input. The callback runs
/// after the write of that key is confirmed and is never called for failed keys.
pub type ProgressCallback = Arc<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Writes pair lists into a `KvStore` under a retry and fallback policy.
///
/// Each call to `write` owns its own `BatchResult`, so one writer can serve concurrent
/// calls without coordination.
///
/// # Examples
///
/// ```rust
/// use kvdoc::adapters::MemoryStore;
/// use kvdoc::domain::{BatchOptions, CallContext, ConfigPair};
/// use kvdoc::service::BatchWriter;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let writer = BatchWriter::new(MemoryStore::new(), BatchOptions::default());
/// let pairs = vec![ConfigPair::new("/app/name", "x"), ConfigPair::new("/app/port", "8080")];
///
/// let result = writer.write(&CallContext::new(), &pairs, None).await?;
/// assert_eq!(result.succeeded, 2);
/// # Ok(())
/// # }
/// ```
pub struct BatchWriter<S> {
    store: S,
    options: BatchOptions,
    logger: Arc<dyn Logger>,
}

impl<S: KvStore> BatchWriter<S> {
    /// Creates a writer with a silent logger.
    pub fn new(store: S, options: BatchOptions) -> Self {
        Self {
            store,
            options,
            logger: Arc::new(NoopLogger),
        }
    }

    /// Routes the writer's diagnostics to `logger`.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Returns the write options.
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Writes `pairs` to the store.
    ///
    /// An empty input succeeds immediately without touching the store.
    ///
    /// # Errors
    ///
    /// Returns a `BatchError` carrying the partial `BatchResult` when the options are
    /// invalid, when the context is cancelled or expires, when a chunk cannot be
    /// committed and fallback is disabled (`ConfigError::ChunkFailed`), or when a
    /// fallback single-key write fails (`ConfigError::FallbackFailed`).
    pub async fn write(
        &self,
        ctx: &CallContext,
        pairs: &[ConfigPair],
        progress: Option<&ProgressCallback>,
    ) -> std::result::Result<BatchResult, BatchError> {
        run_batch(
            &self.store,
            &self.options,
            self.logger.as_ref(),
            ctx,
            pairs,
            progress,
        )
        .await
    }
}

/// Writes `pairs` to `store` without a logger.
///
/// This is a shorthand for building a `BatchWriter` for a single call.
pub async fn write_batch<S: KvStore + ?Sized>(
    store: &S,
    ctx: &CallContext,
    pairs: &[ConfigPair],
    progress: Option<&ProgressCallback>,
    options: &BatchOptions,
) -> std::result::Result<BatchResult, BatchError> {
    run_batch(store, options, &NoopLogger, ctx, pairs, progress).await
}

async fn run_batch<S: KvStore + ?Sized>(
    store: &S,
    options: &BatchOptions,
    logger: &dyn Logger,
    ctx: &CallContext,
    pairs: &[ConfigPair],
    progress: Option<&ProgressCallback>,
) -> std::result::Result<BatchResult, BatchError> {
    let total = pairs.len();
    if total == 0 {
        logger.debug("No pairs to write");
        return Ok(BatchResult::new(0));
    }
    if let Err(source) = options.validate() {
        return Err(BatchError {
            result: BatchResult::new(total),
            source,
        });
    }

    logger.info(&format!(
        "Writing {} keys to '{}' in {} transactions of up to {} operations",
        total,
        store.name(),
        total.div_ceil(options.max_txn_ops),
        options.max_txn_ops
    ));

    let mut run = BatchRun {
        store,
        options,
        logger,
        ctx,
        progress,
        result: BatchResult::new(total),
    };

    for (index, chunk) in pairs.chunks(options.max_txn_ops).enumerate() {
        let offset = index * options.max_txn_ops;
        if let Err(source) = run.write_chunk(chunk, offset).await {
            logger.error(&format!(
                "Batch aborted after {}/{} keys: {}",
                run.result.succeeded, total, source
            ));
            return Err(BatchError {
                result: run.result,
                source,
            });
        }
    }

    logger.info(&format!(
        "Wrote {} keys ({} retries, fallback used: {})",
        run.result.succeeded, run.result.retry_count, run.result.used_fallback
    ));
    Ok(run.result)
}

/// Where a chunk currently is in its write lifecycle.
#[derive(Debug)]
enum ChunkState {
    /// Submit the chunk as one transaction; `attempt` 0 is the first try.
    Attempt { attempt: u32 },
    /// Wait out the backoff before retry number `retry + 1`.
    RetryWait { retry: u32 },
    /// The transaction was applied.
    Committed,
    /// Every transaction attempt failed; `last_error` is the final failure.
    Exhausted { last_error: ConfigError },
    /// Write the chunk's keys one at a time.
    Fallback,
}

/// State of one in-flight batch call.
struct BatchRun<'a, S: ?Sized> {
    store: &'a S,
    options: &'a BatchOptions,
    logger: &'a dyn Logger,
    ctx: &'a CallContext,
    progress: Option<&'a ProgressCallback>,
    result: BatchResult,
}

impl<S: KvStore + ?Sized> BatchRun<'_, S> {
    async fn write_chunk(&mut self, chunk: &[ConfigPair], offset: usize) -> Result<()> {
        let mut state = ChunkState::Attempt { attempt: 0 };

        loop {
            state = match state {
                ChunkState::Attempt { attempt } => {
                    self.ctx.check()?;
                    match self.store.commit(self.ctx, chunk).await {
                        Ok(true) => ChunkState::Committed,
                        Ok(false) => self.after_failure(
                            attempt,
                            offset,
                            ConfigError::TransactionRejected { count: chunk.len() },
                        ),
                        Err(e) if e.is_cancellation() => return Err(e),
                        Err(e) => self.after_failure(attempt, offset, e),
                    }
                }
                ChunkState::RetryWait { retry } => {
                    let delay = self.options.backoff_for(retry);
                    self.logger.debug(&format!(
                        "Retrying chunk at item {} in {:?} (retry {}/{})",
                        offset + 1,
                        delay,
                        retry + 1,
                        self.options.max_retries
                    ));
                    self.ctx.sleep(delay).await?;
                    self.result.retry_count += 1;
                    ChunkState::Attempt { attempt: retry + 1 }
                }
                ChunkState::Committed => {
                    self.logger.debug(&format!(
                        "Committed items {}-{}",
                        offset + 1,
                        offset + chunk.len()
                    ));
                    for (i, pair) in chunk.iter().enumerate() {
                        self.confirm(offset + i, pair);
                    }
                    return Ok(());
                }
                ChunkState::Exhausted { last_error } => {
                    if self.options.fallback_enabled {
                        self.logger.warn(&format!(
                            "Transaction for items {}-{} failed, writing keys individually",
                            offset + 1,
                            offset + chunk.len()
                        ));
                        ChunkState::Fallback
                    } else {
                        self.result
                            .record_failed(chunk.iter().map(|pair| pair.key.as_str()));
                        return Err(ConfigError::ChunkFailed {
                            start: offset + 1,
                            end: offset + chunk.len(),
                            source: Box::new(last_error),
                        });
                    }
                }
                ChunkState::Fallback => {
                    self.result.used_fallback = true;
                    for (i, pair) in chunk.iter().enumerate() {
                        self.ctx.check()?;
                        match self.store.put(self.ctx, pair).await {
                            Ok(()) => self.confirm(offset + i, pair),
                            Err(e) if e.is_cancellation() => return Err(e),
                            Err(e) => {
                                self.result.record_failed([pair.key.as_str()]);
                                return Err(ConfigError::FallbackFailed {
                                    key: pair.key.to_string(),
                                    source: Box::new(e),
                                });
                            }
                        }
                    }
                    return Ok(());
                }
            };
        }
    }

    /// Decides between another attempt and giving up on the transaction path.
    fn after_failure(&self, attempt: u32, offset: usize, error: ConfigError) -> ChunkState {
        self.logger.warn(&format!(
            "Transaction attempt {} for chunk at item {} failed: {}",
            attempt + 1,
            offset + 1,
            error
        ));
        if error.is_retryable() && attempt < self.options.max_retries {
            ChunkState::RetryWait { retry: attempt }
        } else {
            ChunkState::Exhausted { last_error: error }
        }
    }

    /// Records one written key and reports it.
    fn confirm(&mut self, index: usize, pair: &ConfigPair) {
        self.result.succeeded += 1;
        if let Some(progress) = self.progress {
            progress(index + 1, self.result.total, pair.key.as_str());
        }
    }
}
