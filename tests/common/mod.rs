// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fakes and Docker helpers for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use kvdoc::adapters::MemoryStore;
use kvdoc::domain::{CallContext, ConfigError, ConfigPair, ConfigValue, Result};
use kvdoc::ports::{KvStore, Logger};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};

/// Cached result of Docker availability check.
static DOCKER_AVAILABLE: OnceLock<bool> = OnceLock::new();

/// Checks if Docker is available on the system.
///
/// This check is cached after the first call.
pub fn is_docker_available() -> bool {
    *DOCKER_AVAILABLE.get_or_init(|| {
        std::process::Command::new("docker")
            .args(["ps"])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    })
}

/// Prints a warning message that a test is skipped due to Docker being unavailable.
pub fn print_docker_unavailable_warning(test_name: &str) {
    eprintln!("\n⚠️  SKIPPED: {} - Docker is not available", test_name);
    eprintln!("   To run this test, ensure Docker is installed and running.");
    eprintln!("   Installation: https://docs.docker.com/get-docker/\n");
}

/// What a scripted transaction does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Apply the writes and report success
    Apply,
    /// Evaluate but do not apply (`Ok(false)`)
    Reject,
    /// Fail with a transport error
    Fail,
    /// Fail with an I/O error, as a client propagating `std::io::Error` would
    IoFail,
}

/// A store whose transaction outcomes are scripted per call.
///
/// Commits consume the script in order and fall back to `default_commit` once it runs
/// out. Single-key puts fail for keys registered with `fail_put_for`.
pub struct ScriptedStore {
    inner: MemoryStore,
    script: Mutex<VecDeque<Outcome>>,
    default_commit: Outcome,
    failing_puts: HashSet<String>,
    commit_sizes: Mutex<Vec<usize>>,
    puts: AtomicUsize,
}

impl ScriptedStore {
    /// A store that applies every transaction.
    pub fn new() -> Self {
        Self::always(Outcome::Apply)
    }

    /// A store where every transaction ends with `outcome`.
    pub fn always(outcome: Outcome) -> Self {
        Self {
            inner: MemoryStore::new(),
            script: Mutex::new(VecDeque::new()),
            default_commit: outcome,
            failing_puts: HashSet::new(),
            commit_sizes: Mutex::new(Vec::new()),
            puts: AtomicUsize::new(0),
        }
    }

    /// Plays `outcomes` for the first commits, then the default.
    pub fn with_script(self, outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        *self.script.lock().unwrap() = outcomes.into_iter().collect();
        self
    }

    /// Makes single-key writes of `key` fail.
    pub fn fail_put_for(mut self, key: &str) -> Self {
        self.failing_puts.insert(key.to_string());
        self
    }

    /// Number of transactions attempted.
    pub fn commit_calls(&self) -> usize {
        self.commit_sizes.lock().unwrap().len()
    }

    /// Operation count of each attempted transaction, in order.
    pub fn commit_sizes(&self) -> Vec<usize> {
        self.commit_sizes.lock().unwrap().clone()
    }

    /// Number of single-key writes attempted.
    pub fn put_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Reads a stored value.
    pub fn stored(&self, key: &str) -> Option<ConfigValue> {
        self.inner.get(key)
    }

    /// Number of stored keys.
    pub fn stored_len(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl KvStore for ScriptedStore {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn commit(&self, ctx: &CallContext, writes: &[ConfigPair]) -> Result<bool> {
        self.commit_sizes.lock().unwrap().push(writes.len());
        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.default_commit);
        match outcome {
            Outcome::Apply => self.inner.commit(ctx, writes).await,
            Outcome::Reject => Ok(false),
            Outcome::Fail => Err(ConfigError::StoreError {
                store_name: "scripted".to_string(),
                message: "connection reset".to_string(),
                source: None,
            }),
            Outcome::IoFail => Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )
            .into()),
        }
    }

    async fn put(&self, ctx: &CallContext, pair: &ConfigPair) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.failing_puts.contains(pair.key.as_str()) {
            return Err(ConfigError::StoreError {
                store_name: "scripted".to_string(),
                message: format!("put '{}' refused", pair.key),
                source: None,
            });
        }
        self.inner.put(ctx, pair).await
    }

    async fn list(&self, ctx: &CallContext, prefix: &str) -> Result<Vec<ConfigPair>> {
        self.inner.list(ctx, prefix).await
    }
}

/// A logger that keeps every message with its level.
#[derive(Default)]
pub struct CapturingLogger {
    lines: Mutex<Vec<(&'static str, String)>>,
}

impl CapturingLogger {
    /// Messages logged at `level`.
    pub fn messages(&self, level: &str) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    fn push(&self, level: &'static str, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }
}

impl Logger for CapturingLogger {
    fn debug(&self, message: &str) {
        self.push("debug", message);
    }

    fn info(&self, message: &str) {
        self.push("info", message);
    }

    fn warn(&self, message: &str) {
        self.push("warn", message);
    }

    fn error(&self, message: &str) {
        self.push("error", message);
    }
}

/// `n` pairs with zero-padded keys, so key order matches input order.
pub fn numbered_pairs(n: usize) -> Vec<ConfigPair> {
    (1..=n)
        .map(|i| ConfigPair::new(format!("/batch/key{:04}", i), format!("value{}", i)))
        .collect()
}
