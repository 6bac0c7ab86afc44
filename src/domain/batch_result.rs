// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcome ledger for a batch write.

use serde::Serialize;

/// Counters and failed keys for one batch write.
///
/// A `BatchResult` belongs to exactly one write call. `succeeded + failed == total`
/// only holds once the call has run to completion; when a batch is aborted the ledger
/// covers only the keys resolved before the abort.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    /// Number of pairs handed to the writer
    pub total: usize,
    /// Number of pairs confirmed written
    pub succeeded: usize,
    /// Number of pairs recorded as failed
    pub failed: usize,
    /// Keys recorded as failed, in input order
    pub failed_keys: Vec<String>,
    /// Number of transaction retries across all chunks
    pub retry_count: usize,
    /// Whether any chunk fell back to single-key writes
    pub used_fallback: bool,
}

impl BatchResult {
    /// Creates an empty ledger for `total` pairs.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Returns true once every pair has been resolved one way or the other.
    pub fn is_complete(&self) -> bool {
        self.succeeded + self.failed == self.total
    }

    /// Returns true if every pair was written.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.succeeded == self.total
    }

    pub(crate) fn record_failed<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        for key in keys {
            self.failed += 1;
            self.failed_keys.push(key.to_string());
        }
    }
}
