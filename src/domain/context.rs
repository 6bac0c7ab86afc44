// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cancellation and deadlines for calls that suspend.
//!
//! Every store call and every retry wait takes a `CallContext`. A context is cancelled
//! through its `CancelToken`, or expires when its deadline passes; either way the
//! suspended work is abandoned with `ConfigError::Cancelled` or
//! `ConfigError::DeadlineExceeded`.

use crate::domain::errors::{ConfigError, Result};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// A clonable cancellation signal.
///
/// All clones observe the same signal. Cancelling is permanent.
///
/// # Examples
///
/// ```
/// use kvdoc::domain::CancelToken;
///
/// let token = CancelToken::new();
/// let observer = token.clone();
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    state: Arc<CancelState>,
}

impl CancelToken {
    /// Creates a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the token and wakes every task waiting on it.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        self.state.notify.notify_waiters();
    }

    /// Returns true once `cancel` has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Completes when the token is cancelled.
    pub async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel is not missed.
            let notified = self.state.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// The cancellation token and optional deadline for one operation.
///
/// # Examples
///
/// ```
/// use kvdoc::domain::CallContext;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let ctx = CallContext::new().with_timeout(Duration::from_secs(30));
/// assert!(ctx.check().is_ok());
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct CallContext {
    token: CancelToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// Creates a context with a fresh token and no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context observing an existing token.
    pub fn with_token(token: CancelToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Sets an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns the cancellation token.
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns an error if the context has been cancelled or its deadline has passed.
    pub fn check(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(ConfigError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ConfigError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Completes with the reason once the context is cancelled or expires.
    async fn done(&self) -> ConfigError {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => ConfigError::Cancelled,
                    _ = tokio::time::sleep_until(deadline) => ConfigError::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                ConfigError::Cancelled
            }
        }
    }

    /// Sleeps for `duration` unless the context ends first.
    ///
    /// Cancellation wins over a sleep that is due at the same instant.
    pub async fn sleep(&self, duration: Duration) -> Result<()> {
        self.check()?;
        tokio::select! {
            biased;
            reason = self.done() => Err(reason),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }

    /// Runs `future` to completion unless the context ends first.
    pub async fn run<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;
        tokio::select! {
            biased;
            reason = self.done() => Err(reason),
            outcome = future => outcome,
        }
    }
}
