// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leveled logging port.
//!
//! The batch writer reports its progress and failures through an injected `Logger`
//! rather than global state, so diagnostics can be captured in tests or routed anywhere.
//! Without a logger the writer behaves identically, only silently.

/// A leveled logging sink.
///
/// # Examples
///
/// ```rust
/// use kvdoc::ports::Logger;
///
/// struct StderrLogger;
///
/// impl Logger for StderrLogger {
///     fn debug(&self, _message: &str) {}
///     fn info(&self, message: &str) { eprintln!("INFO {message}"); }
///     fn warn(&self, message: &str) { eprintln!("WARN {message}"); }
///     fn error(&self, message: &str) { eprintln!("ERROR {message}"); }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Logs a debug-level message.
    fn debug(&self, message: &str);

    /// Logs an info-level message.
    fn info(&self, message: &str);

    /// Logs a warning.
    fn warn(&self, message: &str);

    /// Logs an error.
    fn error(&self, message: &str);
}

/// A logger that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _message: &str) {}

    fn info(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}
