// SPDX-License-Identifier: MIT OR Apache-2.0

//! `Logger` adapter that forwards to `tracing`.

use crate::ports::Logger;

/// Forwards log messages to the `tracing` macros at the matching level.
///
/// Messages are emitted under the `kvdoc` target together with the configured
/// component name, so subscribers can filter batch writer output separately.
///
/// # Examples
///
/// ```rust
/// use kvdoc::adapters::TracingLogger;
/// use kvdoc::ports::Logger;
///
/// let logger = TracingLogger::new("batch-writer");
/// logger.info("starting");
/// ```
#[derive(Debug, Clone)]
pub struct TracingLogger {
    component: String,
}

impl TracingLogger {
    /// Creates a logger tagging every event with `component`.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    /// Returns the component name attached to events.
    pub fn component(&self) -> &str {
        &self.component
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("kvdoc")
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "kvdoc", component = %self.component, "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "kvdoc", component = %self.component, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "kvdoc", component = %self.component, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "kvdoc", component = %self.component, "{}", message);
    }
}
