//! Human-readable trace of a search run

use serde::{Deserialize, Serialize};

use crate::core::types::Iteration;

/// Ordered event messages, cleared at the start of each run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TraceLog {
    messages: Vec<String>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Append an event stamped with the iteration it happened on
    pub fn event(&mut self, iteration: Iteration, text: impl AsRef<str>) {
        self.messages.push(format!("Iteration {}) {}", iteration, text.as_ref()));
    }

    /// Append a line verbatim
    pub fn raw(&mut self, text: impl Into<String>) {
        self.messages.push(text.into());
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(|s| s.as_str())
    }
}
