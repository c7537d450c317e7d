//! History-inclusion strategies

use serde::{Deserialize, Serialize};

/// Strategy for selecting conversation history under budget pressure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextStrategy {
    /// Greedy newest-first inclusion, stop at the first overflow
    Truncate,
    /// Always attempt the most recent N messages, backfill older ones with
    /// leftover budget
    SlidingWindow,
    /// Summarize older history
    ///
    /// Not implemented yet; behaves exactly like [`SlidingWindow`] and logs
    /// the fallback at debug level.
    ///
    /// [`SlidingWindow`]: ContextStrategy::SlidingWindow
    Summarize,
}

impl Default for ContextStrategy {
    fn default() -> Self {
        ContextStrategy::SlidingWindow
    }
}

impl std::fmt::Display for ContextStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextStrategy::Truncate => write!(f, "truncate"),
            ContextStrategy::SlidingWindow => write!(f, "sliding-window"),
            ContextStrategy::Summarize => write!(f, "summarize"),
        }
    }
}
