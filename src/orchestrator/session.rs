//! Session-local shared state for one acquisition run.
//!
//! Concurrent per-term tasks share one seen-URL set. A URL must be
//! claimed in a single atomic check-and-insert — a separate check followed
//! by an insert could double-claim a URL if two term tasks interleave
//! across a suspension point. The mutex is only ever held across the
//! insert itself, never across an await.

use std::collections::HashSet;
use std::sync::Mutex;

/// Shared per-session acquisition state.
#[derive(Debug, Default)]
pub struct SessionState {
    seen_urls: Mutex<HashSet<String>>,
}

impl SessionState {
    /// Create empty state for a new research session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim a URL for extraction.
    ///
    /// Returns `true` if this caller is the first to claim it; `false` if
    /// another term already did.
    pub fn claim(&self, url: &str) -> bool {
        let mut seen = self.seen_urls.lock().unwrap_or_else(|e| e.into_inner());
        seen.insert(url.to_owned())
    }

    /// Number of URLs claimed so far.
    pub fn claimed_count(&self) -> usize {
        self.seen_urls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}
