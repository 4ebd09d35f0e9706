//! Read-only view of the latest results for dashboards and health checks.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{CycleResult, Posting};

/// Immutable view of the most recently completed cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    /// Postings from the latest cycle that found any
    pub postings: Vec<Posting>,

    /// When the latest cycle finished
    pub last_check: Option<DateTime<Utc>>,

    /// Novel postings reported since startup
    pub total_found: usize,
}

impl Snapshot {
    /// Successor snapshot after `cycle` completed.
    ///
    /// Postings are only replaced when the cycle found something new, so a
    /// quiet cycle keeps the previous finds visible.
    pub fn after(&self, cycle: &CycleResult) -> Self {
        let postings = if cycle.has_novel() {
            cycle.novel.clone()
        } else {
            self.postings.clone()
        };

        Self {
            postings,
            last_check: Some(cycle.finished_at),
            total_found: self.total_found + cycle.novel_count(),
        }
    }

    /// The last `n` postings.
    pub fn recent(&self, n: usize) -> &[Posting] {
        let start = self.postings.len().saturating_sub(n);
        &self.postings[start..]
    }
}

/// Liveness report.
#[derive(Debug, Clone, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub initialized: bool,
    pub time: DateTime<Utc>,
}

/// Shared handle publishing the latest [`Snapshot`].
///
/// Readers get an `Arc` to an immutable snapshot; the watcher swaps in a
/// new one after each completed cycle.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHandle {
    inner: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
struct State {
    snapshot: Arc<Snapshot>,
    initialized: bool,
}

impl SnapshotHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently published snapshot.
    pub fn latest(&self) -> Arc<Snapshot> {
        match self.inner.read() {
            Ok(state) => Arc::clone(&state.snapshot),
            Err(poisoned) => Arc::clone(&poisoned.into_inner().snapshot),
        }
    }

    /// Fold a completed cycle into the published snapshot.
    pub fn publish(&self, cycle: &CycleResult) -> Arc<Snapshot> {
        let mut state = match self.inner.write() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let next = Arc::new(state.snapshot.after(cycle));
        state.snapshot = Arc::clone(&next);
        next
    }

    /// Record that startup (config and seen-set load) finished.
    pub fn mark_initialized(&self) {
        match self.inner.write() {
            Ok(mut state) => state.initialized = true,
            Err(poisoned) => poisoned.into_inner().initialized = true,
        }
    }

    pub fn is_initialized(&self) -> bool {
        match self.inner.read() {
            Ok(state) => state.initialized,
            Err(poisoned) => poisoned.into_inner().initialized,
        }
    }

    pub fn health(&self) -> Health {
        Health {
            status: "healthy",
            initialized: self.is_initialized(),
            time: Utc::now(),
        }
    }
}
