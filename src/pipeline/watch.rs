// src/pipeline/watch.rs

//! Periodic trigger around the orchestrator.
//!
//! Runs one cycle eagerly, then one per interval. Triggers that arrive
//! while a cycle is still running are skipped rather than queued.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

use crate::models::{CycleResult, SourceConfig};
use crate::pipeline::{Orchestrator, SnapshotHandle};
use crate::services::{Notifier, notify_postings};

/// Owns an orchestrator and publishes each completed cycle.
pub struct Watcher {
    orchestrator: Mutex<Orchestrator>,
    sources: Vec<SourceConfig>,
    notifier: Arc<dyn Notifier>,
    snapshot: SnapshotHandle,
}

impl Watcher {
    pub fn new(
        orchestrator: Orchestrator,
        sources: Vec<SourceConfig>,
        notifier: Arc<dyn Notifier>,
        snapshot: SnapshotHandle,
    ) -> Self {
        snapshot.mark_initialized();
        Self {
            orchestrator: Mutex::new(orchestrator),
            sources,
            notifier,
            snapshot,
        }
    }

    pub fn snapshot(&self) -> &SnapshotHandle {
        &self.snapshot
    }

    /// Run a cycle unless one is already in flight.
    ///
    /// Returns `None` when the trigger was skipped.
    pub async fn trigger(&self) -> Option<CycleResult> {
        let Ok(mut orchestrator) = self.orchestrator.try_lock() else {
            log::warn!("Previous cycle still running, skipping this trigger");
            return None;
        };

        let result = orchestrator.run_cycle(&self.sources).await;
        drop(orchestrator);

        self.snapshot.publish(&result);
        if result.has_novel() {
            log::info!("Found {} new postings!", result.novel_count());
            notify_postings(self.notifier.as_ref(), &result.novel).await;
        } else {
            log::info!("No new postings found");
        }
        Some(result)
    }

    /// Trigger a cycle now and then every `interval`, forever.
    pub async fn run(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.trigger().await;
        }
    }

    /// Like [`Watcher::run`], but returns once `shutdown` resolves.
    ///
    /// A cycle interrupted by shutdown is abandoned; the seen-set on disk
    /// still holds the last completed write.
    pub async fn run_until<F>(&self, interval: Duration, shutdown: F)
    where
        F: std::future::Future<Output = ()>,
    {
        tokio::select! {
            _ = self.run(interval) => {}
            _ = shutdown => log::info!("Shutdown requested, stopping watcher"),
        }
    }
}
