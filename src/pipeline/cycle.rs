// src/pipeline/cycle.rs

//! Crawl cycle orchestration.
//!
//! One cycle walks every configured source in order:
//! fetch → extract → classify → dedup. Sources are processed strictly one
//! after another with a randomized pause in between, and any failure is
//! confined to the source that caused it.

use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::models::{CycleResult, Politeness, Posting, SourceConfig};
use crate::services::{adapters, is_relevant};
use crate::storage::FingerprintStore;
use crate::utils::http::Fetch;

/// Drives crawl cycles over a fetcher and a fingerprint store.
///
/// `run_cycle` takes `&mut self`, so at most one cycle per orchestrator can
/// be in flight.
pub struct Orchestrator {
    fetcher: Arc<dyn Fetch>,
    store: FingerprintStore,
    politeness: Politeness,
    cumulative_total: usize,
}

impl Orchestrator {
    pub fn new(fetcher: Arc<dyn Fetch>, store: FingerprintStore, politeness: Politeness) -> Self {
        Self {
            fetcher,
            store,
            politeness,
            cumulative_total: 0,
        }
    }

    pub fn store(&self) -> &FingerprintStore {
        &self.store
    }

    /// Novel postings reported since this orchestrator was created.
    pub fn cumulative_total(&self) -> usize {
        self.cumulative_total
    }

    /// Run one pass over `sources` and return the novel postings.
    pub async fn run_cycle(&mut self, sources: &[SourceConfig]) -> CycleResult {
        let mut result = CycleResult::begin();
        log::info!("Starting cycle over {} sources", sources.len());

        for source in sources {
            log::info!("Crawling {}...", source.name);

            match self.collect(source).await {
                Ok(candidates) => {
                    result.candidates += candidates.len();
                    let relevant: Vec<Posting> = candidates
                        .into_iter()
                        .filter(|p| is_relevant(&p.title))
                        .collect();
                    result.total_seen += relevant.len();

                    for posting in relevant {
                        if self.store.insert(&posting) {
                            log::info!("  New: {}", preview(&posting.title));
                            result.novel.push(posting);
                        }
                    }
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", source.name, e);
                    result.failed_sources.push(source.name.clone());
                }
            }

            self.pause().await;
        }

        if self.store.is_dirty() {
            if let Err(e) = self.store.persist().await {
                log::error!("Failed to save seen postings, will retry next cycle: {}", e);
            }
        }

        self.cumulative_total += result.novel.len();
        result.cumulative_total = self.cumulative_total;
        result.finished_at = Utc::now();

        log::info!(
            "Cycle complete: {} new, {} relevant, {} candidates, {} failed sources",
            result.novel.len(),
            result.total_seen,
            result.candidates,
            result.failed_sources.len()
        );
        result
    }

    /// Fetch and extract candidates for a single source.
    async fn collect(&self, source: &SourceConfig) -> Result<Vec<Posting>> {
        let body = self.fetcher.fetch(&source.search_url).await?;
        let candidates = adapters::extract(&body, source)?;
        log::info!("  Found {} candidates", candidates.len());
        Ok(candidates)
    }

    async fn pause(&self) {
        if self.politeness.is_zero() {
            return;
        }
        let delay = self.politeness.sample();
        log::debug!("Sleeping {:?} before next source", delay);
        tokio::time::sleep(delay).await;
    }
}

/// First 50 characters of a title for log lines.
fn preview(title: &str) -> String {
    crate::utils::truncate_chars(title, 50)
}
