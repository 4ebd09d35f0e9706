//! Outcome of a single crawl cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Posting;

/// Summary of one pass over all configured sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleResult {
    /// Postings whose fingerprint was not yet in the seen-set
    pub novel: Vec<Posting>,

    /// Relevant postings seen this cycle, novel or not
    pub total_seen: usize,

    /// Candidates extracted before classification
    pub candidates: usize,

    /// Sources that could not be fetched or parsed
    pub failed_sources: Vec<String>,

    /// Novel postings across the process lifetime, this cycle included
    pub cumulative_total: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CycleResult {
    pub(crate) fn begin() -> Self {
        let now = Utc::now();
        Self {
            novel: Vec::new(),
            total_seen: 0,
            candidates: 0,
            failed_sources: Vec::new(),
            cumulative_total: 0,
            started_at: now,
            finished_at: now,
        }
    }

    pub fn has_novel(&self) -> bool {
        !self.novel.is_empty()
    }

    pub fn novel_count(&self) -> usize {
        self.novel.len()
    }
}
