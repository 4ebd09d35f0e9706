//! Seen-set persistence.
//!
//! The seen-set maps a posting [`Fingerprint`] to the last posting snapshot
//! recorded under it. It only ever grows: once a fingerprint is recorded the
//! posting is never reported again, across restarts included.
//!
//! ## Storage Layout
//!
//! ```text
//! storage/
//! ├── config.toml           # Watcher configuration
//! └── seen_jobs.json        # Seen-set, fingerprint -> posting
//! ```

pub mod local;
pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Fingerprint, Posting};

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Fingerprint -> posting snapshot, ordered for stable serialization.
pub type SeenSet = BTreeMap<Fingerprint, Posting>;

/// Trait for seen-set storage backends.
#[async_trait]
pub trait SeenStorage: Send + Sync {
    /// Load the whole seen-set. A missing document is an empty set.
    async fn load(&self) -> Result<SeenSet>;

    /// Replace the stored seen-set with `seen`.
    async fn save(&self, seen: &SeenSet) -> Result<()>;
}

/// In-memory seen-set backed by a storage backend.
pub struct FingerprintStore {
    seen: SeenSet,
    backend: Box<dyn SeenStorage>,
    dirty: bool,
}

impl FingerprintStore {
    /// Load the seen-set from `backend`.
    ///
    /// Unreadable or malformed storage degrades to an empty set.
    pub async fn load(backend: impl SeenStorage + 'static) -> Self {
        let seen = match backend.load().await {
            Ok(seen) => {
                log::info!("Loaded {} seen postings", seen.len());
                seen
            }
            Err(e) => {
                log::warn!("Failed to load seen postings, starting empty: {}", e);
                SeenSet::new()
            }
        };

        Self {
            seen,
            backend: Box::new(backend),
            dirty: false,
        }
    }

    /// An empty store that is never read back, for tests and dry runs.
    pub fn in_memory() -> Self {
        Self {
            seen: SeenSet::new(),
            backend: Box::new(MemoryStorage::new()),
            dirty: false,
        }
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.seen.contains_key(fingerprint)
    }

    /// Record `posting`; returns `true` if its fingerprint was new.
    ///
    /// Already recorded fingerprints are left untouched.
    pub fn insert(&mut self, posting: &Posting) -> bool {
        let fingerprint = posting.fingerprint();
        if self.seen.contains_key(&fingerprint) {
            return false;
        }
        self.seen.insert(fingerprint, posting.clone());
        self.dirty = true;
        true
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&Posting> {
        self.seen.get(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Whether there are insertions not yet written to the backend.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the seen-set to the backend.
    ///
    /// On failure the store stays dirty so the next call retries.
    pub async fn persist(&mut self) -> Result<()> {
        self.backend.save(&self.seen).await?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    struct BrokenStorage;

    #[async_trait]
    impl SeenStorage for BrokenStorage {
        async fn load(&self) -> Result<SeenSet> {
            Err(AppError::persistence("disk on fire"))
        }

        async fn save(&self, _seen: &SeenSet) -> Result<()> {
            Err(AppError::persistence("disk on fire"))
        }
    }

    fn posting(title: &str) -> Posting {
        Posting::new("Google", title, format!("https://example.com/{title}"))
    }

    #[tokio::test]
    async fn test_insert_is_idempotent() {
        let mut store = FingerprintStore::in_memory();
        let p = posting("Backend Intern");

        assert!(store.insert(&p));
        assert!(!store.insert(&p));
        assert_eq!(store.len(), 1);
        assert!(store.contains(&p.fingerprint()));
    }

    #[tokio::test]
    async fn test_existing_snapshot_is_kept() {
        let mut store = FingerprintStore::in_memory();
        let first = posting("Backend Intern");
        let mut again = first.clone();
        again.location = "Remote".to_string();

        store.insert(&first);
        store.insert(&again);
        assert_eq!(store.get(&first.fingerprint()).unwrap().location, "US");
    }

    #[tokio::test]
    async fn test_load_failure_degrades_to_empty() {
        let store = FingerprintStore::load(BrokenStorage).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_dirty() {
        let mut store = FingerprintStore::load(BrokenStorage).await;
        store.insert(&posting("Python Intern"));

        assert!(store.persist().await.is_err());
        assert!(store.is_dirty());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_persist_round_trip_through_backend() {
        let backend = MemoryStorage::new();
        let mut store = FingerprintStore::load(backend.clone()).await;
        store.insert(&posting("Java Intern"));
        store.persist().await.unwrap();
        assert!(!store.is_dirty());

        let reloaded = FingerprintStore::load(backend).await;
        assert_eq!(reloaded.len(), 1);
    }

    #[tokio::test]
    async fn test_previously_seen_posting_is_not_new() {
        let seen_before = posting("Go Backend Intern");
        let mut seen = SeenSet::new();
        seen.insert(seen_before.fingerprint(), seen_before.clone());

        let mut store = FingerprintStore::load(MemoryStorage::with_seen(seen)).await;
        assert!(!store.insert(&seen_before));
        assert!(!store.is_dirty());
        assert!(store.insert(&posting("Rust Backend Intern")));
    }
}
