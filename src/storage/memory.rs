//! In-memory storage backend, shared between clones.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::storage::{SeenSet, SeenStorage};

/// Seen-set storage that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<SeenSet>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with `seen`.
    pub fn with_seen(seen: SeenSet) -> Self {
        Self {
            inner: Arc::new(Mutex::new(seen)),
        }
    }
}

#[async_trait]
impl SeenStorage for MemoryStorage {
    async fn load(&self) -> Result<SeenSet> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| AppError::persistence(format!("memory storage poisoned: {e}")))?;
        Ok(guard.clone())
    }

    async fn save(&self, seen: &SeenSet) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| AppError::persistence(format!("memory storage poisoned: {e}")))?;
        *guard = seen.clone();
        Ok(())
    }
}
