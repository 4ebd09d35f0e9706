//! Local filesystem storage implementation.
//!
//! Keeps the seen-set as a single pretty-printed JSON object so the file
//! stays human-diffable between cycles. Writes go to a temporary sibling
//! file that is then renamed over the original, so a crash mid-write never
//! leaves a truncated seen-set behind.

use std::ffi::OsString;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{SeenSet, SeenStorage};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Create a LocalStorage backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Sibling temp file: the full file name with `.tmp` appended.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("seen"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.tmp_path();
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl SeenStorage for LocalStorage {
    async fn load(&self) -> Result<SeenSet> {
        match self.read_bytes().await? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::persistence(format!("malformed {}: {e}", self.path.display()))
            }),
            None => {
                log::warn!("No seen-set found at {}", self.path.display());
                Ok(SeenSet::new())
            }
        }
    }

    async fn save(&self, seen: &SeenSet) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(seen)?;
        self.write_bytes(&bytes).await.map_err(|e| {
            AppError::persistence(format!("writing {}: {e}", self.path.display()))
        })?;
        log::debug!("Seen-set: {} postings written to {}", seen.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Posting;
    use crate::storage::FingerprintStore;
    use tempfile::TempDir;

    fn sample_seen() -> SeenSet {
        let posting = Posting::new(
            "Amazon",
            "Software Development Engineer Intern",
            "https://amazon.jobs/en/jobs/1",
        );
        let mut seen = SeenSet::new();
        seen.insert(posting.fingerprint(), posting);
        seen
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("seen_jobs.json"));

        let seen = sample_seen();
        storage.save(&seen).await.unwrap();

        let loaded = storage.load().await.unwrap();
        assert_eq!(loaded, seen);
        assert!(!tmp.path().join("seen_jobs.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_tmp_suffixed_seen_file_is_not_its_own_temp() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seen_jobs.tmp");
        let storage = LocalStorage::new(&path);
        assert_eq!(storage.tmp_path(), tmp.path().join("seen_jobs.tmp.tmp"));

        let seen = sample_seen();
        storage.save(&seen).await.unwrap();
        storage.save(&seen).await.unwrap();

        assert_eq!(storage.load().await.unwrap(), seen);
        assert!(!tmp.path().join("seen_jobs.tmp.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("nope.json"));

        assert!(storage.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_error_for_backend() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seen_jobs.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let result = LocalStorage::new(&path).load().await;
        assert!(matches!(result, Err(AppError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_store_degrades_on_malformed_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seen_jobs.json");
        tokio::fs::write(&path, b"[1, 2, 3]").await.unwrap();

        let store = FingerprintStore::load(LocalStorage::new(&path)).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_store_degrades_on_missing_file() {
        let tmp = TempDir::new().unwrap();
        let store =
            FingerprintStore::load(LocalStorage::new(tmp.path().join("missing.json"))).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs_and_pretty_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/seen_jobs.json");
        let storage = LocalStorage::new(&path);

        storage.save(&sample_seen()).await.unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(text.contains("\n  \""));
        assert!(text.contains("\"company\": \"Amazon\""));
    }
}
