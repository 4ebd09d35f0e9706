//! Posting data structure and its dedup fingerprint.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Location attached to every extracted posting.
pub const DEFAULT_LOCATION: &str = "US";

/// A job posting extracted from a career page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Posting {
    /// Employer name (the source name)
    pub company: String,

    /// Posting title as shown on the page
    pub title: String,

    /// Absolute URL of the posting
    pub url: String,

    /// Location label
    pub location: String,

    /// When this posting was extracted
    pub discovered_at: DateTime<Utc>,
}

impl Posting {
    /// Create a posting discovered now with the default location.
    pub fn new(
        company: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            company: company.into(),
            title: title.into(),
            url: url.into(),
            location: DEFAULT_LOCATION.to_string(),
            discovered_at: Utc::now(),
        }
    }

    /// Dedup key over `(company, title, url)`.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.company, &self.title, &self.url)
    }
}

/// Hex-encoded SHA-256 digest identifying a posting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a `(company, title, url)` tuple.
    ///
    /// Each field is length-prefixed so that shifting characters between
    /// adjacent fields always changes the digest input.
    pub fn of(company: &str, title: &str, url: &str) -> Self {
        let mut hasher = Sha256::new();
        for field in [company, title, url] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_posting() -> Posting {
        Posting::new(
            "Google",
            "Software Engineering Intern, Backend",
            "https://careers.google.com/jobs/results/123",
        )
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let posting = sample_posting();
        assert_eq!(posting.fingerprint(), posting.fingerprint());
        assert_eq!(posting.fingerprint(), posting.clone().fingerprint());
    }

    #[test]
    fn test_fingerprint_ignores_location_and_time() {
        let a = sample_posting();
        let mut b = a.clone();
        b.location = "Remote".to_string();
        b.discovered_at = DateTime::<Utc>::UNIX_EPOCH;
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_distinguishes_fields() {
        let base = sample_posting();

        let mut other_company = base.clone();
        other_company.company = "Microsoft".to_string();
        let mut other_title = base.clone();
        other_title.title = "Backend Intern".to_string();
        let mut other_url = base.clone();
        other_url.url = "https://careers.google.com/jobs/results/124".to_string();

        assert_ne!(base.fingerprint(), other_company.fingerprint());
        assert_ne!(base.fingerprint(), other_title.fingerprint());
        assert_ne!(base.fingerprint(), other_url.fingerprint());
    }

    #[test]
    fn test_fingerprint_field_boundaries() {
        assert_ne!(Fingerprint::of("ab", "c", "d"), Fingerprint::of("a", "bc", "d"));
        assert_ne!(Fingerprint::of("a-b", "c", "d"), Fingerprint::of("a", "b-c", "d"));
    }

    #[test]
    fn test_fingerprint_is_256_bit_hex() {
        let fp = sample_posting().fingerprint();
        assert_eq!(fp.as_str().len(), 64);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_posting_defaults_location() {
        assert_eq!(sample_posting().location, "US");
    }
}
