//! Notification of newly discovered postings.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Posting;

/// A formatted, human-readable summary of one cycle's novel postings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub body: String,
}

impl Digest {
    /// Format a digest for `postings`.
    pub fn from_postings(postings: &[Posting]) -> Self {
        let subject = format!("{} New Backend Internships Available!", postings.len());

        let mut body = String::from("New Backend Internships Found!\n\n");
        for posting in postings {
            body.push_str(&format!("Company: {}\n", posting.company));
            body.push_str(&format!("Position: {}\n", posting.title));
            body.push_str(&format!("Link: {}\n", posting.url));
            body.push_str(&format!("Found: {}\n", posting.discovered_at.to_rfc3339()));
            body.push_str(&"-".repeat(40));
            body.push_str("\n\n");
        }
        body.push_str(&format!("\nTotal new opportunities: {}", postings.len()));

        Self { subject, body }
    }
}

/// Delivery channel for cycle digests.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a digest to the configured recipient.
    async fn deliver(&self, digest: &Digest) -> Result<()>;
}

/// Notifier that writes digests to the log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    recipient: Option<String>,
}

impl LogNotifier {
    pub fn new(recipient: Option<String>) -> Self {
        Self { recipient }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, digest: &Digest) -> Result<()> {
        let to = self.recipient.as_deref().unwrap_or("operator");
        log::info!("Notify {}: {}", to, digest.subject);
        for line in digest.body.lines() {
            log::info!("    {}", line);
        }
        Ok(())
    }
}

/// Send one digest for `postings`, if there are any.
///
/// Delivery failures are logged and swallowed. Returns whether a digest
/// was delivered.
pub async fn notify_postings(notifier: &dyn Notifier, postings: &[Posting]) -> bool {
    if postings.is_empty() {
        return false;
    }

    let digest = Digest::from_postings(postings);
    match notifier.deliver(&digest).await {
        Ok(()) => {
            log::info!("Alert sent for {} postings", postings.len());
            true
        }
        Err(e) => {
            log::error!("Failed to deliver alert: {}", e);
            false
        }
    }
}
