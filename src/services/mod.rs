//! Service layer for the watcher.
//!
//! This module contains the business logic for:
//! - Posting extraction per source (`adapters`)
//! - Relevance classification (`classifier`)
//! - Digest formatting and delivery (`notifier`)

pub mod adapters;
pub mod classifier;
pub mod notifier;

pub use classifier::is_relevant;
pub use notifier::{Digest, LogNotifier, Notifier, notify_postings};
