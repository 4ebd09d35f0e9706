// src/models/mod.rs

//! Domain models for the watcher.
//!
//! This module contains the data structures shared across the crate,
//! organized by their primary purpose.

mod config;
mod cycle;
mod posting;

// Re-export all public types
pub use config::{
    AdapterKind, Config, CrawlerConfig, NotifyConfig, Politeness, ScheduleConfig, SourceConfig,
    StorageConfig,
};
pub use cycle::CycleResult;
pub use posting::{DEFAULT_LOCATION, Fingerprint, Posting};
