// src/config.rs

//! Configuration loading utilities.
//!
//! This module provides convenience functions for loading the watcher
//! configuration from a storage directory.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::Config;

/// Config file name inside the storage directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Load configuration from `{storage_dir}/config.toml` and validate it.
///
/// A missing or unreadable file falls back to the built-in defaults, but an
/// invalid configuration (for example one without sources) is an error.
pub fn load_all(storage_dir: &Path) -> Result<Config> {
    let config = Config::load_or_default(storage_dir.join(CONFIG_FILE));
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid configuration: {e}")))?;
    Ok(config)
}

/// Path of the seen-set file for `config` under `storage_dir`.
pub fn seen_path(storage_dir: &Path, config: &Config) -> PathBuf {
    storage_dir.join(&config.storage.seen_file)
}
