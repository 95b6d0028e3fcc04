//! Anivault: an incremental AniList record harvester
//!
//! This crate implements a crawler that walks the AniList media id space
//! sequentially, fetching one entry at a time, flattening it into a fixed-width
//! row, and appending rows to a local SQLite database in batches. A crawl
//! resumes from the highest id already stored, so an interrupted run picks up
//! where the previous one left off.

pub mod config;
pub mod crawler;
pub mod storage;

use thiserror::Error;

/// Main error type for anivault operations
#[derive(Debug, Error)]
pub enum AnivaultError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for anivault operations
pub type Result<T> = std::result::Result<T, AnivaultError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlSummary};
pub use storage::{AnimeRecord, RecordStore, SqliteStore};
