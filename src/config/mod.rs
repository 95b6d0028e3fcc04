//! Configuration module for anivault
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every key is optional; omitted keys fall back to the defaults the
//! retriever ships with.
//!
//! # Example
//!
//! ```no_run
//! use anivault::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawl ceiling: {}", config.crawl.max_id);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, Config, CrawlConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
