//! Storage module for persisting harvested records
//!
//! This module handles the durable side of the crawl:
//! - Lazy schema creation for the records table
//! - Append-only bulk inserts, one transaction per batch
//! - The resume checkpoint (highest stored id)

mod schema;
mod sqlite;
mod traits;

pub use schema::{create_schema, SCHEMA_SQL};
pub use sqlite::SqliteStore;
pub use traits::{RecordStore, StorageError, StorageResult};

/// One harvested anime entry, in stored column order
///
/// Every field is flat: list-valued attributes from the API arrive here
/// already joined into delimited strings. `record_updated_on` and
/// `retriever_version` are stamped by the engine, never sourced from the API.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimeRecord {
    pub id: i64,
    pub name_romaji: Option<String>,
    pub name_english: Option<String>,
    pub starting_time: Option<String>,
    pub ending_time: Option<String>,
    pub cover_image: Option<String>,
    pub banner_image: Option<String>,
    pub airing_format: Option<String>,
    pub airing_status: Option<String>,
    pub airing_episodes: Option<i64>,
    pub season: Option<String>,
    pub desc_para: Option<String>,
    pub average_score: Option<i64>,
    pub genres: Option<String>,
    pub next_airing_ep: Option<String>,
    pub record_updated_on: String,
    pub retriever_version: String,
}
