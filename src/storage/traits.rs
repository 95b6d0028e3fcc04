//! Storage traits and error types
//!
//! This module defines the trait interface for record stores and the error
//! taxonomy the crawl engine keys its recovery behavior on.

use crate::storage::AnimeRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// The records table does not exist yet. Recoverable: create the schema
    /// and retry the operation once.
    #[error("records table does not exist")]
    SchemaMissing,

    /// A row violated a table constraint, typically a duplicate primary key.
    /// Fatal to the batch; never retried.
    #[error("integrity violation: {0}")]
    IntegrityViolation(String),

    /// A row's field count or types disagree with the schema. Fatal to the
    /// batch; never retried.
    #[error("row shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for record store implementations
pub trait RecordStore {
    /// Creates the records table if absent. Idempotent.
    fn ensure_schema(&mut self) -> StorageResult<()>;

    /// Returns the highest id currently stored
    ///
    /// `None` when the table is empty or has not been created yet; a missing
    /// table is not an error here.
    fn last_id(&self) -> StorageResult<Option<i64>>;

    /// Appends all rows in one transaction
    ///
    /// Either every row commits or none of them do; a failed batch leaves no
    /// partial rows behind.
    ///
    /// # Errors
    ///
    /// * [`StorageError::SchemaMissing`] - the table has not been created
    /// * [`StorageError::IntegrityViolation`] - a row's id already exists
    /// * [`StorageError::ShapeMismatch`] - a row disagrees with the schema
    fn bulk_insert(&mut self, records: &[AnimeRecord]) -> StorageResult<()>;

    /// Total number of stored records (0 when the table is absent)
    fn count_records(&self) -> StorageResult<u64>;
}
