//! SQLite record store implementation
//!
//! This module provides the rusqlite-backed implementation of the
//! [`RecordStore`] trait.

use crate::storage::schema::create_schema;
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use crate::storage::AnimeRecord;
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a database file
    ///
    /// The records table itself is not created here; schema creation is
    /// deferred to [`RecordStore::ensure_schema`].
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Ok(Self { conn })
    }

    /// Creates an in-memory store, useful in tests
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }
}

/// Maps a rusqlite error onto the storage error taxonomy
fn classify(err: rusqlite::Error) -> StorageError {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            let text = message.unwrap_or_else(|| code.to_string());
            if code.code == rusqlite::ErrorCode::ConstraintViolation {
                StorageError::IntegrityViolation(text)
            } else if text.contains("no such table") {
                StorageError::SchemaMissing
            } else {
                StorageError::Sqlite(rusqlite::Error::SqliteFailure(code, Some(text)))
            }
        }
        err @ rusqlite::Error::InvalidParameterCount(..) => {
            StorageError::ShapeMismatch(err.to_string())
        }
        err @ rusqlite::Error::ToSqlConversionFailure(_) => {
            StorageError::ShapeMismatch(err.to_string())
        }
        other => StorageError::Sqlite(other),
    }
}

impl RecordStore for SqliteStore {
    fn ensure_schema(&mut self) -> StorageResult<()> {
        create_schema(&self.conn)?;
        Ok(())
    }

    fn last_id(&self) -> StorageResult<Option<i64>> {
        let result = self
            .conn
            .query_row("SELECT MAX(id) FROM anime_records", [], |row| {
                row.get::<_, Option<i64>>(0)
            });

        match result {
            Ok(max) => Ok(max),
            Err(err) => match classify(err) {
                StorageError::SchemaMissing => Ok(None),
                other => Err(other),
            },
        }
    }

    fn bulk_insert(&mut self, records: &[AnimeRecord]) -> StorageResult<()> {
        let tx = self.conn.transaction().map_err(classify)?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO anime_records VALUES
                     (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
                )
                .map_err(classify)?;

            for record in records {
                stmt.execute(params![
                    record.id,
                    record.name_romaji,
                    record.name_english,
                    record.starting_time,
                    record.ending_time,
                    record.cover_image,
                    record.banner_image,
                    record.airing_format,
                    record.airing_status,
                    record.airing_episodes,
                    record.season,
                    record.desc_para,
                    record.average_score,
                    record.genres,
                    record.next_airing_ep,
                    record.record_updated_on,
                    record.retriever_version,
                ])
                .map_err(classify)?;
            }
        }

        tx.commit().map_err(classify)?;
        Ok(())
    }

    fn count_records(&self) -> StorageResult<u64> {
        let result = self
            .conn
            .query_row("SELECT COUNT(*) FROM anime_records", [], |row| {
                row.get::<_, i64>(0)
            });

        match result {
            Ok(count) => Ok(count as u64),
            Err(err) => match classify(err) {
                StorageError::SchemaMissing => Ok(0),
                other => Err(other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_record(id: i64) -> AnimeRecord {
        AnimeRecord {
            id,
            name_romaji: Some(format!("Romaji {}", id)),
            name_english: None,
            starting_time: Some("4/3/2013".to_string()),
            ending_time: None,
            cover_image: Some("https://img.example/cover.png".to_string()),
            banner_image: None,
            airing_format: Some("TV".to_string()),
            airing_status: Some("FINISHED".to_string()),
            airing_episodes: Some(25),
            season: Some("SPRING".to_string()),
            desc_para: Some("A description.".to_string()),
            average_score: Some(84),
            genres: Some("Action|Drama".to_string()),
            next_airing_ep: None,
            record_updated_on: "2024-01-01T00:00:00Z".to_string(),
            retriever_version: "test-v1".to_string(),
        }
    }

    #[test]
    fn test_open_in_memory() {
        let store = SqliteStore::open_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store.ensure_schema().unwrap();
    }

    #[test]
    fn test_last_id_without_table() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.last_id().unwrap(), None);
    }

    #[test]
    fn test_last_id_empty_table() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        assert_eq!(store.last_id().unwrap(), None);
    }

    #[test]
    fn test_last_id_returns_maximum() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store
            .bulk_insert(&[test_record(3), test_record(1), test_record(7)])
            .unwrap();
        assert_eq!(store.last_id().unwrap(), Some(7));
    }

    #[test]
    fn test_bulk_insert_without_table_is_schema_missing() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let result = store.bulk_insert(&[test_record(0)]);
        assert!(matches!(result, Err(StorageError::SchemaMissing)));
    }

    #[test]
    fn test_duplicate_id_is_integrity_violation() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store.bulk_insert(&[test_record(5)]).unwrap();

        let result = store.bulk_insert(&[test_record(5)]);
        assert!(matches!(result, Err(StorageError::IntegrityViolation(_))));
    }

    #[test]
    fn test_failed_batch_leaves_no_partial_rows() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store.bulk_insert(&[test_record(1)]).unwrap();

        // Second row collides; the first and third must not survive
        let result = store.bulk_insert(&[test_record(2), test_record(1), test_record(3)]);
        assert!(matches!(result, Err(StorageError::IntegrityViolation(_))));

        assert_eq!(store.last_id().unwrap(), Some(1));
        assert_eq!(store.count_records().unwrap(), 1);
    }

    #[test]
    fn test_count_records() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.count_records().unwrap(), 0);

        store.ensure_schema().unwrap();
        assert_eq!(store.count_records().unwrap(), 0);

        store
            .bulk_insert(&[test_record(0), test_record(1)])
            .unwrap();
        assert_eq!(store.count_records().unwrap(), 2);
    }

    #[test]
    fn test_nullable_fields_round_trip() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();

        let mut record = test_record(9);
        record.name_romaji = None;
        record.airing_episodes = None;
        record.genres = None;
        store.bulk_insert(&[record]).unwrap();

        let (romaji, episodes, version): (Option<String>, Option<i64>, String) = store
            .conn
            .query_row(
                "SELECT name_romaji, airing_episodes, x_retriever_version
                 FROM anime_records WHERE id = 9",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();

        assert_eq!(romaji, None);
        assert_eq!(episodes, None);
        assert_eq!(version, "test-v1");
    }
}
