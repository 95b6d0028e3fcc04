//! Database schema definition
//!
//! Column names and order mirror what [`crate::storage::AnimeRecord`] carries;
//! the bulk insert binds positionally.

/// SQL schema for the records table
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS anime_records (
    id INTEGER,
    name_romaji TEXT,
    name_english TEXT,
    starting_time TEXT,
    ending_time TEXT,
    cover_image TEXT,
    banner_image TEXT,
    airing_format TEXT,
    airing_status TEXT,
    airing_episodes INTEGER,
    season TEXT,
    desc_para TEXT,
    average_score INTEGER,
    genres TEXT,
    next_airing_ep TEXT,

    x_record_updated_on TEXT NOT NULL,
    x_retriever_version TEXT NOT NULL,

    PRIMARY KEY (id)
);
"#;

/// Creates the records table if it does not exist
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema created or already present
/// * `Err(rusqlite::Error)` - Failed to create schema
pub fn create_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
