//! Crawl engine - main ingest orchestration
//!
//! This module contains the main crawl loop that walks the media id space
//! from the resume point up to the configured ceiling, including:
//! - Deriving the resume point from the store
//! - Fetching and flattening one id at a time
//! - Buffering rows and flushing them in fixed-size batches
//! - Recovering from a missing records table on first flush

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_media, FetchOutcome};
use crate::crawler::normalize::normalize;
use crate::crawler::rate_limit::RateLimiter;
use crate::storage::{AnimeRecord, RecordStore, StorageError};
use crate::AnivaultError;
use chrono::Utc;
use reqwest::Client;

/// Counters reported after a completed crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Ids attempted this run
    pub attempted: u64,

    /// Records fetched and buffered for persistence
    pub retrieved: u64,

    /// Bulk writes performed
    pub batches: u64,
}

/// Main crawl engine
///
/// Owns the record buffer exclusively; rows sit in memory until the buffer
/// reaches the configured threshold, then move to the store in a single
/// transaction.
pub struct CrawlEngine<S: RecordStore> {
    config: Config,
    store: S,
    client: Client,
    limiter: RateLimiter,
    buffer: Vec<AnimeRecord>,
}

impl<S: RecordStore> CrawlEngine<S> {
    /// Creates an engine over the given store
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    /// * `store` - The record store to persist into
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlEngine)` - Successfully created engine
    /// * `Err(AnivaultError)` - Failed to build the HTTP client
    pub fn new(config: Config, store: S) -> Result<Self, AnivaultError> {
        let client = build_http_client(&config.api)?;
        let limiter = RateLimiter::from_seconds(config.crawl.rate_limit_seconds);

        Ok(Self {
            config,
            store,
            client,
            limiter,
            buffer: Vec::new(),
        })
    }

    /// The next id this engine would attempt, derived from the store
    ///
    /// Prior ingestion is assumed to have been strictly sequential: ids at or
    /// below the checkpoint are never re-attempted. Ids that were absent
    /// upstream in an earlier run and sit above the checkpoint get re-scanned;
    /// that is accepted cost, not an error.
    pub fn resume_id(&self) -> Result<i64, StorageError> {
        Ok(self.store.last_id()?.map_or(0, |last| last + 1))
    }

    /// Runs the crawl loop to completion
    ///
    /// One id per iteration: flush the buffer if it is full, fetch, flatten,
    /// buffer, sleep the rate-limit interval, advance. Fetch failures of any
    /// kind count the id as absent and the loop continues; storage failures
    /// other than a first missing-schema are fatal.
    pub async fn run(&mut self) -> Result<CrawlSummary, AnivaultError> {
        let mut curr_id = self.resume_id()?;
        let max_id = self.config.crawl.max_id;
        let mut summary = CrawlSummary::default();

        tracing::info!("Starting crawl at id {} (ceiling {})", curr_id, max_id);

        while curr_id < max_id {
            if self.buffer.len() == self.config.crawl.batch_threshold {
                self.flush()?;
                summary.batches += 1;
            }

            match fetch_media(&self.client, &self.config.api.endpoint, curr_id).await {
                FetchOutcome::Found(media) => {
                    let retrieved_at = Utc::now().to_rfc3339();
                    let record = normalize(
                        &media,
                        curr_id,
                        &retrieved_at,
                        &self.config.crawl.retriever_version,
                    );
                    let name = record
                        .name_romaji
                        .clone()
                        .unwrap_or_else(|| "<untitled>".to_string());

                    self.buffer.push(record);
                    summary.retrieved += 1;

                    tracing::info!(
                        "<{} records pending> | id {}: {}",
                        self.buffer.len(),
                        curr_id,
                        name
                    );
                }
                FetchOutcome::Absent => {
                    tracing::info!(
                        "<{} records pending> | id {}: no entry",
                        self.buffer.len(),
                        curr_id
                    );
                }
                FetchOutcome::TransientError { error } => {
                    // Treated the same as an absent entry
                    tracing::info!(
                        "<{} records pending> | id {}: no entry ({})",
                        self.buffer.len(),
                        curr_id,
                        error
                    );
                }
            }
            summary.attempted += 1;

            self.limiter.wait_turn().await;
            curr_id += 1;
        }

        // The loop leaves a partial batch behind; write it out before
        // reporting completion.
        if !self.buffer.is_empty() {
            self.flush()?;
            summary.batches += 1;
        }

        tracing::info!(
            "Crawl complete: {} ids attempted, {} records stored",
            summary.attempted,
            summary.retrieved
        );

        Ok(summary)
    }

    /// Writes the buffered records in one transaction and clears the buffer
    ///
    /// A missing records table is created and the insert retried, at most
    /// once per flush. Every other storage failure propagates and halts the
    /// crawl; the buffer is cleared only after a successful insert.
    fn flush(&mut self) -> Result<(), StorageError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        tracing::info!("Writing {} records to the database", self.buffer.len());

        let mut schema_ensured = false;
        loop {
            match self.store.bulk_insert(&self.buffer) {
                Ok(()) => break,
                Err(StorageError::SchemaMissing) if !schema_ensured => {
                    tracing::warn!("Records table missing, creating it");
                    self.store.ensure_schema()?;
                    schema_ensured = true;
                }
                Err(e) => return Err(e),
            }
        }

        self.buffer.clear();
        Ok(())
    }

    /// Number of records currently buffered
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Consumes the engine, returning the store
    pub fn into_store(self) -> S {
        self.store
    }
}
