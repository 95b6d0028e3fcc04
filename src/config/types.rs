use serde::Deserialize;

/// Main configuration structure for anivault
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub api: ApiConfig,
    pub output: OutputConfig,
}

/// Crawl loop configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Highest media id to attempt (exclusive ceiling)
    #[serde(rename = "max-id")]
    pub max_id: i64,

    /// Number of buffered records that triggers a bulk write
    #[serde(rename = "batch-threshold")]
    pub batch_threshold: usize,

    /// Fixed delay after every fetch attempt, in seconds
    #[serde(rename = "rate-limit-seconds")]
    pub rate_limit_seconds: f64,

    /// Version tag stamped onto every stored row
    #[serde(rename = "retriever-version")]
    pub retriever_version: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_id: 200_000,
            batch_threshold: 150,
            rate_limit_seconds: 0.75,
            retriever_version: "V2.0-SQLite3".to_string(),
        }
    }
}

/// AniList API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// GraphQL endpoint requests are posted to
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-seconds")]
    pub request_timeout_seconds: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://graphql.anilist.co".to_string(),
            request_timeout_seconds: 30,
            user_agent: concat!("anivault/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./anime_database.db".to_string(),
        }
    }
}
