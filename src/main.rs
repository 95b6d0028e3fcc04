//! anivault main entry point
//!
//! This is the command-line interface for the anivault record harvester.

use anivault::config::{load_config_with_hash, Config};
use anivault::crawler::{format_duration, CrawlEngine};
use anivault::storage::{RecordStore, SqliteStore};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// anivault: an incremental AniList record harvester
///
/// anivault walks the AniList media id space sequentially, fetching one
/// entry per request, and appends flattened rows to a local SQLite database
/// in batches. Interrupted runs resume from the highest id already stored.
#[derive(Parser, Debug)]
#[command(name = "anivault")]
#[command(version)]
#[command(about = "Harvests AniList records into a local SQLite database", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("anivault=info,warn"),
            1 => EnvFilter::new("anivault=debug,info"),
            2 => EnvFilter::new("anivault=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what a run would do
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let store = SqliteStore::open(Path::new(&config.output.database_path))?;
    let resume_id = store.last_id()?.map_or(0, |last| last + 1);

    println!("=== anivault Dry Run ===\n");

    println!("Crawl Configuration:");
    println!("  Id ceiling: {}", config.crawl.max_id);
    println!("  Batch threshold: {} records", config.crawl.batch_threshold);
    println!("  Rate limit: {} secs", config.crawl.rate_limit_seconds);
    println!("  Retriever version: {}", config.crawl.retriever_version);

    println!("\nAPI:");
    println!("  Endpoint: {}", config.api.endpoint);
    println!("  Request timeout: {}s", config.api.request_timeout_seconds);
    println!("  User agent: {}", config.api.user_agent);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nResume point: id {}", resume_id);
    let remaining = (config.crawl.max_id - resume_id).max(0) as f64;
    println!(
        "Estimated time consumption: {}",
        format_duration((remaining * config.crawl.rate_limit_seconds) as u64)
    );

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would attempt ids {}..{}",
        resume_id, config.crawl.max_id
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let store = SqliteStore::open(Path::new(&config.output.database_path))?;

    println!("Stored records: {}", store.count_records()?);
    match store.last_id()? {
        Some(last) => println!("Highest stored id: {}", last),
        None => println!("Highest stored id: (none)"),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let store = SqliteStore::open(Path::new(&config.output.database_path))?;
    let mut engine = CrawlEngine::new(config.clone(), store)?;

    let resume_id = engine.resume_id()?;
    print_banner(&config, resume_id);

    let start = std::time::Instant::now();
    match engine.run().await {
        Ok(summary) => {
            tracing::info!(
                "All records retrieved: {} ids attempted, {} records stored, {} bulk writes",
                summary.attempted,
                summary.retrieved,
                summary.batches
            );
            println!(
                "Time consumption: [{}]",
                format_duration(start.elapsed().as_secs())
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Prints the startup banner with the effective settings and time estimate
fn print_banner(config: &Config, resume_id: i64) {
    let remaining = (config.crawl.max_id - resume_id).max(0) as f64;
    let estimated = (remaining * config.crawl.rate_limit_seconds) as u64;

    println!("=============================================");
    println!("  Retriever version: {}", config.crawl.retriever_version);
    println!("  Rate limit offset: {} secs", config.crawl.rate_limit_seconds);
    println!(
        "  Bulk write threshold: {} records",
        config.crawl.batch_threshold
    );
    println!("  Resume point: id {}", resume_id);
    println!(
        "  Estimated time consumption: {}",
        format_duration(estimated)
    );
    println!("=============================================");
}
