//! Mogodum main entry point
//!
//! This is the command-line interface for the Mogodum movie listing harvester.

use anyhow::Context;
use clap::Parser;
use mogodum::api::{create_router, AppState};
use mogodum::config::{load_config_with_hash, validate, Config};
use mogodum::crawler::run_crawl;
use mogodum::output::{compute_statistics, print_statistics, JsonMovieStore, MovieStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mogodum: a movie listing harvester
///
/// Mogodum walks the paginated movie listing, follows every entry to its
/// detail and external metadata pages, and persists the assembled records as
/// JSON. By default it serves the trigger and status endpoints over HTTP.
#[derive(Parser, Debug)]
#[command(name = "mogodum")]
#[command(version = "1.0.0")]
#[command(about = "A movie listing harvester", long_about = None)]
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

    /// Validate config and show the effective settings without serving
    #[arg(long, conflicts_with_all = ["stats", "crawl"])]
    dry_run: bool,

    /// Show statistics from the movie artifact and exit
    #[arg(long, conflicts_with_all = ["dry_run", "crawl"])]
    stats: bool,

    /// Scrape this many listing pages in the foreground and exit
    #[arg(long, value_name = "PAGES", conflicts_with_all = ["dry_run", "stats"])]
    crawl: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            let config = Config::default();
            validate(&config).context("Default configuration is invalid")?;
            tracing::info!("No configuration file given, using defaults");
            config
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(pages) = cli.crawl {
        handle_crawl(config, pages).await?;
    } else {
        serve(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mogodum=info,warn"),
            1 => EnvFilter::new("mogodum=debug,info"),
            2 => EnvFilter::new("mogodum=trace,debug"),
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

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Mogodum Dry Run ===\n");

    println!("Server:");
    println!("  Bind address: {}", config.server.bind_address);

    println!("\nScraper:");
    println!("  Listing URL: {}", config.scraper.listing_url);
    println!("  User agent: {}", config.scraper.user_agent);
    println!(
        "  Timeouts: {}s request, {}s connect",
        config.scraper.request_timeout_secs, config.scraper.connect_timeout_secs
    );
    println!(
        "  Max concurrent details: {}",
        config.scraper.max_concurrent_details
    );
    println!("  Resolve external pages: {}", config.scraper.resolve_external);
    println!(
        "  Listing retries: {} ({}ms apart)",
        config.scraper.listing_retries, config.scraper.retry_delay_ms
    );

    println!("\nOutput:");
    println!("  Movies: {}", config.output.movies_path);
    println!("  Snapshots: {}/movies<page>.json", config.output.snapshot_dir);
    println!("  Write retries: {}", config.output.write_retries);
    println!(
        "  Persistence mandatory: {}",
        config.output.persistence_mandatory
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the final artifact
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Artifact: {}\n", config.output.movies_path);

    let store = JsonMovieStore::from_config(&config.output);
    let movies = match store.load() {
        Ok(movies) => movies,
        Err(e) if e.is_not_found() => {
            anyhow::bail!(
                "{} does not exist yet; run with --crawl <PAGES> first",
                config.output.movies_path
            )
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", config.output.movies_path))
        }
    };

    print_statistics(&compute_statistics(&movies));

    Ok(())
}

/// Handles the --crawl mode: one foreground run
async fn handle_crawl(config: Config, pages: u32) -> anyhow::Result<()> {
    tracing::info!(
        "Scraping {} pages from {}",
        pages,
        config.scraper.listing_url
    );

    match run_crawl(config, pages).await {
        Ok(movies) => {
            tracing::info!("Scrape completed with {} movies", movies.len());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}

/// Serves the HTTP endpoints until the process is stopped
async fn serve(config: Config) -> anyhow::Result<()> {
    let bind_address = config.server.bind_address.clone();
    let state = AppState::new(config)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Listening on {}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
