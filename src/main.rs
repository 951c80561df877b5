//! Offprint main entry point
//!
//! Command-line interface for the journal article harvester.

use clap::Parser;
use offprint::config::{load_config_with_hash, Config};
use offprint::crawler::Coordinator;
use offprint::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Offprint: a journal article harvester
///
/// Offprint fetches a journal listing page, pairs up the article fragments
/// it finds into records, downloads the linked documents with bounded
/// concurrency, mines them for emails and keywords, and writes the batch as
/// metadata.json.
#[derive(Parser, Debug)]
#[command(name = "offprint")]
#[command(version = "1.0.0")]
#[command(about = "A journal article harvester", long_about = None)]
struct Cli {
    /// URL of the journal listing page to crawl
    #[arg(value_name = "URL")]
    url: String,

    /// Directory that receives downloaded files and metadata.json
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would run without crawling
    #[arg(long, conflicts_with = "discover_volumes")]
    dry_run: bool,

    /// Discover volume links on the page and write volumes.csv instead of
    /// crawling
    #[arg(long)]
    discover_volumes: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let page_url = Url::parse(&cli.url)?;

    if cli.dry_run {
        handle_dry_run(&config, &page_url, &cli.output_dir);
        return Ok(());
    }

    let coordinator = Coordinator::new(config, page_url, cli.output_dir)?;

    if cli.discover_volumes {
        let csv_path = coordinator.discover_volumes().await?;
        println!("Volume index written to {}", csv_path.display());
        return Ok(());
    }

    let report = coordinator.run().await?;
    print_report(&report);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("offprint=info,warn"),
            1 => EnvFilter::new("offprint=debug,info"),
            2 => EnvFilter::new("offprint=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &Config, page_url: &Url, output_dir: &std::path::Path) {
    println!("=== Offprint Dry Run ===\n");

    println!("Target:");
    println!("  Page URL: {}", page_url);
    println!("  Output directory: {}", output_dir.display());

    println!("\nFetch Client:");
    println!("  Max retries: {}", config.fetch.max_retries);
    println!("  Backoff base: {}ms", config.fetch.backoff_base_ms);
    println!("  Retry statuses: {:?}", config.fetch.retry_statuses);
    println!("  User agent: {}", config.fetch.user_agent);
    println!(
        "  Referer: {}",
        config.fetch.referer.as_deref().unwrap_or("(none)")
    );

    println!("\nDownloads:");
    println!("  Concurrency: {}", config.download.concurrency);

    println!("\nOutput:");
    println!("  Metadata file: {}", config.output.metadata_filename);
    println!("  Save page source: {}", config.output.save_page_source);

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {}", page_url);
}
