//! Linkscope main entry point
//!
//! This is the command-line interface for the Linkscope crawler and
//! link-graph auditor.

use anyhow::{Context, Result};
use clap::Parser;
use linkscope::config::{load_config_with_hash, Config, CrawlConfig};
use linkscope::crawler::{CrawlStatus, Coordinator, FetchRoute};
use linkscope::output::{print_statistics, write_markdown_report};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Linkscope: a same-origin crawler and link-graph auditor
///
/// Linkscope crawls every in-scope page reachable from a seed URL, analyzes
/// each page once, and reports orphan pages, internal link equity, broken
/// links and per-page SEO scores.
#[derive(Parser, Debug)]
#[command(name = "linkscope")]
#[command(version)]
#[command(about = "A same-origin crawler and link-graph auditor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Skip writing the markdown report
    #[arg(long, conflicts_with = "dry_run")]
    no_report: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let crawl_config =
        CrawlConfig::from_config(&config).context("Invalid crawl configuration")?;

    if cli.dry_run {
        handle_dry_run(&config, &crawl_config);
        return Ok(());
    }

    handle_crawl(&config, crawl_config, &config_hash, !cli.no_report).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkscope=info,warn"),
            1 => EnvFilter::new("linkscope=debug,info"),
            2 => EnvFilter::new("linkscope=trace,debug"),
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

/// Handles the --dry-run mode: shows the resolved crawl configuration
fn handle_dry_run(config: &Config, crawl_config: &CrawlConfig) {
    println!("=== Linkscope Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed: {}", crawl_config.seed);
    println!("  Max depth: {}", crawl_config.max_depth);
    println!("  Workers: {}", crawl_config.concurrency);
    println!("  Crawl delay: {}ms", crawl_config.crawl_delay.as_millis());
    println!(
        "  Request timeout: {}s",
        crawl_config.request_timeout.as_secs()
    );
    match &crawl_config.route {
        FetchRoute::Direct => println!("  Route: direct"),
        FetchRoute::Proxy(template) => println!("  Route: proxy ({})", template),
    }
    println!(
        "  Ignored extensions: {}",
        crawl_config.asset_denylist.len()
    );

    if !crawl_config.known_urls.is_empty() {
        println!("\nKnown URLs ({}):", crawl_config.known_urls.len());
        for url in &crawl_config.known_urls {
            println!("  - {}", url);
        }
    }

    println!("\nUser Agent: {}", crawl_config.user_agent);
    println!("Report: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} root URLs",
        1 + crawl_config.known_urls.len()
    );
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    crawl_config: CrawlConfig,
    config_hash: &str,
    write_report: bool,
) -> Result<()> {
    let coordinator =
        Coordinator::new(crawl_config).context("Failed to initialize the HTTP client")?;

    let token = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after in-flight pages");
            token.cancel();
        }
    });

    let outcome = coordinator.run().await;

    print_statistics(&outcome);

    if write_report {
        write_markdown_report(
            &outcome,
            Some(config_hash),
            Path::new(&config.output.summary_path),
        )
        .context("Failed to write report")?;
    }

    if outcome.status() == CrawlStatus::NothingReachable {
        anyhow::bail!("No page could be fetched from {}", outcome.seed);
    }

    Ok(())
}
