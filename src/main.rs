//! ledger-crawl main entry point
//!
//! This is the command-line interface for the ledger-crawl domain crawler.

use anyhow::{bail, Context};
use clap::Parser;
use ledger_crawl::config::{load_config_with_hash, validate, Config, DuplicateMode};
use ledger_crawl::crawler::crawl;
use ledger_crawl::output::{export_index, load_statistics, print_run_summary, print_statistics};
use ledger_crawl::storage::{CsvLedger, DedupKey};
use ledger_crawl::url::CrawlTarget;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// ledger-crawl: a polite, resumable domain crawler
///
/// Crawls each configured domain breadth-first while respecting robots.txt,
/// saves the visible text of every page, and records each attempt in a CSV
/// ledger that later runs resume from.
#[derive(Parser, Debug)]
#[command(name = "ledger-crawl")]
#[command(version)]
#[command(about = "A polite, resumable domain crawler", long_about = None)]
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

    /// Override the duplicate mode (overwrite, skip, reset)
    #[arg(long, value_name = "MODE")]
    mode: Option<DuplicateMode>,

    /// Override the page budget per domain
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export_index"])]
    dry_run: bool,

    /// Show statistics from the ledger and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_index"])]
    stats: bool,

    /// Write the deduplicated saved-page index as CSV and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["dry_run", "stats"])]
    export_index: Option<PathBuf>,

    /// Deduplicate the exported index by canonical URL instead of exact URL
    #[arg(long, requires = "export_index")]
    canonical: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, cli.mode, cli.max_pages)?;

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else if let Some(path) = &cli.export_index {
        let dedup = if cli.canonical {
            DedupKey::Canonical
        } else {
            DedupKey::Url
        };
        handle_export_index(&config, path, dedup)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ledger_crawl=info,warn"),
            1 => EnvFilter::new("ledger_crawl=debug,info"),
            2 => EnvFilter::new("ledger_crawl=trace,debug"),
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

/// Applies command-line overrides and re-validates
fn apply_overrides(
    config: &mut Config,
    mode: Option<DuplicateMode>,
    max_pages: Option<usize>,
) -> anyhow::Result<()> {
    if let Some(mode) = mode {
        tracing::info!("Duplicate mode overridden: {}", mode);
        config.crawler.duplicate_mode = mode;
    }
    if let Some(max_pages) = max_pages {
        tracing::info!("Page budget overridden: {}", max_pages);
        config.crawler.max_pages_per_domain = max_pages;
    }
    validate(config).context("Invalid command-line override")?;
    Ok(())
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== ledger-crawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max pages per domain: {}",
        config.crawler.max_pages_per_domain
    );
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Sitemap timeout: {}s", config.crawler.sitemap_timeout_secs);
    println!("  Duplicate mode: {}", config.crawler.duplicate_mode);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Pages: {}", config.output.output_dir.display());
    println!("  Ledger: {}", config.output.ledger_path.display());

    println!("\nTargets ({}):", config.targets.len());
    for entry in &config.targets {
        let target = CrawlTarget::parse(&entry.base_url)
            .with_context(|| format!("Invalid target {}", entry.base_url))?;
        println!("  - {} (domain: {})", target.base_url(), target.domain());
    }

    if config.crawler.duplicate_mode == DuplicateMode::Reset {
        println!("\n! A real run would first delete the output directory and the ledger");
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl {} domains, up to {} pages each",
        config.targets.len(),
        config.crawler.max_pages_per_domain
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics from the ledger
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Ledger: {}\n", config.output.ledger_path.display());

    let ledger = CsvLedger::open(&config.output.ledger_path)?;
    if !ledger.exists() {
        bail!(
            "No ledger at {}; nothing has been crawled yet",
            config.output.ledger_path.display()
        );
    }

    let stats = load_statistics(&ledger).context("Failed to read ledger")?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-index mode: writes the embeddable record set
fn handle_export_index(config: &Config, path: &Path, dedup: DedupKey) -> anyhow::Result<()> {
    println!("=== Exporting Index ===\n");
    println!("Ledger: {}", config.output.ledger_path.display());
    println!("Output: {}", path.display());
    println!();

    let ledger = CsvLedger::open(&config.output.ledger_path)?;
    let written = export_index(&ledger, dedup, path)
        .with_context(|| format!("Failed to export index to {}", path.display()))?;

    println!("✓ {} records exported to: {}", written, path.display());

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Targets: {}, mode: {}, budget: {} pages per domain",
        config.targets.len(),
        config.crawler.duplicate_mode,
        config.crawler.max_pages_per_domain
    );

    match crawl(config).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            print_run_summary(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e).context("Crawl aborted")
        }
    }
}
