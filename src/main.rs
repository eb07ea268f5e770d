//! Sitecorpus main entry point
//!
//! This is the command-line interface for the Sitecorpus documentation crawler.

use anyhow::Context;
use clap::{Parser, Subcommand};
use sitecorpus::config::{load_config_with_hash, validate, Config};
use sitecorpus::crawler::{crawl, CrawlReport};
use sitecorpus::output::rebuild_corpus;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Sitecorpus: a single-domain documentation crawler
///
/// Sitecorpus crawls every page reachable within one domain from a seed URL,
/// mirrors each page as Markdown and concatenates them into one corpus file.
#[derive(Parser, Debug)]
#[command(name = "sitecorpus")]
#[command(version)]
#[command(about = "Crawl a documentation site into a Markdown corpus", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory under which `<domain>/` output is written
    #[arg(long, value_name = "DIR", global = true)]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site starting from the given seed URL
    Crawl {
        /// Seed URL; only pages within its domain are crawled
        url: String,

        /// Maximum number of pages fetched at once
        #[arg(long, value_name = "N")]
        concurrency: Option<u32>,
    },

    /// Rebuild the corpus file from an existing output directory
    Generate {
        /// Domain directory name under the output root (e.g. docs.example.com)
        domain: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_configuration(cli.config.as_deref())?;
    if let Some(dir) = &cli.output_dir {
        config.output.root_dir = dir.to_string_lossy().into_owned();
    }

    match cli.command {
        Command::Crawl { url, concurrency } => {
            if let Some(n) = concurrency {
                config.crawler.max_concurrent_requests = n;
            }
            validate(&config).context("Invalid configuration after applying CLI flags")?;
            handle_crawl(config, &url).await
        }
        Command::Generate { domain } => {
            validate(&config).context("Invalid configuration after applying CLI flags")?;
            handle_generate(&config, &domain)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitecorpus=info,warn"),
            1 => EnvFilter::new("sitecorpus=debug,info"),
            2 => EnvFilter::new("sitecorpus=trace,debug"),
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

/// Loads the config file when one is given, defaults otherwise
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Handles the `crawl` subcommand
async fn handle_crawl(config: Config, url: &str) -> anyhow::Result<()> {
    let report = match crawl(config, url).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e).with_context(|| format!("Crawl of {} failed", url));
        }
    };

    print_summary(&report);
    Ok(())
}

/// Handles the `generate` subcommand
fn handle_generate(config: &Config, domain: &str) -> anyhow::Result<()> {
    let root = Path::new(&config.output.root_dir);
    let corpus_path = rebuild_corpus(root, domain)
        .with_context(|| format!("Failed to rebuild corpus for {}", domain))?;

    println!("✓ Corpus written to: {}", corpus_path.display());
    Ok(())
}

fn print_summary(report: &CrawlReport) {
    println!("\n=== Crawl Summary ===\n");
    println!("Seed: {}", report.seed);
    println!("Pages crawled: {}", report.pages_succeeded);
    println!("Pages failed: {}", report.pages_failed);
    println!("Waves: {}", report.waves);
    println!("Elapsed: {:.2}s", report.elapsed.as_secs_f64());
    println!("\n✓ Corpus written to: {}", report.corpus_path.display());

    if let Some(path) = &report.failure_report_path {
        println!("✗ Failure report written to: {}", path.display());
        println!("\nFailed URLs:");
        for failure in &report.failures {
            println!("  - {}", failure.url);
            println!("    reason: {}", failure.reason);
            println!("    found on: {}", failure.referrer);
        }
    }
}
