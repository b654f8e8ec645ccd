//! Link-Ripple main entry point
//!
//! This is the command-line interface for the Link-Ripple crawler.

use anyhow::Context;
use clap::Parser;
use link_ripple::config::load_config_or_default;
use link_ripple::crawler::{run_crawl, seed_lines};
use link_ripple::output::{log_result, log_summary, write_json};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Link-Ripple: a concurrent same-origin link crawler
///
/// Reads one seed URL per line, crawls each site up to the configured depth
/// and reports the pages found, external links and throughput per site.
#[derive(Parser, Debug)]
#[command(name = "link-ripple")]
#[command(version)]
#[command(about = "A concurrent same-origin link crawler", long_about = None)]
struct Cli {
    /// File with one seed URL per line
    #[arg(value_name = "SEEDS")]
    seeds: PathBuf,

    /// Path to TOML configuration file [default: ./config/link-ripple.toml if present]
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print every result as JSON to stdout
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_config_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;

    let content = match std::fs::read_to_string(&cli.seeds) {
        Ok(content) => content,
        Err(e) => {
            tracing::error!("Could not read seed file {}: {}", cli.seeds.display(), e);
            std::process::exit(1);
        }
    };

    let seeds = seed_lines(&content);
    tracing::info!("Loaded {} seeds from {}", seeds.len(), cli.seeds.display());

    let results = run_crawl(config, &seeds, log_result)
        .await
        .context("failed to start crawl")?;

    log_summary(&results);

    if cli.json {
        write_json(&mut std::io::stdout().lock(), &results)
            .context("failed to write JSON output")?;
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
            0 => EnvFilter::new("link_ripple=info,warn"),
            1 => EnvFilter::new("link_ripple=debug,info"),
            2 => EnvFilter::new("link_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}
