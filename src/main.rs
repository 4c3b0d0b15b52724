//! Panelbound main entry point
//!
//! Command-line interface for the Panelbound webcomic archiver.

use anyhow::Context;
use clap::Parser;
use panelbound::config::load_config_with_hash;
use panelbound::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Panelbound: a sequential webcomic archiver
///
/// Panelbound walks a comic site page by page, renders each page's images
/// and text into a standalone PDF, and resumes from its saved position when
/// re-run.
#[derive(Parser, Debug)]
#[command(name = "panelbound")]
#[command(version = "1.0.0")]
#[command(about = "A sequential webcomic archiver", long_about = None)]
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

    /// Validate config and show what would be crawled without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("panelbound=info,warn"),
            1 => EnvFilter::new("panelbound=debug,info"),
            2 => EnvFilter::new("panelbound=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &panelbound::config::Config) {
    println!("=== Panelbound Dry Run ===\n");

    println!("Site:");
    println!("  Start URL: {}", config.site.start_url);
    println!("  Require entry region: {}", config.site.require_entry);

    println!("\nProgress store:");
    println!("  Path: {}", config.state.path);

    println!("\nRendering:");
    println!("  Output directory: {}", config.render.output_dir);
    println!("  Font: {}", config.render.font_path);
    println!("  Font size: {}pt", config.render.font_size);
    println!("  Wrap width: {} chars", config.render.wrap_width);

    println!("\nOptimizer:");
    if config.optimizer.enabled {
        println!("  Enabled, endpoint: {}", config.optimizer.endpoint);
    } else {
        println!("  Disabled");
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: panelbound::config::Config) -> anyhow::Result<()> {
    tracing::info!("Starting crawl of {}", config.site.start_url);

    match crawl(config).await {
        Ok(pages) => {
            tracing::info!("Crawl completed: {} pages archived", pages);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
