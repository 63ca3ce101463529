//! flatcrawl CLI
//!
//! Local execution entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use flatcrawl::{
    error::Result,
    models::Config,
    pipeline,
    services::{DetailExtractor, HttpSessionProvider, LinkContext, LinkExtractor, SnapshotWriter},
    storage::LocalStorage,
};

/// flatcrawl - Furnished Apartment Listing Crawler
#[derive(Parser, Debug)]
#[command(
    name = "flatcrawl",
    version,
    about = "Crawls furnished-apartment listings into CSV files"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl every result page and write CSV checkpoints
    Crawl {
        /// Output directory (overrides output.dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop after this many result pages
        #[arg(long)]
        max_pages: Option<u32>,

        /// Listings extracted concurrently per chunk
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Extract a single listing and print it as JSON
    Listing {
        /// Listing URL
        url: String,
    },

    /// Print the listing links of one result page
    Links {
        /// Result page number (1-based)
        #[arg(default_value_t = 1)]
        page: u32,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, configured: &str) {
    let level = if verbose { "debug" } else { configured };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_exists = cli.config.exists();
    let mut config = if config_exists {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };
    init_logging(cli.verbose, &config.logging.level);

    if config_exists {
        log::info!("Loaded configuration from {}", cli.config.display());
    } else {
        log::warn!(
            "No configuration at {}. Using defaults.",
            cli.config.display()
        );
    }

    match cli.command {
        Command::Crawl {
            output,
            max_pages,
            concurrency,
        } => {
            if let Some(dir) = output {
                config.output.dir = dir;
            }
            if max_pages.is_some() {
                config.crawler.max_pages = max_pages;
            }
            if let Some(bound) = concurrency {
                config.crawler.max_concurrent = bound;
            }
            config.validate()?;

            let provider = Arc::new(HttpSessionProvider::new(&config.crawler)?);
            let storage = LocalStorage::from_config(&config.output);
            let summary = pipeline::run_crawler(Arc::new(config), provider, &storage).await?;

            log::info!(
                "Crawl complete: {} records kept ({})",
                summary.records.len(),
                summary.termination
            );
        }

        Command::Listing { url } => {
            config.validate()?;
            let config = Arc::new(config);
            let provider = Arc::new(HttpSessionProvider::new(&config.crawler)?);
            let snapshots = SnapshotWriter::from_config(&config.output);
            let extractor = DetailExtractor::new(Arc::clone(&config), provider, snapshots);

            let record = extractor
                .extract(&url, LinkContext { page: 0, position: 0 })
                .await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }

        Command::Links { page } => {
            config.validate()?;
            let url = config.search.page_url(page);
            let config = Arc::new(config);
            let provider = Arc::new(HttpSessionProvider::new(&config.crawler)?);
            let snapshots = SnapshotWriter::from_config(&config.output);
            let extractor = LinkExtractor::new(Arc::clone(&config), provider, snapshots);

            let result = extractor.extract_links(&url).await?;
            log::info!("{} listing links on {}", result.links().len(), url);
            for link in result.links() {
                println!("{link}");
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (search URL, selectors, output)");
            log::info!("First page: {}", config.search.page_url(1));
        }
    }

    log::info!("Done!");

    Ok(())
}
