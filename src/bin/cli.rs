//! Advisory Book CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use advisory_book::{
    error::Result,
    models::Config,
    pipeline::{self, PipelineOptions},
    storage::{DirectoryCache, FragmentStore},
    utils::http::HttpFetcher,
};
use clap::{Parser, Subcommand};

/// advisory-book - Travel advisories to e-book
#[derive(Parser, Debug)]
#[command(
    name = "advisory-book",
    version,
    about = "Travel advisory site to e-book converter"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "advisory.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch every country's advisory into the fragment cache
    Update {
        /// Rebuild the country list even if a cached copy exists
        #[arg(long)]
        refresh: bool,
    },

    /// Merge cached fragments into one HTML document
    Build,

    /// Convert the merged document into an e-book
    Convert {
        /// Directory for the e-book file
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Run full pipeline: Update → Build → Convert
    Pipeline {
        /// Rebuild the country list even if a cached copy exists
        #[arg(long)]
        refresh: bool,

        /// Reuse cached fragments, don't fetch
        #[arg(long)]
        skip_update: bool,

        /// Stop after building the merged document
        #[arg(long)]
        skip_convert: bool,

        /// Directory for the e-book file
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Validate configuration file
    Validate,

    /// Show cache and output status
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    log::debug!("Configuration: {:?}", config);

    match cli.command {
        Command::Update { refresh } => {
            let fetcher = HttpFetcher::from_config(&config.crawler)?;
            let directory = pipeline::load_directory(&config, &fetcher, refresh).await?;
            let outcome = pipeline::run_update(&config, &fetcher, &directory).await?;

            if outcome.failure_count() > 0 {
                log::warn!("{} countries were not updated:", outcome.failure_count());
                for failure in &outcome.failures {
                    log::warn!("    {} ({}): {}", failure.country, failure.url, failure.reason);
                }
            }
        }

        Command::Build => {
            let fetcher = HttpFetcher::from_config(&config.crawler)?;
            let directory = pipeline::load_directory(&config, &fetcher, false).await?;
            pipeline::run_build(&config, &directory).await?;
        }

        Command::Convert { out_dir } => {
            pipeline::run_convert(&config, &out_dir).await?;
        }

        Command::Pipeline {
            refresh,
            skip_update,
            skip_convert,
            out_dir,
        } => {
            let fetcher = HttpFetcher::from_config(&config.crawler)?;
            let options = PipelineOptions {
                refresh,
                skip_update,
                skip_convert,
                out_dir,
            };
            pipeline::run_pipeline(&config, &fetcher, &options).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            log::info!("    Index: {}", config.index_url()?);
            log::info!("    Converter: {}", config.ebook.convert_bin.display());
        }

        Command::Info => {
            let cache = DirectoryCache::new(&config.paths.cache_file);
            log::info!("Country cache: {}", cache.path().display());

            match cache.load().await? {
                Ok(directory) => {
                    let store = FragmentStore::new();
                    let mut cached = 0;
                    for record in &directory {
                        if store.exists(record).await {
                            cached += 1;
                        }
                    }
                    log::info!("Countries: {}", directory.len());
                    log::info!(
                        "Fragments cached: {}/{} in {}",
                        cached,
                        directory.len(),
                        config.paths.fragment_dir.display()
                    );
                }
                Err(miss) => log::info!("No usable country list ({})", miss),
            }

            log::info!(
                "Merged document: {} ({})",
                config.paths.output_html.display(),
                if config.paths.output_html.exists() {
                    "exists"
                } else {
                    "not built"
                }
            );
        }
    }

    log::info!("Done!");

    Ok(())
}
