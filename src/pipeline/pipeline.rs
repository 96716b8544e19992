// src/pipeline/pipeline.rs

use std::path::PathBuf;

use crate::error::Result;
use crate::models::Config;
use crate::utils::http::PageFetcher;

use super::build::run_build;
use super::convert::run_convert;
use super::directory::load_directory;
use super::update::run_update;

/// Which pipeline steps to run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Rebuild the country directory even if a cache exists
    pub refresh: bool,
    /// Reuse cached fragments instead of fetching
    pub skip_update: bool,
    /// Stop after building the merged document
    pub skip_convert: bool,
    /// Where the e-book is written
    pub out_dir: PathBuf,
}

/// Run the full pipeline: Update → Build → Convert.
pub async fn run_pipeline(
    config: &Config,
    fetcher: &dyn PageFetcher,
    options: &PipelineOptions,
) -> Result<()> {
    let directory = load_directory(config, fetcher, options.refresh).await?;

    let total_steps = 3 - usize::from(options.skip_update) - usize::from(options.skip_convert);
    let mut step = 1;

    if !options.skip_update {
        log::info!("[STEP {}/{}] Update - Fetching advisories", step, total_steps);
        let outcome = run_update(config, fetcher, &directory).await?;
        for failure in &outcome.failures {
            log::warn!("Not updated: {} ({})", failure.country, failure.url);
        }
        step += 1;
    }

    log::info!("[STEP {}/{}] Build - Merging fragments", step, total_steps);
    run_build(config, &directory).await?;
    step += 1;

    if !options.skip_convert {
        log::info!("[STEP {}/{}] Convert - Creating e-book", step, total_steps);
        run_convert(config, &options.out_dir).await?;
    }

    log::info!("Pipeline complete!");
    Ok(())
}
