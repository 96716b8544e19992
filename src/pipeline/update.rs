// src/pipeline/update.rs

//! Country fragment update.

use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{Config, CountryDirectory, CountryFailure, UpdateOutcome};
use crate::services::AdvisoryExtractor;
use crate::storage::FragmentStore;
use crate::utils::fs::ensure_dir;
use crate::utils::http::PageFetcher;

/// Fetch, sanitize and cache the advisory fragment of every country.
///
/// Per-country failures (missing article, failed fetch) are logged and
/// skipped, leaving that country's previous fragment untouched, unless
/// `crawler.fail_fast` is set. Anything else aborts the update.
pub async fn run_update(
    config: &Config,
    fetcher: &dyn PageFetcher,
    directory: &CountryDirectory,
) -> Result<UpdateOutcome> {
    if !tokio::fs::try_exists(&config.paths.fragment_dir).await? {
        log::info!(
            "Creating directory: {}",
            config.paths.fragment_dir.display()
        );
    }
    ensure_dir(&config.paths.fragment_dir).await?;

    let extractor = AdvisoryExtractor::new(config, fetcher)?;
    let store = FragmentStore::new();
    let delay = Duration::from_millis(config.crawler.request_delay_ms);
    let concurrency = config.crawler.max_concurrent.max(1);

    log::info!(
        "Updating {} countries ({} at a time)",
        directory.len(),
        concurrency
    );

    let extractor = &extractor;
    let mut pages = stream::iter(directory.iter())
        .map(|record| async move { (record, extractor.extract(&record.url).await) })
        .buffer_unordered(concurrency);

    let mut outcome = UpdateOutcome::default();
    while let Some((record, result)) = pages.next().await {
        match result {
            Ok(html) => {
                store.write_fragment(record, &html).await?;
                outcome.written += 1;
                log::info!("{} written.", record.cache_file.display());
            }
            Err(error) if error.is_per_country() && !config.crawler.fail_fast => {
                log::warn!(
                    "Skipping {} ({}): {}",
                    record.name,
                    record.url,
                    error
                );
                outcome.failures.push(CountryFailure {
                    country: record.name.clone(),
                    url: record.url.clone(),
                    reason: error.to_string(),
                });
            }
            Err(error) => {
                log::error!("Update aborted at {} ({})", record.name, record.url);
                return Err(error);
            }
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    log::info!(
        "Finished updating html files: {} written, {} skipped",
        outcome.written,
        outcome.failure_count()
    );
    Ok(outcome)
}
