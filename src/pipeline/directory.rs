// src/pipeline/directory.rs

use crate::error::{AppError, Result};
use crate::models::{Config, CountryDirectory};
use crate::services::DirectoryService;
use crate::utils::http::PageFetcher;

/// Load the country directory for this run.
///
/// An empty directory means the index page no longer matches the expected
/// markup and is reported as `AppError::EmptyDirectory`.
pub async fn load_directory(
    config: &Config,
    fetcher: &dyn PageFetcher,
    refresh: bool,
) -> Result<CountryDirectory> {
    let service = DirectoryService::new(config, fetcher);
    let directory = service
        .load_with(&config.paths.cache_file, refresh)
        .await?;

    if directory.is_empty() {
        return Err(AppError::EmptyDirectory {
            url: config.index_url()?,
        });
    }
    directory.validate()?;

    log::info!("Got country list with {} countries.", directory.len());
    Ok(directory)
}
