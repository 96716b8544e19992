// src/pipeline/convert.rs

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;
use crate::models::Config;
use crate::services::EbookConverter;

/// Convert the merged document into an e-book in `out_dir`.
///
/// This can take a while; the converter's own output goes to the console.
pub async fn run_convert(config: &Config, out_dir: &Path) -> Result<PathBuf> {
    let today = Local::now().date_naive();
    let converter = EbookConverter::new(&config.ebook);
    let output = converter
        .convert(&config.paths.output_html, out_dir, today)
        .await?;
    log::info!("E-book written to {}", output.display());
    Ok(output)
}
