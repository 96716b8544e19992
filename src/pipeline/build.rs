// src/pipeline/build.rs

use std::path::PathBuf;

use crate::error::Result;
use crate::models::{Config, CountryDirectory};
use crate::services::DocumentAssembler;
use crate::storage::FragmentStore;

/// Merge every cached fragment into `paths.output_html`.
pub async fn run_build(config: &Config, directory: &CountryDirectory) -> Result<PathBuf> {
    let output = config.paths.output_html.clone();
    log::info!(
        "Building {} from {} fragments",
        output.display(),
        directory.len()
    );

    let store = FragmentStore::new();
    DocumentAssembler::new(&store)
        .assemble_to_file(directory, &output)
        .await?;

    log::info!("Built output html: {}", output.display());
    Ok(output)
}
