//! Per-country fragment files.

use std::io::ErrorKind;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::CountryRecord;
use crate::storage::FragmentSource;
use crate::utils::fs::write_atomic;

/// Fragment files addressed by each record's `cache_file`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentStore;

impl FragmentStore {
    pub fn new() -> Self {
        Self
    }

    /// Write a country's fragment, replacing the previous one.
    pub async fn write_fragment(&self, record: &CountryRecord, html: &str) -> Result<()> {
        write_atomic(&record.cache_file, html.as_bytes()).await
    }

    /// Whether a fragment exists for the country.
    pub async fn exists(&self, record: &CountryRecord) -> bool {
        tokio::fs::try_exists(&record.cache_file)
            .await
            .unwrap_or(false)
    }
}

#[async_trait]
impl FragmentSource for FragmentStore {
    async fn read_fragment(&self, record: &CountryRecord) -> Result<String> {
        match tokio::fs::read(&record.cache_file).await {
            Ok(bytes) => String::from_utf8(bytes).map_err(|e| {
                AppError::parse(record.cache_file.display().to_string(), e)
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::MissingFragment {
                country: record.name.clone(),
                path: record.cache_file.clone(),
            }),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
