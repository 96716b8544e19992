// src/models/mod.rs

//! Domain models for the advisory book builder.

mod config;
mod country;

// Re-export all public types
pub use config::{Config, CrawlerConfig, EbookConfig, PathsConfig, SelectorConfig, SiteConfig};
pub use country::{CountryDirectory, CountryRecord};

/// Summary of an update run.
#[derive(Debug, Default)]
pub struct UpdateOutcome {
    /// Countries whose fragments were written
    pub written: usize,
    /// Countries skipped, with the reason
    pub failures: Vec<CountryFailure>,
}

impl UpdateOutcome {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// A country that could not be updated.
#[derive(Debug, Clone)]
pub struct CountryFailure {
    pub country: String,
    pub url: String,
    pub reason: String,
}
