// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Source of raw page text, keyed by absolute URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page body as text.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &CrawlerConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;
    Ok(client)
}

/// `PageFetcher` backed by a `reqwest` client.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a fetcher from crawler settings.
    pub fn from_config(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self::new(create_client(config)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::fetch(url, e))?;
        response.text().await.map_err(|e| AppError::fetch(url, e))
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory fetcher for tests.

    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Serves canned pages and counts requests.
    #[derive(Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, String>,
        failures: HashSet<String>,
        requests: AtomicUsize,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        /// Make `url` fail the way an unreachable host does.
        pub fn with_failure(mut self, url: &str) -> Self {
            self.failures.insert(url.to_string());
            self
        }

        pub fn request_count(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    /// A genuine `reqwest::Error`, from a request that cannot be built.
    pub fn transport_error() -> reqwest::Error {
        match Client::new().get("::bad").build() {
            Err(e) => e,
            Ok(_) => panic!("'::bad' unexpectedly parsed as a URL"),
        }
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            if self.failures.contains(url) {
                return Err(AppError::fetch(url, transport_error()));
            }
            self.pages.get(url).cloned().ok_or_else(|| {
                AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no canned page for {url}"),
                ))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StaticFetcher;
    use super::*;

    #[test]
    fn test_create_client_from_default_config() {
        assert!(create_client(&CrawlerConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_static_fetcher_serves_and_counts() {
        let fetcher = StaticFetcher::new().with_page("https://example.com/", "<p>hi</p>");

        assert_eq!(fetcher.fetch("https://example.com/").await.unwrap(), "<p>hi</p>");
        assert!(fetcher.fetch("https://example.com/missing").await.is_err());
        assert_eq!(fetcher.request_count(), 2);
    }

    #[tokio::test]
    async fn test_static_fetcher_failure_is_fetch_error() {
        let fetcher = StaticFetcher::new().with_failure("https://example.com/down");

        let err = fetcher.fetch("https://example.com/down").await.unwrap_err();
        assert!(matches!(err, AppError::Fetch { ref url, .. } if url == "https://example.com/down"));
        assert!(err.is_per_country());
    }
}
