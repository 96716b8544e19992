// src/error.rs

//! Unified error handling for the advisory book builder.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for advisory operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed or returned a non-success status
    #[error("Fetch error for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Expected markup was not where it should be
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

    /// Index page produced no countries (markup likely changed)
    #[error("No countries found on the index page {url}")]
    EmptyDirectory { url: String },

    /// Country page has no advisory article
    #[error("Advisory article not found at {url}")]
    ArticleNotFound { url: String },

    /// Assembly requested before the country fragment was fetched
    #[error("Missing fragment for {country}: {} (run 'update' first)", .path.display())]
    MissingFragment { country: String, path: PathBuf },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// External converter failed
    #[error("Conversion failed: {0}")]
    Convert(String),
}

impl AppError {
    /// Create a fetch error for a URL.
    pub fn fetch(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Fetch {
            url: url.into(),
            source,
        }
    }

    /// Create a parse error with context.
    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a conversion error.
    pub fn convert(message: impl fmt::Display) -> Self {
        Self::Convert(message.to_string())
    }

    /// Whether this error is scoped to a single country page.
    ///
    /// Such failures are skipped during `update`; everything else aborts.
    pub fn is_per_country(&self) -> bool {
        matches!(self, Self::ArticleNotFound { .. } | Self::Fetch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fragment_names_country() {
        let err = AppError::MissingFragment {
            country: "Fiji".to_string(),
            path: PathBuf::from("country_html/fiji.html"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Fiji"));
        assert!(msg.contains("fiji.html"));
    }

    #[test]
    fn test_is_per_country() {
        let not_found = AppError::ArticleNotFound {
            url: "https://example.com/x".to_string(),
        };
        assert!(not_found.is_per_country());
        let unreachable = AppError::fetch(
            "https://example.com/x",
            crate::utils::http::testing::transport_error(),
        );
        assert!(unreachable.is_per_country());
        assert!(!AppError::parse("index", "no rows").is_per_country());
        assert!(!AppError::config("bad").is_per_country());
    }
}
