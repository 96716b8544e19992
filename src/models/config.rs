//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Advisory site location
    #[serde(default)]
    pub site: SiteConfig,

    /// CSS selectors describing the site markup
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// On-disk locations for caches and output
    #[serde(default)]
    pub paths: PathsConfig,

    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// External e-book converter settings
    #[serde(default)]
    pub ebook: EbookConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.site.base_url)
            .map_err(|e| AppError::validation(format!("site.base_url is invalid: {e}")))?;
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.paths.fragment_ext.trim().is_empty() {
            return Err(AppError::validation("paths.fragment_ext is empty"));
        }
        for (name, selector) in self.selectors.named() {
            scraper::Selector::parse(selector).map_err(|e| {
                AppError::validation(format!("selectors.{name} is invalid: {e:?}"))
            })?;
        }
        Ok(())
    }

    /// Absolute URL of the advisory index page.
    pub fn index_url(&self) -> Result<String> {
        let base = url::Url::parse(&self.site.base_url)?;
        Ok(base.join(&self.site.index_path)?.to_string())
    }

    /// Path of the cached fragment for a country safe name.
    pub fn fragment_path(&self, safe_name: &str) -> PathBuf {
        self.paths
            .fragment_dir
            .join(format!("{}.{}", safe_name, self.paths.fragment_ext))
    }
}

/// Advisory site location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base URL that relative advisory links resolve against
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Path of the country index page, relative to `base_url`
    #[serde(default = "defaults::index_path")]
    pub index_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            index_path: defaults::index_path(),
        }
    }
}

/// Selectors for the index page and the country pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// One topic row per country on the index page
    #[serde(default = "defaults::row")]
    pub row: String,

    /// Country display name within a row
    #[serde(default = "defaults::name")]
    pub name: String,

    /// Link to the advisory page within a row
    #[serde(default = "defaults::title")]
    pub title: String,

    /// Issue date within a row
    #[serde(default = "defaults::issue_date")]
    pub issue_date: String,

    /// Advisory article on a country page
    #[serde(default = "defaults::article")]
    pub article: String,

    /// Media section removed before sanitizing
    #[serde(default = "defaults::media")]
    pub media: String,
}

impl SelectorConfig {
    fn named(&self) -> [(&'static str, &str); 6] {
        [
            ("row", self.row.as_str()),
            ("name", self.name.as_str()),
            ("title", self.title.as_str()),
            ("issue_date", self.issue_date.as_str()),
            ("article", self.article.as_str()),
            ("media", self.media.as_str()),
        ]
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            row: defaults::row(),
            name: defaults::name(),
            title: defaults::title(),
            issue_date: defaults::issue_date(),
            article: defaults::article(),
            media: defaults::media(),
        }
    }
}

/// Cache and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Cached country directory
    #[serde(default = "defaults::cache_file")]
    pub cache_file: PathBuf,

    /// Directory holding one fragment per country
    #[serde(default = "defaults::fragment_dir")]
    pub fragment_dir: PathBuf,

    /// Fragment file extension
    #[serde(default = "defaults::fragment_ext")]
    pub fragment_ext: String,

    /// Merged HTML document
    #[serde(default = "defaults::output_html")]
    pub output_html: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cache_file: defaults::cache_file(),
            fragment_dir: defaults::fragment_dir(),
            fragment_ext: defaults::fragment_ext(),
            output_html: defaults::output_html(),
        }
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between requests in milliseconds
    #[serde(default)]
    pub request_delay_ms: u64,

    /// Maximum concurrent requests (1 = strictly sequential)
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Abort the update on the first failing country
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: 0,
            max_concurrent: defaults::max_concurrent(),
            fail_fast: false,
        }
    }
}

/// E-book converter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EbookConfig {
    /// Path to calibre's `ebook-convert`
    #[serde(default = "defaults::convert_bin")]
    pub convert_bin: PathBuf,

    /// Output file name stem; the month and year are appended
    #[serde(default = "defaults::output_stem")]
    pub output_stem: String,

    /// Output file extension, which selects the e-book format
    #[serde(default = "defaults::output_ext")]
    pub output_ext: String,

    /// Optional cover image, passed along only if it exists
    #[serde(default)]
    pub cover: Option<PathBuf>,

    #[serde(default = "defaults::title_prefix")]
    pub title_prefix: String,

    #[serde(default = "defaults::authors")]
    pub authors: String,

    #[serde(default = "defaults::producer")]
    pub producer: String,

    #[serde(default = "defaults::language")]
    pub language: String,

    #[serde(default = "defaults::comments")]
    pub comments: String,
}

impl Default for EbookConfig {
    fn default() -> Self {
        Self {
            convert_bin: defaults::convert_bin(),
            output_stem: defaults::output_stem(),
            output_ext: defaults::output_ext(),
            cover: None,
            title_prefix: defaults::title_prefix(),
            authors: defaults::authors(),
            producer: defaults::producer(),
            language: defaults::language(),
            comments: defaults::comments(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Site defaults
    pub fn base_url() -> String {
        "http://www.smarttraveller.gov.au".into()
    }
    pub fn index_path() -> String {
        "/zw-cgi/view/Advice/".into()
    }

    // Selector defaults
    pub fn row() -> String {
        ".topicRow".into()
    }
    pub fn name() -> String {
        ".hidden".into()
    }
    pub fn title() -> String {
        ".topicTitle".into()
    }
    pub fn issue_date() -> String {
        ".issueDate".into()
    }
    pub fn article() -> String {
        "article#theArticle".into()
    }
    pub fn media() -> String {
        "section[class=\"mediaFiles\"]".into()
    }

    // Path defaults
    pub fn cache_file() -> PathBuf {
        PathBuf::from("country_list.json")
    }
    pub fn fragment_dir() -> PathBuf {
        PathBuf::from("country_html")
    }
    pub fn fragment_ext() -> String {
        "html".into()
    }
    pub fn output_html() -> PathBuf {
        PathBuf::from("country_html").join("_main.html")
    }

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; advisory-book/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        1
    }

    // Ebook defaults
    pub fn convert_bin() -> PathBuf {
        PathBuf::from("ebook-convert")
    }
    pub fn output_stem() -> String {
        "smarttraveller".into()
    }
    pub fn output_ext() -> String {
        "mobi".into()
    }
    pub fn title_prefix() -> String {
        "Smart Traveller".into()
    }
    pub fn authors() -> String {
        "Australian Government".into()
    }
    pub fn producer() -> String {
        "advisory-book".into()
    }
    pub fn language() -> String {
        "English".into()
    }
    pub fn comments() -> String {
        "This is information taken from smarttraveller.gov.au".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.crawler.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_selector() {
        let mut config = Config::default();
        config.selectors.article = "[[broken".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn index_url_joins_base_and_path() {
        let config = Config::default();
        assert_eq!(
            config.index_url().unwrap(),
            "http://www.smarttraveller.gov.au/zw-cgi/view/Advice/"
        );
    }

    #[test]
    fn fragment_path_uses_dir_and_extension() {
        let config = Config::default();
        assert_eq!(
            config.fragment_path("fiji"),
            PathBuf::from("country_html").join("fiji.html")
        );
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [paths]
            fragment_dir = "/tmp/fragments"

            [crawler]
            max_concurrent = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.paths.fragment_dir, PathBuf::from("/tmp/fragments"));
        assert_eq!(config.paths.fragment_ext, "html");
        assert_eq!(config.crawler.max_concurrent, 4);
        assert_eq!(config.selectors.row, ".topicRow");
    }

    #[test]
    fn load_or_default_on_missing_file() {
        let config = Config::load_or_default("/nonexistent/advisory.toml");
        assert_eq!(config.crawler.max_concurrent, 1);
    }
}
