// src/services/directory.rs

//! Country directory service.
//!
//! Loads the cached country directory or rebuilds it from the advisory index
//! page.

use std::path::Path;

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Config, CountryDirectory, CountryRecord};
use crate::storage::DirectoryCache;
use crate::utils::http::PageFetcher;
use crate::utils::{last_path_segment, resolve_url};

/// Date format used on the index page.
const SOURCE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Date format shown in the table of contents.
const DISPLAY_DATE_FORMAT: &str = "%d %b %Y";

/// Reformat an index page date (`05/03/2020`) for display (`05 Mar 2020`).
///
/// Blank input yields `None`.
pub fn format_issue_date(raw: &str) -> Result<Option<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(raw, SOURCE_DATE_FORMAT)
        .map_err(|e| AppError::parse("issue date", format!("'{raw}': {e}")))?;
    Ok(Some(date.format(DISPLAY_DATE_FORMAT).to_string()))
}

/// Service that produces the country directory.
pub struct DirectoryService<'a> {
    config: &'a Config,
    fetcher: &'a dyn PageFetcher,
}

impl<'a> DirectoryService<'a> {
    pub fn new(config: &'a Config, fetcher: &'a dyn PageFetcher) -> Self {
        Self { config, fetcher }
    }

    /// Load the directory from `cache_path`, rebuilding it on a cache miss.
    pub async fn load(&self, cache_path: &Path) -> Result<CountryDirectory> {
        self.load_with(cache_path, false).await
    }

    /// Like `load`, but `refresh` skips the cache entirely.
    pub async fn load_with(&self, cache_path: &Path, refresh: bool) -> Result<CountryDirectory> {
        let cache = DirectoryCache::new(cache_path);

        if refresh {
            log::info!("Refresh requested, ignoring {}", cache_path.display());
        } else {
            match cache.load().await? {
                Ok(mut directory) => {
                    self.relocate_fragments(&mut directory);
                    log::info!(
                        "Loaded {} countries from {}",
                        directory.len(),
                        cache_path.display()
                    );
                    return Ok(directory);
                }
                Err(miss) => {
                    log::info!("Country cache unusable ({}), rebuilding", miss);
                }
            }
        }

        let directory = self.rebuild().await?;
        if directory.is_empty() {
            log::warn!("Index page yielded no countries; cache not written");
        } else {
            cache.save(&directory).await?;
            log::debug!("Saved country cache to {}", cache_path.display());
        }
        Ok(directory)
    }

    /// Point every record's `cache_file` at the configured fragment directory.
    fn relocate_fragments(&self, directory: &mut CountryDirectory) {
        for record in directory.iter_mut() {
            let path = self.config.fragment_path(&record.safe_name);
            if record.cache_file != path {
                log::debug!(
                    "{}: fragment moved {} -> {}",
                    record.name,
                    record.cache_file.display(),
                    path.display()
                );
                record.cache_file = path;
            }
        }
    }

    /// Fetch and parse the index page.
    pub async fn rebuild(&self) -> Result<CountryDirectory> {
        let index_url = self.config.index_url()?;
        log::info!("Fetching country index from {}", index_url);
        let html = self.fetcher.fetch(&index_url).await?;
        self.parse_index(&html)
    }

    /// Parse the index page into a directory.
    ///
    /// A row missing any expected sub-element fails the whole parse.
    pub fn parse_index(&self, html: &str) -> Result<CountryDirectory> {
        let selectors = &self.config.selectors;
        let row_sel = Self::parse_selector(&selectors.row)?;
        let name_sel = Self::parse_selector(&selectors.name)?;
        let title_sel = Self::parse_selector(&selectors.title)?;
        let date_sel = Self::parse_selector(&selectors.issue_date)?;

        let base_url = url::Url::parse(&self.config.site.base_url)?;
        let document = Html::parse_document(html);
        let mut directory = CountryDirectory::new();

        for (index, row) in document.select(&row_sel).enumerate() {
            let context = format!("topic row {}", index + 1);

            let name = Self::first(&row, &name_sel, &context, &selectors.name)?;
            let name = collect_text(&name);
            if name.is_empty() {
                return Err(AppError::parse(context, "empty country name"));
            }

            let title = Self::first(&row, &title_sel, &context, &selectors.title)?;
            let href = title.value().attr("href").ok_or_else(|| {
                AppError::parse(&context, format!("{name}: title link has no href"))
            })?;
            let url = resolve_url(&base_url, href);

            let date = Self::first(&row, &date_sel, &context, &selectors.issue_date)?;
            let issue_date = format_issue_date(&collect_text(&date))
                .map_err(|e| AppError::parse(&context, format!("{name}: {e}")))?;

            let safe_name = last_path_segment(&url).ok_or_else(|| {
                AppError::parse(&context, format!("{name}: no path segment in {url}"))
            })?;
            let cache_file = self.config.fragment_path(&safe_name);

            directory.insert(CountryRecord {
                name,
                url,
                issue_date,
                safe_name,
                cache_file,
            });
        }

        log::info!("Parsed {} countries from index page", directory.len());
        Ok(directory)
    }

    fn first<'d>(
        row: &ElementRef<'d>,
        selector: &Selector,
        context: &str,
        selector_str: &str,
    ) -> Result<ElementRef<'d>> {
        row.select(selector)
            .next()
            .ok_or_else(|| AppError::parse(context, format!("no element matches '{selector_str}'")))
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

fn collect_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
