// src/services/advisory.rs

//! Advisory extractor service.
//!
//! Pulls the advisory article out of a country page and sanitizes it into a
//! fragment that can be embedded in the merged document.

use ammonia::Builder;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::utils::http::PageFetcher;

/// Container tags unwrapped by the sanitizer (their content is kept).
const UNWRAPPED_TAGS: [&str; 5] = ["a", "article", "section", "span", "div"];

/// Attributes allowed on any tag besides the sanitizer's defaults.
const EXTRA_ATTRIBUTES: [&str; 2] = ["class", "id"];

/// Tag literals that may survive cleaning and are stripped at assembly.
const RESIDUAL_TAGS: [&str; 2] = ["<div>", "</div>"];

/// Remove container tag literals left behind by the cleaning pass.
pub fn strip_residual_tags(html: &str) -> String {
    RESIDUAL_TAGS
        .iter()
        .fold(html.to_string(), |acc, tag| acc.replace(tag, ""))
}

/// Service that turns a country page into a sanitized fragment.
pub struct AdvisoryExtractor<'a> {
    fetcher: &'a dyn PageFetcher,
    article_sel: Selector,
    media_sel: Selector,
    cleaner: Builder<'static>,
}

impl<'a> AdvisoryExtractor<'a> {
    pub fn new(config: &Config, fetcher: &'a dyn PageFetcher) -> Result<Self> {
        Ok(Self {
            fetcher,
            article_sel: Self::parse_selector(&config.selectors.article)?,
            media_sel: Self::parse_selector(&config.selectors.media)?,
            cleaner: Self::cleaner(),
        })
    }

    fn cleaner() -> Builder<'static> {
        let mut builder = Builder::default();
        builder
            .rm_tags(&UNWRAPPED_TAGS)
            .add_generic_attributes(&EXTRA_ATTRIBUTES);
        builder
    }

    /// Fetch a country page and return its sanitized advisory fragment.
    pub async fn extract(&self, url: &str) -> Result<String> {
        let html = self.fetcher.fetch(url).await?;
        self.extract_from_html(url, &html)
    }

    /// Extract and sanitize the advisory article from page HTML.
    pub fn extract_from_html(&self, url: &str, html: &str) -> Result<String> {
        let mut document = Html::parse_document(html);

        let (article_id, media_ids) = {
            let article = document
                .select(&self.article_sel)
                .next()
                .ok_or_else(|| AppError::ArticleNotFound {
                    url: url.to_string(),
                })?;
            let media: Vec<_> = article.select(&self.media_sel).map(|m| m.id()).collect();
            (article.id(), media)
        };

        // Maps and videos don't survive conversion.
        for id in media_ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }

        let article = document
            .tree
            .get(article_id)
            .and_then(ElementRef::wrap)
            .ok_or_else(|| AppError::ArticleNotFound {
                url: url.to_string(),
            })?;

        Ok(self.sanitize(&article.html()))
    }

    /// Strip containers, links and active content from an HTML fragment.
    pub fn sanitize(&self, html: &str) -> String {
        self.cleaner.clean(html).to_string()
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}
