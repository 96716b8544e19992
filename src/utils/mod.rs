//! Utility functions and helpers.

pub mod fs;
pub mod http;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Last non-empty path segment of a URL.
///
/// Used as the safe name of a country: it names the cached fragment file and
/// doubles as the anchor id in the merged document. The segment is returned
/// percent-encoded as `Url` normalizes it, so a decoded `%2F` can never turn
/// into a path separator.
pub fn last_path_segment(url_str: &str) -> Option<String> {
    let parsed = Url::parse(url_str).ok()?;
    parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(|segment| segment.to_string())
}
