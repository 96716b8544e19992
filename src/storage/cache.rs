//! Cached country directory.
//!
//! The directory is stored as versioned JSON:
//!
//! ```text
//! {
//!   "version": 1,
//!   "saved_at": "2026-10-18T09:00:00Z",
//!   "countries": { "Fiji": { "name": "Fiji", ... }, ... }
//! }
//! ```
//!
//! Reading distinguishes the expected ways a cache can be unusable
//! (`CacheMiss`) from real I/O failures, which are returned as errors.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::CountryDirectory;
use crate::utils::fs::write_atomic;

/// Current cache schema version.
pub const CACHE_VERSION: u32 = 1;

/// Why a cached directory could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheMiss {
    /// No cache file on disk
    Missing,
    /// File exists but is not a valid cache document
    Malformed(String),
    /// Written by an incompatible schema version
    VersionMismatch { found: Option<u32>, expected: u32 },
    /// Valid document with no countries
    Empty,
}

impl fmt::Display for CacheMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheMiss::Missing => write!(f, "no cache file"),
            CacheMiss::Malformed(reason) => write!(f, "malformed cache: {reason}"),
            CacheMiss::VersionMismatch { found, expected } => match found {
                Some(v) => write!(f, "cache version {v}, expected {expected}"),
                None => write!(f, "cache has no version, expected {expected}"),
            },
            CacheMiss::Empty => write!(f, "cache holds no countries"),
        }
    }
}

#[derive(Deserialize)]
struct VersionProbe {
    #[serde(default)]
    version: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct CachedDirectory {
    version: u32,
    saved_at: DateTime<Utc>,
    countries: CountryDirectory,
}

/// On-disk cache for the country directory.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    path: PathBuf,
}

impl DirectoryCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached directory.
    ///
    /// The outer `Result` carries unexpected I/O failures; the inner one a
    /// cache miss that callers treat as "rebuild".
    pub async fn load(&self) -> Result<std::result::Result<CountryDirectory, CacheMiss>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Err(CacheMiss::Missing)),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Ok(Err(CacheMiss::Malformed(e.to_string())));
            }
            Err(e) => return Err(AppError::Io(e)),
        };
        Ok(Self::decode(&bytes))
    }

    fn decode(bytes: &[u8]) -> std::result::Result<CountryDirectory, CacheMiss> {
        let probe: VersionProbe =
            serde_json::from_slice(bytes).map_err(|e| CacheMiss::Malformed(e.to_string()))?;
        if probe.version != Some(CACHE_VERSION) {
            return Err(CacheMiss::VersionMismatch {
                found: probe.version,
                expected: CACHE_VERSION,
            });
        }

        let cached: CachedDirectory =
            serde_json::from_slice(bytes).map_err(|e| CacheMiss::Malformed(e.to_string()))?;
        if cached.countries.is_empty() {
            return Err(CacheMiss::Empty);
        }
        Ok(cached.countries)
    }

    /// Persist the directory, replacing any previous cache.
    pub async fn save(&self, directory: &CountryDirectory) -> Result<()> {
        let cached = CachedDirectory {
            version: CACHE_VERSION,
            saved_at: Utc::now(),
            countries: directory.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&cached)?;
        write_atomic(&self.path, &bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CountryRecord;
    use tempfile::TempDir;

    fn sample_directory() -> CountryDirectory {
        vec![
            CountryRecord {
                name: "Fiji".to_string(),
                url: "http://example.gov.au/Advice/Fiji".to_string(),
                issue_date: Some("05 Mar 2020".to_string()),
                safe_name: "Fiji".to_string(),
                cache_file: PathBuf::from("country_html/Fiji.html"),
            },
            CountryRecord {
                name: "Peru".to_string(),
                url: "http://example.gov.au/Advice/Peru".to_string(),
                issue_date: None,
                safe_name: "Peru".to_string(),
                cache_file: PathBuf::from("country_html/Peru.html"),
            },
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn test_round_trip_preserves_empty_dates() {
        let tmp = TempDir::new().unwrap();
        let cache = DirectoryCache::new(tmp.path().join("country_list.json"));
        let directory = sample_directory();

        cache.save(&directory).await.unwrap();
        let loaded = cache.load().await.unwrap().unwrap();

        assert_eq!(loaded, directory);
        assert_eq!(loaded.get("Peru").unwrap().issue_date, None);
    }

    #[tokio::test]
    async fn test_missing_file_is_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = DirectoryCache::new(tmp.path().join("nope.json"));
        assert_eq!(cache.load().await.unwrap(), Err(CacheMiss::Missing));
    }

    #[tokio::test]
    async fn test_garbage_is_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("country_list.json");
        tokio::fs::write(&path, b"\x80\x03}q\x00(X\x04").await.unwrap();

        let cache = DirectoryCache::new(&path);
        assert!(matches!(
            cache.load().await.unwrap(),
            Err(CacheMiss::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_version_mismatch_is_miss() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("country_list.json");
        tokio::fs::write(&path, br#"{"version": 99, "countries": {}}"#)
            .await
            .unwrap();

        let cache = DirectoryCache::new(&path);
        assert_eq!(
            cache.load().await.unwrap(),
            Err(CacheMiss::VersionMismatch {
                found: Some(99),
                expected: CACHE_VERSION
            })
        );
    }

    #[tokio::test]
    async fn test_empty_directory_is_miss() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("country_list.json");
        tokio::fs::write(
            &path,
            br#"{"version": 1, "saved_at": "2026-01-01T00:00:00Z", "countries": {}}"#,
        )
        .await
        .unwrap();

        let cache = DirectoryCache::new(&path);
        assert_eq!(cache.load().await.unwrap(), Err(CacheMiss::Empty));
    }

    #[tokio::test]
    async fn test_directory_path_surfaces_io_error() {
        let tmp = TempDir::new().unwrap();
        // Reading a directory is neither "missing" nor "malformed".
        let cache = DirectoryCache::new(tmp.path());
        assert!(cache.load().await.is_err());
    }
}
