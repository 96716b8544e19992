//! Country record and directory data structures.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// One country's advisory listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountryRecord {
    /// Display name, unique within the directory
    pub name: String,

    /// Absolute URL of the advisory page
    pub url: String,

    /// Issue date as displayed (e.g. "05 Mar 2020"), absent if the site omitted it
    #[serde(default)]
    pub issue_date: Option<String>,

    /// Filesystem and anchor safe identifier: the last URL path segment,
    /// kept percent-encoded (`C%C3%B4te_d'Ivoire`) so it stays ASCII and
    /// can never decode into a path separator
    pub safe_name: String,

    /// Where the sanitized fragment for this country is cached.
    ///
    /// Derived from `paths.fragment_dir`; re-pointed on every cache load.
    pub cache_file: PathBuf,
}

impl CountryRecord {
    /// Issue date for display; empty when unknown.
    pub fn issue_date_display(&self) -> &str {
        self.issue_date.as_deref().unwrap_or("")
    }
}

/// Countries keyed by name.
///
/// Iteration is always in lexicographic name order, which defines both the
/// table of contents and chapter order of the merged document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CountryDirectory {
    countries: BTreeMap<String, CountryRecord>,
}

impl CountryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any previous record with the same name.
    pub fn insert(&mut self, record: CountryRecord) -> Option<CountryRecord> {
        self.countries.insert(record.name.clone(), record)
    }

    pub fn get(&self, name: &str) -> Option<&CountryRecord> {
        self.countries.get(name)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Records in lexicographic order of country name.
    pub fn iter(&self) -> impl Iterator<Item = &CountryRecord> {
        self.countries.values()
    }

    /// Mutable records in lexicographic order; names stay fixed.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CountryRecord> {
        self.countries.values_mut()
    }

    /// Check that no two countries share a safe name.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for record in self.iter() {
            if record.safe_name.is_empty() {
                return Err(AppError::validation(format!(
                    "{} has an empty safe name ({})",
                    record.name, record.url
                )));
            }
            if let Some(other) = seen.insert(&record.safe_name, &record.name) {
                return Err(AppError::validation(format!(
                    "{} and {} share the safe name '{}'",
                    other, record.name, record.safe_name
                )));
            }
        }
        Ok(())
    }
}

impl FromIterator<CountryRecord> for CountryDirectory {
    fn from_iter<I: IntoIterator<Item = CountryRecord>>(iter: I) -> Self {
        let mut directory = Self::new();
        for record in iter {
            directory.insert(record);
        }
        directory
    }
}

impl<'a> IntoIterator for &'a CountryDirectory {
    type Item = &'a CountryRecord;
    type IntoIter = std::collections::btree_map::Values<'a, String, CountryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.countries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, safe_name: &str) -> CountryRecord {
        CountryRecord {
            name: name.to_string(),
            url: format!("https://example.com/advice/{safe_name}"),
            issue_date: None,
            safe_name: safe_name.to_string(),
            cache_file: PathBuf::from(format!("country_html/{safe_name}.html")),
        }
    }

    #[test]
    fn test_iter_is_lexicographic_regardless_of_insertion() {
        let directory: CountryDirectory = vec![
            record("Zambia", "zambia"),
            record("Albania", "albania"),
            record("Fiji", "fiji"),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = directory.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Albania", "Fiji", "Zambia"]);
    }

    #[test]
    fn test_issue_date_display_empty_when_absent() {
        let r = record("Fiji", "fiji");
        assert_eq!(r.issue_date_display(), "");
    }

    #[test]
    fn test_validate_detects_safe_name_collision() {
        let directory: CountryDirectory =
            vec![record("Congo", "congo"), record("Congo (DRC)", "congo")]
                .into_iter()
                .collect();
        let err = directory.validate().unwrap_err();
        assert!(err.to_string().contains("congo"));
    }

    #[test]
    fn test_validate_ok_for_unique_names() {
        let directory: CountryDirectory = vec![record("Fiji", "fiji"), record("Peru", "peru")]
            .into_iter()
            .collect();
        assert!(directory.validate().is_ok());
    }
}
