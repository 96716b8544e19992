//! Storage for the country directory cache and per-country fragments.
//!
//! ## Directory Structure
//!
//! ```text
//! ./
//! ├── country_list.json     # Cached country directory (versioned JSON)
//! └── country_html/
//!     ├── Fiji.html         # One sanitized fragment per country safe name
//!     ├── Peru.html
//!     └── _main.html        # Merged document
//! ```

pub mod cache;
pub mod fragments;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::CountryRecord;

// Re-export for convenience
pub use cache::{CacheMiss, DirectoryCache};
pub use fragments::FragmentStore;

/// Source of cached country fragments.
#[async_trait]
pub trait FragmentSource: Send + Sync {
    /// Read the fragment for a country.
    ///
    /// Fails with `AppError::MissingFragment` if it was never written.
    async fn read_fragment(&self, record: &CountryRecord) -> Result<String>;
}
