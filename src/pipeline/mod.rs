//! Pipeline entry points.
//!
//! - `load_directory`: Load or rebuild the country directory
//! - `run_update`: Fetch and cache every country's advisory fragment
//! - `run_build`: Merge cached fragments into one HTML document
//! - `run_convert`: Hand the merged document to the e-book converter
//! - `run_pipeline`: All of the above in order

pub mod build;
pub mod convert;
pub mod directory;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod update;

pub use build::run_build;
pub use convert::run_convert;
pub use directory::load_directory;
pub use pipeline::{PipelineOptions, run_pipeline};
pub use update::run_update;
