//! Service layer for the advisory book builder.
//!
//! This module contains the business logic for:
//! - Country list discovery (`DirectoryService`)
//! - Advisory extraction and sanitizing (`AdvisoryExtractor`)
//! - Merged document assembly (`DocumentAssembler`)
//! - E-book conversion (`EbookConverter`)

pub mod advisory;
pub mod assembler;
pub mod convert;
pub mod directory;

pub use advisory::{AdvisoryExtractor, strip_residual_tags};
pub use assembler::DocumentAssembler;
pub use convert::EbookConverter;
pub use directory::{DirectoryService, format_issue_date};
