// src/lib.rs

//! Advisory Book Library
//!
//! Scrapes per-country travel advisories, caches them as sanitized HTML
//! fragments and merges them into a single document with a table of
//! contents, ready for e-book conversion.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
