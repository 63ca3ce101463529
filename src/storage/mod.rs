//! Storage abstractions for listing persistence.
//!
//! Every result page is checkpointed as its own file as soon as it is
//! processed, and the combined set is written once the crawl ends.
//!
//! ## Directory Structure
//!
//! ```text
//! output/
//! ├── {prefix}_page_1.csv     # Checkpoint of result page 1
//! ├── {prefix}_page_2.csv
//! └── {prefix}_all.csv        # Every kept record of the run
//! ```

pub mod local;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ListingRecord;

// Re-export for convenience
pub use local::LocalStorage;

/// Column order of every output file.
pub const CSV_HEADER: [&str; 10] = [
    "Title",
    "Address",
    "PostalCode",
    "Neighborhood",
    "Size (sqm)",
    "Rooms",
    "Price (EUR)",
    "Price/Sqm (EUR)",
    "Description",
    "URL",
];

/// Trait for listing storage backends.
#[async_trait]
pub trait ListingStorage: Send + Sync {
    /// Persist the kept records of one result page, replacing earlier runs.
    async fn write_page(&self, page: u32, records: &[ListingRecord]) -> Result<PathBuf>;

    /// Persist every kept record of the crawl, replacing earlier runs.
    async fn write_combined(&self, records: &[ListingRecord]) -> Result<PathBuf>;
}
