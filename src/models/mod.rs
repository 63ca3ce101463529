// src/models/mod.rs

//! Domain models for the crawler application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod listing;
mod selectors;

// Re-export all public types
pub use config::{
    Config, CrawlerConfig, FilterConfig, LoggingConfig, OutputConfig, SearchConfig,
};
pub use listing::{ListingRecord, price_per_sqm};
pub use selectors::{DescriptionSelectors, ListingSelectors};
