//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ListingSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Session and scheduling behavior
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Search-results URL construction
    #[serde(default)]
    pub search: SearchConfig,

    /// CSS selectors for search and listing pages
    #[serde(default)]
    pub selectors: ListingSelectors,

    /// Record filtering rules
    #[serde(default)]
    pub filter: FilterConfig,

    /// Output locations
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("cannot read {}: {e}", path.display())))?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.navigation_timeout_secs == 0 {
            return Err(AppError::validation(
                "crawler.navigation_timeout_secs must be > 0",
            ));
        }
        if self.crawler.selector_timeout_secs == 0 {
            return Err(AppError::validation(
                "crawler.selector_timeout_secs must be > 0",
            ));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.crawler.max_pages == Some(0) {
            return Err(AppError::validation("crawler.max_pages must be > 0"));
        }
        if self.search.base_url.trim().is_empty() {
            return Err(AppError::validation("search.base_url is empty"));
        }
        url::Url::parse(&self.search.page_url(1))?;

        for (key, selector) in self.selectors.named() {
            Selector::parse(selector)
                .map_err(|e| AppError::selector(selector, format!("{key}: {e:?}")))?;
        }
        Selector::parse(&self.selectors.description.paragraph_overlap()).map_err(|e| {
            AppError::selector(self.selectors.description.paragraph_overlap(), format!("{e:?}"))
        })?;

        if self.output.file_prefix.trim().is_empty() {
            return Err(AppError::validation("output.file_prefix is empty"));
        }
        Ok(())
    }
}

/// Session and scheduling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Navigation timeout in seconds
    #[serde(default = "defaults::navigation_timeout")]
    pub navigation_timeout_secs: u64,

    /// Bounded wait for the results container, in seconds
    #[serde(default = "defaults::selector_timeout")]
    pub selector_timeout_secs: u64,

    /// Pause after clicking "show more", in milliseconds
    #[serde(default = "defaults::settle_delay")]
    pub settle_delay_ms: u64,

    /// Listing pages extracted concurrently per chunk
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Delay between result pages in milliseconds
    #[serde(default)]
    pub page_delay_ms: u64,

    /// Stop after this many result pages (unbounded when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            navigation_timeout_secs: defaults::navigation_timeout(),
            selector_timeout_secs: defaults::selector_timeout(),
            settle_delay_ms: defaults::settle_delay(),
            max_concurrent: defaults::max_concurrent(),
            page_delay_ms: 0,
            max_pages: None,
        }
    }
}

/// Search-results URL settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Path the page number is appended to
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Fixed query string (date range, room/size/type filters)
    #[serde(default = "defaults::query")]
    pub query: String,

    /// Keep only listing links whose path starts with this prefix
    #[serde(default = "defaults::listing_path_prefix")]
    pub listing_path_prefix: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            query: defaults::query(),
            listing_path_prefix: defaults::listing_path_prefix(),
        }
    }
}

impl SearchConfig {
    /// Build the search-results URL for a 1-based page number.
    pub fn page_url(&self, page: u32) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.query.is_empty() {
            format!("{base}/{page}")
        } else {
            format!("{base}/{page}?{}", self.query.trim_start_matches('?'))
        }
    }
}

/// Record filtering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Records in these neighborhoods are dropped
    #[serde(default = "defaults::excluded_neighborhoods")]
    pub excluded_neighborhoods: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            excluded_neighborhoods: defaults::excluded_neighborhoods(),
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving per-page and combined CSV files
    #[serde(default = "defaults::output_dir")]
    pub dir: PathBuf,

    /// File name prefix shared by all CSV files
    #[serde(default = "defaults::file_prefix")]
    pub file_prefix: String,

    /// Directory receiving diagnostic snapshots
    #[serde(default = "defaults::snapshot_dir")]
    pub snapshot_dir: PathBuf,

    #[serde(default = "defaults::snapshots_enabled")]
    pub snapshots_enabled: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
            file_prefix: defaults::file_prefix(),
            snapshot_dir: defaults::snapshot_dir(),
            snapshots_enabled: defaults::snapshots_enabled(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; flatcrawl/0.1)".into()
    }
    pub fn navigation_timeout() -> u64 {
        30
    }
    pub fn selector_timeout() -> u64 {
        10
    }
    pub fn settle_delay() -> u64 {
        1000
    }
    pub fn max_concurrent() -> usize {
        5
    }

    // Search defaults
    pub fn base_url() -> String {
        "https://wunderflats.com/en/furnished-apartments/berlin".into()
    }
    pub fn query() -> String {
        "from=2025-07-01&to=2025-09-30&flexibleDays=14&scoreVariant=B\
         &minRooms=3&homeType=ENTIRE_APARTMENT&minSize=60"
            .into()
    }
    pub fn listing_path_prefix() -> Option<String> {
        Some("/en/furnished-apartment/".into())
    }

    // Filter defaults
    pub fn excluded_neighborhoods() -> Vec<String> {
        vec!["Wedding".into(), "Marzahn".into(), "Hellersdorf".into()]
    }

    // Output defaults
    pub fn output_dir() -> PathBuf {
        PathBuf::from("storage/output")
    }
    pub fn file_prefix() -> String {
        "wunderflats_berlin".into()
    }
    pub fn snapshot_dir() -> PathBuf {
        PathBuf::from("storage/snapshots")
    }
    pub fn snapshots_enabled() -> bool {
        true
    }

    pub fn log_level() -> String {
        "info".into()
    }
}
