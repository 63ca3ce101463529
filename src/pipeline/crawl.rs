// src/pipeline/crawl.rs

//! Listing crawling pipeline.
//!
//! Result pages are visited in order starting at page 1. Each page's links
//! are extracted in bounded chunks, filtered and checkpointed before the
//! next page is requested. The crawl ends at the first page without links.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Config, ListingRecord};
use crate::pipeline::scheduler::run_chunked;
use crate::pipeline::sink::RecordSink;
use crate::services::{
    DetailExtractor, LinkContext, LinkExtractor, SearchPage, SessionProvider, SnapshotWriter,
};
use crate::storage::ListingStorage;
use crate::utils::log::{header, sub_item, summary};

/// Why the crawl stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// A result page loaded with no listings
    Exhausted { page: u32 },
    /// A result page could not be read; treated as the end of results
    PageUnavailable { page: u32, reason: String },
    /// The configured page cap was reached
    PageLimit { max_pages: u32 },
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { page } => write!(f, "no listings on page {page}"),
            Self::PageUnavailable { page, reason } => {
                write!(f, "page {page} unavailable ({reason})")
            }
            Self::PageLimit { max_pages } => write!(f, "page limit of {max_pages} reached"),
        }
    }
}

/// Summary of a crawl run.
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Result pages that yielded listings
    pub pages_crawled: u32,
    pub links_seen: usize,
    pub records_extracted: usize,
    /// Every kept record, in crawl order
    pub records: Vec<ListingRecord>,
    pub termination: Termination,
}

/// Per-page result folded into the running total by the driver.
#[derive(Debug)]
struct PageReport {
    links: usize,
    extracted: usize,
    kept: Vec<ListingRecord>,
}

enum PageStep {
    Processed(PageReport),
    Finished(Termination),
}

/// Drives the crawl across result pages.
pub struct PaginationDriver<'a> {
    config: Arc<Config>,
    links: LinkExtractor,
    detail: DetailExtractor,
    sink: RecordSink<'a>,
}

impl<'a> PaginationDriver<'a> {
    pub fn new(
        config: Arc<Config>,
        provider: Arc<dyn SessionProvider>,
        storage: &'a dyn ListingStorage,
    ) -> Self {
        let snapshots = SnapshotWriter::from_config(&config.output);
        let links = LinkExtractor::new(Arc::clone(&config), Arc::clone(&provider), snapshots.clone());
        let detail = DetailExtractor::new(Arc::clone(&config), provider, snapshots);
        let sink = RecordSink::new(storage, &config.filter);
        Self {
            config,
            links,
            detail,
            sink,
        }
    }

    /// Crawl until a page yields no links, then write the combined file.
    ///
    /// A fatal error (no session could be opened, a checkpoint could not be
    /// written) still attempts the combined write before it is returned.
    pub async fn run(&self) -> Result<CrawlSummary> {
        let start_time = Utc::now();
        let page_delay = Duration::from_millis(self.config.crawler.page_delay_ms);

        let mut records: Vec<ListingRecord> = Vec::new();
        let mut pages_crawled = 0;
        let mut links_seen = 0;
        let mut records_extracted = 0;
        let mut page = 1;

        let termination = loop {
            if let Some(max_pages) = self.config.crawler.max_pages.filter(|max| page > *max) {
                break Termination::PageLimit { max_pages };
            }

            match self.process_page(page).await {
                Ok(PageStep::Processed(report)) => {
                    pages_crawled += 1;
                    links_seen += report.links;
                    records_extracted += report.extracted;
                    records.extend(report.kept);
                }
                Ok(PageStep::Finished(termination)) => break termination,
                Err(e) => {
                    log::error!("Crawl aborted on page {}: {}", page, e);
                    if let Err(flush_error) = self.sink.checkpoint_all(&records).await {
                        log::error!("Final checkpoint failed: {}", flush_error);
                    }
                    return Err(e);
                }
            }

            page += 1;
            if !page_delay.is_zero() {
                tokio::time::sleep(page_delay).await;
            }
        };

        match &termination {
            Termination::Exhausted { page } => {
                log::info!("No listing links on page {}. Stopping crawl.", page)
            }
            Termination::PageUnavailable { page, reason } => log::warn!(
                "Page {} could not be read ({}). Stopping crawl.",
                page,
                reason
            ),
            Termination::PageLimit { max_pages } => {
                log::info!("Reached page limit of {}. Stopping crawl.", max_pages)
            }
        }

        let combined = self.sink.checkpoint_all(&records).await?;
        sub_item(&format!("Combined file: {}", combined.display()));

        Ok(CrawlSummary {
            start_time,
            end_time: Utc::now(),
            pages_crawled,
            links_seen,
            records_extracted,
            records,
            termination,
        })
    }

    /// Extract, filter and checkpoint one result page.
    async fn process_page(&self, page: u32) -> Result<PageStep> {
        let url = self.config.search.page_url(page);
        log::info!("Crawling search results page {} ({})", page, url);

        let links = match self.links.extract_links(&url).await? {
            SearchPage::Listings(links) => links,
            SearchPage::Empty => return Ok(PageStep::Finished(Termination::Exhausted { page })),
            SearchPage::Unavailable(reason) => {
                return Ok(PageStep::Finished(Termination::PageUnavailable { page, reason }));
            }
        };

        log::info!(
            "Found {} links on page {}. Extracting details...",
            links.len(),
            page
        );

        let detail = &self.detail;
        let results = run_chunked(&links, self.config.crawler.max_concurrent, |position, link| {
            detail.extract(link, LinkContext { page, position })
        })
        .await;

        let extracted = results.iter().filter(|r| r.is_some()).count();
        let kept = self.sink.filter(results);
        let path = self.sink.checkpoint_page(page, &kept).await?;
        log::info!(
            "Page {}: {}/{} extracted, {} kept, saved to {}",
            page,
            extracted,
            links.len(),
            kept.len(),
            path.display()
        );

        Ok(PageStep::Processed(PageReport {
            links: links.len(),
            extracted,
            kept,
        }))
    }
}

/// Run the listing crawler.
pub async fn run_crawler(
    config: Arc<Config>,
    provider: Arc<dyn SessionProvider>,
    storage: &dyn ListingStorage,
) -> Result<CrawlSummary> {
    header("Listing crawl starting");

    let driver = PaginationDriver::new(config, provider, storage);
    let outcome = driver.run().await?;

    let elapsed = outcome.end_time - outcome.start_time;
    summary(
        "Crawl finished",
        &[
            ("Pages crawled", outcome.pages_crawled.to_string()),
            ("Links seen", outcome.links_seen.to_string()),
            ("Records extracted", outcome.records_extracted.to_string()),
            ("Records kept", outcome.records.len().to_string()),
            ("Stopped because", outcome.termination.to_string()),
            ("Elapsed", format!("{}s", elapsed.num_seconds())),
        ],
    );

    Ok(outcome)
}
