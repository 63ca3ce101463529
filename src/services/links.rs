// src/services/links.rs

//! Search-results link extraction.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::error::Result;
use crate::models::Config;
use crate::services::browser::{BrowserSession, SessionProvider, WaitCondition, with_session};
use crate::services::diagnostics::SnapshotWriter;
use crate::utils::{origin_of, resolve_url};

/// Outcome of reading one search-results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPage {
    /// Distinct absolute listing URLs in document order
    Listings(Vec<String>),
    /// The page loaded but held no listings
    Empty,
    /// Navigation or the results wait failed
    Unavailable(String),
}

impl SearchPage {
    /// Listing links, empty for both non-listing outcomes.
    pub fn links(&self) -> &[String] {
        match self {
            Self::Listings(links) => links,
            Self::Empty | Self::Unavailable(_) => &[],
        }
    }
}

/// Service collecting listing links from search-results pages.
pub struct LinkExtractor {
    config: Arc<Config>,
    provider: Arc<dyn SessionProvider>,
    snapshots: SnapshotWriter,
}

impl LinkExtractor {
    pub fn new(
        config: Arc<Config>,
        provider: Arc<dyn SessionProvider>,
        snapshots: SnapshotWriter,
    ) -> Self {
        Self {
            config,
            provider,
            snapshots,
        }
    }

    /// Read the listing links of one search-results page.
    ///
    /// Page failures are folded into [`SearchPage::Unavailable`]; only a
    /// session that cannot be opened at all is returned as an error.
    pub async fn extract_links(&self, search_url: &str) -> Result<SearchPage> {
        with_session(self.provider.as_ref(), |mut session| async move {
            let page = match self.collect(session.as_mut(), search_url).await {
                Ok(links) if links.is_empty() => SearchPage::Empty,
                Ok(links) => SearchPage::Listings(links),
                Err(e) => {
                    log::warn!("Link extraction failed for {}: {}", search_url, e);
                    self.snapshot(session.as_mut(), search_url).await;
                    SearchPage::Unavailable(e.to_string())
                }
            };
            (session, page)
        })
        .await
    }

    async fn collect(&self, session: &mut dyn BrowserSession, search_url: &str) -> Result<Vec<String>> {
        let crawler = &self.config.crawler;
        let selectors = &self.config.selectors;
        let base = origin_of(&Url::parse(search_url)?);

        session
            .navigate(
                search_url,
                WaitCondition::DomContentLoaded,
                Duration::from_secs(crawler.navigation_timeout_secs),
            )
            .await?;

        if let Err(e) = session.click(&selectors.consent_button).await {
            log::debug!("Consent control not dismissed: {}", e);
        }

        session
            .wait_for_selector(
                &selectors.results_container,
                Duration::from_secs(crawler.selector_timeout_secs),
                true,
            )
            .await?;

        let hrefs = session
            .extract_all_attributes(&selectors.listing_link, &selectors.link_attr)
            .await?;
        log::debug!("Found {} candidate anchors on {}", hrefs.len(), search_url);

        Ok(dedup_links(
            &base,
            &hrefs,
            self.config.search.listing_path_prefix.as_deref(),
        ))
    }

    async fn snapshot(&self, session: &mut dyn BrowserSession, search_url: &str) {
        match session.capture_snapshot().await {
            Ok(markup) => {
                self.snapshots.save("search", search_url, &markup).await;
            }
            Err(e) => log::debug!("Snapshot capture failed for {}: {}", search_url, e),
        }
    }
}

/// Resolve hrefs against `base`, keep those under `path_prefix`, drop
/// exact duplicates (first occurrence wins).
pub fn dedup_links(base: &Url, hrefs: &[String], path_prefix: Option<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    hrefs
        .iter()
        .map(|href| resolve_url(base, href.trim()))
        .filter(|link| matches_prefix(link, path_prefix))
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

fn matches_prefix(link: &str, path_prefix: Option<&str>) -> bool {
    match path_prefix {
        None => true,
        Some(prefix) => Url::parse(link)
            .map(|url| url.path().starts_with(prefix))
            .unwrap_or(false),
    }
}
