// src/services/detail.rs

//! Listing detail extraction.
//!
//! Turns one listing page into a [`ListingRecord`]. Fields are extracted
//! independently; a missing field only nulls that field, while a failed
//! navigation drops the whole record.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::models::{Config, ListingRecord};
use crate::services::browser::{BrowserSession, SessionProvider, WaitCondition, with_session};
use crate::services::description::DescriptionResolver;
use crate::services::diagnostics::SnapshotWriter;
use crate::services::fields::{
    extract_field, parse_postal_code, parse_price, parse_rooms, parse_size,
};
use crate::services::neighborhood::neighborhood_for;

/// Where a listing link came from, for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkContext {
    pub page: u32,
    pub position: usize,
}

/// Service extracting full records from listing pages.
pub struct DetailExtractor {
    config: Arc<Config>,
    provider: Arc<dyn SessionProvider>,
    resolver: DescriptionResolver,
    snapshots: SnapshotWriter,
}

impl DetailExtractor {
    pub fn new(
        config: Arc<Config>,
        provider: Arc<dyn SessionProvider>,
        snapshots: SnapshotWriter,
    ) -> Self {
        let resolver = DescriptionResolver::from_selectors(&config.selectors.description);
        Self {
            config,
            provider,
            resolver,
            snapshots,
        }
    }

    /// Extract one listing in its own session.
    ///
    /// Errors mean the record is lost entirely (session could not be opened,
    /// navigation failed); the session is closed either way.
    pub async fn extract(&self, url: &str, context: LinkContext) -> Result<ListingRecord> {
        with_session(self.provider.as_ref(), |mut session| async move {
            let result = self.extract_in(session.as_mut(), url, context).await;
            (session, result)
        })
        .await?
    }

    async fn extract_in(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
        context: LinkContext,
    ) -> Result<ListingRecord> {
        let crawler = &self.config.crawler;
        let selectors = &self.config.selectors;

        session
            .navigate(
                url,
                WaitCondition::DomContentLoaded,
                Duration::from_secs(crawler.navigation_timeout_secs),
            )
            .await?;

        let mut record = ListingRecord::new(url);
        record.title = extract_field(session, &selectors.title).await;

        record.address = extract_field(session, &selectors.address).await;
        if let Some(postal_code) = record.address.as_deref().and_then(parse_postal_code) {
            record.neighborhood = neighborhood_for(&postal_code).map(str::to_string);
            record.postal_code = Some(postal_code);
        }

        record.size = extract_field(session, &selectors.size)
            .await
            .as_deref()
            .and_then(parse_size);
        record.rooms = extract_field(session, &selectors.rooms)
            .await
            .as_deref()
            .and_then(parse_rooms);
        record.price = extract_field(session, &selectors.price)
            .await
            .as_deref()
            .and_then(parse_price);
        record.derive_price_per_sqm();

        self.expand_description(session).await;
        record.description = self.resolver.resolve(session).await;
        if record.description.is_none() {
            log::warn!(
                "No description for listing {} (page {}, link {})",
                url,
                context.page,
                context.position
            );
            self.snapshot(session, url, context).await;
        }

        Ok(record)
    }

    /// Click "show more" if present and let the expanded text render.
    async fn expand_description(&self, session: &mut dyn BrowserSession) {
        match session.click(&self.config.selectors.show_more).await {
            Ok(()) => {
                let settle = Duration::from_millis(self.config.crawler.settle_delay_ms);
                if !settle.is_zero() {
                    tokio::time::sleep(settle).await;
                }
            }
            Err(e) => log::debug!("No description toggle: {}", e),
        }
    }

    async fn snapshot(&self, session: &mut dyn BrowserSession, url: &str, context: LinkContext) {
        match session.capture_snapshot().await {
            Ok(markup) => {
                let tag = format!("listing_p{}_{}", context.page, context.position);
                self.snapshots.save(&tag, url, &markup).await;
            }
            Err(e) => log::debug!("Snapshot capture failed for {}: {}", url, e),
        }
    }
}
