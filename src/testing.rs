//! In-memory sessions and storage for tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::ListingRecord;
use crate::services::browser::{BrowserSession, SessionProvider, WaitCondition};
use crate::services::document::StaticDocument;
use crate::storage::ListingStorage;

#[derive(Default)]
struct Counters {
    opened: AtomicUsize,
    closed: AtomicUsize,
    queried: Mutex<Vec<String>>,
    clicked: Mutex<Vec<String>>,
}

/// Serves canned markup per URL; unknown URLs fail navigation.
#[derive(Default)]
pub struct FixtureProvider {
    pages: HashMap<String, String>,
    refuse: bool,
    counters: Arc<Counters>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Make every `open_session` call fail.
    pub fn refuse_sessions(mut self) -> Self {
        self.refuse = true;
        self
    }

    pub fn opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.counters.closed.load(Ordering::SeqCst)
    }

    /// Selectors passed to `extract_text`, in call order.
    pub fn queried(&self) -> Vec<String> {
        self.counters.queried.lock().unwrap().clone()
    }

    pub fn clicked(&self) -> Vec<String> {
        self.counters.clicked.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionProvider for FixtureProvider {
    async fn open_session(&self) -> Result<Box<dyn BrowserSession>> {
        if self.refuse {
            return Err(AppError::session("fixture refuses sessions"));
        }
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FixtureSession {
            pages: self.pages.clone(),
            counters: Arc::clone(&self.counters),
            document: None,
        }))
    }
}

struct FixtureSession {
    pages: HashMap<String, String>,
    counters: Arc<Counters>,
    document: Option<StaticDocument>,
}

impl FixtureSession {
    fn document(&self) -> Result<&StaticDocument> {
        self.document.as_ref().ok_or(AppError::NoDocument)
    }
}

#[async_trait]
impl BrowserSession for FixtureSession {
    async fn navigate(&mut self, url: &str, _wait: WaitCondition, _timeout: Duration) -> Result<()> {
        let html = self
            .pages
            .get(url)
            .ok_or_else(|| AppError::navigation(url, "HTTP 404 Not Found"))?;
        self.document = Some(StaticDocument::new(url, html.clone()));
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
        _visible_only: bool,
    ) -> Result<()> {
        if self.document()?.contains(selector)? {
            Ok(())
        } else {
            Err(AppError::Timeout {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis(),
            })
        }
    }

    async fn extract_text(&mut self, selector: &str) -> Result<Option<String>> {
        self.counters.queried.lock().unwrap().push(selector.to_string());
        self.document()?.text(selector)
    }

    async fn extract_all_attributes(&mut self, selector: &str, attr: &str) -> Result<Vec<String>> {
        self.document()?.attributes(selector, attr)
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        if self.document()?.contains(selector)? {
            self.counters.clicked.lock().unwrap().push(selector.to_string());
            Ok(())
        } else {
            Err(AppError::ElementNotFound(selector.to_string()))
        }
    }

    async fn capture_snapshot(&mut self) -> Result<String> {
        Ok(self.document()?.html().to_string())
    }

    async fn close(&mut self) -> Result<()> {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        self.document = None;
        Ok(())
    }
}

/// Storage that keeps every write in memory.
#[derive(Default)]
pub struct MemoryStorage {
    pub pages: Mutex<Vec<(u32, Vec<ListingRecord>)>>,
    pub combined: Mutex<Vec<Vec<ListingRecord>>>,
    pub fail_page_writes: bool,
}

impl MemoryStorage {
    pub fn failing_page_writes() -> Self {
        Self {
            fail_page_writes: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ListingStorage for MemoryStorage {
    async fn write_page(&self, page: u32, records: &[ListingRecord]) -> Result<PathBuf> {
        if self.fail_page_writes {
            return Err(AppError::Io(std::io::Error::other("disk full")));
        }
        self.pages.lock().unwrap().push((page, records.to_vec()));
        Ok(PathBuf::from(format!("memory/page_{page}")))
    }

    async fn write_combined(&self, records: &[ListingRecord]) -> Result<PathBuf> {
        self.combined.lock().unwrap().push(records.to_vec());
        Ok(PathBuf::from("memory/all"))
    }
}

/// Detail-page markup in the default selector layout.
pub fn listing_html(title: &str, address: &str, price: &str, description: &str) -> String {
    format!(
        r#"<html><body>
          <h2 class="ListingDetails-title">{title}</h2>
          <span data-testid="ListingDetailsPage-address">{address}</span>
          <div class="ListingDetails-stats">
            <span class="ListingDetails-statsElt floor"><span>98 m², 3rd floor</span></span>
            <span class="ListingDetails-statsElt rooms"><span>3 rooms</span></span>
          </div>
          <div class="ListingPriceText__wrapper">
            <strong class="ListingPriceText__value">{price}</strong><span>per month</span>
          </div>
          <div class="ListingDetails-description">
            <div class="ListingDetails-descriptionText"><p>{description}</p></div>
          </div>
        </body></html>"#
    )
}

/// Search-page markup listing the given hrefs in the default layout.
pub fn search_html(hrefs: &[String]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{href}">listing</a>"#))
        .collect();
    format!(r#"<html><body><div class="ListingsList">{anchors}</div></body></html>"#)
}
