//! Default session engine: plain HTTP fetches queried as static markup.
//!
//! No scripts run, so the search and listing pages must be server-rendered.
//! Waiting for a selector degenerates to a presence check and clicking
//! succeeds whenever the target exists.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;
use crate::services::browser::{BrowserSession, SessionProvider, WaitCondition};
use crate::services::document::StaticDocument;
use crate::utils::http::create_async_client;

/// Hands out [`HttpSession`]s sharing one connection pool.
#[derive(Clone)]
pub struct HttpSessionProvider {
    client: Client,
}

impl HttpSessionProvider {
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn open_session(&self) -> Result<Box<dyn BrowserSession>> {
        Ok(Box::new(HttpSession {
            client: self.client.clone(),
            document: None,
        }))
    }
}

/// Session backed by a single fetched document.
pub struct HttpSession {
    client: Client,
    document: Option<StaticDocument>,
}

impl HttpSession {
    fn document(&self) -> Result<&StaticDocument> {
        self.document.as_ref().ok_or(AppError::NoDocument)
    }
}

#[async_trait]
impl BrowserSession for HttpSession {
    async fn navigate(&mut self, url: &str, _wait: WaitCondition, timeout: Duration) -> Result<()> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| AppError::navigation(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::navigation(url, format!("HTTP {status}")));
        }

        let final_url = response.url().to_string();
        let html = response.text().await?;
        let document = StaticDocument::new(final_url, html);
        if document.url() != url {
            log::debug!("{} redirected to {}", url, document.url());
        }
        self.document = Some(document);
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
        self.document()?.text(selector)
    }

    async fn extract_all_attributes(&mut self, selector: &str, attr: &str) -> Result<Vec<String>> {
        self.document()?.attributes(selector, attr)
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        if self.document()?.contains(selector)? {
            Ok(())
        } else {
            Err(AppError::ElementNotFound(selector.to_string()))
        }
    }

    async fn capture_snapshot(&mut self) -> Result<String> {
        Ok(self.document()?.html().to_string())
    }

    async fn close(&mut self) -> Result<()> {
        self.document = None;
        Ok(())
    }
}
