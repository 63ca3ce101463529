//! Browser-automation contract.
//!
//! The crawler only ever talks to a page through [`BrowserSession`]. A
//! session is opened for exactly one navigation + extraction and is always
//! closed afterwards; [`with_session`] enforces that.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// When a navigation is considered complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitCondition {
    /// The `load` event fired
    Load,
    /// The DOM is parsed; subresources may still be loading
    #[default]
    DomContentLoaded,
    /// No network activity for a short while
    NetworkIdle,
}

/// One ephemeral browsing context.
#[async_trait]
pub trait BrowserSession: Send {
    /// Load `url`, failing if it does not complete within `timeout`.
    async fn navigate(&mut self, url: &str, wait: WaitCondition, timeout: Duration) -> Result<()>;

    /// Wait until `selector` matches, failing after `timeout`.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
        visible_only: bool,
    ) -> Result<()>;

    /// Text of the first element matching `selector`, `None` when absent.
    async fn extract_text(&mut self, selector: &str) -> Result<Option<String>>;

    /// Attribute `attr` of every element matching `selector`, in document order.
    async fn extract_all_attributes(&mut self, selector: &str, attr: &str) -> Result<Vec<String>>;

    async fn click(&mut self, selector: &str) -> Result<()>;

    /// Rendered markup of the current page.
    async fn capture_snapshot(&mut self) -> Result<String>;

    async fn close(&mut self) -> Result<()>;
}

/// Source of fresh sessions.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn open_session(&self) -> Result<Box<dyn BrowserSession>>;
}

/// Run `body` with a freshly opened session and close it afterwards.
///
/// The body takes ownership of the session and hands it back together with
/// its result, so the session is closed on every exit path of the body,
/// including early `?` returns inside it. Failing to open a session is the
/// only error returned without running the body.
pub async fn with_session<T, F, Fut>(provider: &dyn SessionProvider, body: F) -> Result<T>
where
    F: FnOnce(Box<dyn BrowserSession>) -> Fut,
    Fut: Future<Output = (Box<dyn BrowserSession>, T)>,
{
    let session = provider.open_session().await?;
    let (mut session, output) = body(session).await;
    if let Err(e) = session.close().await {
        log::debug!("Failed to close session: {}", e);
    }
    Ok(output)
}
