//! Browser capability used by the crawl engine.
//!
//! The engine never talks to Chromium directly. It drives a [`PageDriver`]
//! (navigate, read the rendered DOM, issue raw requests through
//! [`RawRequest`]) and receives every network response through a
//! [`ResponseSink`]. `ChromiumDriver` is the production implementation;
//! tests use scripted in-memory drivers.

pub mod chromium;
mod cleanup;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::http_client::RawRequest;

pub use chromium::ChromiumDriver;
pub use cleanup::{CleanupResult, cleanup_browser_and_data};

/// When a navigation counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// `load` fired and no request has been in flight for the quiet window.
    NetworkIdle,
}

/// Navigation failures reported by a [`PageDriver`].
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("navigation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("navigation failed: {0}")]
    Failed(String),
}

/// Lazily read body of an observed response.
#[async_trait]
pub trait ResponseBody: Send + Sync {
    async fn bytes(&self) -> Result<Vec<u8>>;
}

#[async_trait]
impl ResponseBody for Vec<u8> {
    async fn bytes(&self) -> Result<Vec<u8>> {
        Ok(self.clone())
    }
}

/// A network response seen while a page was loading.
///
/// The body is only fetched when a sink asks for it, so filtered responses
/// cost nothing beyond their metadata.
pub struct ObservedResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    body: Box<dyn ResponseBody>,
}

impl ObservedResponse {
    pub fn new(
        url: impl Into<String>,
        status: u16,
        content_type: Option<String>,
        body: Box<dyn ResponseBody>,
    ) -> Self {
        Self {
            url: url.into(),
            status,
            content_type,
            body,
        }
    }

    /// Read the response body. May fail if the browser has already evicted it.
    pub async fn body(&self) -> Result<Vec<u8>> {
        self.body.bytes().await
    }
}

impl std::fmt::Debug for ObservedResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservedResponse")
            .field("url", &self.url)
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Receiver for every response the browser produces.
#[async_trait]
pub trait ResponseSink: Send + Sync {
    async fn on_response(&self, response: ObservedResponse);
}

/// A single browser tab the crawl engine drives.
///
/// Raw requests share the tab's identity and come from [`RawRequest`].
#[async_trait]
pub trait PageDriver: RawRequest {
    /// Register the sink that receives every subsequent network response.
    fn on_response(&mut self, sink: Arc<dyn ResponseSink>);

    /// Navigate to `url`, waiting for `readiness` at most `timeout`.
    async fn navigate(
        &mut self,
        url: &str,
        timeout: Duration,
        readiness: Readiness,
    ) -> std::result::Result<(), NavigationError>;

    /// Resolved `href` of every `<a href>` in the rendered DOM, in document order.
    async fn anchor_hrefs(&self) -> Result<Vec<String>>;

    /// Serialized rendered HTML of the current page.
    async fn content(&self) -> Result<String>;

    /// Release the browser. Called exactly once at the end of a run.
    async fn close(&mut self) -> Result<()>;
}
