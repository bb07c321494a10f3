//! Best-effort capture of same-origin static assets seen during page loads.
//!
//! [`AssetInterceptor`] is registered as the browser's [`ResponseSink`]. For
//! every response it decides whether the asset qualifies, maps it through
//! [`PathMapper`] and writes the body to disk. Nothing it does can fail the
//! page visit: every outcome is reported as a [`CaptureOutcome`] and counted.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context;
use async_trait::async_trait;
use log::{debug, warn};
use url::Url;

use crate::browser::{ObservedResponse, ResponseSink};
use crate::path_mapper::PathMapper;

/// Why a response was not saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ErrorStatus(u16),
    CrossOrigin,
    UnsupportedContentType,
}

/// Result of offering one response to the interceptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Saved(PathBuf),
    Skipped(SkipReason),
    Failed(String),
}

/// Whether a declared content type belongs to a family the mirror keeps.
///
/// `image/*`, `font/*`, `text/css`, `application/javascript` and
/// `text/javascript` qualify. Parameters and case are ignored.
#[must_use]
pub fn is_capturable_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence.starts_with("image/")
        || essence.starts_with("font/")
        || matches!(
            essence.as_str(),
            "text/css" | "application/javascript" | "text/javascript"
        )
}

/// Writes qualifying responses under the mirror's host directory.
#[derive(Debug)]
pub struct AssetInterceptor {
    mapper: PathMapper,
    saved: AtomicUsize,
    failed: AtomicUsize,
}

impl AssetInterceptor {
    #[must_use]
    pub fn new(mapper: PathMapper) -> Self {
        Self {
            mapper,
            saved: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    /// Number of assets written so far.
    #[must_use]
    pub fn saved(&self) -> usize {
        self.saved.load(Ordering::Relaxed)
    }

    /// Number of qualifying assets that could not be written.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    /// Offer one observed response. Existing files are overwritten.
    pub async fn capture(&self, response: &ObservedResponse) -> CaptureOutcome {
        if response.status >= 400 {
            return CaptureOutcome::Skipped(SkipReason::ErrorStatus(response.status));
        }

        let same_origin = Url::parse(&response.url)
            .map(|url| self.mapper.origin().contains(&url))
            .unwrap_or(false);
        if !same_origin {
            return CaptureOutcome::Skipped(SkipReason::CrossOrigin);
        }

        let content_type = response.content_type.as_deref().unwrap_or_default();
        if !is_capturable_content_type(content_type) {
            return CaptureOutcome::Skipped(SkipReason::UnsupportedContentType);
        }

        let Some(path) = self.mapper.map(&response.url, false, Some(content_type)) else {
            return CaptureOutcome::Skipped(SkipReason::CrossOrigin);
        };

        match self.write(response, &path).await {
            Ok(()) => {
                self.saved.fetch_add(1, Ordering::Relaxed);
                debug!(target: "site_mirror::assets", "Saved {} -> {}", response.url, path.display());
                CaptureOutcome::Saved(path)
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                warn!(target: "site_mirror::assets", "Failed to save {}: {e:#}", response.url);
                CaptureOutcome::Failed(format!("{e:#}"))
            }
        }
    }

    async fn write(&self, response: &ObservedResponse, path: &Path) -> anyhow::Result<()> {
        let body = response.body().await?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(path, body)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[async_trait]
impl ResponseSink for AssetInterceptor {
    async fn on_response(&self, response: ObservedResponse) {
        self.capture(&response).await;
    }
}
