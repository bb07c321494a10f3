//! URL and origin utilities.
//!
//! This module provides the origin boundary used by every mirror component
//! and the fragment normalization that gives crawl targets their identity.

use anyhow::{Context, Result};
use std::fmt;
use url::Url;

/// Scheme + host + port of the start URL.
///
/// The single trust boundary: nothing outside this origin is mapped,
/// crawled or saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    inner: url::Origin,
    host: String,
}

impl Origin {
    /// Derive the origin of an absolute http(s) URL.
    pub fn from_url(url: &Url) -> Result<Self> {
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Unsupported URL scheme '{}' in {url}", url.scheme());
        }
        let host = host_with_port(url).ok_or_else(|| anyhow::anyhow!("URL has no host: {url}"))?;
        Ok(Self {
            inner: url.origin(),
            host,
        })
    }

    /// Parse a URL string and derive its origin.
    pub fn parse(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).with_context(|| format!("Invalid URL: {url}"))?;
        Self::from_url(&parsed)
    }

    /// Whether `url` shares this origin.
    #[must_use]
    pub fn contains(&self, url: &Url) -> bool {
        url.origin() == self.inner
    }

    /// Host directory name used under the output root (`host` or `host:port`).
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.ascii_serialization())
    }
}

/// The URL's host as it appears in the authority, port included when explicit.
#[must_use]
pub fn host_with_port(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Normalize a URL by stripping its fragment.
///
/// Fragment identifiers are client-side markers that don't name a different
/// resource, so `page#a` and `page#b` are the same crawl target.
pub fn normalize_url(url: &str) -> Result<String> {
    let mut parsed = Url::parse(url).with_context(|| format!("Failed to parse URL: {url}"))?;
    parsed.set_fragment(None);
    Ok(parsed.to_string())
}

/// Check if a URL is an absolute http(s) URL
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
