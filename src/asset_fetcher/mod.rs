//! Standalone asset fetcher
//!
//! Works from one already-saved HTML file instead of a browser. Every
//! first-party asset the file references is downloaded over plain HTTP and
//! written below the output directory at its URL path. Stylesheets fetched in
//! that first pass are then scanned for `url(...)` references, which are
//! downloaded in a second pass.
//!
//! Both passes are sequential and throttled. A failed download is recorded
//! and the batch moves on.

pub mod extractors;

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use url::Url;

use crate::css_resolver::resolve_css_urls;
use crate::http_client::{DownloadError, HttpClient, RawRequest, RawResponse};
use crate::utils::constants::{
    DEFAULT_ASSET_BASE_URL, DEFAULT_SOURCE_HTML, FETCH_THROTTLE_MS, FIRST_PARTY_MARKER,
};
use crate::utils::Origin;

pub use extractors::extract_asset_references;

/// Reference recorded for URLs discovered inside a stylesheet.
pub const CSS_REFERENCE: &str = "(css-ref)";

/// Settings for one fetcher run.
#[derive(Debug, Clone)]
pub struct AssetFetchOptions {
    /// Origin the page's root-relative references resolve against
    pub base_url: String,
    pub html_path: PathBuf,
    pub output_dir: PathBuf,
    /// Path fragment identifying first-party uploaded content
    pub marker: String,
    /// Pause after each download attempt
    pub throttle: Duration,
}

impl Default for AssetFetchOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ASSET_BASE_URL.to_string(),
            html_path: PathBuf::from(DEFAULT_SOURCE_HTML),
            output_dir: PathBuf::from("."),
            marker: FIRST_PARTY_MARKER.to_string(),
            throttle: Duration::from_millis(FETCH_THROTTLE_MS),
        }
    }
}

impl AssetFetchOptions {
    /// Defaults with a different base origin.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// One asset that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub url: String,
    /// The reference as found in the HTML, or [`CSS_REFERENCE`]
    pub reference: String,
    pub error: String,
}

/// Result of a fetcher run.
#[derive(Debug, Clone, Default)]
pub struct FetchSummary {
    /// Distinct URLs attempted, CSS references included
    pub fetched: usize,
    /// Files written, in download order
    pub saved: Vec<PathBuf>,
    pub errors: Vec<FetchError>,
}

impl FetchSummary {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl fmt::Display for FetchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fetched {} URLs (including CSS refs).", self.fetched)?;
        if self.has_errors() {
            write!(f, "\nErrors ({}):", self.errors.len())?;
            for err in &self.errors {
                write!(f, "\n- {} -> {}", err.url, err.error)?;
            }
        }
        Ok(())
    }
}

/// Download every first-party asset referenced by `options.html_path`.
///
/// Fails only when the HTML file cannot be read or the base URL is invalid.
pub async fn fetch_assets(options: &AssetFetchOptions) -> Result<FetchSummary> {
    let html = tokio::fs::read_to_string(&options.html_path)
        .await
        .with_context(|| format!("Failed to read {}", options.html_path.display()))?;

    let base = Url::parse(&options.base_url)
        .with_context(|| format!("Invalid base URL: {}", options.base_url))?;
    let origin = Origin::from_url(&base)?;
    let client = HttpClient::new()?;

    let references = extract_asset_references(&html, &options.marker);
    info!(
        target: "site_mirror::fetch",
        "Found {} asset references in {}",
        references.len(),
        options.html_path.display()
    );

    let mut run = FetchRun {
        client,
        options,
        attempted: HashSet::new(),
        summary: FetchSummary::default(),
    };

    let mut stylesheets = Vec::new();
    for reference in references {
        let url = match base.join(&reference) {
            Ok(url) => url,
            Err(e) => {
                run.record_error(reference.clone(), reference, e.to_string());
                continue;
            }
        };
        if let Some(response) = run.fetch(&url, &reference).await
            && response.is_css()
        {
            stylesheets.push((url, String::from_utf8_lossy(&response.body).into_owned()));
        }
    }

    for (owner, css) in stylesheets {
        for discovered in resolve_css_urls(&css, &owner) {
            let Ok(url) = Url::parse(&discovered) else {
                continue;
            };
            if !origin.contains(&url) {
                debug!(target: "site_mirror::fetch", "Skipping cross-origin CSS reference {url}");
                continue;
            }
            run.fetch(&url, CSS_REFERENCE).await;
        }
    }

    let mut summary = run.summary;
    summary.fetched = run.attempted.len();
    Ok(summary)
}

struct FetchRun<'a> {
    client: HttpClient,
    options: &'a AssetFetchOptions,
    attempted: HashSet<String>,
    summary: FetchSummary,
}

impl FetchRun<'_> {
    /// Download `url` once and write it to disk, then pause.
    ///
    /// Returns the response on success. Repeated URLs are skipped.
    async fn fetch(&mut self, url: &Url, reference: &str) -> Option<RawResponse> {
        if !self.attempted.insert(url.to_string()) {
            return None;
        }

        let result = self.download_to_disk(url).await;
        tokio::time::sleep(self.options.throttle).await;

        match result {
            Ok((response, path)) => {
                debug!(target: "site_mirror::fetch", "Saved {url} -> {}", path.display());
                self.summary.saved.push(path);
                Some(response)
            }
            Err(e) => {
                warn!(target: "site_mirror::fetch", "Failed to fetch {url}: {e}");
                self.record_error(url.to_string(), reference.to_string(), e.to_string());
                None
            }
        }
    }

    async fn download_to_disk(&self, url: &Url) -> Result<(RawResponse, PathBuf), DownloadError> {
        let response = self.client.download(url.as_str(), None).await?;
        let path = local_path(&self.options.output_dir, url);

        let io_failure = |source: std::io::Error| DownloadError::Write {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_failure)?;
        }
        tokio::fs::write(&path, &response.body)
            .await
            .map_err(io_failure)?;

        Ok((response, path))
    }

    fn record_error(&mut self, url: String, reference: String, error: String) {
        self.summary.errors.push(FetchError {
            url,
            reference,
            error,
        });
    }
}

/// `<output_dir>/<url path>`, with `index` for directory-style paths.
fn local_path(output_dir: &Path, url: &Url) -> PathBuf {
    let mut relative = url.path().trim_start_matches('/').to_string();
    if relative.is_empty() || relative.ends_with('/') {
        relative.push_str("index");
    }
    output_dir.join(relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_path_uses_url_path_only() {
        let url = Url::parse("https://h.test/wp-content/a/b.css?ver=1#x").unwrap();
        assert_eq!(
            local_path(Path::new("out"), &url),
            PathBuf::from("out/wp-content/a/b.css")
        );
        let dir = Url::parse("https://h.test/wp-content/").unwrap();
        assert_eq!(
            local_path(Path::new("."), &dir),
            PathBuf::from("./wp-content/index")
        );
    }

    #[test]
    fn default_options_throttle_between_downloads() {
        let options = AssetFetchOptions::default();
        assert_eq!(options.throttle, Duration::from_millis(FETCH_THROTTLE_MS));
        assert_eq!(options.throttle, Duration::from_millis(50));
        assert_eq!(options.marker, "/wp-content/");
        assert_eq!(options.html_path, PathBuf::from("index.html"));
    }

    #[test]
    fn summary_lists_errors() {
        let summary = FetchSummary {
            fetched: 3,
            saved: Vec::new(),
            errors: vec![FetchError {
                url: "https://h.test/wp-content/x.png".into(),
                reference: "/wp-content/x.png".into(),
                error: "HTTP 404".into(),
            }],
        };
        assert_eq!(
            summary.to_string(),
            "Fetched 3 URLs (including CSS refs).\nErrors (1):\n- https://h.test/wp-content/x.png -> HTTP 404"
        );
        assert_eq!(
            FetchSummary::default().to_string(),
            "Fetched 0 URLs (including CSS refs)."
        );
    }
}
