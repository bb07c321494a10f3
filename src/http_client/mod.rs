//! Direct HTTP access with the mirror's fixed browser identity.
//!
//! [`RawRequest`] is the "raw request" capability: fetch-one, the standalone
//! asset fetcher and every [`PageDriver`](crate::browser::PageDriver) expose
//! it. [`HttpClient`] is the reqwest implementation; redirects are followed.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue, REFERER};
use async_trait::async_trait;
use reqwest::Client;

use crate::utils::constants::{ACCEPT_LANGUAGE as ACCEPT_LANGUAGE_VALUE, CHROME_USER_AGENT};
use crate::utils::NAVIGATION_TIMEOUT_SECS;

/// Errors from a single download
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Final URL after redirects
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the declared content type is a stylesheet.
    #[must_use]
    pub fn is_css(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("text/css"))
    }
}

/// reqwest client preconfigured with the browser identity headers.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Client with the default 45 second request timeout.
    pub fn new() -> Result<Self, DownloadError> {
        Self::with_timeout(Duration::from_secs(NAVIGATION_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DownloadError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));

        let client = Client::builder()
            .user_agent(CHROME_USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| DownloadError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

/// Direct GET access, without rendering anything.
#[async_trait]
pub trait RawRequest: Send + Sync {
    /// GET `url` and read the whole body, whatever the status code.
    ///
    /// `referer` is sent as the `Referer` header when given.
    async fn raw_request(
        &self,
        url: &str,
        referer: Option<&str>,
    ) -> Result<RawResponse, DownloadError>;

    /// GET `url`, treating any non-2xx status as an error.
    async fn download(
        &self,
        url: &str,
        referer: Option<&str>,
    ) -> Result<RawResponse, DownloadError> {
        let response = self.raw_request(url, referer).await?;
        if !response.is_success() {
            return Err(DownloadError::Status {
                status: response.status,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RawRequest for HttpClient {
    async fn raw_request(
        &self,
        url: &str,
        referer: Option<&str>,
    ) -> Result<RawResponse, DownloadError> {
        let parsed = url::Url::parse(url).map_err(|e| DownloadError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let mut request = self.client.get(parsed);
        if let Some(referer) = referer {
            request = request.header(REFERER, referer);
        }

        let response = request.send().await?;
        let status = response.status();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        log::debug!(
            target: "site_mirror::fetch",
            "GET {url} -> {} ({} bytes)",
            status.as_u16(),
            body.len()
        );

        Ok(RawResponse {
            url: final_url,
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
