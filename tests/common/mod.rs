//! Test utilities for the site_mirror test suite
//!
//! [`FakeDriver`] stands in for Chromium: pages are served from an in-memory
//! site, and each page's assets are pushed to the registered response sink
//! during navigation the way the real browser reports network responses.

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use site_mirror::{
    DownloadError, MirrorConfig, NavigationError, ObservedResponse, PageDriver, RawRequest,
    RawResponse, Readiness, ResponseSink,
};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const ORIGIN: &str = "https://h.test";

/// Absolute URL on the test origin.
#[allow(dead_code)]
pub fn url(path: &str) -> String {
    format!("{ORIGIN}{path}")
}

/// A response the browser reports while a page loads.
#[derive(Debug, Clone)]
pub struct FakeAsset {
    pub url: String,
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl FakeAsset {
    pub fn new(url: impl Into<String>, status: u16, content_type: &str, body: &[u8]) -> Self {
        Self {
            url: url.into(),
            status,
            content_type: content_type.to_string(),
            body: body.to_vec(),
        }
    }
}

/// How a page behaves when visited.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub links: Vec<String>,
    pub html: String,
    pub assets: Vec<FakeAsset>,
    pub times_out: bool,
    pub dom_error: bool,
}

#[allow(dead_code)]
impl FakePage {
    pub fn linking(links: &[&str]) -> Self {
        let html = format!(
            "<html><body>{}</body></html>",
            links
                .iter()
                .map(|l| format!(r#"<a href="{l}">{l}</a>"#))
                .collect::<String>()
        );
        Self {
            links: links.iter().map(|l| (*l).to_string()).collect(),
            html,
            ..Self::default()
        }
    }

    pub fn with_assets(mut self, assets: Vec<FakeAsset>) -> Self {
        self.assets = assets;
        self
    }

    pub fn timing_out() -> Self {
        Self {
            times_out: true,
            ..Self::default()
        }
    }

    pub fn unreadable() -> Self {
        Self {
            dom_error: true,
            ..Self::default()
        }
    }
}

type PageSource = Box<dyn Fn(&str) -> Option<FakePage> + Send + Sync>;

/// Scripted [`PageDriver`].
pub struct FakeDriver {
    source: PageSource,
    current: Option<FakePage>,
    sink: Option<Arc<dyn ResponseSink>>,
    resources: HashMap<String, FakeAsset>,
    /// Every raw request as `(url, referer)`, in order
    pub raw_requests: Mutex<Vec<(String, Option<String>)>>,
    /// Every URL passed to `navigate`, in order
    pub navigations: Vec<String>,
    pub readiness: Vec<Readiness>,
    pub close_calls: usize,
}

#[allow(dead_code)]
impl FakeDriver {
    /// Serve a fixed set of pages; any other URL fails to load.
    pub fn with_pages(pages: Vec<(&str, FakePage)>) -> Self {
        let pages: HashMap<String, FakePage> = pages
            .into_iter()
            .map(|(path, page)| (url(path), page))
            .collect();
        Self::from_fn(move |u| pages.get(u).cloned())
    }

    /// Serve pages produced on demand.
    pub fn from_fn(source: impl Fn(&str) -> Option<FakePage> + Send + Sync + 'static) -> Self {
        Self {
            source: Box::new(source),
            current: None,
            sink: None,
            resources: HashMap::new(),
            raw_requests: Mutex::new(Vec::new()),
            navigations: Vec::new(),
            readiness: Vec::new(),
            close_calls: 0,
        }
    }

    /// Answer raw requests for `resource.url` with `resource`.
    pub fn serving(mut self, resource: FakeAsset) -> Self {
        self.resources.insert(resource.url.clone(), resource);
        self
    }

    /// Endless `/page/N/` chain: every page links to the next one.
    pub fn infinite_pagination() -> Self {
        Self::from_fn(|u| {
            let n: u64 = if u == url("/") {
                0
            } else {
                u.strip_prefix(&url("/page/"))?
                    .trim_end_matches('/')
                    .parse()
                    .ok()?
            };
            Some(FakePage::linking(&[format!("/page/{}/", n + 1).as_str()]))
        })
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    fn on_response(&mut self, sink: Arc<dyn ResponseSink>) {
        self.sink = Some(sink);
    }

    async fn navigate(
        &mut self,
        url: &str,
        timeout: Duration,
        readiness: Readiness,
    ) -> std::result::Result<(), NavigationError> {
        self.navigations.push(url.to_string());
        self.readiness.push(readiness);
        self.current = None;

        let Some(page) = (self.source)(url) else {
            return Err(NavigationError::Failed(
                "net::ERR_NAME_NOT_RESOLVED".to_string(),
            ));
        };
        if page.times_out {
            return Err(NavigationError::Timeout(timeout));
        }

        if let Some(sink) = self.sink.clone() {
            for asset in &page.assets {
                sink.on_response(ObservedResponse::new(
                    asset.url.clone(),
                    asset.status,
                    Some(asset.content_type.clone()),
                    Box::new(asset.body.clone()),
                ))
                .await;
            }
        }

        self.current = Some(page);
        Ok(())
    }

    async fn anchor_hrefs(&self) -> Result<Vec<String>> {
        match &self.current {
            Some(page) if !page.dom_error => Ok(page.links.clone()),
            _ => anyhow::bail!("Execution context was destroyed"),
        }
    }

    async fn content(&self) -> Result<String> {
        match &self.current {
            Some(page) if !page.dom_error => Ok(page.html.clone()),
            _ => anyhow::bail!("Execution context was destroyed"),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.close_calls += 1;
        Ok(())
    }
}

#[async_trait]
impl RawRequest for FakeDriver {
    async fn raw_request(
        &self,
        url: &str,
        referer: Option<&str>,
    ) -> std::result::Result<RawResponse, DownloadError> {
        self.raw_requests
            .lock()
            .push((url.to_string(), referer.map(str::to_string)));

        Ok(match self.resources.get(url) {
            Some(resource) => RawResponse {
                url: url.to_string(),
                status: resource.status,
                content_type: Some(resource.content_type.clone()),
                body: resource.body.clone(),
            },
            None => RawResponse {
                url: url.to_string(),
                status: 404,
                content_type: None,
                body: Vec::new(),
            },
        })
    }
}

/// Crawl config rooted at `root` for the test origin.
#[allow(dead_code)]
pub fn config(root: &Path, max_pages: usize) -> MirrorConfig {
    MirrorConfig::builder()
        .output_root(root)
        .start_url(url("/"))
        .max_pages(max_pages)
        .build()
        .expect("valid test config")
}

/// Every file under `root` with its contents, keyed by relative path.
#[allow(dead_code)]
pub fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    fn walk(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, root, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
                out.insert(rel, std::fs::read(&path).unwrap());
            }
        }
    }

    let mut out = BTreeMap::new();
    if root.exists() {
        walk(root, root, &mut out);
    }
    out
}
