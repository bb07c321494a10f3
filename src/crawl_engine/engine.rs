//! The crawl loop.
//!
//! One page at a time, breadth-first, until the queue drains or the page
//! budget is spent. Queue, visited set and budget live on the engine and are
//! touched only by [`CrawlEngine::run`].

use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};
use url::Url;

use super::crawl_types::{
    CrawlSummary, FailedPage, PageFailure, PageOutcome, SavedPage, StopReason,
};
use super::frontier::CrawlFrontier;
use super::link_processor::filter_link;
use super::page_timeout::with_page_timeout;
use crate::asset_capture::AssetInterceptor;
use crate::browser::{PageDriver, Readiness};
use crate::config::MirrorConfig;
use crate::path_mapper::PathMapper;
use crate::utils::Origin;

/// Drives a [`PageDriver`] over a site and writes what it renders.
pub struct CrawlEngine<'a, D: PageDriver + ?Sized> {
    driver: &'a mut D,
    config: &'a MirrorConfig,
    origin: Origin,
    mapper: PathMapper,
    interceptor: Arc<AssetInterceptor>,
    frontier: CrawlFrontier,
}

impl<'a, D: PageDriver + ?Sized> CrawlEngine<'a, D> {
    /// Prepare a crawl of `config.start_url()` and register asset capture on `driver`.
    pub fn new(driver: &'a mut D, config: &'a MirrorConfig) -> anyhow::Result<Self> {
        let origin = config.origin()?;
        let mapper = PathMapper::new(origin.clone(), config.output_root().clone());
        let interceptor = Arc::new(AssetInterceptor::new(mapper.clone()));
        driver.on_response(interceptor.clone());

        Ok(Self {
            driver,
            config,
            origin,
            mapper,
            interceptor,
            frontier: CrawlFrontier::new(config.start_url()),
        })
    }

    /// Crawl until the queue drains or `max_pages` pages have been saved.
    pub async fn run(mut self) -> CrawlSummary {
        let max_pages = self.config.max_pages();
        let mut saved = Vec::new();
        let mut failed = Vec::new();

        let stop_reason = loop {
            if saved.len() >= max_pages {
                break StopReason::BudgetExhausted;
            }
            let Some(url) = self.frontier.next() else {
                break StopReason::Drained;
            };

            info!(
                target: "site_mirror::crawl",
                "Crawling [{}/{}]: {url}",
                saved.len() + 1,
                max_pages
            );

            match self.visit(&url).await {
                Ok(path) => {
                    debug!(target: "site_mirror::crawl", "Saved {url} -> {}", path.display());
                    saved.push(SavedPage { url, path });
                }
                Err(failure) => {
                    warn!(target: "site_mirror::crawl", "Skipping {url}: {failure}");
                    failed.push(FailedPage { url, failure });
                }
            }
        };

        info!(
            target: "site_mirror::crawl",
            "Crawl finished ({stop_reason:?}): {} saved, {} failed, {} queued",
            saved.len(),
            failed.len(),
            self.frontier.len()
        );

        CrawlSummary {
            saved,
            failed,
            assets_saved: self.interceptor.saved(),
            assets_failed: self.interceptor.failed(),
            stop_reason,
            host_dir: self.mapper.host_dir(),
        }
    }

    /// Navigate to `url`, queue its links and write its rendered HTML.
    async fn visit(&mut self, url: &str) -> PageOutcome {
        let timeout = self.config.navigation_timeout();

        self.driver
            .navigate(url, timeout, Readiness::NetworkIdle)
            .await?;

        let hrefs = with_page_timeout(self.driver.anchor_hrefs(), timeout, "Link extraction")
            .await
            .map_err(|e| PageFailure::DomRead(format!("{e:#}")))?;
        self.enqueue_links(url, &hrefs);

        let html = with_page_timeout(self.driver.content(), timeout, "Rendered HTML read")
            .await
            .map_err(|e| PageFailure::DomRead(format!("{e:#}")))?;

        let path = self
            .mapper
            .map(url, true, None)
            .ok_or_else(|| PageFailure::Unmapped(url.to_string()))?;
        write_document(&path, &html).await?;
        Ok(path)
    }

    fn enqueue_links(&mut self, url: &str, hrefs: &[String]) {
        let Ok(page_url) = Url::parse(url) else {
            return;
        };

        let mut added = 0usize;
        for href in hrefs {
            if let Some(target) = filter_link(href, &page_url, &self.origin, self.config)
                && self.frontier.enqueue(target)
            {
                added += 1;
            }
        }

        debug!(
            target: "site_mirror::links",
            "Found {} links on {url}, {added} newly queued",
            hrefs.len()
        );
    }
}

async fn write_document(path: &Path, html: &str) -> Result<(), PageFailure> {
    let io_failure = |source: std::io::Error| PageFailure::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_failure)?;
    }
    tokio::fs::write(path, html).await.map_err(io_failure)
}
