//! Crawl Engine Module
//!
//! Breadth-first, same-origin traversal that saves each page's rendered HTML
//! and captures its static assets. [`mirror_site`] is the entry point; it
//! owns the browser for the whole run and always releases it.

pub mod crawl_types;
pub mod engine;
pub mod frontier;
pub mod link_processor;
pub mod page_timeout;

use anyhow::Result;
use log::warn;

use crate::browser::{ChromiumDriver, PageDriver};
use crate::config::MirrorConfig;

pub use crawl_types::{
    CrawlSummary, FailedPage, PageFailure, PageOutcome, SavedPage, StopReason,
};
pub use engine::CrawlEngine;
pub use frontier::CrawlFrontier;
pub use link_processor::{filter_link, is_administrative_path};
pub use page_timeout::with_page_timeout;

/// Launch a browser and mirror `config.start_url()` into `config.output_root()`.
///
/// Fails only when the browser cannot be started. Per-page problems are
/// reported in the returned summary.
pub async fn mirror_site(config: &MirrorConfig) -> Result<CrawlSummary> {
    let mut driver = ChromiumDriver::launch(config).await?;
    mirror_with_driver(&mut driver, config).await
}

/// Run a crawl on an already acquired driver, then close it.
///
/// The driver is closed whether or not the crawl could be set up.
pub async fn mirror_with_driver<D: PageDriver + ?Sized>(
    driver: &mut D,
    config: &MirrorConfig,
) -> Result<CrawlSummary> {
    let result = match CrawlEngine::new(&mut *driver, config) {
        Ok(engine) => Ok(engine.run().await),
        Err(e) => Err(e),
    };

    if let Err(e) = driver.close().await {
        warn!(target: "site_mirror::crawl", "Failed to close browser: {e:#}");
    }

    result
}
