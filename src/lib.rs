pub mod asset_capture;
pub mod asset_fetcher;
pub mod browser;
pub mod browser_setup;
pub mod config;
pub mod crawl_engine;
pub mod css_resolver;
pub mod fetch_one;
pub mod http_client;
pub mod path_mapper;
pub mod utils;

pub use asset_capture::{AssetInterceptor, CaptureOutcome, SkipReason, is_capturable_content_type};
pub use asset_fetcher::{
    AssetFetchOptions, FetchError, FetchSummary, extract_asset_references, fetch_assets,
};
pub use browser::{
    ChromiumDriver, NavigationError, ObservedResponse, PageDriver, Readiness, ResponseBody,
    ResponseSink,
};
pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::MirrorConfig;
pub use crawl_engine::{
    CrawlEngine, CrawlFrontier, CrawlSummary, PageFailure, StopReason, mirror_site,
    mirror_with_driver,
};
pub use css_resolver::resolve_css_urls;
pub use fetch_one::{fetch_one, fetch_one_with};
pub use http_client::{DownloadError, HttpClient, RawRequest, RawResponse};
pub use path_mapper::{PathMapper, extension_for_content_type};
pub use utils::{Origin, init_logging, normalize_url};
