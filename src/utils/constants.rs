//! Shared configuration constants for site_mirror
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Default output root for mirrored content
pub const DEFAULT_OUTPUT_ROOT: &str = "site_copy";

/// Default page budget: 50 successfully saved pages
///
/// The crawl stops as soon as this many pages have been written, even if
/// the queue still holds URLs.
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Navigation timeout: 45 seconds
///
/// Bounds `goto` plus the network-idle wait for a single page. Pages that
/// keep long-polling connections open will hit this and be recorded as
/// failed rather than hanging the crawl.
pub const NAVIGATION_TIMEOUT_SECS: u64 = 45;

/// Quiet window for the network-idle readiness condition
///
/// A page counts as idle once no request has been in flight for this long.
pub const NETWORK_IDLE_QUIET_MS: u64 = 500;

/// Pause between downloads in the standalone asset fetcher
pub const FETCH_THROTTLE_MS: u64 = 50;

/// Path segment identifying first-party uploaded content
pub const FIRST_PARTY_MARKER: &str = "/wp-content/";

/// Base origin used by the standalone asset fetcher when none is given
pub const DEFAULT_ASSET_BASE_URL: &str = "https://kssoftware.net";

/// Source document read by the standalone asset fetcher
pub const DEFAULT_SOURCE_HTML: &str = "index.html";

/// Path prefixes of administrative/API surfaces that are never crawled
pub const ADMIN_PATH_PREFIXES: &[&str] = &["/wp-admin", "/wp-json"];

/// Path suffixes of administrative/API surfaces that are never crawled
pub const ADMIN_PATH_SUFFIXES: &[&str] = &["/xmlrpc.php"];

/// Chrome user agent string sent on every page load and raw request
///
/// Pinned to Chrome 127 desktop. Not configurable.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36";

/// Accept-Language header sent with the browser identity
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
