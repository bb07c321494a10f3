//! Core configuration types for site mirroring
//!
//! This module contains the main `MirrorConfig` struct that defines the
//! parameters of a single crawl run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{
    ADMIN_PATH_PREFIXES, ADMIN_PATH_SUFFIXES, DEFAULT_MAX_PAGES, DEFAULT_OUTPUT_ROOT,
    NAVIGATION_TIMEOUT_SECS,
};

/// Main configuration struct for a crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Root directory under which `<host>/...` is written.
    pub(crate) output_root: PathBuf,

    /// Start URL with its fragment stripped. Its origin bounds the crawl.
    pub(crate) start_url: String,

    /// Page budget: the crawl ends after this many pages are saved.
    pub(crate) max_pages: usize,

    /// Timeout in seconds for navigation plus the network-idle wait
    ///
    /// Default: 45 seconds
    pub(crate) navigation_timeout_secs: u64,

    pub(crate) headless: bool,

    /// Links whose path starts with one of these are never enqueued.
    pub(crate) excluded_path_prefixes: Vec<String>,

    /// Links whose path ends with one of these are never enqueued.
    pub(crate) excluded_path_suffixes: Vec<String>,

    /// Chrome user data directory for this run
    ///
    /// When unset a per-process directory under the system temp dir is used.
    /// Either way the directory is removed when the browser is closed.
    #[serde(skip)]
    pub(crate) chrome_data_dir: Option<PathBuf>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            start_url: String::new(),
            max_pages: DEFAULT_MAX_PAGES,
            navigation_timeout_secs: NAVIGATION_TIMEOUT_SECS,
            headless: true,
            excluded_path_prefixes: ADMIN_PATH_PREFIXES.iter().map(|s| (*s).to_string()).collect(),
            excluded_path_suffixes: ADMIN_PATH_SUFFIXES.iter().map(|s| (*s).to_string()).collect(),
            chrome_data_dir: None,
        }
    }
}
