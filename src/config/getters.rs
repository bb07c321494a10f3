//! Getter methods for `MirrorConfig`

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use super::types::MirrorConfig;
use crate::utils::Origin;

impl MirrorConfig {
    #[must_use]
    pub fn output_root(&self) -> &PathBuf {
        &self.output_root
    }

    #[must_use]
    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    /// Origin of the start URL.
    ///
    /// The builder has already validated the start URL, so this only fails
    /// for configs deserialized from elsewhere.
    pub fn origin(&self) -> Result<Origin> {
        Origin::parse(&self.start_url)
    }

    #[must_use]
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    #[must_use]
    pub fn navigation_timeout_secs(&self) -> u64 {
        self.navigation_timeout_secs
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn excluded_path_prefixes(&self) -> &[String] {
        &self.excluded_path_prefixes
    }

    #[must_use]
    pub fn excluded_path_suffixes(&self) -> &[String] {
        &self.excluded_path_suffixes
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }
}
