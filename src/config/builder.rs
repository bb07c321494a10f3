//! Type-safe builder for `MirrorConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time validation
//! ensuring that the output root and start URL are set before building.

use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::MirrorConfig;
use crate::utils::{Origin, normalize_url};

// Type states for the builder
pub struct WithOutputRoot;
pub struct WithStartUrl;

pub struct MirrorConfigBuilder<State = ()> {
    pub(crate) output_root: Option<PathBuf>,
    pub(crate) start_url: Option<String>,
    pub(crate) defaults: MirrorConfig,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for MirrorConfigBuilder<()> {
    fn default() -> Self {
        Self {
            output_root: None,
            start_url: None,
            defaults: MirrorConfig::default(),
            _phantom: PhantomData,
        }
    }
}

impl MirrorConfig {
    /// Create a builder for configuring a `MirrorConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> MirrorConfigBuilder<()> {
        MirrorConfigBuilder::default()
    }
}

impl MirrorConfigBuilder<()> {
    pub fn output_root(self, dir: impl Into<PathBuf>) -> MirrorConfigBuilder<WithOutputRoot> {
        MirrorConfigBuilder {
            output_root: Some(dir.into()),
            start_url: self.start_url,
            defaults: self.defaults,
            _phantom: PhantomData,
        }
    }
}

impl MirrorConfigBuilder<WithOutputRoot> {
    pub fn start_url(self, url: impl Into<String>) -> MirrorConfigBuilder<WithStartUrl> {
        let url_string = url.into();

        // Normalize URL: add https:// if no scheme is present
        let normalized_url =
            if url_string.starts_with("http://") || url_string.starts_with("https://") {
                url_string
            } else {
                format!("https://{url_string}")
            };

        MirrorConfigBuilder {
            output_root: self.output_root,
            start_url: Some(normalized_url),
            defaults: self.defaults,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when all required fields are set
impl MirrorConfigBuilder<WithStartUrl> {
    pub fn build(self) -> Result<MirrorConfig> {
        let raw_start = self
            .start_url
            .ok_or_else(|| anyhow!("start_url is required"))?;
        let start_url = normalize_url(&raw_start)?;

        // Fails for non-http schemes and host-less URLs
        Origin::parse(&start_url)?;

        if self.defaults.navigation_timeout_secs == 0 {
            return Err(anyhow!("navigation_timeout_secs must be at least 1"));
        }

        Ok(MirrorConfig {
            output_root: self
                .output_root
                .ok_or_else(|| anyhow!("output_root is required"))?,
            start_url,
            ..self.defaults
        })
    }
}

// Builder methods available at any state
impl<State> MirrorConfigBuilder<State> {
    /// Set the page budget (default: 50). Zero saves nothing.
    #[must_use]
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.defaults.max_pages = max_pages;
        self
    }

    /// Set the per-page navigation timeout in seconds (default: 45)
    #[must_use]
    pub fn navigation_timeout_secs(mut self, secs: u64) -> Self {
        self.defaults.navigation_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.defaults.headless = headless;
        self
    }

    /// Replace the administrative path prefixes excluded from traversal
    #[must_use]
    pub fn excluded_path_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.defaults.excluded_path_prefixes = prefixes;
        self
    }

    /// Replace the administrative path suffixes excluded from traversal
    #[must_use]
    pub fn excluded_path_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.defaults.excluded_path_suffixes = suffixes;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.defaults.chrome_data_dir = Some(dir.into());
        self
    }
}
