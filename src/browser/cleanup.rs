//! Release of the browser process and its profile directory.

use anyhow::Result;
use chromiumoxide::Browser;
use log::{debug, warn};
use std::path::Path;

/// Result of cleanup operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupResult {
    /// Everything was released
    Success,
    /// Some steps failed, with error details
    PartialFailure(Vec<String>),
}

/// Close the browser, wait for its process to exit and remove the profile directory.
///
/// Every step is attempted even when an earlier one fails.
pub async fn cleanup_browser_and_data(
    browser: &mut Browser,
    chrome_data_dir: &Path,
) -> Result<CleanupResult> {
    let mut errors = Vec::new();

    debug!(target: "site_mirror::cleanup", "Closing browser");
    if let Err(e) = browser.close().await {
        warn!(target: "site_mirror::cleanup", "Failed to close browser: {e}");
        errors.push(format!("Browser close failed: {e}"));
    }

    if let Err(e) = browser.wait().await {
        warn!(target: "site_mirror::cleanup", "Failed to wait for browser exit: {e}");
        errors.push(format!("Browser wait failed: {e}"));
    } else {
        debug!(target: "site_mirror::cleanup", "Browser process exited");
    }

    if chrome_data_dir.exists() {
        if let Err(e) = std::fs::remove_dir_all(chrome_data_dir) {
            warn!(
                target: "site_mirror::cleanup",
                "Failed to remove profile directory {}: {e}",
                chrome_data_dir.display()
            );
            errors.push(format!("Directory cleanup failed: {e}"));
        }
    }

    if errors.is_empty() {
        Ok(CleanupResult::Success)
    } else {
        Ok(CleanupResult::PartialFailure(errors))
    }
}
