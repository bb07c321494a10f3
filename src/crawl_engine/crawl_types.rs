//! Outcome and summary types for a crawl run.

use std::path::PathBuf;
use std::time::Duration;

use crate::browser::NavigationError;

/// Why a single page could not be mirrored.
///
/// Page failures are isolated: they are recorded in the summary and the
/// crawl moves on to the next queued URL.
#[derive(Debug, thiserror::Error)]
pub enum PageFailure {
    #[error("navigation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("failed to read rendered page: {0}")]
    DomRead(String),

    #[error("no local path for {0}")]
    Unmapped(String),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<NavigationError> for PageFailure {
    fn from(err: NavigationError) -> Self {
        match err {
            NavigationError::Timeout(after) => Self::Timeout(after),
            NavigationError::Failed(msg) => Self::Navigation(msg),
        }
    }
}

/// Result of visiting one page: where its HTML was written, or why not.
pub type PageOutcome = Result<PathBuf, PageFailure>;

/// A page whose rendered HTML was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPage {
    pub url: String,
    pub path: PathBuf,
}

/// A page that was dequeued but not saved.
#[derive(Debug)]
pub struct FailedPage {
    pub url: String,
    pub failure: PageFailure,
}

/// Why the crawl loop stopped. Both are normal terminations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The queue ran empty.
    Drained,
    /// The page budget was reached.
    BudgetExhausted,
}

/// Aggregate result of a crawl run.
#[derive(Debug)]
pub struct CrawlSummary {
    /// Saved pages in visit order
    pub saved: Vec<SavedPage>,
    pub failed: Vec<FailedPage>,
    pub assets_saved: usize,
    pub assets_failed: usize,
    pub stop_reason: StopReason,
    /// `<output root>/<host>`
    pub host_dir: PathBuf,
}

impl CrawlSummary {
    #[must_use]
    pub fn pages_saved(&self) -> usize {
        self.saved.len()
    }

    /// Pages dequeued and attempted, whether saved or failed.
    #[must_use]
    pub fn pages_visited(&self) -> usize {
        self.saved.len() + self.failed.len()
    }
}
