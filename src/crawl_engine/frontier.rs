//! Breadth-first crawl frontier.

use std::collections::{HashSet, VecDeque};

/// FIFO queue of crawl targets plus the set of targets already dequeued.
///
/// A URL is accepted at most once: `enqueue` rejects anything queued or
/// visited, and `next` never yields a visited URL.
#[derive(Debug, Default)]
pub struct CrawlFrontier {
    queue: VecDeque<String>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl CrawlFrontier {
    /// Frontier holding only `start`.
    #[must_use]
    pub fn new(start: impl Into<String>) -> Self {
        let mut frontier = Self::default();
        frontier.enqueue(start);
        frontier
    }

    /// Append `url` unless it is already queued or visited.
    ///
    /// Returns whether the URL was added.
    pub fn enqueue(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Dequeue the oldest unvisited URL and mark it visited.
    pub fn next(&mut self) -> Option<String> {
        while let Some(url) = self.queue.pop_front() {
            self.queued.remove(&url);
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    #[must_use]
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of URLs waiting to be visited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
