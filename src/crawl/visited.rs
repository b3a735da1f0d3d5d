// src/crawl/visited.rs
// Pages already entered during one crawl session. Only ever grows.

use std::collections::HashSet;

use crate::links::NormalizedUrl;

#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<NormalizedUrl>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` as visited. Returns false if it already was.
    pub fn mark(&mut self, url: NormalizedUrl) -> bool {
        self.seen.insert(url)
    }

    pub fn contains(&self, url: &NormalizedUrl) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }
}
