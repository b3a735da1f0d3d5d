// src/crawl/collector.rs
// =============================================================================
// Accumulates the pages found to link to the target.
//
// No deduplication happens here: the visited set already guarantees that the
// engine processes each page once, so each page adds at most one record.
// =============================================================================

use serde::Serialize;

/// One page that links to the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BacklinkRecord {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Default)]
pub struct BacklinkCollector {
    records: Vec<BacklinkRecord>,
}

impl BacklinkCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, title: impl Into<String>, url: impl Into<String>) {
        self.records.push(BacklinkRecord {
            title: title.into(),
            url: url.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn into_records(self) -> Vec<BacklinkRecord> {
        self.records
    }
}
