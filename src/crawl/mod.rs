// src/crawl/mod.rs
// =============================================================================
// This module handles crawling a site section for backlinks.
//
// Features:
// - Depth-first crawl from a seed URL using an explicit worklist
// - Stays within one host and one path prefix
// - Each page is fetched at most once, so cyclic links are safe
// - Failed pages are recorded and skipped; the crawl keeps going
// - Pluggable politeness delay between pages
//
// Submodules:
// - engine: the crawl loop
// - fetch: downloading pages
// - visited: the visited set
// - collector: backlink records
// - throttle: delay policies
// =============================================================================

mod collector;
mod engine;
mod fetch;
mod throttle;
mod visited;

pub use collector::BacklinkRecord;
pub use engine::{CrawlReport, Crawler};
pub use fetch::{lookup_title, HttpFetcher, PLACEHOLDER_TITLE};
pub use throttle::{FixedDelay, Throttle, TokenBucket};
