// src/crawl/engine.rs
// =============================================================================
// This module implements the backlink crawl with a depth-first worklist.
//
// How it works:
// 1. Pop the next URL from the frontier (a Vec used as a stack)
// 2. Skip it if its normalized form was already visited, otherwise mark it
//    visited BEFORE fetching, so a page linking back to itself or to a page
//    still being expanded can't be entered twice
// 3. Fetch the page; on failure record it and drop only this branch
// 4. Extract links and title
// 5. If any link normalizes to the target, record the page once
// 6. Push in-scope links onto the frontier, last link first, so the first
//    link in the document is the next one popped
// 7. Pause the throttle before moving on
//
// The visited set only grows and the in-scope part of a site is finite, so
// the frontier always drains, cycles included.
// =============================================================================

use serde::Serialize;
use tracing::{debug, info, trace, warn};
use url::Url;

use super::collector::{BacklinkCollector, BacklinkRecord};
use super::fetch::PageFetcher;
use super::throttle::Throttle;
use super::visited::VisitedSet;
use crate::error::FetchError;
use crate::links::{normalize_href, NormalizedUrl, Page, Scope};

/// Title recorded for a backlink page that has no <title>
pub const UNTITLED_PAGE: &str = "No Title";

/// A branch abandoned because its page could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlFailure {
    pub url: String,
    pub error: FetchError,
}

/// Everything a finished crawl session produced.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// Pages linking to the target, in the order they were found
    pub backlinks: Vec<BacklinkRecord>,
    /// Every URL a fetch was attempted for, in order
    pub fetched: Vec<String>,
    pub failures: Vec<CrawlFailure>,
}

impl CrawlReport {
    pub fn pages_crawled(&self) -> usize {
        self.fetched.len()
    }
}

// An entry in the frontier: the URL to fetch and its identity
struct Pending {
    url: String,
    key: NormalizedUrl,
}

/// One crawl session. Owns all of its state; nothing is global.
pub struct Crawler<F> {
    fetcher: F,
    throttle: Box<dyn Throttle>,
    scope: Scope,
    target: NormalizedUrl,
    visited: VisitedSet,
    collector: BacklinkCollector,
    fetched: Vec<String>,
    failures: Vec<CrawlFailure>,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(
        fetcher: F,
        throttle: Box<dyn Throttle>,
        scope: Scope,
        target: NormalizedUrl,
    ) -> Self {
        Self {
            fetcher,
            throttle,
            scope,
            target,
            visited: VisitedSet::new(),
            collector: BacklinkCollector::new(),
            fetched: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Crawls everything reachable from `seed` within the scope.
    ///
    /// The seed itself is fetched as given even if it lies outside the scope.
    /// Calling this again in the same session skips any page already visited,
    /// so crawling the same seed twice fetches it once.
    pub async fn crawl(&mut self, seed: &str) {
        let Some(key) = NormalizedUrl::parse(seed) else {
            warn!(url = seed, "seed is not an absolute URL with a host, skipping");
            return;
        };

        let mut frontier = vec![Pending {
            url: seed.to_string(),
            key,
        }];

        while let Some(next) = frontier.pop() {
            if !self.visited.mark(next.key) {
                trace!(url = %next.url, "already visited");
                continue;
            }

            let children = self.process(&next.url).await;
            frontier.extend(children.into_iter().rev());

            self.throttle.pause().await;
        }

        debug!(visited = self.visited.len(), "frontier exhausted");
    }

    /// Fetches one page, records it if it links to the target, and returns
    /// the in-scope links to follow.
    async fn process(&mut self, url: &str) -> Vec<Pending> {
        self.fetched.push(url.to_string());
        info!("Crawling page {}: {}", self.fetched.len(), url);

        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(error) => {
                warn!(url, %error, "fetch failed, abandoning branch");
                self.failures.push(CrawlFailure {
                    url: url.to_string(),
                    error,
                });
                return Vec::new();
            }
        };

        let page = Page::parse(url, html);
        trace!(url, bytes = page.html.len(), hrefs = page.hrefs.len(), "parsed");

        // The frontier only holds URLs that already parsed
        let Ok(base) = Url::parse(&page.url) else {
            return Vec::new();
        };

        let links: Vec<NormalizedUrl> = page
            .hrefs
            .iter()
            .filter_map(|href| normalize_href(href, &base))
            .collect();

        if links.contains(&self.target) {
            let title = if page.title.is_empty() {
                UNTITLED_PAGE.to_string()
            } else {
                page.title.clone()
            };
            info!(url, title = %title, "links to target");
            self.collector.record(title, page.url.clone());
        }

        links
            .into_iter()
            .filter(|link| {
                let in_scope = self.scope.contains(link);
                if !in_scope {
                    trace!(link = %link, "out of scope");
                }
                in_scope && !self.visited.contains(link)
            })
            .map(|key| Pending {
                url: key.to_string(),
                key,
            })
            .collect()
    }

    pub fn backlinks_found(&self) -> usize {
        self.collector.len()
    }

    /// Ends the session and hands back what it found.
    pub fn finish(self) -> CrawlReport {
        CrawlReport {
            backlinks: self.collector.into_records(),
            fetched: self.fetched,
            failures: self.failures,
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a Vec instead of recursion?
//    - A deep site would grow the call stack one frame per level
//    - The Vec grows on the heap instead, bounded by the frontier size
//    - Pushing children in reverse keeps the same visiting order a recursive
//      version would have
//
// 2. Why check visited on pop and not only on push?
//    - The same URL can be pushed by two pages before either copy is popped
//    - The check on pop is the one that guarantees a single fetch; the check
//      on push just keeps the frontier small
//
// 3. Why Box<dyn Throttle>?
//    - The politeness policy is picked at runtime (--delay-ms or --rate)
//    - The engine doesn't care which one it got
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::throttle::FixedDelay;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    // An in-memory site: URL -> HTML. Unknown URLs answer 404.
    #[derive(Clone, Default)]
    struct FakeSite {
        pages: HashMap<String, String>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl FakeSite {
        fn page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for FakeSite {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or(FetchError::Status(404))
        }
    }

    // Counts pauses so tests can check the throttle is applied per page
    struct CountingThrottle(Arc<Mutex<usize>>);

    #[async_trait]
    impl Throttle for CountingThrottle {
        async fn pause(&mut self) {
            *self.0.lock().unwrap() += 1;
        }
    }

    fn crawler(site: &FakeSite, target: &str) -> Crawler<FakeSite> {
        Crawler::new(
            site.clone(),
            Box::new(FixedDelay::new(Duration::ZERO)),
            Scope::new("ex.com", "/health"),
            NormalizedUrl::parse(target).unwrap(),
        )
    }

    fn health_site() -> FakeSite {
        FakeSite::default()
            .page(
                "https://ex.com/health/",
                r#"<title>Health</title>
                   <a href="/health/advising">Advising</a>
                   <a href="/health/staff">Staff</a>"#,
            )
            .page(
                "https://ex.com/health/advising",
                "<title>Advising</title><p>Welcome</p>",
            )
            .page(
                "https://ex.com/health/staff",
                r#"<title>Staff</title>
                   <a href="/health/advising/">Advising</a>
                   <a href="/health/">Home</a>"#,
            )
    }

    #[tokio::test]
    async fn test_worked_example_with_cycle() {
        let site = health_site();
        let mut crawler = crawler(&site, "https://ex.com/health/advising/");

        crawler.crawl("https://ex.com/health/").await;
        let report = crawler.finish();

        assert_eq!(
            site.requests(),
            vec![
                "https://ex.com/health/",
                "https://ex.com/health/advising",
                "https://ex.com/health/staff",
            ]
        );
        assert_eq!(
            report.backlinks,
            vec![
                BacklinkRecord {
                    title: "Health".into(),
                    url: "https://ex.com/health/".into(),
                },
                BacklinkRecord {
                    title: "Staff".into(),
                    url: "https://ex.com/health/staff".into(),
                },
            ]
        );
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_crawling_same_seed_twice_fetches_once() {
        let site = FakeSite::default().page("https://ex.com/health/a", "<p>leaf</p>");
        let mut crawler = crawler(&site, "https://ex.com/elsewhere");

        crawler.crawl("https://ex.com/health/a").await;
        crawler.crawl("https://ex.com/health/a").await;
        crawler.crawl("http://ex.com/health/a/").await;

        assert_eq!(site.requests(), vec!["https://ex.com/health/a"]);
    }

    #[tokio::test]
    async fn test_self_loop_terminates() {
        let site = FakeSite::default().page(
            "https://ex.com/health/loop",
            r#"<a href="">me</a><a href="/health/loop">me</a><a href="./loop/">me</a>"#,
        );
        let mut crawler = crawler(&site, "https://ex.com/elsewhere");

        crawler.crawl("https://ex.com/health/loop").await;

        assert_eq!(crawler.finish().pages_crawled(), 1);
    }

    #[tokio::test]
    async fn test_out_of_scope_links_are_never_fetched() {
        let site = FakeSite::default()
            .page(
                "https://ex.com/health/",
                r#"<a href="https://other.com/health/x">other host</a>
                   <a href="/arts/">other section</a>
                   <a href="mailto:a@ex.com">mail</a>
                   <a href="/health/in">inside</a>"#,
            )
            .page("https://ex.com/health/in", "<p>leaf</p>");
        let mut crawler = crawler(&site, "https://ex.com/elsewhere");

        crawler.crawl("https://ex.com/health/").await;

        assert_eq!(
            site.requests(),
            vec!["https://ex.com/health/", "https://ex.com/health/in"]
        );
    }

    #[tokio::test]
    async fn test_out_of_scope_seed_is_still_fetched() {
        let site = FakeSite::default().page(
            "https://ex.com/news/",
            r#"<a href="/health/advising">x</a><a href="/news/other">y</a>"#,
        );
        let mut crawler = crawler(&site, "https://ex.com/health/advising");

        crawler.crawl("https://ex.com/news/").await;
        let report = crawler.finish();

        assert_eq!(report.backlinks.len(), 1);
        // /health/advising is in scope and followed; /news/other is not
        assert_eq!(
            site.requests(),
            vec!["https://ex.com/news/", "https://ex.com/health/advising"]
        );
    }

    #[tokio::test]
    async fn test_repeated_target_link_records_page_once() {
        let site = FakeSite::default().page(
            "https://ex.com/health/",
            r#"<title>Home</title>
               <a href="/target">one</a>
               <a href="/target/">two</a>
               <a href="http://ex.com/target?ref=nav">three</a>"#,
        );
        let mut crawler = crawler(&site, "https://ex.com/target/");

        crawler.crawl("https://ex.com/health/").await;

        assert_eq!(crawler.backlinks_found(), 1);
    }

    #[tokio::test]
    async fn test_untitled_backlink_gets_default_title() {
        let site = FakeSite::default().page("https://ex.com/health/", r#"<a href="/t">t</a>"#);
        let mut crawler = crawler(&site, "https://ex.com/t");

        crawler.crawl("https://ex.com/health/").await;
        let report = crawler.finish();

        assert_eq!(report.backlinks[0].title, UNTITLED_PAGE);
    }

    #[tokio::test]
    async fn test_failed_branch_does_not_stop_siblings() {
        let site = FakeSite::default()
            .page(
                "https://ex.com/health/",
                r#"<a href="/health/broken">broken</a><a href="/health/ok">ok</a>"#,
            )
            .page("https://ex.com/health/ok", r#"<a href="/target">t</a>"#);
        let mut crawler = crawler(&site, "https://ex.com/target");

        crawler.crawl("https://ex.com/health/").await;
        let report = crawler.finish();

        assert_eq!(report.pages_crawled(), 3);
        assert_eq!(
            report.failures,
            vec![CrawlFailure {
                url: "https://ex.com/health/broken".into(),
                error: FetchError::Status(404),
            }]
        );
        assert_eq!(report.backlinks.len(), 1);
        assert_eq!(report.backlinks[0].url, "https://ex.com/health/ok");
    }

    #[tokio::test]
    async fn test_depth_first_document_order() {
        let site = FakeSite::default()
            .page(
                "https://ex.com/health/",
                r#"<a href="/health/a">a</a><a href="/health/b">b</a>"#,
            )
            .page("https://ex.com/health/a", r#"<a href="/health/a/deep">deep</a>"#)
            .page("https://ex.com/health/a/deep", "<p>leaf</p>")
            .page("https://ex.com/health/b", "<p>leaf</p>");
        let mut crawler = crawler(&site, "https://ex.com/elsewhere");

        crawler.crawl("https://ex.com/health/").await;

        assert_eq!(
            site.requests(),
            vec![
                "https://ex.com/health/",
                "https://ex.com/health/a",
                "https://ex.com/health/a/deep",
                "https://ex.com/health/b",
            ]
        );
    }

    #[tokio::test]
    async fn test_throttle_runs_once_per_processed_page() {
        let site = health_site().page(
            "https://ex.com/health/advising",
            r#"<a href="/health/nope">x</a>"#,
        );
        let pauses = Arc::new(Mutex::new(0));
        let mut crawler = Crawler::new(
            site.clone(),
            Box::new(CountingThrottle(pauses.clone())),
            Scope::new("ex.com", "/health"),
            NormalizedUrl::parse("https://ex.com/health/advising").unwrap(),
        );

        crawler.crawl("https://ex.com/health/").await;

        // health, advising, nope (404), staff; staff's links are duplicates
        assert_eq!(site.requests().len(), 4);
        assert_eq!(*pauses.lock().unwrap(), 4);
    }

    #[tokio::test]
    async fn test_invalid_seed_is_ignored() {
        let site = FakeSite::default();
        let mut crawler = crawler(&site, "https://ex.com/t");

        crawler.crawl("not a url").await;

        assert!(site.requests().is_empty());
    }
}
