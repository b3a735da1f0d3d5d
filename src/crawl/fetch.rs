// src/crawl/fetch.rs
// =============================================================================
// This module downloads pages for the crawler.
//
// Key functionality:
// - PageFetcher: the capability the engine needs (GET a URL, get HTML back)
// - HttpFetcher: the real implementation on top of reqwest
// - lookup_title: the one-off fetch of the target page's title
//
// Failure handling:
// - Non-2xx statuses and transport errors become a FetchError
// - Bodies that aren't valid UTF-8 are decoded lossily (bad bytes turn
//   into U+FFFD) rather than failing the page
// - Nothing is retried
//
// Rust concepts:
// - Traits: the engine is generic over PageFetcher, so tests can swap in an
//   in-memory site without touching the network
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ConfigError, FetchError};
use crate::links::Page;

/// Title used when the target page can't be fetched or has no <title>
pub const PLACEHOLDER_TITLE: &str = "target_page";

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GETs `url` and returns the body as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches pages over HTTP(S) with a shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // Read raw bytes so a bad encoding can't fail the page
        let body = response.bytes().await?;
        debug!(url, bytes = body.len(), "fetched");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Fetches `url` and returns its title, or the placeholder when the page is
/// unreachable or untitled. Never fails.
pub async fn lookup_title<F: PageFetcher + ?Sized>(fetcher: &F, url: &str) -> String {
    match fetcher.fetch(url).await {
        Ok(html) => {
            let page = Page::parse(url, html);
            if page.title.is_empty() {
                PLACEHOLDER_TITLE.to_string()
            } else {
                page.title
            }
        }
        Err(error) => {
            warn!(url, %error, "could not fetch target page title, using placeholder");
            PLACEHOLDER_TITLE.to_string()
        }
    }
}
