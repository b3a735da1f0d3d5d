// src/error.rs
// =============================================================================
// Error types shared across the crawler.
//
// Two families:
// - FetchError: one page could not be fetched. The crawler records it and
//   abandons that branch only.
// - ConfigError: the run cannot start (bad URL, client build failure).
//
// Broken markup and non-UTF8 bodies are not errors here: the extractor and
// the fetcher recover from them on their own.
// =============================================================================

use serde::Serialize;
use thiserror::Error;

/// Why a single page fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    /// The server answered with a non-2xx status
    #[error("HTTP {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("too many redirects")]
    TooManyRedirects,

    /// DNS failure, refused connection, TLS handshake failure...
    #[error("connection failed: {0}")]
    Connect(String),

    /// Anything else reqwest reports (body read errors, invalid URL)
    #[error("{0}")]
    Transport(String),
}

// Sorts reqwest's error kinds into our taxonomy
impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_redirect() {
            FetchError::TooManyRedirects
        } else if error.is_connect() {
            FetchError::Connect(error.to_string())
        } else if let Some(status) = error.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}

/// Problems detected before the crawl starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {role} URL '{url}': {source}")]
    InvalidUrl {
        role: &'static str,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{role} URL '{url}' must use http or https")]
    UnsupportedScheme { role: &'static str, url: String },

    #[error("{role} URL '{url}' has no host")]
    MissingHost { role: &'static str, url: String },

    #[error("--prefix must start with '/', got '{0}'")]
    InvalidPrefix(String),

    #[error("--rate must be greater than zero")]
    ZeroRate,

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
