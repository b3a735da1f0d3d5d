// src/links/normalize.rs
// =============================================================================
// Turns an href found on a page into a canonical identity for that page.
//
// The canonical form is `https://<host><path>`:
// - the scheme is always https, so http and https links collapse
// - query string and fragment are dropped
// - trailing slashes are removed, except for the root path "/"
//
// The same form is used for three things: the visited set, comparing a link
// against the target page, and the scope check that decides what to crawl.
//
// Dropping the query means `/list?page=2` and `/list?page=3` are one page to
// the crawler. That is a known limitation and is kept on purpose.
// =============================================================================

use std::fmt;
use url::Url;

/// Canonical identity of a page.
///
/// Displays as `https://<host><path>`. Host and path stay separate so the
/// scope check does not need to reparse the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl {
    host: String,
    path: String,
}

impl NormalizedUrl {
    /// Builds the canonical form of an already resolved URL.
    ///
    /// Returns None for URLs without a host (`javascript:`, `tel:`, `data:`...)
    pub fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str().filter(|h| !h.is_empty())?;

        // url.port() is None when the port is the scheme's default
        let host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let trimmed = url.path().trim_end_matches('/');
        let path = if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        };

        Some(Self { host, path })
    }

    /// Parses an absolute URL string and normalizes it.
    pub fn parse(input: &str) -> Option<Self> {
        Url::parse(input).ok().as_ref().and_then(Self::from_url)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "https://{}{}", self.host, self.path)
    }
}

/// The part of a site the crawler is allowed to enter.
///
/// A page is in scope when its host equals `domain` and its path starts with
/// `prefix`. This is a plain string prefix: "/health" also admits "/healthy".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    domain: String,
    prefix: String,
}

impl Scope {
    pub fn new(domain: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            domain: domain.into().to_ascii_lowercase(),
            prefix: prefix.into(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn contains(&self, url: &NormalizedUrl) -> bool {
        url.host() == self.domain && url.path().starts_with(&self.prefix)
    }
}

/// Returns true for hrefs worth resolving at all.
///
/// Empty hrefs, in-page anchors and email links are skipped before
/// resolution, since resolving them would point back at the current page
/// or nowhere useful.
pub fn is_followable(href: &str) -> bool {
    let href = href.trim();
    !href.is_empty()
        && !href.starts_with('#')
        && !href
            .get(..7)
            .map_or(false, |scheme| scheme.eq_ignore_ascii_case("mailto:"))
}

/// Resolves `href` against the page it was found on and normalizes it.
///
/// Handles relative paths (`../x`), absolute paths (`/x`), scheme-relative
/// references (`//host/x`) and full URLs. Anything filtered out or
/// unresolvable yields None.
pub fn normalize_href(href: &str, base: &Url) -> Option<NormalizedUrl> {
    if !is_followable(href) {
        return None;
    }

    let resolved = base.join(href.trim()).ok()?;
    NormalizedUrl::from_url(&resolved)
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why keep host and path instead of one String?
//    - The scope check needs both pieces on every discovered link
//    - Display rebuilds the string when it's needed for a fetch or a log line
//
// 2. Why derive Hash and Eq?
//    - NormalizedUrl is the key of the visited set (a HashSet)
//    - Two values are equal exactly when their canonical strings are equal
//
// 3. What does Url::join do with "//other.com/x"?
//    - It's a scheme-relative reference: it keeps the base scheme
//      and replaces the host, giving "https://other.com/x"
// -----------------------------------------------------------------------------
