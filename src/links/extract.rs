// src/links/extract.rs
// =============================================================================
// This module pulls the raw hrefs and the title out of an HTML page.
//
// We use the `scraper` crate which parses HTML with html5ever, the same
// error-recovering parser browsers follow. Unclosed tags, unknown tags and
// stray markup never make parsing fail; at worst a tag cut off at the end of
// the input is dropped and everything before it is still returned.
//
// Hrefs are returned raw, in document order, duplicates included. Resolving
// and filtering them is the normalizer's job.
// =============================================================================

use scraper::{ElementRef, Html};

/// A fetched page after extraction.
#[derive(Debug, Clone)]
pub struct Page {
    /// The URL the page was fetched from
    pub url: String,
    pub html: String,
    /// Text of the first <title>, trimmed. Empty when there is none.
    pub title: String,
    /// Raw href values of every <a href>, in document order
    pub hrefs: Vec<String>,
}

impl Page {
    pub fn parse(url: impl Into<String>, html: String) -> Self {
        let (title, hrefs) = extract(&html);
        Self {
            url: url.into(),
            html,
            title,
            hrefs,
        }
    }
}

/// Returns (title, hrefs) for an HTML document.
pub fn extract(html: &str) -> (String, Vec<String>) {
    let document = Html::parse_document(html);

    let mut title: Option<String> = None;
    let mut hrefs = Vec::new();

    // descendants() walks the tree in document order
    for node in document.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };

        match element.value().name() {
            "a" => {
                if let Some(href) = element.value().attr("href") {
                    hrefs.push(href.to_string());
                }
            }
            "title" if title.is_none() => {
                title = Some(element.text().collect::<String>());
            }
            _ => {}
        }
    }

    let title = title.map(|t| t.trim().to_string()).unwrap_or_default();
    (title, hrefs)
}
