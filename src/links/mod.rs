// src/links/mod.rs
// =============================================================================
// Everything about links on a single page.
//
// Submodules:
// - extract: raw hrefs and the title from HTML
// - normalize: resolving an href and reducing it to a canonical identity
// =============================================================================

mod extract;
mod normalize;

pub use extract::Page;
pub use normalize::{normalize_href, NormalizedUrl, Scope};
