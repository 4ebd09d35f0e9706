//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Resolve a link found on a career page.
///
/// Links that already start with `http` are kept verbatim; anything else
/// is joined onto `base`.
pub fn resolve_link(base: &Url, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        resolve_url(base, href)
    }
}

/// Truncate to at most `max` characters.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
