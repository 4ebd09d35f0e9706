// src/services/adapters.rs

//! Per-source posting extraction.
//!
//! Each [`AdapterKind`] maps to a pure function from a raw HTML document to
//! candidate postings. Adapters never classify; every candidate is handed
//! to the relevance filter by the caller.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{AdapterKind, DEFAULT_LOCATION, Posting, SourceConfig};
use crate::utils::{resolve_link, truncate_chars};

/// Containers examined by the card-based adapters.
pub const CONTAINER_LIMIT: usize = 15;
/// Anchors examined by flat link scans.
pub const LINK_SCAN_LIMIT: usize = 30;
/// Candidates kept by the structured adapter's link fallback.
pub const FALLBACK_LIMIT: usize = 10;
/// Maximum title length kept by the structured adapter.
pub const TITLE_MAX_CHARS: usize = 100;
/// Accepted anchor text length range for the generic adapter.
pub const GENERIC_TEXT_LEN: std::ops::Range<usize> = 10..150;

const CARD_HINTS: &[&str] = &["job", "card"];
const TITLE_HINTS: &[&str] = &["title"];
const FALLBACK_TERMS: &[&str] = &["intern", "software"];
const GENERIC_TERMS: &[&str] = &["intern", "software", "developer", "engineer"];

impl AdapterKind {
    /// Extract candidate postings from `raw_body` fetched for `source`.
    pub fn extract(self, raw_body: &str, source: &SourceConfig) -> Result<Vec<Posting>> {
        let document = Html::parse_document(raw_body);
        let ctx = Context::new(source)?;

        match self {
            AdapterKind::Structured => extract_structured(&document, &ctx),
            AdapterKind::Simplified => extract_simplified(&document, &ctx),
            AdapterKind::Generic => extract_generic(&document, &ctx),
        }
    }
}

/// Extract candidates using the adapter configured on `source`.
pub fn extract(raw_body: &str, source: &SourceConfig) -> Result<Vec<Posting>> {
    source.adapter.extract(raw_body, source)
}

/// Shared state for one extraction call.
struct Context<'a> {
    source: &'a SourceConfig,
    base: Url,
    now: DateTime<Utc>,
}

impl<'a> Context<'a> {
    fn new(source: &'a SourceConfig) -> Result<Self> {
        let base = Url::parse(&source.base_url)
            .map_err(|e| AppError::parse(&source.name, format!("invalid base_url: {e}")))?;
        Ok(Self {
            source,
            base,
            now: Utc::now(),
        })
    }

    fn posting(&self, title: String, href: &str) -> Posting {
        Posting {
            company: self.source.name.clone(),
            title,
            url: resolve_link(&self.base, href),
            location: DEFAULT_LOCATION.to_string(),
            discovered_at: self.now,
        }
    }

    fn selector(&self, s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| {
            AppError::parse(&self.source.name, AppError::selector(s, format!("{e:?}")))
        })
    }
}

/// Card containers with a dedicated title element, or a link scan when the
/// page has no cards.
fn extract_structured(document: &Html, ctx: &Context<'_>) -> Result<Vec<Posting>> {
    let container_sel = ctx.selector("div, li")?;
    let containers: Vec<ElementRef> = document
        .select(&container_sel)
        .filter(|el| has_class_hint(el, CARD_HINTS))
        .collect();

    if containers.is_empty() {
        log::debug!(
            "{}: no card containers, falling back to link scan",
            ctx.source.name
        );
        return scan_links_fallback(document, ctx);
    }

    let title_sel = ctx.selector("h3, h4, a, span")?;
    let link_sel = ctx.selector("a[href]")?;

    let postings = containers
        .iter()
        .take(CONTAINER_LIMIT)
        .filter_map(|card| {
            let title_el = card
                .select(&title_sel)
                .find(|el| has_class_hint(el, TITLE_HINTS))?;
            let href = card.select(&link_sel).next()?.value().attr("href")?;
            let title = truncate_chars(&text_of(&title_el), TITLE_MAX_CHARS);
            Some(ctx.posting(title, href))
        })
        .collect();

    Ok(postings)
}

fn scan_links_fallback(document: &Html, ctx: &Context<'_>) -> Result<Vec<Posting>> {
    let link_sel = ctx.selector("a[href]")?;

    let postings = document
        .select(&link_sel)
        .take(LINK_SCAN_LIMIT)
        .filter_map(|link| {
            let text = text_of(&link);
            if text.is_empty() || !contains_any(&text.to_lowercase(), FALLBACK_TERMS) {
                return None;
            }
            let href = link.value().attr("href")?;
            Some(ctx.posting(truncate_chars(&text, TITLE_MAX_CHARS), href))
        })
        .take(FALLBACK_LIMIT)
        .collect();

    Ok(postings)
}

/// Card containers whose first link carries both title and URL.
fn extract_simplified(document: &Html, ctx: &Context<'_>) -> Result<Vec<Posting>> {
    let container_sel = ctx.selector("div, article")?;
    let link_sel = ctx.selector("a[href]")?;

    let postings = document
        .select(&container_sel)
        .filter(|el| has_class_hint(el, CARD_HINTS))
        .take(CONTAINER_LIMIT)
        .filter_map(|card| {
            let link = card.select(&link_sel).next()?;
            let href = link.value().attr("href")?;
            Some(ctx.posting(text_of(&link), href))
        })
        .collect();

    Ok(postings)
}

/// Flat scan over the first anchors of the page.
fn extract_generic(document: &Html, ctx: &Context<'_>) -> Result<Vec<Posting>> {
    let link_sel = ctx.selector("a[href]")?;

    let postings = document
        .select(&link_sel)
        .take(LINK_SCAN_LIMIT)
        .filter_map(|link| {
            let text = text_of(&link);
            if !GENERIC_TEXT_LEN.contains(&text.chars().count()) {
                return None;
            }
            if !contains_any(&text.to_lowercase(), GENERIC_TERMS) {
                return None;
            }
            let href = link.value().attr("href")?;
            Some(ctx.posting(text, href))
        })
        .collect();

    Ok(postings)
}

/// Whether the element's class attribute contains any of `hints`.
fn has_class_hint(el: &ElementRef<'_>, hints: &[&str]) -> bool {
    el.value()
        .attr("class")
        .map(|class| contains_any(&class.to_lowercase(), hints))
        .unwrap_or(false)
}

fn text_of(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}
