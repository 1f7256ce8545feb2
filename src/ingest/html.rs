// src/ingest/html.rs
//! HTML listing-page adapters: one hand-tuned strategy per known site family plus a
//! generic fallback, behind a registry keyed by host predicates.
//!
//! Every adapter turns one fetched page into raw (title, absolute url, date-text)
//! triples. Relative hrefs are resolved against the page URL; links to binary
//! documents are rejected; per-page (title, url) dedup and caps are applied by the
//! collector. A registry lookup never fails; unknown hosts get the generic adapter.

use once_cell::sync::OnceCell;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::model::RawItem;
use crate::textnorm::normalize;

/// Anchor text shorter than this is menu/footer noise, not an article title.
const MIN_ANCHOR_CHARS: usize = 12;

/// One extraction strategy for a family of listing pages.
pub trait PageAdapter: Send + Sync {
    fn name(&self) -> &'static str;
    /// Host predicate deciding whether this adapter owns a page.
    fn matches(&self, host: &str) -> bool;
    /// Extract raw triples from a fetched page body.
    fn extract(&self, html: &str, base: &Url) -> Vec<RawItem>;
}

/// Open strategy table: first matching adapter wins, generic fallback otherwise.
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn PageAdapter>>,
    fallback: GenericAdapter,
}

impl AdapterRegistry {
    pub fn with_defaults() -> Self {
        Self {
            adapters: vec![Box::new(GeorgiaGovAdapter), Box::new(TnEcdAdapter)],
            fallback: GenericAdapter,
        }
    }

    pub fn adapter_for(&self, host: &str) -> &dyn PageAdapter {
        for a in &self.adapters {
            if a.matches(host) {
                return a.as_ref();
            }
        }
        &self.fallback
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// --- georgia.gov press releases ---

/// Georgia governor's office / agency press-release listings. Article links carry a
/// dated path segment: `/press-releases/2026-02-04/slug`.
pub struct GeorgiaGovAdapter;

fn ga_press_path_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"/press-releases/(\d{4}-\d{2}-\d{2})(?:/|$)").unwrap())
}

impl PageAdapter for GeorgiaGovAdapter {
    fn name(&self) -> &'static str {
        "georgia.gov"
    }

    fn matches(&self, host: &str) -> bool {
        host == "georgia.gov" || host.ends_with(".georgia.gov")
    }

    fn extract(&self, html: &str, base: &Url) -> Vec<RawItem> {
        let doc = Html::parse_document(html);
        let anchors = Selector::parse("a[href]").unwrap();

        let mut items = Vec::new();
        for a in doc.select(&anchors) {
            let Some(url) = a.value().attr("href").and_then(|h| resolve(base, h)) else {
                continue;
            };
            if is_document_link(&url) || !url.path().starts_with("/press-releases/") {
                continue;
            }
            let title = anchor_text(&a);
            if title.chars().count() < MIN_ANCHOR_CHARS {
                continue;
            }
            // The CMS path date is authoritative; month-name text in the link or its
            // surrounding block is the fallback for undated slugs.
            let date_text = ga_press_path_re()
                .captures(url.path())
                .map(|c| c[1].to_string())
                .or_else(|| month_date_in(&title))
                .or_else(|| parent_text(&a).as_deref().and_then(month_date_in));
            items.push(RawItem {
                title,
                url: url.to_string(),
                date_text,
                summary: None,
            });
        }
        items
    }
}

// --- tnecd.com news listings ---

/// Tennessee ECD news cards: article links under `/news/`, with the site's numeric
/// `MM.DD.YYYY` date token in the card text.
pub struct TnEcdAdapter;

fn numeric_date_token_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"\b\d{2}\.\d{2}\.\d{4}\b").unwrap())
}

impl PageAdapter for TnEcdAdapter {
    fn name(&self) -> &'static str {
        "tnecd.com"
    }

    fn matches(&self, host: &str) -> bool {
        host == "tnecd.com" || host.ends_with(".tnecd.com") || host.ends_with(".tn.gov")
    }

    fn extract(&self, html: &str, base: &Url) -> Vec<RawItem> {
        let doc = Html::parse_document(html);
        let anchors = Selector::parse("a[href]").unwrap();

        let mut items = Vec::new();
        for a in doc.select(&anchors) {
            let Some(url) = a.value().attr("href").and_then(|h| resolve(base, h)) else {
                continue;
            };
            if is_document_link(&url) || !url.path().starts_with("/news") {
                continue;
            }
            let title = anchor_text(&a);
            if title.chars().count() < MIN_ANCHOR_CHARS {
                continue;
            }
            let date_text = numeric_date_token_re()
                .find(&title)
                .map(|m| m.as_str().to_string())
                .or_else(|| {
                    parent_text(&a)
                        .and_then(|t| numeric_date_token_re().find(&t).map(|m| m.as_str().to_string()))
                });
            // Strip a leading/trailing date token the card baked into the link text.
            let title = normalize(&numeric_date_token_re().replace_all(&title, " "));
            if title.is_empty() {
                continue;
            }
            items.push(RawItem {
                title,
                url: url.to_string(),
                date_text,
                summary: None,
            });
        }
        items
    }
}

// --- generic fallback ---

/// Unknown site shapes: prefer `<article>` containers with an explicit `<time>`;
/// otherwise scan for links with headline-length anchor text.
pub struct GenericAdapter;

impl PageAdapter for GenericAdapter {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn matches(&self, _host: &str) -> bool {
        true
    }

    fn extract(&self, html: &str, base: &Url) -> Vec<RawItem> {
        let doc = Html::parse_document(html);
        let article_sel = Selector::parse("article").unwrap();
        let anchor_sel = Selector::parse("a[href]").unwrap();
        let time_sel = Selector::parse("time").unwrap();
        let para_sel = Selector::parse("p").unwrap();
        let meta_desc = page_meta_description(&doc);

        let mut items = Vec::new();

        for art in doc.select(&article_sel) {
            let Some(a) = art.select(&anchor_sel).next() else {
                continue;
            };
            let Some(url) = a.value().attr("href").and_then(|h| resolve(base, h)) else {
                continue;
            };
            if is_document_link(&url) {
                continue;
            }
            let title = anchor_text(&a);
            if title.is_empty() {
                continue;
            }
            let date_text = art.select(&time_sel).next().map(|t| {
                t.value()
                    .attr("datetime")
                    .map(|d| normalize(d))
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| normalize(&t.text().collect::<Vec<_>>().join(" ")))
            });
            let summary = art
                .select(&para_sel)
                .next()
                .map(|p| normalize(&p.text().collect::<Vec<_>>().join(" ")))
                .filter(|s| !s.is_empty())
                .or_else(|| meta_desc.clone());
            items.push(RawItem {
                title,
                url: url.to_string(),
                date_text,
                summary,
            });
        }

        if !items.is_empty() {
            return items;
        }

        // Bare link list: anything with headline-length anchor text.
        for a in doc.select(&anchor_sel) {
            let Some(url) = a.value().attr("href").and_then(|h| resolve(base, h)) else {
                continue;
            };
            if is_document_link(&url) {
                continue;
            }
            let title = anchor_text(&a);
            if title.chars().count() < MIN_ANCHOR_CHARS {
                continue;
            }
            items.push(RawItem {
                title,
                url: url.to_string(),
                date_text: None,
                summary: None,
            });
        }
        items
    }
}

// --- shared helpers ---

fn resolve(base: &Url, href: &str) -> Option<Url> {
    let href = normalize(href);
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let url = base.join(&href).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}

fn is_document_link(url: &Url) -> bool {
    let path = url.path().to_lowercase();
    [".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".zip"]
        .iter()
        .any(|ext| path.ends_with(ext))
}

fn anchor_text(a: &ElementRef<'_>) -> String {
    normalize(&a.text().collect::<Vec<_>>().join(" "))
}

fn parent_text(a: &ElementRef<'_>) -> Option<String> {
    a.parent()
        .and_then(ElementRef::wrap)
        .map(|p| normalize(&p.text().collect::<Vec<_>>().join(" ")))
        .filter(|t| !t.is_empty())
}

fn month_date_in(text: &str) -> Option<String> {
    fn re() -> &'static Regex {
        static RE: OnceCell<Regex> = OnceCell::new();
        RE.get_or_init(|| {
            Regex::new(
                r"(?i)\b(?:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{1,2},\s+\d{4}\b",
            )
            .unwrap()
        })
    }
    re().find(text).map(|m| m.as_str().to_string())
}

fn page_meta_description(doc: &Html) -> Option<String> {
    let sel = Selector::parse(r#"meta[name="description"]"#).unwrap();
    doc.select(&sel)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(normalize)
        .filter(|s| !s.is_empty())
}
