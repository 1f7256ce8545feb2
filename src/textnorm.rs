// src/textnorm.rs
//! Text normalization primitives shared by adapters, detectors, and the record builder.
//!
//! - `normalize`: collapse runs of whitespace (incl. newlines) to single spaces, trim.
//!   Idempotent: `normalize(normalize(x)) == normalize(x)`.
//! - `strip_markup`: best-effort removal of tag-like substrings + entity decode, then
//!   `normalize`. Not a full HTML parse.
//! - `encode_query`: normalize, then percent-encode for embedding in a URL query.
//! - `truncate_chars`: display truncation with an `…` marker.

use once_cell::sync::OnceCell;
use regex::Regex;

fn ws_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn tag_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap())
}

/// Collapse all whitespace runs to single spaces and trim both ends.
pub fn normalize(s: &str) -> String {
    ws_re().replace_all(s.trim(), " ").to_string()
}

/// Strip tag-like substrings and decode common HTML entities, then normalize.
pub fn strip_markup(html: &str) -> String {
    let decoded = html_escape::decode_html_entities(html);
    let stripped = tag_re().replace_all(&decoded, "");
    normalize(&stripped)
}

/// Normalize and percent-encode a search query for safe URL embedding.
pub fn encode_query(q: &str) -> String {
    urlencoding::encode(&normalize(q)).into_owned()
}

/// Truncate to `max` chars, appending `…` when anything was cut.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push('…');
    out
}
