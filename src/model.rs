// src/model.rs
//! Canonical article records: builder, identity hashing, similarity signatures.
//!
//! Records are immutable once built; every later stage re-orders or filters, never
//! mutates. A record only exists with a non-empty title and url; adapters' raw
//! triples failing that are dropped here.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::classify::{classify_tag, ScoreWeights, Tag};
use crate::dates::parse_date;
use crate::detect::{CompanyDetector, StateDetector};
use crate::textnorm::{normalize, strip_markup, truncate_chars};

/// Display length of the one-line core summary.
pub const CORE_SUMMARY_CHARS: usize = 180;

/// Ingestion channel a record came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    /// Google News RSS, Korean-language queries.
    Korean,
    /// State-government / EDO HTML listing pages.
    Us,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Korean => "KOREAN",
            Provider::Us => "US",
        }
    }
}

/// Raw (title, url, date-text) triple as produced by a source adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub title: String,
    pub url: String,
    pub date_text: Option<String>,
    pub summary: Option<String>,
}

/// The canonical unit flowing from adapters to the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub provider: Provider,
    pub source_name: String,
    pub title: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub state: String,
    pub company: String,
    pub tag: Tag,
    pub core_summary: String,
    pub importance_score: i32,
    pub identity_hash: String,
    pub similarity_signature: BTreeSet<String>,
}

/// Detector/classifier bundle threaded into record building, constructed once from
/// one `AppConfig`, no hidden globals.
pub struct RecordContext<'a> {
    pub states: &'a StateDetector,
    pub companies: &'a CompanyDetector,
    pub weights: &'a ScoreWeights,
}

/// Assemble a full record from an adapter's raw triple. `None` when the normalized
/// title or url is empty.
pub fn build_record(
    provider: Provider,
    source_name: &str,
    raw: RawItem,
    ctx: &RecordContext<'_>,
) -> Option<ArticleRecord> {
    let title = normalize(&raw.title);
    let url = normalize(&raw.url);
    if title.is_empty() || url.is_empty() {
        return None;
    }

    let published_at = raw.date_text.as_deref().and_then(parse_date);
    let state = ctx.states.detect(&title, Some(&url));
    let company = ctx.companies.detect(&title);
    let tag = classify_tag(&title);

    // Summary preference: feed summary / page description, then the title itself.
    let summary_src = raw
        .summary
        .as_deref()
        .map(strip_markup)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| title.clone());
    let core_summary = truncate_chars(&summary_src, CORE_SUMMARY_CHARS);

    let importance_score = ctx
        .weights
        .score(ctx.companies.is_priority(&company), tag, provider);
    let identity_hash = identity_hash(provider, &title, &url);
    let similarity_signature = similarity_signature(&title, &company);

    Some(ArticleRecord {
        provider,
        source_name: source_name.to_string(),
        title,
        url,
        published_at,
        state,
        company,
        tag,
        core_summary,
        importance_score,
        identity_hash,
        similarity_signature,
    })
}

/// Stable content identity over `(provider, normalized title, normalized url)`,
/// the exact-duplicate key.
pub fn identity_hash(provider: Provider, title: &str, url: &str) -> String {
    let raw = format!(
        "{}||{}||{}",
        provider.as_str(),
        normalize(title),
        normalize(url)
    );
    let digest = Sha256::digest(raw.as_bytes());
    let mut out = String::with_capacity(64);
    for b in digest.iter() {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}

fn digits_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}

fn token_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?u)\b\w+\b").unwrap())
}

/// Token-set signature for near-duplicate detection: the normalized title with the
/// detected company name and all digit runs removed, lowercased, tokenized, minus
/// stop words and single-char tokens.
pub fn similarity_signature(title: &str, company: &str) -> BTreeSet<String> {
    let mut text = normalize(title).to_lowercase();
    let company_lower = normalize(company).to_lowercase();
    if !company_lower.is_empty() {
        text = text.replace(&company_lower, " ");
    }
    let text = digits_re().replace_all(&text, " ");

    // surviving_tokens already drops stop words and sub-2-char tokens
    crate::detect::company::surviving_tokens(&text)
        .into_iter()
        .collect()
}
