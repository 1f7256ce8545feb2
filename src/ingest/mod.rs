// src/ingest/mod.rs
//! One collection cycle over all configured sources.
//!
//! Sources are fetched sequentially; each source's fetch/parse failure is caught,
//! reported as a typed `SourceReport`, and contributes zero records; a failing
//! source never aborts the others. Records from all sources meet only afterwards,
//! in the exact-dedup map.

pub mod fetch;
pub mod html;
pub mod rss;

use std::collections::HashSet;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use url::Url;

use crate::config::AppConfig;
use crate::dedup::dedup_exact;
use crate::model::{build_record, ArticleRecord, Provider, RawItem, RecordContext};

/// Display label for the Korean RSS channel.
pub const KOREAN_SOURCE_NAME: &str = "Google News (KR)";

/// Typed per-source outcome. `error` carries the reason instead of a silent catch-all
/// so callers can log or count failures.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source: String,
    pub items: usize,
    pub error: Option<String>,
}

impl SourceReport {
    fn ok(source: impl Into<String>, items: usize) -> Self {
        Self {
            source: source.into(),
            items,
            error: None,
        }
    }

    fn failed(source: impl Into<String>, err: impl ToString) -> Self {
        Self {
            source: source.into(),
            items: 0,
            error: Some(err.to_string()),
        }
    }
}

/// One-time metrics registration (so series show up on an exporter, if wired).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "newsboard_feed_items_total",
            "Raw entries parsed from RSS feeds."
        );
        describe_counter!(
            "newsboard_page_items_total",
            "Raw items extracted from HTML source pages."
        );
        describe_counter!(
            "newsboard_records_total",
            "Records built across one collection cycle."
        );
        describe_counter!(
            "newsboard_source_errors_total",
            "Source fetch/parse failures."
        );
        describe_histogram!("newsboard_parse_ms", "Feed/page parse time in ms.");
        describe_gauge!(
            "newsboard_last_cycle_records",
            "Record count of the most recent collection cycle."
        );
    });
}

/// Per-page hygiene shared by every adapter: (title, url) dedup and an item cap.
pub fn cap_and_dedup(items: Vec<RawItem>, max: usize) -> Vec<RawItem> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let key = (item.title.clone(), item.url.clone());
        if !seen.insert(key) {
            continue;
        }
        out.push(item);
        if out.len() >= max {
            break;
        }
    }
    out
}

/// Drop items whose host differs from the source page's host, unless the source
/// descriptor explicitly allows external links.
fn same_domain_filter(items: Vec<RawItem>, page_host: &str, allow_external: bool) -> Vec<RawItem> {
    if allow_external {
        return items;
    }
    items
        .into_iter()
        .filter(|it| {
            Url::parse(&it.url)
                .ok()
                .and_then(|u| u.host_str().map(|h| h.eq_ignore_ascii_case(page_host)))
                .unwrap_or(false)
        })
        .collect()
}

/// Collect from the Korean RSS channel: one feed per configured query.
pub async fn collect_korean(
    cfg: &AppConfig,
    ctx: &RecordContext<'_>,
    client: &reqwest::Client,
) -> (Vec<ArticleRecord>, Vec<SourceReport>) {
    ensure_metrics_described();

    let mut records = Vec::new();
    let mut reports = Vec::new();

    for query in &cfg.korean_queries {
        let label = format!("{KOREAN_SOURCE_NAME}: {query}");
        let url = rss::search_feed_url(query);

        let body = match fetch::fetch_text(client, &url).await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = ?e, %query, "rss fetch failed");
                counter!("newsboard_source_errors_total").increment(1);
                reports.push(SourceReport::failed(label, e));
                continue;
            }
        };
        let items = match rss::parse_feed(&body, cfg.limits.per_query) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = ?e, %query, "rss parse failed");
                counter!("newsboard_source_errors_total").increment(1);
                reports.push(SourceReport::failed(label, e));
                continue;
            }
        };

        let items = cap_and_dedup(items, cfg.limits.per_query);
        let built: Vec<ArticleRecord> = items
            .into_iter()
            .filter_map(|raw| build_record(Provider::Korean, KOREAN_SOURCE_NAME, raw, ctx))
            .collect();
        reports.push(SourceReport::ok(label, built.len()));
        records.extend(built);
    }

    (records, reports)
}

/// Collect from the configured US HTML sources via the adapter registry.
pub async fn collect_us(
    cfg: &AppConfig,
    ctx: &RecordContext<'_>,
    client: &reqwest::Client,
    registry: &html::AdapterRegistry,
) -> (Vec<ArticleRecord>, Vec<SourceReport>) {
    ensure_metrics_described();

    let mut records = Vec::new();
    let mut reports = Vec::new();

    for src in &cfg.us_sources {
        let page_url = match Url::parse(&src.url) {
            Ok(u) => u,
            Err(e) => {
                reports.push(SourceReport::failed(&src.name, e));
                continue;
            }
        };
        let host = page_url.host_str().unwrap_or_default().to_lowercase();

        let body = match fetch::fetch_text(client, &src.url).await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = ?e, source = %src.name, "page fetch failed");
                counter!("newsboard_source_errors_total").increment(1);
                reports.push(SourceReport::failed(&src.name, e));
                continue;
            }
        };

        let adapter = registry.adapter_for(&host);
        let items = adapter.extract(&body, &page_url);
        counter!("newsboard_page_items_total").increment(items.len() as u64);

        let items = same_domain_filter(items, &host, src.allow_external_domain_links);
        let items = cap_and_dedup(items, cfg.limits.per_source);
        let built: Vec<ArticleRecord> = items
            .into_iter()
            .filter_map(|raw| build_record(Provider::Us, &src.name, raw, ctx))
            .collect();
        reports.push(SourceReport::ok(&src.name, built.len()));
        records.extend(built);
    }

    (records, reports)
}

/// Full cycle: both channels, then the exact-dedup map (last write wins).
pub async fn collect_all(
    cfg: &AppConfig,
    ctx: &RecordContext<'_>,
    client: &reqwest::Client,
    registry: &html::AdapterRegistry,
) -> (Vec<ArticleRecord>, Vec<SourceReport>) {
    let (mut records, mut reports) = collect_korean(cfg, ctx, client).await;
    let (us_records, us_reports) = collect_us(cfg, ctx, client, registry).await;
    records.extend(us_records);
    reports.extend(us_reports);

    let records = dedup_exact(records);
    counter!("newsboard_records_total").increment(records.len() as u64);
    gauge!("newsboard_last_cycle_records").set(records.len() as f64);

    (records, reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str, url: &str) -> RawItem {
        RawItem {
            title: title.into(),
            url: url.into(),
            date_text: None,
            summary: None,
        }
    }

    #[test]
    fn cap_and_dedup_drops_repeats_and_caps() {
        let items = vec![
            raw("a title", "https://x/a"),
            raw("a title", "https://x/a"),
            raw("b title", "https://x/b"),
            raw("c title", "https://x/c"),
        ];
        let out = cap_and_dedup(items, 2);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].url, "https://x/a");
        assert_eq!(out[1].url, "https://x/b");
    }

    #[test]
    fn same_domain_filter_respects_allow_flag() {
        let items = vec![
            raw(
                "kept local item",
                "https://gov.georgia.gov/press-releases/2026-02-04/x",
            ),
            raw(
                "external item",
                "https://cdn.example.net/press-releases/2026-02-04/y",
            ),
        ];
        let strict = same_domain_filter(items.clone(), "gov.georgia.gov", false);
        assert_eq!(strict.len(), 1);
        assert_eq!(
            strict[0].url,
            "https://gov.georgia.gov/press-releases/2026-02-04/x"
        );

        let lax = same_domain_filter(items, "gov.georgia.gov", true);
        assert_eq!(lax.len(), 2);
    }
}
