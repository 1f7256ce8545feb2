// src/ingest/rss.rs
//! Google News search-feed adapter (Korean queries).
//!
//! One feed per configured query string, bounded entry count per feed. Entries
//! missing a title or link are skipped; `pubDate` falls back to `updated` where a
//! feed carries Atom-style fields.

use anyhow::{Context, Result};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::model::RawItem;
use crate::textnorm::{encode_query, normalize};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    updated: Option<String>,
    description: Option<String>,
}

/// Search-feed URL for one query, Korean locale pinned.
pub fn search_feed_url(query: &str) -> String {
    format!(
        "https://news.google.com/rss/search?q={}&hl=ko&gl=KR&ceid=KR:ko",
        encode_query(query)
    )
}

/// Parse a feed body into raw items, at most `limit` entries.
pub fn parse_feed(xml: &str, limit: usize) -> Result<Vec<RawItem>> {
    let t0 = std::time::Instant::now();
    let xml_clean = scrub_html_entities_for_xml(xml);
    let rss: Rss = from_str(&xml_clean).context("parsing google news rss xml")?;

    let mut out = Vec::with_capacity(rss.channel.items.len().min(limit));
    for it in rss.channel.items.into_iter().take(limit) {
        let title = normalize(it.title.as_deref().unwrap_or_default());
        let link = normalize(it.link.as_deref().unwrap_or_default());
        if title.is_empty() || link.is_empty() {
            continue;
        }
        let date_text = it
            .pub_date
            .or(it.updated)
            .map(|s| normalize(&s))
            .filter(|s| !s.is_empty());

        out.push(RawItem {
            title,
            url: link,
            date_text,
            summary: it.description,
        });
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("newsboard_parse_ms").record(ms);
    counter!("newsboard_feed_items_total").increment(out.len() as u64);
    Ok(out)
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
  <title>"현대차 조지아" - Google 뉴스</title>
  <item>
    <title>현대자동차 조지아 공장 2억달러 투자 발표</title>
    <link>https://news.example.com/articles/hyundai-ga</link>
    <pubDate>Tue, 03 Feb 2026 10:00:00 GMT</pubDate>
    <description>&lt;a href="https://news.example.com"&gt;현대자동차&lt;/a&gt; 조지아 공장 증설</description>
  </item>
  <item>
    <title>링크 없는 항목</title>
    <pubDate>Tue, 03 Feb 2026 11:00:00 GMT</pubDate>
  </item>
  <item>
    <title>기아 테네시 물류 계약</title>
    <link>https://news.example.com/articles/kia-tn</link>
    <updated>2026-02-02T09:00:00Z</updated>
  </item>
</channel></rss>"#;

    #[test]
    fn feed_url_pins_korean_locale() {
        let url = search_feed_url("현대차 조지아");
        assert!(url.starts_with("https://news.google.com/rss/search?q="));
        assert!(url.ends_with("&hl=ko&gl=KR&ceid=KR:ko"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn entries_without_link_are_skipped() {
        let items = parse_feed(FEED, 20).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "현대자동차 조지아 공장 2억달러 투자 발표");
        assert_eq!(items[0].url, "https://news.example.com/articles/hyundai-ga");
        assert!(items[0].summary.is_some());
    }

    #[test]
    fn updated_fills_in_for_missing_pubdate() {
        let items = parse_feed(FEED, 20).unwrap();
        assert_eq!(items[1].date_text.as_deref(), Some("2026-02-02T09:00:00Z"));
    }

    #[test]
    fn limit_caps_entries() {
        let items = parse_feed(FEED, 1).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn parsing_is_idempotent() {
        assert_eq!(parse_feed(FEED, 20).unwrap(), parse_feed(FEED, 20).unwrap());
    }
}
