// src/dates.rs
//! Loose date resolution for feed and page date strings.
//!
//! Sources hand us anything from RFC 2822 `pubDate` values to bare `February 04, 2026`
//! page text and the numeric `MM.DD.YYYY` shape some EDO sites use. That numeric shape
//! is rearranged to ISO order before any generic parsing: month-first vs day-first is
//! locale-ambiguous and generic parsing of it cannot be trusted.
//!
//! Any parse failure yields `None`; dates without an explicit offset are assumed UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::textnorm::normalize;

fn numeric_mdy_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2})\.(\d{2})\.(\d{4})$").unwrap())
}

/// Datetime shapes tried after the well-known formats, assumed UTC.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Day-granularity shapes, parsed to midnight UTC.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

/// Parse a loosely-formatted date string into a UTC timestamp.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = normalize(raw);
    if s.is_empty() {
        return None;
    }

    // Site-specific numeric `MM.DD.YYYY`: rearrange to ISO order before parsing.
    if let Some(c) = numeric_mdy_re().captures(&s) {
        let iso = format!("{}-{}-{}", &c[3], &c[1], &c[2]);
        return NaiveDate::parse_from_str(&iso, "%Y-%m-%d")
            .ok()
            .and_then(at_midnight_utc);
    }

    // RFC 2822 (`Tue, 04 Feb 2026 09:30:00 GMT`), the usual RSS `pubDate` shape.
    // chrono accepts the obsolete named zones (GMT/UT/EST…) feeds still emit.
    if let Ok(dt) = DateTime::parse_from_rfc2822(&s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Some(dt.with_timezone(&Utc));
    }
    for f in DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(&s, f) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    for f in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(&s, f) {
            return at_midnight_utc(d);
        }
    }
    None
}

fn at_midnight_utc(d: NaiveDate) -> Option<DateTime<Utc>> {
    d.and_hms_opt(0, 0, 0).map(|ndt| Utc.from_utc_datetime(&ndt))
}

/// `YYYY.MM.DD` projection for the board; empty when no date was resolved.
pub fn display_date(dt: Option<&DateTime<Utc>>) -> String {
    dt.map(|d| d.format("%Y.%m.%d").to_string())
        .unwrap_or_default()
}

/// Recency sort key that never leaves a hole: absent dates sink to the bottom.
pub fn recency_key(dt: Option<&DateTime<Utc>>) -> DateTime<Utc> {
    dt.copied().unwrap_or(DateTime::<Utc>::MIN_UTC)
}
