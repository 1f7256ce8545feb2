// src/rank.rs
//! Global ordering and board selection.
//!
//! Global sort key: (published_at desc, importance desc). Absent dates sort as
//! `MIN_UTC`, so undated records sink without special-casing nulls anywhere else.
//!
//! Selection partitions the sorted records into the top-per-priority-company section
//! (one best record per company, ordered by priority-list position: business
//! priority, not score, decides section order) and a bounded "other updates" tail.

use std::cmp::Ordering;

use crate::dates::recency_key;
use crate::detect::CompanyDetector;
use crate::model::ArticleRecord;

/// Recency-then-importance comparison, both descending. Stable sorts keep input
/// order on full ties, which is deterministic end to end.
pub fn compare(a: &ArticleRecord, b: &ArticleRecord) -> Ordering {
    recency_key(b.published_at.as_ref())
        .cmp(&recency_key(a.published_at.as_ref()))
        .then_with(|| b.importance_score.cmp(&a.importance_score))
}

pub fn sort_records(records: &mut [ArticleRecord]) {
    records.sort_by(compare);
}

/// One representative record per priority company, in priority-list order, capped.
/// Assumes `records` are already globally sorted; the first hit per company is its
/// highest-ranked record.
pub fn top_per_company(
    records: &[ArticleRecord],
    companies: &CompanyDetector,
    cap: usize,
) -> Vec<ArticleRecord> {
    let mut out = Vec::new();
    for name in companies.priority_order() {
        if out.len() >= cap {
            break;
        }
        if let Some(rec) = records.iter().find(|r| r.company == name) {
            out.push(rec.clone());
        }
    }
    out
}

/// Non-priority records in global order, capped.
pub fn other_updates(
    records: &[ArticleRecord],
    companies: &CompanyDetector,
    cap: usize,
) -> Vec<ArticleRecord> {
    records
        .iter()
        .filter(|r| !companies.is_priority(&r.company))
        .take(cap)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Tag;
    use crate::config::CompanyCfg;
    use crate::model::{identity_hash, similarity_signature, Provider};

    fn rec(title: &str, company: &str, date: Option<&str>, score: i32) -> ArticleRecord {
        ArticleRecord {
            provider: Provider::Us,
            source_name: "Georgia.gov".into(),
            title: title.to_string(),
            url: format!("https://x/{}", title.len()),
            published_at: date.and_then(crate::dates::parse_date),
            state: "GA".into(),
            company: company.to_string(),
            tag: Tag::General,
            core_summary: title.to_string(),
            importance_score: score,
            identity_hash: identity_hash(Provider::Us, title, "u"),
            similarity_signature: similarity_signature(title, company),
        }
    }

    fn companies() -> CompanyDetector {
        CompanyDetector::new(&[
            CompanyCfg {
                name: "현대".into(),
                aliases: vec![],
            },
            CompanyCfg {
                name: "기아".into(),
                aliases: vec![],
            },
        ])
    }

    #[test]
    fn recency_beats_importance_and_undated_sinks() {
        let mut records = vec![
            rec("low score but newest", "기타", Some("2026-02-05"), 1),
            rec("high score older", "기타", Some("2026-01-05"), 99),
            rec("undated", "기타", None, 1000),
        ];
        sort_records(&mut records);
        assert_eq!(records[0].title, "low score but newest");
        assert_eq!(records[1].title, "high score older");
        assert_eq!(records[2].title, "undated");
    }

    #[test]
    fn importance_breaks_same_day_ties() {
        let mut records = vec![
            rec("weak", "기타", Some("2026-02-05"), 5),
            rec("strong", "기타", Some("2026-02-05"), 50),
        ];
        sort_records(&mut records);
        assert_eq!(records[0].title, "strong");
    }

    #[test]
    fn top_section_follows_priority_order_not_score() {
        let cos = companies();
        let mut records = vec![
            rec("기아 최신 대형 발표", "기아", Some("2026-02-05"), 80),
            rec("현대 소식", "현대", Some("2026-01-01"), 60),
            rec("현대 옛 소식", "현대", Some("2025-06-01"), 70),
        ];
        sort_records(&mut records);
        let top = top_per_company(&records, &cos, 10);
        // 현대 first (priority-list position), with its highest-ranked record
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].company, "현대");
        assert_eq!(top[0].title, "현대 소식");
        assert_eq!(top[1].company, "기아");
    }

    #[test]
    fn top_section_is_capped() {
        let cos = companies();
        let mut records = vec![
            rec("현대 소식", "현대", Some("2026-01-01"), 60),
            rec("기아 소식", "기아", Some("2026-01-02"), 60),
        ];
        sort_records(&mut records);
        assert_eq!(top_per_company(&records, &cos, 1).len(), 1);
    }

    #[test]
    fn other_updates_excludes_priority_and_prefers_recency() {
        let cos = companies();
        let mut records = vec![
            rec("현대 소식", "현대", Some("2026-02-05"), 60),
            rec("부품사 A 발표", "에이사", Some("2026-01-01"), 3),
            rec("부품사 B 발표", "비사", Some("2026-02-01"), 1),
        ];
        sort_records(&mut records);
        let rest = other_updates(&records, &cos, 10);
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].title, "부품사 B 발표");
        assert_eq!(rest[1].title, "부품사 A 발표");
    }
}
