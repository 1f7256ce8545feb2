// src/dedup.rs
//! Duplicate suppression: exact (identity hash) and near (token-set Jaccard).
//!
//! Exact dedup is a map keyed by identity hash, last write wins; repeated syndication
//! of the same (provider, title, url) carries identical content.
//!
//! Near dedup sorts candidates by (recency desc, importance desc) and keeps the first
//! representative of each cluster: a candidate whose signature reaches the similarity
//! threshold against any already-kept record is discarded. O(n²) in the kept set,
//! fine at a few hundred records per refresh.

use std::collections::{BTreeSet, HashMap};

use crate::model::ArticleRecord;
use crate::rank;

/// Exact dedup by identity hash, last write wins. First-occurrence order is kept so
/// downstream tie-breaking stays deterministic.
pub fn dedup_exact(records: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut out: Vec<ArticleRecord> = Vec::with_capacity(records.len());
    for rec in records {
        match index.get(&rec.identity_hash) {
            Some(&i) => out[i] = rec,
            None => {
                index.insert(rec.identity_hash.clone(), out.len());
                out.push(rec);
            }
        }
    }
    out
}

/// Jaccard similarity of two token sets.
///
/// Both empty → 1.0 (titles that reduce to nothing are treated as duplicates,
/// conservative). One empty → 0.0.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let inter = a.intersection(b).count();
    let union = a.len() + b.len() - inter;
    inter as f64 / union as f64
}

/// Remove near-duplicates, keeping the highest-ranked representative per cluster.
pub fn dedup_similar(mut records: Vec<ArticleRecord>, threshold: f64) -> Vec<ArticleRecord> {
    records.sort_by(rank::compare);

    let mut kept: Vec<ArticleRecord> = Vec::with_capacity(records.len());
    for rec in records {
        let duplicate = kept
            .iter()
            .any(|k| jaccard(&rec.similarity_signature, &k.similarity_signature) >= threshold);
        if !duplicate {
            kept.push(rec);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Tag;
    use crate::model::{identity_hash, similarity_signature, Provider};

    fn rec(title: &str, url: &str, date: &str, score: i32) -> ArticleRecord {
        ArticleRecord {
            provider: Provider::Korean,
            source_name: "Google News (KR)".into(),
            title: title.to_string(),
            url: url.to_string(),
            published_at: crate::dates::parse_date(date),
            state: "GA".into(),
            company: "현대".into(),
            tag: Tag::Investment,
            core_summary: title.to_string(),
            importance_score: score,
            identity_hash: identity_hash(Provider::Korean, title, url),
            similarity_signature: similarity_signature(title, "현대"),
        }
    }

    #[test]
    fn exact_dedup_is_last_write_wins() {
        let a = rec("현대 조지아 배터리 공장 착공", "https://x/a", "2026-01-01", 10);
        let mut b = a.clone();
        b.source_name = "Google News (KR) mirror".into();
        let c = rec("다른 기사 제목 입니다", "https://x/c", "2026-01-02", 5);

        let out = dedup_exact(vec![a, c.clone(), b.clone()]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].source_name, b.source_name);
        assert_eq!(out[1].identity_hash, c.identity_hash);
    }

    #[test]
    fn jaccard_edge_cases() {
        let empty = BTreeSet::new();
        let some: BTreeSet<String> = ["배터리".to_string()].into_iter().collect();
        assert_eq!(jaccard(&empty, &empty), 1.0);
        assert_eq!(jaccard(&empty, &some), 0.0);
        assert_eq!(jaccard(&some, &some), 1.0);
    }

    #[test]
    fn trailing_numeral_variants_collapse_to_the_newer_record() {
        // Same event; titles differ only in a trailing counter.
        let newer = rec(
            "현대 조지아 전기차 공장 가동 확대 12",
            "https://x/n",
            "2026-02-02",
            10,
        );
        let older = rec(
            "현대 조지아 전기차 공장 가동 확대 7",
            "https://x/o",
            "2026-02-01",
            10,
        );
        assert_eq!(newer.similarity_signature, older.similarity_signature);

        let out = dedup_similar(vec![older, newer.clone()], 0.86);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].url, newer.url);
    }

    #[test]
    fn empty_signatures_are_mutual_duplicates() {
        let a = rec("현대 1", "https://x/a", "2026-02-02", 10);
        let b = rec("현대 2 3", "https://x/b", "2026-02-01", 10);
        assert!(a.similarity_signature.is_empty());
        assert!(b.similarity_signature.is_empty());
        let out = dedup_similar(vec![a.clone(), b], 0.86);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].url, a.url);
    }

    #[test]
    fn distinct_stories_survive() {
        let a = rec("현대 조지아 전기차 공장 착공", "https://x/a", "2026-02-02", 10);
        let b = rec("현대 테네시 물류 센터 계약 체결", "https://x/b", "2026-02-01", 10);
        let out = dedup_similar(vec![a, b], 0.86);
        assert_eq!(out.len(), 2);
    }
}
