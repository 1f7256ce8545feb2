// src/board.rs
//! Display-row projection and row-level predicate filters.
//!
//! The display layer renders rows; it never touches `ArticleRecord` internals.
//! Filtering here is plain predicate composition over the projected rows, matching
//! what the board UI exposes (year, state, company substring, keyword).

use serde::Serialize;

use crate::dates::display_date;
use crate::detect::CompanyDetector;
use crate::model::ArticleRecord;
use crate::rank::{other_updates, top_per_company};

/// One renderable row.
#[derive(Debug, Clone, Serialize)]
pub struct BoardRow {
    pub state: String,
    pub company: String,
    /// `YYYY.MM.DD`, empty when the date never resolved.
    pub published: String,
    /// `"[tag] core summary"`.
    pub summary: String,
    pub title: String,
    pub url: String,
    pub source_link: String,
    pub title_link: String,
}

impl BoardRow {
    pub fn from_record(rec: &ArticleRecord) -> Self {
        Self {
            state: rec.state.clone(),
            company: rec.company.clone(),
            published: display_date(rec.published_at.as_ref()),
            summary: format!("{} {}", rec.tag.label(), rec.core_summary),
            title: rec.title.clone(),
            url: rec.url.clone(),
            source_link: link_md(&rec.source_name, &rec.url),
            title_link: link_md(&rec.title, &rec.url),
        }
    }
}

/// Markdown link, the shape the board renders clickable cells from.
pub fn link_md(label: &str, url: &str) -> String {
    format!("[{label}]({url})")
}

/// The two board sections over one record generation.
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    pub top_by_company: Vec<BoardRow>,
    pub other_updates: Vec<BoardRow>,
}

impl Board {
    /// Partition globally-sorted records into the board sections.
    pub fn build(
        records: &[ArticleRecord],
        companies: &CompanyDetector,
        top_cap: usize,
        other_cap: usize,
    ) -> Self {
        Self {
            top_by_company: top_per_company(records, companies, top_cap)
                .iter()
                .map(BoardRow::from_record)
                .collect(),
            other_updates: other_updates(records, companies, other_cap)
                .iter()
                .map(BoardRow::from_record)
                .collect(),
        }
    }
}

/// User-facing row filter; `None` fields don't constrain.
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    pub year: Option<i32>,
    pub state: Option<String>,
    pub company_query: Option<String>,
    pub keyword: Option<String>,
}

/// Apply the filter predicates; rows with an empty date are excluded by a year filter.
pub fn apply_filters(rows: &[BoardRow], filter: &RowFilter) -> Vec<BoardRow> {
    rows.iter()
        .filter(|r| {
            if let Some(y) = filter.year {
                if !r.published.starts_with(&y.to_string()) {
                    return false;
                }
            }
            if let Some(st) = &filter.state {
                if &r.state != st {
                    return false;
                }
            }
            if let Some(q) = &filter.company_query {
                let q = q.trim().to_lowercase();
                if !q.is_empty()
                    && !r.company.to_lowercase().contains(&q)
                    && !r.title.to_lowercase().contains(&q)
                {
                    return false;
                }
            }
            if let Some(k) = &filter.keyword {
                let k = k.trim().to_lowercase();
                if !k.is_empty()
                    && !r.summary.to_lowercase().contains(&k)
                    && !r.title.to_lowercase().contains(&k)
                {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Tag;
    use crate::model::{identity_hash, similarity_signature, Provider};

    fn rec(title: &str, state: &str, company: &str, date: Option<&str>) -> ArticleRecord {
        ArticleRecord {
            provider: Provider::Korean,
            source_name: "Google News (KR)".into(),
            title: title.into(),
            url: "https://x/a".into(),
            published_at: date.and_then(crate::dates::parse_date),
            state: state.into(),
            company: company.into(),
            tag: Tag::Investment,
            core_summary: title.into(),
            importance_score: 10,
            identity_hash: identity_hash(Provider::Korean, title, "https://x/a"),
            similarity_signature: similarity_signature(title, company),
        }
    }

    #[test]
    fn row_projection_formats_date_summary_and_links() {
        let r = rec("현대차 조지아 공장 투자", "GA", "현대", Some("2026-02-04"));
        let row = BoardRow::from_record(&r);
        assert_eq!(row.published, "2026.02.04");
        assert_eq!(row.summary, "[신규 투자] 현대차 조지아 공장 투자");
        assert_eq!(row.source_link, "[Google News (KR)](https://x/a)");
        assert!(row.title_link.starts_with("[현대차"));
    }

    #[test]
    fn year_filter_excludes_undated_rows() {
        let rows = vec![
            BoardRow::from_record(&rec("dated item title", "GA", "현대", Some("2026-01-01"))),
            BoardRow::from_record(&rec("undated item title", "GA", "현대", None)),
        ];
        let out = apply_filters(
            &rows,
            &RowFilter {
                year: Some(2026),
                ..Default::default()
            },
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].published, "2026.01.01");
    }

    #[test]
    fn state_and_keyword_filters_compose() {
        let rows = vec![
            BoardRow::from_record(&rec("현대 조지아 배터리 공장", "GA", "현대", Some("2026-01-01"))),
            BoardRow::from_record(&rec("기아 테네시 물류 센터", "TN", "기아", Some("2026-01-02"))),
        ];
        let out = apply_filters(
            &rows,
            &RowFilter {
                state: Some("GA".into()),
                keyword: Some("배터리".into()),
                ..Default::default()
            },
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].state, "GA");

        let none = apply_filters(
            &rows,
            &RowFilter {
                state: Some("GA".into()),
                keyword: Some("물류".into()),
                ..Default::default()
            },
        );
        assert!(none.is_empty());
    }

    #[test]
    fn company_filter_matches_name_or_title_case_insensitively() {
        let rows = vec![BoardRow::from_record(&rec(
            "Hyundai weighs Georgia expansion",
            "GA",
            "현대",
            Some("2026-01-01"),
        ))];
        let by_name = apply_filters(
            &rows,
            &RowFilter {
                company_query: Some("현대".into()),
                ..Default::default()
            },
        );
        assert_eq!(by_name.len(), 1);

        let by_title = apply_filters(
            &rows,
            &RowFilter {
                company_query: Some("hyundai".into()),
                ..Default::default()
            },
        );
        assert_eq!(by_title.len(), 1);
    }
}
