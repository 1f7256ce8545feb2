// src/classify.rs
//! Keyword-rule topic tagging and additive importance scoring.
//!
//! Tagging checks five ordered keyword sets; the first set with a hit wins and the
//! default is `General`. Scoring is a tunable point model, but the ordering invariant
//! is a hard contract: priority-company weight outranks any tag weight plus the
//! provenance bonus, and every non-general tag weight outranks the bonus. The exact
//! numbers live in config; `ScoreWeights::validate` rejects assignments that break
//! the invariant.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::model::Provider;
use crate::textnorm::normalize;

/// Closed classification set; display labels are the Korean board labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Policy,
    Investment,
    Deal,
    Capital,
    Sales,
    General,
}

impl Tag {
    pub fn label(&self) -> &'static str {
        match self {
            Tag::Policy => "[정책/지원]",
            Tag::Investment => "[신규 투자]",
            Tag::Deal => "[수주/계약]",
            Tag::Capital => "[자본/공시]",
            Tag::Sales => "[실적/발표]",
            Tag::General => "[일반]",
        }
    }
}

// Ordered: policy/government evidence outranks investment, which outranks
// deal/contract, capital/disclosure, sales/performance.
const POLICY_KEYWORDS: &[&str] = &[
    "정책", "보조금", "지원금", "세제", "인센티브", "세액공제", "행정명령", "governor",
    "policy", "grant", "incentive", "legislation", "tax credit", "executive order",
];
const INVESTMENT_KEYWORDS: &[&str] = &[
    "투자", "공장", "증설", "착공", "신설", "설비", "신공장", "investment", "invest",
    "expansion", "expand", "plant", "facility", "factory", "breaks ground",
    "groundbreaking",
];
const DEAL_KEYWORDS: &[&str] = &[
    "수주", "계약", "공급", "납품", "협약", "mou", "contract", "deal", "supply",
    "agreement", "partnership", "order",
];
const CAPITAL_KEYWORDS: &[&str] = &[
    "유상증자", "공시", "지분", "인수", "합병", "상장", "ipo", "disclosure", "stake",
    "acquisition", "merger", "shares", "listing",
];
const SALES_KEYWORDS: &[&str] = &[
    "실적", "매출", "영업이익", "분기", "earnings", "revenue", "profit", "sales",
    "quarterly",
];

const TAG_RULES: &[(Tag, &[&str])] = &[
    (Tag::Policy, POLICY_KEYWORDS),
    (Tag::Investment, INVESTMENT_KEYWORDS),
    (Tag::Deal, DEAL_KEYWORDS),
    (Tag::Capital, CAPITAL_KEYWORDS),
    (Tag::Sales, SALES_KEYWORDS),
];

/// Classify a headline into the closed tag set; first matching set wins.
pub fn classify_tag(text: &str) -> Tag {
    let t = normalize(text).to_lowercase();
    for (tag, keywords) in TAG_RULES {
        if keywords.iter().any(|k| t.contains(k)) {
            return *tag;
        }
    }
    Tag::General
}

/// Additive importance weights. The numbers are policy, the ordering is contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub priority_company: i32,
    pub tag_policy: i32,
    pub tag_investment: i32,
    pub tag_deal: i32,
    pub tag_capital: i32,
    pub tag_sales: i32,
    pub tag_general: i32,
    /// Native-language feeds carry usable summaries; HTML listings don't.
    pub korean_source_bonus: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            priority_company: 50,
            tag_policy: 5,
            tag_investment: 12,
            tag_deal: 10,
            tag_capital: 8,
            tag_sales: 6,
            tag_general: 0,
            korean_source_bonus: 2,
        }
    }
}

impl ScoreWeights {
    pub fn tag_weight(&self, tag: Tag) -> i32 {
        match tag {
            Tag::Policy => self.tag_policy,
            Tag::Investment => self.tag_investment,
            Tag::Deal => self.tag_deal,
            Tag::Capital => self.tag_capital,
            Tag::Sales => self.tag_sales,
            Tag::General => self.tag_general,
        }
    }

    fn max_tag_weight(&self) -> i32 {
        [
            self.tag_policy,
            self.tag_investment,
            self.tag_deal,
            self.tag_capital,
            self.tag_sales,
            self.tag_general,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Enforce the ordering invariant: priority > tag > provenance bonus.
    pub fn validate(&self) -> Result<()> {
        if self.priority_company <= self.max_tag_weight() + self.korean_source_bonus {
            bail!(
                "priority_company weight ({}) must outrank every tag weight plus the source bonus",
                self.priority_company
            );
        }
        let min_tagged = [
            self.tag_policy,
            self.tag_investment,
            self.tag_deal,
            self.tag_capital,
            self.tag_sales,
        ]
        .into_iter()
        .min()
        .unwrap_or(0);
        if min_tagged <= self.korean_source_bonus {
            bail!(
                "every non-general tag weight must outrank the source bonus ({})",
                self.korean_source_bonus
            );
        }
        if self.korean_source_bonus < 0 || self.tag_general < 0 {
            bail!("weights must be non-negative");
        }
        Ok(())
    }

    /// Additive importance score for a built record.
    pub fn score(&self, is_priority_company: bool, tag: Tag, provider: Provider) -> i32 {
        let mut score = self.tag_weight(tag);
        if is_priority_company {
            score += self.priority_company;
        }
        if provider == Provider::Korean {
            score += self.korean_source_bonus;
        }
        score
    }
}
