// src/detect/company.rs
//! Company extraction from headline text: layered heuristics, most-precise first.
//!
//! 1. Alias table: curated priority companies, first alias substring hit wins and
//!    returns the canonical name.
//! 2. Leading token of the title, if it is not a stop word and is at least 2 chars.
//! 3. Token scan for business-entity suffixes (sector suffixes in Korean, Inc/Corp/…
//!    in English); first such token wins.
//! 4. First surviving non-stop-word token; `미상` only when nothing survives.
//!
//! The last tier is noisy on purpose; a wrong-but-plausible token beats an "Unknown"
//! bucket swallowing half the board. Detection never fails.

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::config::CompanyCfg;
use crate::textnorm::normalize;

/// Last-resort marker when no alphanumeric token survives stop-word filtering.
pub const UNIDENTIFIED_COMPANY: &str = "미상";

const MIN_TOKEN_CHARS: usize = 2;
const MAX_TOKEN_CHARS: usize = 40;

/// Sector suffixes that mark a token as a likely business-entity name.
const ENTITY_SUFFIXES: &[&str] = &[
    "산업",
    "에너지",
    "화학",
    "건설",
    "모빌리티",
    "테크",
    "소재",
    "전기",
    "전자",
    "바이오",
    "Inc",
    "Corp",
    "LLC",
    "Ltd",
];

/// Titles/roles, locations, and generic action words that must never be taken for a
/// company name. Lowercased ASCII; Korean entries as-is.
const STOP_WORDS: &[&str] = &[
    // roles & people
    "대표", "회장", "사장", "부회장", "장관", "주지사", "지사", "governor", "president",
    "ceo", "secretary", "commissioner",
    // locations & geography
    "미국", "한국", "조지아", "테네시", "앨라배마", "사우스캐롤라이나", "플로리다", "동남부",
    "usa", "america", "american", "korea", "korean", "georgia", "tennessee", "alabama",
    "carolina", "florida", "south", "county", "state", "city",
    // generic action/headline words
    "속보", "단독", "종합", "발표", "투자", "공장", "신규", "확대", "진출", "유치", "뉴스",
    "기업", "올해", "내년", "breaking", "exclusive", "new", "news", "update", "report",
    "the", "a", "an", "and", "for", "with", "announces", "announce", "announced",
    "opens", "open", "plans", "plan", "million", "billion",
];

fn token_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?u)\b\w+\b").unwrap())
}

fn is_stop_word(token: &str) -> bool {
    let lower = token.to_lowercase();
    STOP_WORDS.iter().any(|w| *w == lower)
}

/// A token usable as a company-name candidate: 2–40 chars, not a stop word.
pub(crate) fn surviving_tokens(text: &str) -> Vec<String> {
    token_re()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|t| {
            let n = t.chars().count();
            (MIN_TOKEN_CHARS..=MAX_TOKEN_CHARS).contains(&n) && !is_stop_word(t)
        })
        .collect()
}

/// ASCII aliases shorter than this match case-sensitively. "SK" must not hit the
/// "sk" inside "risk"; the real usages ("SK On", "SK하이닉스") keep the capitals.
const MIN_FOLDED_ALIAS_CHARS: usize = 3;

#[derive(Debug, Clone)]
struct CompanyEntry {
    name: String,
    /// Lowercased aliases matched against the lowercased title.
    aliases_lower: Vec<String>,
    /// Short ASCII aliases matched case-sensitively against the original title.
    aliases_exact: Vec<String>,
}

/// Alias-table + heuristic company detector built once from config.
///
/// Config order of the priority companies is ranking order and is preserved.
#[derive(Debug)]
pub struct CompanyDetector {
    companies: Vec<CompanyEntry>,
}

impl CompanyDetector {
    pub fn new(cfg: &[CompanyCfg]) -> Self {
        let companies = cfg
            .iter()
            .map(|c| {
                let mut aliases_lower = Vec::new();
                let mut aliases_exact = Vec::new();
                // The canonical name always counts as its own alias.
                for alias in std::iter::once(&c.name).chain(c.aliases.iter()) {
                    let a = normalize(alias);
                    if a.is_empty() {
                        continue;
                    }
                    if a.is_ascii() && a.chars().count() < MIN_FOLDED_ALIAS_CHARS {
                        aliases_exact.push(a);
                    } else {
                        aliases_lower.push(a.to_lowercase());
                    }
                }
                CompanyEntry {
                    name: c.name.clone(),
                    aliases_lower,
                    aliases_exact,
                }
            })
            .collect();
        Self { companies }
    }

    /// Extract a company name from a headline. Never fails; the marker is returned
    /// only when literally no token survives filtering.
    pub fn detect(&self, title: &str) -> String {
        let t = normalize(title);
        let t_lower = t.to_lowercase();

        // 1) curated alias table
        for entry in &self.companies {
            if entry
                .aliases_lower
                .iter()
                .any(|a| t_lower.contains(a.as_str()))
                || entry.aliases_exact.iter().any(|a| t.contains(a.as_str()))
            {
                return entry.name.clone();
            }
        }

        let tokens: Vec<&str> = token_re().find_iter(&t).map(|m| m.as_str()).collect();

        // 2) leading token
        if let Some(first) = tokens.first() {
            if first.chars().count() >= MIN_TOKEN_CHARS && !is_stop_word(first) {
                return (*first).to_string();
            }
        }

        // 3) entity-suffix scan
        for tok in &tokens {
            let n = tok.chars().count();
            if !(MIN_TOKEN_CHARS..=MAX_TOKEN_CHARS).contains(&n) {
                continue;
            }
            for suf in ENTITY_SUFFIXES {
                // a bare "Inc" token is not a name
                if tok.len() > suf.len() && ends_with_ignore_ascii_case(tok, suf) {
                    return (*tok).to_string();
                }
            }
        }

        // 4) first surviving non-stop-word token
        surviving_tokens(&t)
            .into_iter()
            .next()
            .unwrap_or_else(|| UNIDENTIFIED_COMPANY.to_string())
    }

    /// Whether `name` is one of the curated priority companies.
    pub fn is_priority(&self, name: &str) -> bool {
        self.companies.iter().any(|c| c.name == name)
    }

    /// Priority companies in config (ranking) order.
    pub fn priority_order(&self) -> impl Iterator<Item = &str> {
        self.companies.iter().map(|c| c.name.as_str())
    }
}

fn ends_with_ignore_ascii_case(token: &str, suffix: &str) -> bool {
    if suffix.is_ascii() {
        let n = suffix.len();
        token.len() >= n
            && token.is_char_boundary(token.len() - n)
            && token[token.len() - n..].eq_ignore_ascii_case(suffix)
    } else {
        token.ends_with(suffix)
    }
}
