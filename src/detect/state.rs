// src/detect/state.rs
//! State inference from headline text and source URL.
//!
//! Ordered strategy, first match wins:
//! 1. Full names/aliases per state code, case-insensitive substring (Korean included).
//! 2. The two-letter code as an isolated token: neighbors must not be letters/digits,
//!    so "GA" inside "MEGA" never matches.
//! 3. Source-URL host against the per-state domain list (state-government sites rarely
//!    name their own state in a headline).
//! 4. `"Global"`.
//!
//! Abbreviations are demoted below full-name and domain evidence on purpose: two-letter
//! codes are highly ambiguous in free text.

use anyhow::{Context, Result};
use regex::Regex;
use url::Url;

use crate::config::StateCfg;
use crate::textnorm::normalize;

/// Catch-all code for records with no regional evidence.
pub const GLOBAL_STATE: &str = "Global";

#[derive(Debug)]
struct CompiledState {
    code: String,
    names_lower: Vec<String>,
    abbrev_re: Regex,
    domains: Vec<String>,
}

/// Compiled state matcher built once from config.
#[derive(Debug)]
pub struct StateDetector {
    states: Vec<CompiledState>,
}

impl StateDetector {
    pub fn new(cfg: &[StateCfg]) -> Result<Self> {
        let mut states = Vec::with_capacity(cfg.len());
        for st in cfg {
            // Uppercase exact, isolated on both sides. `(?u)` so Hangul neighbors
            // count as letters too.
            let pattern = format!(
                r"(?u)(?:^|[^\p{{L}}\p{{N}}]){}(?:[^\p{{L}}\p{{N}}]|$)",
                regex::escape(&st.code)
            );
            let abbrev_re = Regex::new(&pattern)
                .with_context(|| format!("compiling abbreviation pattern for {}", st.code))?;
            states.push(CompiledState {
                code: st.code.clone(),
                names_lower: st
                    .names
                    .iter()
                    .map(|n| normalize(n).to_lowercase())
                    .filter(|n| !n.is_empty())
                    .collect(),
                abbrev_re,
                domains: st
                    .domains
                    .iter()
                    .map(|d| d.trim().to_lowercase())
                    .filter(|d| !d.is_empty())
                    .collect(),
            });
        }
        Ok(Self { states })
    }

    /// Infer a state code from free text plus the article's source URL.
    pub fn detect(&self, text: &str, source_url: Option<&str>) -> String {
        let t = normalize(text);
        let t_lower = t.to_lowercase();

        for st in &self.states {
            if st.names_lower.iter().any(|n| t_lower.contains(n.as_str())) {
                return st.code.clone();
            }
        }

        for st in &self.states {
            if st.abbrev_re.is_match(&t) {
                return st.code.clone();
            }
        }

        if let Some(host) = source_url.and_then(host_of) {
            for st in &self.states {
                if st.domains.iter().any(|d| host_matches(&host, d)) {
                    return st.code.clone();
                }
            }
        }

        GLOBAL_STATE.to_string()
    }
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> StateDetector {
        let cfg = vec![
            StateCfg {
                code: "GA".into(),
                names: vec!["Georgia".into(), "조지아".into()],
                domains: vec!["georgia.gov".into(), "georgia.org".into()],
            },
            StateCfg {
                code: "TN".into(),
                names: vec!["Tennessee".into(), "테네시".into()],
                domains: vec!["tn.gov".into(), "tnecd.com".into()],
            },
        ];
        StateDetector::new(&cfg).unwrap()
    }

    #[test]
    fn full_name_matches_any_case() {
        let d = detector();
        assert_eq!(d.detect("New plant announced in GEORGIA today", None), "GA");
        assert_eq!(d.detect("현대차 조지아 공장 착공", None), "GA");
        assert_eq!(d.detect("Supplier expands in tennessee", None), "TN");
    }

    #[test]
    fn abbreviation_needs_token_isolation() {
        let d = detector();
        assert_eq!(d.detect("MEGA deal closes overseas", None), "Global");
        assert_eq!(d.detect("Battery maker picks GA site", None), "GA");
        assert_eq!(d.detect("Savannah, GA: port volume up", None), "GA");
        // lowercase letters still count as adjacency
        assert_eq!(d.detect("omegaGAs pipeline", None), "Global");
    }

    #[test]
    fn full_names_win_over_abbreviations() {
        let d = detector();
        // "Tennessee" (tier 1) beats the isolated "GA" token (tier 2).
        assert_eq!(d.detect("Tennessee supplier ships to GA", None), "TN");
    }

    #[test]
    fn domain_fallback_applies_only_without_text_evidence() {
        let d = detector();
        assert_eq!(
            d.detect(
                "Governor announces 400 new jobs",
                Some("https://gov.georgia.gov/press-releases/2026-02-04/x")
            ),
            "GA"
        );
        // Text evidence outranks the host.
        assert_eq!(
            d.detect(
                "Tennessee supplier announcement",
                Some("https://gov.georgia.gov/press-releases/2026-02-04/x")
            ),
            "TN"
        );
    }

    #[test]
    fn no_evidence_is_global() {
        let d = detector();
        assert_eq!(d.detect("수출 호조에 실적 개선", None), "Global");
        assert_eq!(d.detect("Quarterly results beat forecast", Some("https://news.example.com/a")), "Global");
    }
}
