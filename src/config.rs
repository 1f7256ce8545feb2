// src/config.rs
//! Board configuration: one explicit struct built at startup and passed by reference
//! into every detector/classifier/adapter. No module-level globals.
//!
//! Loaded from TOML. Path resolution: `$NEWSBOARD_CONFIG_PATH`, then
//! `config/newsboard.toml`. Missing or invalid configuration fails fast with a
//! contextual error; everything downstream assumes a validated config.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::classify::ScoreWeights;

pub const DEFAULT_CONFIG_PATH: &str = "config/newsboard.toml";
pub const ENV_CONFIG_PATH: &str = "NEWSBOARD_CONFIG_PATH";

/// One tracked state: code, recognized full names, and known government/EDO domains.
#[derive(Debug, Clone, Deserialize)]
pub struct StateCfg {
    pub code: String,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub domains: Vec<String>,
}

/// One priority company: canonical display name plus textual variants.
/// List order in config is ranking order on the board.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyCfg {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// One HTML source descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceCfg {
    pub name: String,
    pub url: String,
    /// Keep links pointing off the source's own domain (syndication hubs need this).
    #[serde(default)]
    pub allow_external_domain_links: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// RSS entries consumed per Korean query.
    pub per_query: usize,
    /// Items extracted per HTML source page.
    pub per_source: usize,
    /// Cap on the top-per-company section.
    pub top_companies: usize,
    /// Cap on the "other updates" tail.
    pub other_updates: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            per_query: 20,
            per_source: 30,
            top_companies: 10,
            other_updates: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DedupCfg {
    /// Jaccard threshold at or above which a candidate is a near-duplicate.
    pub similarity_threshold: f64,
}

impl Default for DedupCfg {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.86,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpCfg {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpCfg {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: "Mozilla/5.0 (SoutheastNewsBoard/1.0)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheCfg {
    /// Collected generations expire after this many seconds.
    pub ttl_secs: u64,
}

impl Default for CacheCfg {
    fn default() -> Self {
        Self { ttl_secs: 30 * 60 }
    }
}

/// The whole board configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub states: Vec<StateCfg>,
    #[serde(default)]
    pub companies: Vec<CompanyCfg>,
    #[serde(default)]
    pub korean_queries: Vec<String>,
    #[serde(default)]
    pub us_sources: Vec<SourceCfg>,
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub dedup: DedupCfg,
    #[serde(default)]
    pub http: HttpCfg,
    #[serde(default)]
    pub cache: CacheCfg,
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: AppConfig = toml::from_str(s).context("parsing newsboard config TOML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Load using `$NEWSBOARD_CONFIG_PATH`, falling back to `config/newsboard.toml`.
    pub fn load_default() -> Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from(&path)
    }

    fn validate(&self) -> Result<()> {
        if self.states.is_empty() {
            bail!("config: at least one state must be configured");
        }
        let mut codes: Vec<&str> = self.states.iter().map(|s| s.code.as_str()).collect();
        codes.sort_unstable();
        let before = codes.len();
        codes.dedup();
        if codes.len() != before {
            bail!("config: duplicate state codes");
        }
        if self.states.iter().any(|s| s.code.trim().is_empty()) {
            bail!("config: empty state code");
        }
        if self.companies.iter().any(|c| c.name.trim().is_empty()) {
            bail!("config: empty company name");
        }
        if self.korean_queries.is_empty() && self.us_sources.is_empty() {
            bail!("config: no queries and no sources, nothing to ingest");
        }
        for src in &self.us_sources {
            Url::parse(&src.url)
                .with_context(|| format!("config: invalid source url for {}", src.name))?;
        }
        if !(0.0..=1.0).contains(&self.dedup.similarity_threshold) {
            bail!("config: similarity_threshold must be within [0, 1]");
        }
        if self.http.timeout_secs == 0 {
            bail!("config: timeout_secs must be positive");
        }
        self.weights.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        korean_queries = ["현대차 조지아"]

        [[states]]
        code = "GA"
        names = ["Georgia", "조지아"]
        domains = ["georgia.gov"]

        [[companies]]
        name = "현대"
        aliases = ["Hyundai", "현대자동차"]
    "#;

    #[test]
    fn minimal_config_parses_with_defaults() {
        let cfg = AppConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(cfg.states[0].code, "GA");
        assert_eq!(cfg.limits.per_query, 20);
        assert_eq!(cfg.dedup.similarity_threshold, 0.86);
        assert_eq!(cfg.cache.ttl_secs, 1800);
        assert!(cfg.http.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn nothing_to_ingest_is_rejected() {
        let toml = r#"
            [[states]]
            code = "GA"
        "#;
        assert!(AppConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn invalid_source_url_is_rejected() {
        let toml = r#"
            korean_queries = ["x"]

            [[states]]
            code = "GA"

            [[us_sources]]
            name = "Broken"
            url = "not a url"
        "#;
        assert!(AppConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn weight_invariant_is_enforced_at_load() {
        let toml = r#"
            korean_queries = ["x"]

            [[states]]
            code = "GA"

            [weights]
            priority_company = 1
        "#;
        assert!(AppConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let toml = r#"
            korean_queries = ["x"]

            [[states]]
            code = "GA"

            [dedup]
            similarity_threshold = 1.5
        "#;
        assert!(AppConfig::from_toml_str(toml).is_err());
    }
}
