// src/pipeline.rs
//! Pipeline wiring: detectors, classifier weights, adapter registry, and HTTP client
//! built once from a validated `AppConfig`, then one method per refresh cycle.
//!
//! Stage order is fixed: collect (all sources) → exact dedup → near dedup, which
//! leaves records in global (recency, importance) order. Near dedup needs global
//! visibility of every candidate, so it runs strictly after all sources complete.

use anyhow::Result;
use tracing::info;

use crate::board::Board;
use crate::cache::{source_set_fingerprint, ResultCache};
use crate::config::AppConfig;
use crate::dedup::dedup_similar;
use crate::detect::{CompanyDetector, StateDetector};
use crate::ingest::{self, html::AdapterRegistry, SourceReport};
use crate::model::{ArticleRecord, RecordContext};

/// Result of one refresh cycle: globally sorted records plus per-source outcomes.
#[derive(Debug)]
pub struct RefreshOutcome {
    pub records: Vec<ArticleRecord>,
    pub reports: Vec<SourceReport>,
}

pub struct Pipeline {
    cfg: AppConfig,
    states: StateDetector,
    companies: CompanyDetector,
    registry: AdapterRegistry,
    client: reqwest::Client,
}

impl Pipeline {
    /// Build all components from one validated config. Fails fast on a bad config.
    pub fn new(cfg: AppConfig) -> Result<Self> {
        let states = StateDetector::new(&cfg.states)?;
        let companies = CompanyDetector::new(&cfg.companies);
        let client = ingest::fetch::build_client(&cfg.http)?;
        Ok(Self {
            cfg,
            states,
            companies,
            registry: AdapterRegistry::with_defaults(),
            client,
        })
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn companies(&self) -> &CompanyDetector {
        &self.companies
    }

    /// One full refresh cycle against the live sources.
    pub async fn refresh(&self) -> RefreshOutcome {
        let ctx = RecordContext {
            states: &self.states,
            companies: &self.companies,
            weights: &self.cfg.weights,
        };
        let (records, reports) =
            ingest::collect_all(&self.cfg, &ctx, &self.client, &self.registry).await;

        let outcome = self.finish(records, reports);
        info!(
            records = outcome.records.len(),
            sources = outcome.reports.len(),
            failures = outcome.reports.iter().filter(|r| r.error.is_some()).count(),
            "refresh cycle complete"
        );
        outcome
    }

    /// Refresh through the TTL cache; `force` expires the current generation first.
    pub async fn refresh_cached(&self, cache: &ResultCache, force: bool) -> RefreshOutcome {
        let key = source_set_fingerprint(&self.cfg);
        if force {
            cache.invalidate(key);
        }
        if let Some(records) = cache.get(key) {
            return RefreshOutcome {
                records,
                reports: Vec::new(),
            };
        }
        let outcome = self.refresh().await;
        cache.put(key, outcome.records.clone());
        outcome
    }

    /// Post-collection stages.
    fn finish(
        &self,
        records: Vec<ArticleRecord>,
        reports: Vec<SourceReport>,
    ) -> RefreshOutcome {
        // dedup_similar sorts candidates first, so kept records come out in global order
        let records = dedup_similar(records, self.cfg.dedup.similarity_threshold);
        RefreshOutcome { records, reports }
    }

    /// Project one record generation onto the two board sections.
    pub fn board(&self, records: &[ArticleRecord]) -> Board {
        Board::build(
            records,
            &self.companies,
            self.cfg.limits.top_companies,
            self.cfg.limits.other_updates,
        )
    }
}
