// src/cache.rs
//! TTL cache around the collection entry point.
//!
//! Keyed by a fingerprint of the configured source set, storing (instant, records)
//! generations. A generation is served until its TTL elapses or it is explicitly
//! invalidated; the pipeline itself stays pure and refresh policy lives here.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::model::ArticleRecord;

/// Identity of the configured source set: queries plus source URLs, order-sensitive.
pub fn source_set_fingerprint(cfg: &AppConfig) -> u64 {
    let mut h = DefaultHasher::new();
    for q in &cfg.korean_queries {
        q.hash(&mut h);
    }
    for s in &cfg.us_sources {
        s.name.hash(&mut h);
        s.url.hash(&mut h);
        s.allow_external_domain_links.hash(&mut h);
    }
    h.finish()
}

#[derive(Debug)]
struct Generation {
    fetched_at: Instant,
    records: Vec<ArticleRecord>,
}

/// In-memory result cache; generations expire after the configured TTL.
#[derive(Debug)]
pub struct ResultCache {
    ttl: Duration,
    inner: RwLock<HashMap<u64, Generation>>,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Live generation for a source set, if any.
    pub fn get(&self, key: u64) -> Option<Vec<ArticleRecord>> {
        let guard = self.inner.read().unwrap_or_else(|p| p.into_inner());
        guard.get(&key).and_then(|generation| {
            if generation.fetched_at.elapsed() < self.ttl {
                Some(generation.records.clone())
            } else {
                None
            }
        })
    }

    /// Store a fresh generation, replacing whatever was cached for the key.
    pub fn put(&self, key: u64, records: Vec<ArticleRecord>) {
        let mut guard = self.inner.write().unwrap_or_else(|p| p.into_inner());
        guard.insert(
            key,
            Generation {
                fetched_at: Instant::now(),
                records,
            },
        );
    }

    /// Force-expire a single source set (the "refresh now" button).
    pub fn invalidate(&self, key: u64) {
        let mut guard = self.inner.write().unwrap_or_else(|p| p.into_inner());
        guard.remove(&key);
    }

    /// Force-expire everything.
    pub fn clear(&self) {
        let mut guard = self.inner.write().unwrap_or_else(|p| p.into_inner());
        guard.clear();
    }
}
