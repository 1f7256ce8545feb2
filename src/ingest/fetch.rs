// src/ingest/fetch.rs
//! Shared outbound HTTP: one client, fixed user agent, bounded timeout.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::config::HttpCfg;

pub fn build_client(http: &HttpCfg) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(http.user_agent.clone())
        .timeout(Duration::from_secs(http.timeout_secs))
        .build()
        .context("building http client")
}

/// GET a page/feed body as text. Non-success statuses are errors.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?;
    let resp = resp
        .error_for_status()
        .with_context(|| format!("status for {url}"))?;
    resp.text()
        .await
        .with_context(|| format!("reading body of {url}"))
}
