//! Newsboard binary entrypoint.
//! Runs one refresh cycle against the configured sources and prints the board
//! sections as plain text; the interactive surface lives elsewhere.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use southeast_newsboard::board::BoardRow;
use southeast_newsboard::{AppConfig, Pipeline};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn print_section(heading: &str, rows: &[BoardRow]) {
    println!("== {heading} ({}건) ==", rows.len());
    for row in rows {
        println!(
            "{:10}  {:4}  {:12}  {}",
            row.published, row.state, row.company, row.summary
        );
        println!("            {}", row.url);
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op elsewhere. Enables NEWSBOARD_CONFIG_PATH.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::load_default()?;
    let pipeline = Pipeline::new(cfg)?;

    let outcome = pipeline.refresh().await;
    for report in &outcome.reports {
        match &report.error {
            Some(err) => tracing::warn!(source = %report.source, %err, "source skipped"),
            None => tracing::info!(source = %report.source, items = report.items, "source ok"),
        }
    }

    let board = pipeline.board(&outcome.records);
    if std::env::var("NEWSBOARD_JSON").ok().as_deref() == Some("1") {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        print_section("주요 기업 동향", &board.top_by_company);
        print_section("기타 업데이트", &board.other_updates);
    }

    Ok(())
}
