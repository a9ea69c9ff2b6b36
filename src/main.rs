//! ATE Dashboard - Normalized ATE of Heater Profiles
//!
//! Loads the treatment-effect table, builds one stacked-area chart per
//! category and serves them as a single local web page.

mod category;
mod charts;
mod config;
mod data;
mod export;
mod web;

use anyhow::Context;
use category::custom_title;
use config::Config;
use data::{DataLoader, TYPE_COL};
use export::ChartExporter;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use web::Dashboard;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config);
    tracing::debug!(?config, "configuration loaded");

    // Loaded once; everything below borrows it read-only.
    let table = DataLoader::load_csv(&config.data_path)
        .with_context(|| format!("failed to load {}", config.data_path.display()))?;
    tracing::info!(
        path = %config.data_path.display(),
        rows = table.height(),
        "loaded observation table"
    );

    let unknown: Vec<String> = DataLoader::distinct_values(&table, TYPE_COL)
        .into_iter()
        .filter(|code| custom_title(code).is_none())
        .collect();
    if !unknown.is_empty() {
        tracing::info!(codes = ?unknown, "rows with these categories are not charted");
    }

    let dashboard = Dashboard::build(&table, config.chart_width, config.chart_height)
        .context("failed to build dashboard")?;

    if let Some(dir) = &config.export_dir {
        ChartExporter::export_panels(
            dashboard.panels(),
            dir,
            config.chart_width,
            config.chart_height,
        )
        .context("failed to export charts")?;
    }

    let page = dashboard.into_html();
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    tracing::info!(url = %config.listen_url(), bytes = page.len(), "dashboard ready");

    web::serve(listener, page).await.context("server error")?;
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_directive()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
