//! Pump Failure Monitor - Main Entry Point

use anyhow::Context;
use chrono::Utc;
use inference_engine::ModelBundle;
use pump_monitor::{build_report, init_logging, MonitorConfig};
use std::path::PathBuf;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = MonitorConfig::load(config_path.as_deref())?;
    init_logging(&config)?;

    info!("=== Pump Failure Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let bundle = ModelBundle::load(&config.model.dir, &config.model.artifacts)
        .context("model artifacts unavailable, cannot serve predictions")?;

    let report = build_report(&bundle, &config, Utc::now())?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
