//! Command implementations behind the `tiltplan` binary

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr, bail};
use tiltplan_core::align::align;
use tiltplan_core::synthetic::demo_frames;
use tiltplan_core::{AnalysisReport, analyze_aligned};
use tracing::info;

use crate::config::AppConfig;
use crate::ingest::{load_frames, verify_all};
use crate::report::{export_json, render_text};

/// Load the configured pair from CSV files, analyse it and print the report
pub fn run(config: &AppConfig, data_dir: Option<PathBuf>, json: Option<&Path>) -> Result<AnalysisReport> {
    let analysis = &config.analysis;
    let data_dir = data_dir.unwrap_or_else(|| config.data_dir());
    info!(pair = %analysis.pair, data_dir = %data_dir.display(), "starting analysis");

    let tickers = analysis.pair.instruments();
    let frames = load_frames(&data_dir, &tickers)
        .wrap_err_with(|| format!("Failed to load prices from {}", data_dir.display()))?;
    for ticker in &tickers {
        if !frames.contains_key(ticker) {
            bail!(
                "No price file for {ticker} (expected {})",
                crate::ingest::price_file(&data_dir, ticker).display()
            );
        }
    }

    let findings = verify_all(&frames, &config.data.verify);
    let alignment = align(frames.iter()).wrap_err("Failed to align price series")?;
    let report = analyze_aligned(&alignment, analysis)
        .wrap_err_with(|| format!("Analysis of {} failed", analysis.pair))?;

    println!("{}", render_text(&report, &findings, &alignment.excluded));
    if let Some(path) = json {
        export_json(&report, path)?;
        println!("Report written to {}", path.display());
    }
    Ok(report)
}

/// Run the pipeline on a seeded synthetic SPY/QQQ pair
pub fn demo(seed: u64, days: usize, json: Option<&Path>) -> Result<AnalysisReport> {
    info!(seed, days, "starting demo analysis");

    let frames = demo_frames(seed, days).wrap_err("Failed to generate synthetic prices")?;
    let alignment = align(frames.iter()).wrap_err("Failed to align price series")?;
    let config = AppConfig::default();
    let report = analyze_aligned(&alignment, &config.analysis).wrap_err("Demo analysis failed")?;

    println!("{}", render_text(&report, &[], &alignment.excluded));
    if let Some(path) = json {
        export_json(&report, path)?;
        println!("Report written to {}", path.display());
    }
    Ok(report)
}

/// Write the default configuration, refusing to overwrite an existing file
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    AppConfig::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
