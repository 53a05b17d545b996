//! Plain-text and JSON rendering of an analysis report

use std::fmt;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use tiltplan_core::AnalysisReport;
use tiltplan_core::model::{ExcludedInstrument, InstrumentId};
use tiltplan_core::stats::PairStats;
use tracing::info;

use crate::ingest::Finding;
use crate::util::format::{format_currency, format_or_dash, format_percentage};
use crate::util::io::atomic_write;

/// Text form of a report together with the warnings gathered around it
struct TextReport<'a> {
    report: &'a AnalysisReport,
    findings: &'a [(InstrumentId, Finding)],
    excluded: &'a [ExcludedInstrument],
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_report(f, self.report, self.findings, self.excluded)
    }
}

/// Render the human-readable summary printed by the CLI.
///
/// `findings` are data verification warnings and `excluded` the instruments
/// the aligner could not use; both are listed after the figures.
pub fn render_text(
    report: &AnalysisReport,
    findings: &[(InstrumentId, Finding)],
    excluded: &[ExcludedInstrument],
) -> String {
    TextReport {
        report,
        findings,
        excluded,
    }
    .to_string()
}

fn format_ratio(value: f64) -> String {
    format!("{value:.2}")
}

fn format_correlation(value: f64) -> String {
    format!("{value:.3}")
}

fn write_report(
    out: &mut impl fmt::Write,
    report: &AnalysisReport,
    findings: &[(InstrumentId, Finding)],
    excluded: &[ExcludedInstrument],
) -> fmt::Result {
    let config = &report.config;

    writeln!(
        out,
        "Pair: {} (benchmark) / {} (growth)",
        config.pair.benchmark, config.pair.growth
    )?;
    let columns: Vec<String> = report
        .columns
        .iter()
        .map(|(id, column)| format!("{id}={}", column.label()))
        .collect();
    writeln!(out, "Close columns: {}", columns.join(", "))?;
    match (report.prices.dates().first(), report.prices.dates().last()) {
        (Some(first), Some(last)) => writeln!(
            out,
            "Aligned dates: {first} to {last} ({} days)",
            report.prices.len()
        )?,
        _ => writeln!(out, "Aligned dates: none")?,
    }

    writeln!(out)?;
    writeln!(
        out,
        "Momentum: {}-day rate of change of {}/{}",
        config.momentum.window, config.pair.growth, config.pair.benchmark
    )?;
    match &report.regimes.thresholds {
        Some(t) => writeln!(
            out,
            "Thresholds: strong > {} (q{:.2}), weak < {} (q{:.2})",
            format_percentage(t.strong),
            config.momentum.strong_quantile,
            format_percentage(t.weak),
            config.momentum.weak_quantile,
        )?,
        None => writeln!(out, "Thresholds: insufficient history, even weights used")?,
    }
    let counts = &report.regime_counts;
    writeln!(
        out,
        "Regimes: {} strong, {} neutral, {} weak, {} unclassified",
        counts.strong, counts.neutral, counts.weak, counts.unclassified
    )?;

    writeln!(out)?;
    writeln!(
        out,
        "Lump sum ({} initial, daily compounding)",
        format_currency(config.lump_sum)
    )?;
    let lump = report.lump_sum_summary.as_ref();
    if let Some(s) = lump {
        writeln!(out, "  Period:            {} to {}", s.start, s.end)?;
    }
    writeln!(
        out,
        "  Final value:       {}",
        format_or_dash(lump.map(|s| s.final_value), format_currency)
    )?;
    writeln!(
        out,
        "  Total return:      {}",
        format_or_dash(lump.map(|s| s.total_return), format_percentage)
    )?;
    writeln!(
        out,
        "  Annualized return: {}",
        format_or_dash(lump.map(|s| s.annualized_return), format_percentage)
    )?;
    writeln!(
        out,
        "  Max drawdown:      {}",
        format_or_dash(lump.map(|s| s.max_drawdown), format_percentage)
    )?;

    writeln!(out)?;
    writeln!(
        out,
        "Periodic ({} per {} period, {:?} weights)",
        format_currency(config.periodic_deposit),
        config.period.label(),
        config.aggregation
    )?;
    let periodic = report.periodic_summary.as_ref();
    if let Some(s) = periodic {
        writeln!(out, "  Period:            {} to {}", s.start, s.end)?;
        writeln!(out, "  Periods:           {}", s.periods)?;
    }
    writeln!(
        out,
        "  Total contributed: {}",
        format_or_dash(periodic.map(|s| s.total_contributed), format_currency)
    )?;
    writeln!(
        out,
        "  Final value:       {}",
        format_or_dash(periodic.map(|s| s.final_value), format_currency)
    )?;
    writeln!(
        out,
        "  Total return:      {}",
        format_or_dash(periodic.map(|s| s.total_return), format_percentage)
    )?;
    writeln!(
        out,
        "  Annualized return: {}",
        format_or_dash(periodic.map(|s| s.annualized_return), format_percentage)
    )?;

    writeln!(out)?;
    write_stats(out, &report.stats, config.stats.risk_free_rate)?;

    if !excluded.is_empty() || !findings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Warnings:")?;
        for e in excluded {
            writeln!(out, "  {}: excluded, {}", e.instrument, e.reason.describe())?;
        }
        for (instrument, finding) in findings {
            writeln!(out, "  {instrument}: {finding}")?;
        }
    }

    Ok(())
}

fn write_stats(out: &mut impl fmt::Write, stats: &PairStats, risk_free_rate: f64) -> fmt::Result {
    writeln!(
        out,
        "Risk ({} risk-free rate)",
        format_percentage(risk_free_rate)
    )?;
    writeln!(
        out,
        "  {:<8} {:>10} {:>10} {:>7} {:>10} {:>7} {:>7}",
        "", "Return", "Volatility", "Sharpe", "Drawdown", "Skew", "Kurt"
    )?;
    for r in &stats.risk {
        writeln!(
            out,
            "  {:<8} {:>10} {:>10} {:>7} {:>10} {:>7} {:>7}",
            r.instrument.as_str(),
            format_percentage(r.annual_return),
            format_percentage(r.annual_volatility),
            format_or_dash(r.sharpe_ratio, format_ratio),
            format_percentage(r.max_drawdown),
            format_or_dash(r.skewness, format_ratio),
            format_or_dash(r.kurtosis, format_ratio),
        )?;
    }

    writeln!(
        out,
        "Correlation: {} full sample",
        format_or_dash(stats.correlation, format_correlation)
    )?;
    let rolling = &stats.rolling_correlation;
    match rolling.latest() {
        Some((date, value)) => writeln!(
            out,
            "  {}-day rolling: {} on {date}",
            rolling.window,
            format_correlation(value)
        )?,
        None => writeln!(out, "  {}-day rolling: -", rolling.window)?,
    }
    for (id, vol) in &stats.rolling_volatility {
        writeln!(
            out,
            "  {id} {}-day volatility: {}",
            vol.window,
            format_or_dash(vol.latest().map(|(_, v)| v), format_percentage)
        )?;
    }
    Ok(())
}

/// Serialize every output of the report as pretty JSON
pub fn to_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).wrap_err("Failed to serialize report")
}

/// Write the JSON export atomically
pub fn export_json(report: &AnalysisReport, path: &Path) -> Result<()> {
    let json = to_json(report)?;
    atomic_write(path, &json)
        .wrap_err_with(|| format!("Failed to write report {}", path.display()))?;

    info!(path = %path.display(), bytes = json.len(), "exported report");
    Ok(())
}
