//! Relative-momentum regime classifier
//!
//! The growth/benchmark price ratio is turned into a rate-of-change series
//! over a fixed lookback, and every defined value is compared with quantile
//! cut-offs taken over the whole defined history.
//!
//! The cut-offs see the full history, including dates after the one being
//! classified. A regime on date `t` is therefore not a point-in-time signal.

use jiff::civil::Date;
use tracing::debug;

use crate::config::MomentumConfig;
use crate::error::{AnalysisError, Result};
use crate::model::{AlignedTable, InstrumentId, MomentumSeries, Pair, RegimeTable, Thresholds};

/// Linear-interpolation quantile of unsorted values.
///
/// Uses `pos = q * (n - 1)` on the sorted values. Returns `None` for an
/// empty input; `q` is clamped to `[0, 1]`.
#[must_use]
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(quantile_sorted(&sorted, q))
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Growth over benchmark price ratio on every aligned date
pub fn relative_strength(prices: &AlignedTable, pair: &Pair) -> Result<Vec<f64>> {
    let benchmark = column(prices, &pair.benchmark)?;
    let growth = column(prices, &pair.growth)?;
    Ok(growth
        .iter()
        .zip(benchmark)
        .map(|(g, b)| g / b)
        .collect())
}

fn column<'a>(table: &'a AlignedTable, instrument: &InstrumentId) -> Result<&'a [f64]> {
    table
        .column(instrument)
        .ok_or_else(|| AnalysisError::MissingInstrumentData {
            instrument: instrument.clone(),
            reason: None,
        })
}

/// Rate-of-change momentum: `ratio[t] / ratio[t - window] - 1`.
///
/// The first `window` entries are `None`.
#[must_use]
pub fn momentum_from_ratio(dates: &[Date], ratio: &[f64], window: usize) -> MomentumSeries {
    let values = (0..ratio.len())
        .map(|t| {
            let base = t.checked_sub(window)?;
            (window > 0).then(|| ratio[t] / ratio[base] - 1.0)
        })
        .collect();
    MomentumSeries {
        dates: dates.to_vec(),
        values,
        window,
    }
}

/// Quantile cut-offs over every defined momentum value
#[must_use]
pub fn thresholds(momentum: &MomentumSeries, config: &MomentumConfig) -> Option<Thresholds> {
    let mut defined: Vec<f64> = momentum.defined().collect();
    if defined.is_empty() {
        return None;
    }
    defined.sort_by(f64::total_cmp);
    Some(Thresholds {
        strong: quantile_sorted(&defined, config.strong_quantile),
        weak: quantile_sorted(&defined, config.weak_quantile),
    })
}

/// Regime per date from a momentum series.
///
/// Without any defined momentum there are no thresholds and every date is
/// left unclassified.
#[must_use]
pub fn classify_momentum(momentum: &MomentumSeries, config: &MomentumConfig) -> RegimeTable {
    let thresholds = thresholds(momentum, config);
    let regimes = momentum
        .values
        .iter()
        .map(|m| Some(thresholds?.classify((*m)?)))
        .collect();
    RegimeTable {
        dates: momentum.dates.clone(),
        regimes,
        thresholds,
    }
}

/// Momentum and regimes for a pair from an aligned price table
pub fn classify(
    prices: &AlignedTable,
    pair: &Pair,
    config: &MomentumConfig,
) -> Result<(MomentumSeries, RegimeTable)> {
    config.validate()?;
    let ratio = relative_strength(prices, pair)?;
    let momentum = momentum_from_ratio(prices.dates(), &ratio, config.window);
    let regimes = classify_momentum(&momentum, config);

    match regimes.thresholds {
        Some(t) => debug!(
            pair = %pair,
            defined = momentum.defined_count(),
            strong = t.strong,
            weak = t.weak,
            "classified momentum regimes"
        ),
        None => debug!(
            pair = %pair,
            observations = prices.len(),
            window = config.window,
            "not enough history for momentum; all dates unclassified"
        ),
    }

    Ok((momentum, regimes))
}
