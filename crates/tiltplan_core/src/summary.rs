//! Performance summaries of simulated value series

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::model::ValueSeries;
use crate::simulation::PeriodicSimulation;

/// Observations per year used to annualize daily series
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Summary of the lump-sum simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LumpSumSummary {
    pub initial: f64,
    pub final_value: f64,
    /// `final / initial - 1`
    pub total_return: f64,
    pub annualized_return: f64,
    /// Largest peak-to-trough fall, as a positive fraction of the peak
    pub max_drawdown: f64,
    pub observations: usize,
    pub start: Date,
    pub end: Date,
}

/// Summary of the periodic-contribution simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodicSummary {
    pub deposit: f64,
    pub total_contributed: f64,
    pub final_value: f64,
    /// `final / contributed - 1`
    pub total_return: f64,
    pub annualized_return: f64,
    pub periods: usize,
    pub start: Date,
    pub end: Date,
}

/// Annualize a total return earned over `observations` steps.
///
/// `(1 + total)^(per_year / observations) - 1`; `None` without observations
/// or when `1 + total` is negative.
#[must_use]
pub fn annualize(total_return: f64, observations: usize, per_year: f64) -> Option<f64> {
    let growth = 1.0 + total_return;
    if observations == 0 || growth < 0.0 {
        return None;
    }
    Some(growth.powf(per_year / observations as f64) - 1.0)
}

/// Largest relative fall from a running peak.
///
/// `start` seeds the peak, so a loss right after the deposit counts.
#[must_use]
pub fn max_drawdown(start: f64, values: &[f64]) -> f64 {
    let mut peak = start;
    let mut worst = 0.0_f64;
    for &v in values {
        peak = peak.max(v);
        if peak > 0.0 {
            worst = worst.max((peak - v) / peak);
        }
    }
    worst
}

/// Summarize a lump-sum value series.
///
/// `None` when the series is empty or the deposit is not positive.
#[must_use]
pub fn summarize_lump_sum(values: &ValueSeries, initial: f64) -> Option<LumpSumSummary> {
    let (start, _) = values.first()?;
    let (end, final_value) = values.last()?;
    if initial <= 0.0 {
        return None;
    }
    let total_return = final_value / initial - 1.0;
    Some(LumpSumSummary {
        initial,
        final_value,
        total_return,
        annualized_return: annualize(total_return, values.len(), TRADING_DAYS_PER_YEAR)?,
        max_drawdown: max_drawdown(initial, &values.values),
        observations: values.len(),
        start,
        end,
    })
}

/// Summarize a periodic simulation.
///
/// `None` when no period was simulated or nothing was contributed.
#[must_use]
pub fn summarize_periodic(sim: &PeriodicSimulation, per_year: f64) -> Option<PeriodicSummary> {
    let (start, _) = sim.values.first()?;
    let (end, final_value) = sim.values.last()?;
    let total_contributed = sim.total_contributed();
    if total_contributed <= 0.0 {
        return None;
    }
    let total_return = final_value / total_contributed - 1.0;
    Some(PeriodicSummary {
        deposit: sim.deposit,
        total_contributed,
        final_value,
        total_return,
        annualized_return: annualize(total_return, sim.values.len(), per_year)?,
        periods: sim.values.len(),
        start,
        end,
    })
}
