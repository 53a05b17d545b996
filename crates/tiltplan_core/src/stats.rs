//! Risk and co-movement statistics of the aligned pair
//!
//! All figures are computed on the same aligned tables the simulators use:
//! - Per-instrument risk: annualized mean return and volatility, Sharpe
//!   ratio, price drawdown, skewness and excess kurtosis
//! - Full-sample and rolling correlation of the two daily return columns
//! - Rolling annualized volatility of each return column
//!
//! Dispersion uses the sample (n - 1) estimator. A rolling value at row `t`
//! covers rows `t + 1 - window ..= t` and is `None` until a full window exists
//! or when a window has no variance.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StatsConfig;
use crate::model::{AlignedTable, InstrumentId, Pair};
use crate::summary::{TRADING_DAYS_PER_YEAR, max_drawdown};

/// A statistic evaluated over a trailing window of rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingSeries {
    pub dates: Vec<Date>,
    pub values: Vec<Option<f64>>,
    pub window: usize,
}

impl RollingSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Most recent defined value and its date
    #[must_use]
    pub fn latest(&self) -> Option<(Date, f64)> {
        self.dates
            .iter()
            .zip(&self.values)
            .rev()
            .find_map(|(d, v)| v.map(|v| (*d, v)))
    }
}

/// Risk profile of one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRisk {
    pub instrument: InstrumentId,
    /// Mean daily return times 252
    pub annual_return: f64,
    /// Sample standard deviation of daily returns times sqrt(252)
    pub annual_volatility: f64,
    /// `(annual_return - risk_free_rate) / annual_volatility`
    pub sharpe_ratio: Option<f64>,
    /// Largest peak-to-trough fall of the price, as a positive fraction
    pub max_drawdown: f64,
    pub skewness: Option<f64>,
    /// Excess kurtosis (0 for a normal distribution)
    pub kurtosis: Option<f64>,
}

/// Statistics of the pair attached to every analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairStats {
    /// Benchmark first, then growth
    pub risk: Vec<InstrumentRisk>,
    /// Correlation of the daily returns over the whole aligned history
    pub correlation: Option<f64>,
    pub rolling_correlation: RollingSeries,
    /// Rolling annualized volatility per instrument, benchmark first
    pub rolling_volatility: Vec<(InstrumentId, RollingSeries)>,
}

#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation; `None` below two values
#[must_use]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Pearson correlation of two equally long slices.
///
/// `None` for fewer than two points, mismatched lengths, or a constant input.
#[must_use]
pub fn correlation(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.len() < 2 {
        return None;
    }
    let ma = mean(a)?;
    let mb = mean(b)?;
    let (mut cov, mut va, mut vb) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - ma, y - mb);
        cov += dx * dy;
        va += dx * dx;
        vb += dy * dy;
    }
    if va <= 0.0 || vb <= 0.0 {
        return None;
    }
    Some((cov / (va * vb).sqrt()).clamp(-1.0, 1.0))
}

/// Bias-adjusted sample skewness; `None` below three values or without variance
#[must_use]
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    if values.len() < 3 {
        return None;
    }
    let (m, s) = (mean(values)?, sample_std(values)?);
    if s <= 0.0 {
        return None;
    }
    let cubed: f64 = values.iter().map(|v| ((v - m) / s).powi(3)).sum();
    Some(n / ((n - 1.0) * (n - 2.0)) * cubed)
}

/// Bias-adjusted excess kurtosis; `None` below four values or without variance
#[must_use]
pub fn excess_kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    if values.len() < 4 {
        return None;
    }
    let (m, s) = (mean(values)?, sample_std(values)?);
    if s <= 0.0 {
        return None;
    }
    let fourth: f64 = values.iter().map(|v| ((v - m) / s).powi(4)).sum();
    let scale = n * (n + 1.0) / ((n - 1.0) * (n - 2.0) * (n - 3.0));
    let bias = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    Some(scale * fourth - bias)
}

/// Apply `f` to every full trailing window
fn rolling(
    dates: &[Date],
    len: usize,
    window: usize,
    f: impl Fn(std::ops::Range<usize>) -> Option<f64>,
) -> RollingSeries {
    let values = (0..len)
        .map(|t| {
            if window == 0 || t + 1 < window {
                None
            } else {
                f(t + 1 - window..t + 1)
            }
        })
        .collect();
    RollingSeries {
        dates: dates[..len].to_vec(),
        values,
        window,
    }
}

/// Trailing-window correlation of two return columns
#[must_use]
pub fn rolling_correlation(dates: &[Date], a: &[f64], b: &[f64], window: usize) -> RollingSeries {
    let len = dates.len().min(a.len()).min(b.len());
    rolling(dates, len, window, |r| correlation(&a[r.clone()], &b[r]))
}

/// Trailing-window annualized volatility of one return column
#[must_use]
pub fn rolling_volatility(dates: &[Date], returns: &[f64], window: usize) -> RollingSeries {
    let len = dates.len().min(returns.len());
    rolling(dates, len, window, |r| {
        sample_std(&returns[r]).map(|s| s * TRADING_DAYS_PER_YEAR.sqrt())
    })
}

/// Risk profile from one instrument's daily returns and prices.
///
/// `None` when there are fewer than two returns.
#[must_use]
pub fn instrument_risk(
    instrument: InstrumentId,
    returns: &[f64],
    prices: &[f64],
    risk_free_rate: f64,
) -> Option<InstrumentRisk> {
    let annual_return = mean(returns)? * TRADING_DAYS_PER_YEAR;
    let annual_volatility = sample_std(returns)? * TRADING_DAYS_PER_YEAR.sqrt();
    let sharpe_ratio =
        (annual_volatility > 0.0).then(|| (annual_return - risk_free_rate) / annual_volatility);
    let max_drawdown = prices
        .first()
        .map_or(0.0, |&first| max_drawdown(first, prices));
    Some(InstrumentRisk {
        instrument,
        annual_return,
        annual_volatility,
        sharpe_ratio,
        max_drawdown,
        skewness: skewness(returns),
        kurtosis: excess_kurtosis(returns),
    })
}

/// Every pair statistic over aligned prices and returns.
///
/// Both tables must hold the pair's columns; instruments missing from either
/// are left out of `risk` and `rolling_volatility`.
#[must_use]
pub fn pair_stats(
    prices: &AlignedTable,
    returns: &AlignedTable,
    pair: &Pair,
    config: &StatsConfig,
) -> PairStats {
    let dates = returns.dates();
    let instruments = pair.instruments();

    let mut risk = Vec::with_capacity(2);
    let mut rolling_volatility = Vec::with_capacity(2);
    for id in &instruments {
        let (Some(r), Some(p)) = (returns.column(id), prices.column(id)) else {
            continue;
        };
        if let Some(profile) = instrument_risk(id.clone(), r, p, config.risk_free_rate) {
            risk.push(profile);
        }
        rolling_volatility.push((
            id.clone(),
            self::rolling_volatility(dates, r, config.volatility_window),
        ));
    }

    let columns = (returns.column(&pair.benchmark), returns.column(&pair.growth));
    let (correlation, rolling_correlation) = match columns {
        (Some(a), Some(b)) => (
            self::correlation(a, b),
            self::rolling_correlation(dates, a, b, config.correlation_window),
        ),
        _ => (None, rolling(dates, dates.len(), config.correlation_window, |_| None)),
    };

    debug!(
        pair = %pair,
        correlation,
        rolling_points = rolling_correlation.values.iter().flatten().count(),
        "computed pair statistics"
    );

    PairStats {
        risk,
        correlation,
        rolling_correlation,
        rolling_volatility,
    }
}
