//! End-to-end pairwise analysis
//!
//! `analyze` runs every stage for one benchmark/growth pair:
//! alignment, momentum classification, weight scheduling, both simulators and
//! their summaries. `analyze_batch` does the same for many independent pairs
//! over one shared set of raw frames.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::align::{Alignment, align};
use crate::config::AnalysisConfig;
use crate::error::{AlignError, AnalysisError, Result};
use crate::model::{
    AlignedTable, ExcludedInstrument, InstrumentId, MomentumSeries, Pair, PriceColumn,
    RawPriceFrame, RegimeCounts, RegimeTable, ValueSeries, WeightSchedule,
};
use crate::momentum::classify;
use crate::schedule::schedule;
use crate::simulation::{PeriodicSimulation, simulate_lump_sum, simulate_periodic};
use crate::stats::{PairStats, pair_stats};
use crate::summary::{LumpSumSummary, PeriodicSummary, summarize_lump_sum, summarize_periodic};

/// Raw price frames keyed by instrument
pub type RawFrames = FxHashMap<InstrumentId, RawPriceFrame>;

/// Every output of one pairwise analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub config: AnalysisConfig,
    /// Close column used per instrument
    pub columns: Vec<(InstrumentId, PriceColumn)>,
    /// Aligned close prices, benchmark column first
    pub prices: AlignedTable,
    /// Aligned daily simple returns
    pub returns: AlignedTable,
    pub momentum: MomentumSeries,
    pub regimes: RegimeTable,
    pub regime_counts: RegimeCounts,
    /// Target weights per price date
    pub daily_weights: WeightSchedule,
    pub lump_sum: ValueSeries,
    pub periodic: PeriodicSimulation,
    pub lump_sum_summary: Option<LumpSumSummary>,
    pub periodic_summary: Option<PeriodicSummary>,
    /// Risk, correlation and rolling statistics of the pair
    pub stats: PairStats,
}

impl AnalysisReport {
    #[must_use]
    pub fn pair(&self) -> &Pair {
        &self.config.pair
    }
}

/// Run the full pipeline for the configured pair.
///
/// Only the two instruments of the pair are aligned; any other frames in
/// `raw` are ignored. Fails when either instrument is absent or unusable.
pub fn analyze(raw: &RawFrames, config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;
    let pair = &config.pair;

    let mut frames = Vec::with_capacity(2);
    for id in [&pair.benchmark, &pair.growth] {
        let frame = raw
            .get(id)
            .ok_or_else(|| AnalysisError::MissingInstrumentData {
                instrument: id.clone(),
                reason: None,
            })?;
        frames.push((id, frame));
    }

    let alignment = align(frames).map_err(|err| match err {
        AlignError::NoUsableData { excluded } => first_missing(pair, &excluded)
            .unwrap_or(AnalysisError::Align(AlignError::NoUsableData { excluded })),
        other => AnalysisError::Align(other),
    })?;
    if let Some(err) = first_missing(pair, &alignment.excluded) {
        return Err(err);
    }

    analyze_aligned(&alignment, config)
}

/// The pair member reported as missing, benchmark first
fn first_missing(pair: &Pair, excluded: &[ExcludedInstrument]) -> Option<AnalysisError> {
    [&pair.benchmark, &pair.growth].into_iter().find_map(|id| {
        excluded
            .iter()
            .find(|e| &e.instrument == id)
            .map(|e| AnalysisError::MissingInstrumentData {
                instrument: e.instrument.clone(),
                reason: Some(e.reason),
            })
    })
}

/// Run every stage after alignment.
///
/// The alignment may cover more instruments than the pair; the pair's two
/// columns are taken from it.
pub fn analyze_aligned(alignment: &Alignment, config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;
    let pair = &config.pair;
    let instruments = pair.instruments();

    let missing = |id: &InstrumentId| AnalysisError::MissingInstrumentData {
        instrument: id.clone(),
        reason: alignment.exclusion(id),
    };
    for id in &instruments {
        if alignment.prices.position(id).is_none() {
            return Err(missing(id));
        }
    }
    let prices = alignment
        .prices
        .select(&instruments)
        .ok_or_else(|| missing(&pair.benchmark))?;
    let returns = alignment
        .returns
        .select(&instruments)
        .ok_or_else(|| missing(&pair.benchmark))?;
    debug!(pair = %pair, prices = prices.len(), returns = returns.len(), "selected pair columns");

    let (momentum, regimes) = classify(&prices, pair, &config.momentum)?;
    let daily_weights = schedule(&regimes, &config.weights, pair);

    let lump_sum = simulate_lump_sum(&returns, &daily_weights, config.lump_sum)?;
    let periodic = simulate_periodic(
        &returns,
        &daily_weights,
        config.periodic_deposit,
        config.period,
        config.aggregation,
    )?;

    let lump_sum_summary = summarize_lump_sum(&lump_sum, config.lump_sum);
    let periodic_summary = summarize_periodic(&periodic, config.period.periods_per_year());
    let regime_counts = regimes.counts();
    let stats = pair_stats(&prices, &returns, pair, &config.stats);

    info!(
        pair = %pair,
        days = prices.len(),
        strong = regime_counts.strong,
        weak = regime_counts.weak,
        neutral = regime_counts.neutral,
        lump_sum_final = lump_sum.last().map(|(_, v)| v),
        periodic_final = periodic.values.last().map(|(_, v)| v),
        "analysis complete"
    );

    let columns = alignment
        .columns
        .iter()
        .filter(|(id, _)| instruments.contains(id))
        .cloned()
        .collect();

    Ok(AnalysisReport {
        config: config.clone(),
        columns,
        prices,
        returns,
        momentum,
        regimes,
        regime_counts,
        daily_weights,
        lump_sum,
        periodic,
        lump_sum_summary,
        periodic_summary,
        stats,
    })
}

/// One pair to evaluate in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRequest {
    pub label: String,
    pub config: AnalysisConfig,
}

impl PairRequest {
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            label: config.pair.to_string(),
            config,
        }
    }
}

/// Analyze many pairs over one set of frames.
///
/// Results come back in request order. Requests are independent: one failing
/// pair does not affect the others.
pub fn analyze_batch(raw: &RawFrames, requests: &[PairRequest]) -> Vec<Result<AnalysisReport>> {
    #[cfg(feature = "parallel")]
    let results: Vec<Result<AnalysisReport>> = requests
        .par_iter()
        .map(|request| analyze(raw, &request.config))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<AnalysisReport>> = requests
        .iter()
        .map(|request| analyze(raw, &request.config))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(requests = requests.len(), failed, "batch analysis complete");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExclusionReason, RawTimestamp};
    use jiff::civil::date;

    fn frames() -> RawFrames {
        let dates: Vec<_> = (0..5)
            .map(|i| crate::date_math::add_days(date(2024, 1, 1), i))
            .collect();
        let mut raw = RawFrames::default();
        raw.insert(
            "SPY".into(),
            RawPriceFrame::from_closes(&dates, &[100.0, 101.0, 102.0, 101.0, 103.0]),
        );
        raw.insert(
            "QQQ".into(),
            RawPriceFrame::from_closes(&dates, &[200.0, 204.0, 206.0, 203.0, 210.0]),
        );
        raw
    }

    fn short_window() -> AnalysisConfig {
        let mut config = AnalysisConfig::default();
        config.momentum.window = 2;
        config
    }

    #[test]
    fn test_missing_pair_member_is_reported() {
        let mut raw = frames();
        raw.remove(&InstrumentId::from("QQQ"));

        let err = analyze(&raw, &short_window()).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MissingInstrumentData {
                instrument: "QQQ".into(),
                reason: None,
            }
        );
    }

    #[test]
    fn test_unusable_pair_member_carries_reason() {
        let mut raw = frames();
        raw.insert(
            "SPY".into(),
            RawPriceFrame::new(vec![RawTimestamp::from(date(2024, 1, 1))])
                .with_column("Open", vec![Some(1.0)]),
        );

        let err = analyze(&raw, &short_window()).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MissingInstrumentData {
                instrument: "SPY".into(),
                reason: Some(ExclusionReason::MissingPriceColumn),
            }
        );
    }

    #[test]
    fn test_report_shapes() {
        let report = analyze(&frames(), &short_window()).unwrap();
        assert_eq!(report.prices.len(), 5);
        assert_eq!(report.returns.len(), 4);
        assert_eq!(report.momentum.len(), 5);
        assert_eq!(report.momentum.defined_count(), 3);
        assert_eq!(report.daily_weights.len(), 5);
        assert_eq!(report.lump_sum.len(), 4);
        assert_eq!(report.periodic.values.len(), 1);
        assert_eq!(report.regime_counts.total(), 5);
        assert!(report.lump_sum_summary.is_some());
        assert!(report.periodic_summary.is_some());

        // Four returns are shorter than the default 60-row correlation window
        assert_eq!(report.stats.risk.len(), 2);
        assert_eq!(report.stats.risk[0].instrument, InstrumentId::from("SPY"));
        assert_eq!(report.stats.rolling_correlation.len(), 4);
        assert_eq!(report.stats.rolling_correlation.latest(), None);
        assert!(report.stats.correlation.is_some());
    }

    #[test]
    fn test_batch_preserves_request_order() {
        let raw = frames();
        let good = PairRequest::new(short_window());
        let mut bad_config = short_window();
        bad_config.pair = Pair::new("SPY", "IWM");
        let bad = PairRequest::new(bad_config);

        let results = analyze_batch(&raw, &[good.clone(), bad, good]);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}
