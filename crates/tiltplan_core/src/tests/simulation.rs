//! Tests for the lump-sum and periodic-contribution simulators
//!
//! These tests verify that:
//! - Lump-sum values compound the weighted daily return from one deposit
//! - Periodic deposits are made before the period's return is applied
//! - Period weights come from the last observed day (`Last`)
//! - Periods missing from either aggregate are skipped, never filled

use jiff::civil::{Date, date};

use crate::model::{
    AlignedTable, InstrumentId, Period, PeriodAggregation, Regime, RegimeTable, RegimeWeights,
    WeightPair, WeightSchedule,
};
use crate::schedule::schedule;
use crate::simulation::{aggregate_weights, simulate_lump_sum, simulate_periodic};
use crate::summary::{summarize_lump_sum, summarize_periodic};

fn ids() -> [InstrumentId; 2] {
    ["SPY".into(), "QQQ".into()]
}

fn returns(dates: &[Date], spy: &[f64], qqq: &[f64]) -> AlignedTable {
    AlignedTable::new(dates.to_vec(), ids().to_vec(), vec![spy.to_vec(), qqq.to_vec()]).unwrap()
}

#[test]
fn test_lump_sum_compounding() {
    let dates = [date(2024, 1, 2), date(2024, 1, 3)];
    // 0.3 * 0.05 + 0.7 * 0.05 = 0.05, then -0.02 the same way
    let table = returns(&dates, &[0.05, -0.02], &[0.05, -0.02]);
    let weights = WeightSchedule::from_pairs(dates.to_vec(), ids(), [WeightPair::new(0.3, 0.7); 2]).unwrap();

    let values = simulate_lump_sum(&table, &weights, 1000.0).unwrap();

    assert_eq!(values.dates, dates.to_vec());
    assert!((values.values[0] - 1050.0).abs() < 1e-9);
    assert!((values.values[1] - 1029.0).abs() < 1e-9);
}

#[test]
fn test_lump_sum_applies_each_days_weights() {
    let dates = [date(2024, 1, 2), date(2024, 1, 3)];
    let table = returns(&dates, &[0.10, 0.0], &[0.0, 0.10]);
    let weights = WeightSchedule::from_pairs(
        dates.to_vec(),
        ids(),
        [WeightPair::new(1.0, 0.0), WeightPair::new(0.5, 0.5)],
    )
    .unwrap();

    let values = simulate_lump_sum(&table, &weights, 100.0).unwrap();
    assert!((values.values[0] - 110.0).abs() < 1e-9);
    assert!((values.values[1] - 115.5).abs() < 1e-9);
}

#[test]
fn test_lump_sum_with_no_common_dates_is_empty() {
    let table = returns(&[date(2024, 1, 2)], &[0.1], &[0.1]);
    let weights = WeightSchedule::from_pairs(vec![date(2024, 1, 3)], ids(), [WeightPair::even()]).unwrap();

    let values = simulate_lump_sum(&table, &weights, 100.0).unwrap();
    assert!(values.is_empty());
    assert!(summarize_lump_sum(&values, 100.0).is_none());
}

#[test]
fn test_periodic_single_period() {
    let dates = [date(2024, 1, 2)];
    let table = returns(&dates, &[0.10], &[0.10]);
    let weights = WeightSchedule::from_pairs(dates.to_vec(), ids(), [WeightPair::even()]).unwrap();

    let sim = simulate_periodic(&table, &weights, 500.0, Period::Monthly, PeriodAggregation::Last)
        .unwrap();

    assert!((sim.values.values[0] - 550.0).abs() < 1e-9);
}

#[test]
fn test_periodic_deposits_every_period() {
    let dates = [date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15)];
    let table = returns(&dates, &[0.10, 0.0, -0.5], &[0.10, 0.0, -0.5]);
    let weights = WeightSchedule::from_pairs(dates.to_vec(), ids(), [WeightPair::even(); 3]).unwrap();

    let sim = simulate_periodic(&table, &weights, 500.0, Period::Monthly, PeriodAggregation::Last)
        .unwrap();

    // (500 * 1.1 + 500) * 1.0 = 1050, then (1050 + 500) * 0.5 = 775
    let v = &sim.values.values;
    assert!((v[0] - 550.0).abs() < 1e-9);
    assert!((v[1] - 1050.0).abs() < 1e-9);
    assert!((v[2] - 775.0).abs() < 1e-9);
    assert_eq!(sim.contributed.values, vec![500.0, 1000.0, 1500.0]);
    assert_eq!(
        sim.values.dates,
        vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]
    );

    let summary = summarize_periodic(&sim, Period::Monthly.periods_per_year()).unwrap();
    assert_eq!(summary.total_contributed, 1500.0);
    assert!((summary.total_return - (775.0 / 1500.0 - 1.0)).abs() < 1e-12);
    assert_eq!(summary.periods, 3);
}

#[test]
fn test_period_weight_is_last_daily_weight() {
    // Strong for most of January, Weak on its last trading day
    let dates = [
        date(2024, 1, 29),
        date(2024, 1, 30),
        date(2024, 1, 31),
        date(2024, 2, 1),
    ];
    let regimes = RegimeTable {
        dates: dates.to_vec(),
        regimes: vec![
            Some(Regime::Strong),
            Some(Regime::Strong),
            Some(Regime::Weak),
            Some(Regime::Strong),
        ],
        thresholds: None,
    };
    let pair = crate::model::Pair::default();
    let daily = schedule(&regimes, &RegimeWeights::default(), &pair);

    let last = aggregate_weights(&daily, Period::Monthly, PeriodAggregation::Last);
    assert_eq!(last.dates(), &[date(2024, 1, 31), date(2024, 2, 29)]);
    assert_eq!(last.row(0), &[0.7, 0.3]);
    assert_eq!(last.row(1), &[0.3, 0.7]);

    let majority = aggregate_weights(&daily, Period::Monthly, PeriodAggregation::Majority);
    assert_eq!(majority.row(0), &[0.3, 0.7]);
}

#[test]
fn test_periodic_skips_periods_without_weights() {
    let return_dates = [date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15)];
    let table = returns(&return_dates, &[0.1, 0.1, 0.1], &[0.1, 0.1, 0.1]);
    let weights = WeightSchedule::from_pairs(
        vec![date(2024, 2, 1), date(2024, 3, 1)],
        ids(),
        [WeightPair::even(); 2],
    )
    .unwrap();

    let sim = simulate_periodic(&table, &weights, 100.0, Period::Monthly, PeriodAggregation::Last)
        .unwrap();
    assert_eq!(sim.values.dates, vec![date(2024, 2, 29), date(2024, 3, 31)]);
    assert_eq!(sim.weights.len(), 2);
    assert_eq!(sim.period_returns.len(), 2);
    // First simulated period starts from zero, not from a January balance
    assert!((sim.values.values[0] - 110.0).abs() < 1e-9);
}

#[test]
fn test_quarterly_periods() {
    let dates = [date(2024, 1, 15), date(2024, 2, 15), date(2024, 4, 15)];
    let table = returns(&dates, &[0.1, 0.1, 0.0], &[0.1, 0.1, 0.0]);
    let weights = WeightSchedule::from_pairs(dates.to_vec(), ids(), [WeightPair::even(); 3]).unwrap();

    let sim = simulate_periodic(&table, &weights, 100.0, Period::Quarterly, PeriodAggregation::Last)
        .unwrap();
    assert_eq!(sim.values.dates, vec![date(2024, 3, 31), date(2024, 6, 30)]);
    assert!((sim.values.values[0] - 121.0).abs() < 1e-9);
    assert!((sim.values.values[1] - 221.0).abs() < 1e-9);
}
