//! Tests for the momentum regime classifier and the weight scheduler

use jiff::civil::{Date, date};

use crate::config::MomentumConfig;
use crate::model::{AlignedTable, InstrumentId, Pair, Regime, RegimeWeights};
use crate::momentum::{classify, momentum_from_ratio};
use crate::schedule::schedule;
use crate::synthetic::{RandomWalk, correlated_pair};

fn synthetic_prices(seed: u64, days: usize) -> (Pair, AlignedTable) {
    let pair = Pair::default();
    let (dates, a, b) = correlated_pair(
        seed,
        date(2015, 1, 1),
        days,
        &RandomWalk::BROAD_MARKET,
        &RandomWalk::GROWTH,
        0.8,
    )
    .unwrap();
    let table = AlignedTable::new(dates, pair.instruments().to_vec(), vec![a, b]).unwrap();
    (pair, table)
}

fn calendar(n: usize) -> Vec<Date> {
    crate::synthetic::business_days(date(2024, 1, 1), n)
}

#[test]
fn test_momentum_depends_only_on_endpoints() {
    let window = 3;
    let ratio: Vec<f64> = (0..10).map(|i: i32| 1.0 + 0.01 * f64::from(i)).collect();
    let base = momentum_from_ratio(&calendar(10), &ratio, window);

    // Perturb everything strictly between t - window and t
    let t = 7;
    let mut perturbed = ratio.clone();
    for v in &mut perturbed[t - window + 1..t] {
        *v *= 3.0;
    }
    let changed = momentum_from_ratio(&calendar(10), &perturbed, window);

    assert_eq!(base.values[t], changed.values[t]);
    let expected = ratio[t] / ratio[t - window] - 1.0;
    assert!((base.values[t].unwrap() - expected).abs() < 1e-15);
}

#[test]
fn test_ratio_is_growth_over_benchmark() {
    let pair = Pair::default();
    let prices = AlignedTable::new(
        calendar(3),
        pair.instruments().to_vec(),
        vec![vec![100.0, 100.0, 100.0], vec![100.0, 110.0, 121.0]],
    )
    .unwrap();
    let config = MomentumConfig::default().with_window(1);

    let (momentum, _) = classify(&prices, &pair, &config).unwrap();
    assert_eq!(momentum.values[0], None);
    assert!((momentum.values[1].unwrap() - 0.10).abs() < 1e-12);
    assert!((momentum.values[2].unwrap() - 0.10).abs() < 1e-12);
}

#[test]
fn test_exactly_one_regime_per_defined_date() {
    let (pair, prices) = synthetic_prices(11, 750);
    let config = MomentumConfig::default();

    let (momentum, regimes) = classify(&prices, &pair, &config).unwrap();

    assert_eq!(momentum.len(), prices.len());
    assert_eq!(regimes.len(), prices.len());
    assert_eq!(momentum.defined_count(), prices.len() - config.window);
    for (m, r) in momentum.values.iter().zip(&regimes.regimes) {
        assert_eq!(m.is_some(), r.is_some());
    }

    let t = regimes.thresholds.unwrap();
    assert!(t.weak <= t.strong);
    let counts = regimes.counts();
    assert_eq!(counts.unclassified, config.window);
    assert_eq!(counts.total(), prices.len());
    assert!(counts.strong > 0 && counts.weak > 0 && counts.neutral > 0);
}

#[test]
fn test_regimes_match_thresholds() {
    let (pair, prices) = synthetic_prices(3, 400);
    let (momentum, regimes) = classify(&prices, &pair, &MomentumConfig::default()).unwrap();
    let t = regimes.thresholds.unwrap();

    for (m, r) in momentum.values.iter().zip(&regimes.regimes) {
        let (Some(m), Some(r)) = (m, r) else { continue };
        let expected = if *m > t.strong {
            Regime::Strong
        } else if *m < t.weak {
            Regime::Weak
        } else {
            Regime::Neutral
        };
        assert_eq!(*r, expected);
    }
}

#[test]
fn test_insufficient_history_is_unclassified() {
    let (pair, prices) = synthetic_prices(5, 40);
    let (momentum, regimes) = classify(&prices, &pair, &MomentumConfig::default()).unwrap();

    assert_eq!(momentum.defined_count(), 0);
    assert!(regimes.thresholds.is_none());
    assert_eq!(regimes.counts().unclassified, 40);

    let weights = schedule(&regimes, &RegimeWeights::default(), &pair);
    assert!(weights.rows().all(|(_, row)| row == [0.5, 0.5]));
}

#[test]
fn test_few_defined_points_still_classify() {
    let (pair, prices) = synthetic_prices(9, 63);
    let (momentum, regimes) = classify(&prices, &pair, &MomentumConfig::default()).unwrap();

    assert_eq!(momentum.defined_count(), 3);
    assert!(regimes.thresholds.is_some());
    assert_eq!(regimes.counts().unclassified, 60);
}

#[test]
fn test_missing_pair_column() {
    let (_, prices) = synthetic_prices(1, 10);
    let pair = Pair::new("SPY", "IWM");
    assert!(classify(&prices, &pair, &MomentumConfig::default()).is_err());
}

#[test]
fn test_invalid_config_is_rejected() {
    let (pair, prices) = synthetic_prices(1, 10);
    let config = MomentumConfig::default().with_window(0);
    assert!(classify(&prices, &pair, &config).is_err());
}

#[test]
fn test_every_regime_weight_pair_sums_to_one() {
    let weights = RegimeWeights::default();
    for regime in [
        Some(Regime::Strong),
        Some(Regime::Weak),
        Some(Regime::Neutral),
        None,
    ] {
        let pair = weights.lookup(regime);
        assert_eq!(pair.benchmark + pair.growth, 1.0);
        assert!((0.0..=1.0).contains(&pair.benchmark));
        assert!((0.0..=1.0).contains(&pair.growth));
    }
}

#[test]
fn test_schedule_columns_follow_pair_order() {
    let (pair, prices) = synthetic_prices(21, 300);
    let (_, regimes) = classify(&prices, &pair, &MomentumConfig::default()).unwrap();
    let weights = schedule(&regimes, &RegimeWeights::default(), &pair);

    assert_eq!(weights.instruments(), &pair.instruments());
    assert_eq!(weights.dates(), prices.dates());
    let growth = weights.column(&InstrumentId::from("QQQ")).unwrap();
    for (w, r) in growth.iter().zip(&regimes.regimes) {
        match r {
            Some(Regime::Strong) => assert_eq!(*w, 0.7),
            Some(Regime::Weak) => assert_eq!(*w, 0.3),
            _ => assert_eq!(*w, 0.5),
        }
    }
}
