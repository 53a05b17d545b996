//! Portfolio value simulators
//!
//! Two accounts are simulated under the same regime weights:
//!
//! - **Lump sum**: one deposit, compounded by the weighted daily return.
//! - **Periodic**: daily returns and weights are folded into periods, then a
//!   fixed deposit is added at the start of every period before that
//!   period's weighted return is applied.
//!
//! Both run only over dates (or periods) where returns and weights are both
//! defined. Nothing is forward-filled.

use std::ops::Range;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::align::matching_indices;
use crate::error::{AnalysisError, Result};
use crate::model::{AlignedTable, Period, PeriodAggregation, ValueSeries, WeightSchedule};

/// Output of the periodic-contribution simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodicSimulation {
    /// Balance at the end of each period
    pub values: ValueSeries,
    /// Weights applied in each period
    pub weights: WeightSchedule,
    /// Compounded return of each instrument in each period
    pub period_returns: AlignedTable,
    /// Cumulative deposits up to and including each period
    pub contributed: ValueSeries,
    pub deposit: f64,
}

impl PeriodicSimulation {
    #[must_use]
    pub fn total_contributed(&self) -> f64 {
        self.contributed.last().map_or(0.0, |(_, v)| v)
    }
}

/// Return-table column of every weighted instrument, in schedule order
fn weight_columns(returns: &AlignedTable, weights: &WeightSchedule) -> Result<Vec<usize>> {
    weights
        .instruments()
        .iter()
        .map(|id| {
            returns
                .position(id)
                .ok_or_else(|| AnalysisError::MissingInstrumentData {
                    instrument: id.clone(),
                    reason: None,
                })
        })
        .collect()
}

#[inline]
fn weighted_return(
    returns: &AlignedTable,
    row: usize,
    columns: &[usize],
    weights: &[f64],
) -> f64 {
    columns
        .iter()
        .zip(weights)
        .map(|(&col, w)| w * returns.value(row, col))
        .sum()
}

/// Grow a single deposit by the weighted daily return.
///
/// `value[t] = initial * prod(1 + sum_i w[t, i] * r[t, i])` over the dates
/// present in both the return table and the schedule.
pub fn simulate_lump_sum(
    returns: &AlignedTable,
    weights: &WeightSchedule,
    initial: f64,
) -> Result<ValueSeries> {
    let columns = weight_columns(returns, weights)?;
    let rows = matching_indices(returns.dates(), weights.dates());

    let mut value = initial;
    let mut out = ValueSeries {
        dates: Vec::with_capacity(rows.len()),
        values: Vec::with_capacity(rows.len()),
    };
    for (r, w) in rows {
        value *= 1.0 + weighted_return(returns, r, &columns, weights.row(w));
        out.dates.push(returns.dates()[r]);
        out.values.push(value);
    }

    debug!(days = out.len(), initial, final_value = value, "simulated lump sum");
    Ok(out)
}

/// Consecutive row ranges sharing a period, keyed by period end
fn period_groups(dates: &[Date], period: Period) -> Vec<(Date, Range<usize>)> {
    let mut groups: Vec<(Date, Range<usize>)> = Vec::new();
    for (i, &date) in dates.iter().enumerate() {
        let key = period.period_end(date);
        match groups.last_mut() {
            Some((last_key, range)) if *last_key == key => range.end = i + 1,
            _ => groups.push((key, i..i + 1)),
        }
    }
    groups
}

/// Product of `1 + r` over a run of returns, minus one
#[inline]
fn compound(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

/// Compound daily returns into one return per period and instrument
#[must_use]
pub fn aggregate_returns(returns: &AlignedTable, period: Period) -> AlignedTable {
    let groups = period_groups(returns.dates(), period);
    let columns: Vec<Vec<f64>> = (0..returns.instruments().len())
        .map(|col| {
            let daily = returns.column_at(col);
            groups
                .iter()
                .map(|(_, rows)| compound(&daily[rows.clone()]))
                .collect()
        })
        .collect();
    AlignedTable::from_parts(
        groups.into_iter().map(|(key, _)| key).collect(),
        returns.instruments().to_vec(),
        columns,
    )
}

/// Pick one weight row per period
#[must_use]
pub fn aggregate_weights(
    weights: &WeightSchedule,
    period: Period,
    aggregation: PeriodAggregation,
) -> WeightSchedule {
    let groups = period_groups(weights.dates(), period);
    let mut dates = Vec::with_capacity(groups.len());
    let mut rows = Vec::with_capacity(groups.len() * weights.instruments().len());
    for (key, range) in groups {
        let chosen = match aggregation {
            PeriodAggregation::Last => range.end - 1,
            PeriodAggregation::Majority => majority_row(weights, range),
        };
        dates.push(key);
        rows.extend_from_slice(weights.row(chosen));
    }
    WeightSchedule::from_parts(dates, weights.instruments().to_vec(), rows)
}

/// Most frequent row in a range; on a tie the row seen most recently wins
fn majority_row(weights: &WeightSchedule, range: Range<usize>) -> usize {
    // (representative row, count, last occurrence)
    let mut tally: Vec<(usize, usize, usize)> = Vec::new();
    for i in range.clone() {
        let row = weights.row(i);
        match tally.iter_mut().find(|(rep, _, _)| weights.row(*rep) == row) {
            Some(entry) => {
                entry.1 += 1;
                entry.2 = i;
            }
            None => tally.push((i, 1, i)),
        }
    }
    tally
        .into_iter()
        .max_by_key(|&(_, count, last)| (count, last))
        .map_or(range.end - 1, |(_, _, last)| last)
}

/// Fixed deposit at the start of every period, compounded per period.
///
/// Balance starts at zero. In each period present in both the aggregated
/// returns and the aggregated weights, the deposit is added first and the
/// weighted period return is applied after.
pub fn simulate_periodic(
    returns: &AlignedTable,
    weights: &WeightSchedule,
    deposit: f64,
    period: Period,
    aggregation: PeriodAggregation,
) -> Result<PeriodicSimulation> {
    let columns = weight_columns(returns, weights)?;
    let period_returns = aggregate_returns(returns, period);
    let period_weights = aggregate_weights(weights, period, aggregation);

    let matched = matching_indices(period_returns.dates(), period_weights.dates());
    let (return_rows, weight_rows): (Vec<usize>, Vec<usize>) = matched.into_iter().unzip();
    let period_returns = period_returns.select_rows(&return_rows);
    let period_weights = period_weights.select_rows(&weight_rows);

    let n = period_returns.len();
    let mut values = ValueSeries {
        dates: period_returns.dates().to_vec(),
        values: Vec::with_capacity(n),
    };
    let mut contributed = ValueSeries {
        dates: period_returns.dates().to_vec(),
        values: Vec::with_capacity(n),
    };

    let mut balance = 0.0;
    let mut total = 0.0;
    for row in 0..n {
        balance += deposit;
        total += deposit;
        balance *= 1.0 + weighted_return(&period_returns, row, &columns, period_weights.row(row));
        values.values.push(balance);
        contributed.values.push(total);
    }

    debug!(
        periods = n,
        period = period.label(),
        deposit,
        final_value = balance,
        "simulated periodic contributions"
    );

    Ok(PeriodicSimulation {
        values,
        weights: period_weights,
        period_returns,
        contributed,
        deposit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InstrumentId, WeightPair};
    use jiff::civil::date;

    fn ids() -> [InstrumentId; 2] {
        ["SPY".into(), "QQQ".into()]
    }

    #[test]
    fn test_lump_sum_compounds_weighted_returns() {
        let dates = vec![date(2024, 1, 2), date(2024, 1, 3)];
        // Equal returns on both instruments make the weighted return exact
        let returns = AlignedTable::new(
            dates.clone(),
            ids().to_vec(),
            vec![vec![0.05, -0.02], vec![0.05, -0.02]],
        )
        .unwrap();
        let weights = WeightSchedule::from_pairs(dates, ids(), [WeightPair::even(); 2]).unwrap();

        let values = simulate_lump_sum(&returns, &weights, 1000.0).unwrap();
        assert!((values.values[0] - 1050.0).abs() < 1e-9);
        assert!((values.values[1] - 1029.0).abs() < 1e-9);
    }

    #[test]
    fn test_lump_sum_uses_common_dates_only() {
        let returns = AlignedTable::new(
            vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)],
            ids().to_vec(),
            vec![vec![0.1, 0.1, 0.1], vec![0.1, 0.1, 0.1]],
        )
        .unwrap();
        let weights = WeightSchedule::from_pairs(
            vec![date(2024, 1, 3), date(2024, 1, 4), date(2024, 1, 5)],
            ids(),
            [WeightPair::even(); 3],
        )
        .unwrap();

        let values = simulate_lump_sum(&returns, &weights, 100.0).unwrap();
        assert_eq!(values.dates, vec![date(2024, 1, 3), date(2024, 1, 4)]);
    }

    #[test]
    fn test_missing_weight_column_is_an_error() {
        let returns = AlignedTable::new(
            vec![date(2024, 1, 2)],
            vec!["SPY".into(), "IWM".into()],
            vec![vec![0.0], vec![0.0]],
        )
        .unwrap();
        let weights =
            WeightSchedule::from_pairs(vec![date(2024, 1, 2)], ids(), [WeightPair::even()]).unwrap();

        let err = simulate_lump_sum(&returns, &weights, 1.0).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingInstrumentData { ref instrument, .. } if instrument.as_str() == "QQQ"
        ));
    }

    #[test]
    fn test_period_groups_are_keyed_by_period_end() {
        let dates = [
            date(2024, 1, 30),
            date(2024, 1, 31),
            date(2024, 2, 1),
            date(2024, 3, 4),
        ];
        let groups = period_groups(&dates, Period::Monthly);
        assert_eq!(
            groups,
            vec![
                (date(2024, 1, 31), 0..2),
                (date(2024, 2, 29), 2..3),
                (date(2024, 3, 31), 3..4),
            ]
        );
        assert_eq!(period_groups(&dates, Period::Quarterly).len(), 1);
    }

    #[test]
    fn test_aggregate_returns_compounds() {
        let returns = AlignedTable::new(
            vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 2, 1)],
            vec!["SPY".into()],
            vec![vec![0.1, 0.1, -0.5]],
        )
        .unwrap();
        let monthly = aggregate_returns(&returns, Period::Monthly);
        assert_eq!(monthly.dates(), &[date(2024, 1, 31), date(2024, 2, 29)]);
        assert!((monthly.value(0, 0) - 0.21).abs() < 1e-12);
        assert!((monthly.value(1, 0) + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_majority_ties_go_to_latest() {
        let weights = WeightSchedule::from_pairs(
            vec![
                date(2024, 1, 2),
                date(2024, 1, 3),
                date(2024, 1, 4),
                date(2024, 1, 5),
            ],
            ids(),
            [
                WeightPair::new(0.3, 0.7),
                WeightPair::even(),
                WeightPair::even(),
                WeightPair::new(0.3, 0.7),
            ],
        )
        .unwrap();
        let majority = aggregate_weights(&weights, Period::Monthly, PeriodAggregation::Majority);
        assert_eq!(majority.row(0), &[0.3, 0.7]);

        let last = aggregate_weights(&weights, Period::Monthly, PeriodAggregation::Last);
        assert_eq!(last.row(0), &[0.3, 0.7]);
    }

    #[test]
    fn test_majority_prefers_most_frequent() {
        let weights = WeightSchedule::from_pairs(
            vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)],
            ids(),
            [
                WeightPair::new(0.7, 0.3),
                WeightPair::new(0.7, 0.3),
                WeightPair::even(),
            ],
        )
        .unwrap();
        let majority = aggregate_weights(&weights, Period::Monthly, PeriodAggregation::Majority);
        assert_eq!(majority.row(0), &[0.7, 0.3]);
        let last = aggregate_weights(&weights, Period::Monthly, PeriodAggregation::Last);
        assert_eq!(last.row(0), &[0.5, 0.5]);
    }

    #[test]
    fn test_single_period_deposit_comes_first() {
        let returns = AlignedTable::new(
            vec![date(2024, 1, 2)],
            ids().to_vec(),
            vec![vec![0.10], vec![0.10]],
        )
        .unwrap();
        let weights =
            WeightSchedule::from_pairs(vec![date(2024, 1, 2)], ids(), [WeightPair::even()]).unwrap();

        let sim = simulate_periodic(
            &returns,
            &weights,
            500.0,
            Period::Monthly,
            PeriodAggregation::Last,
        )
        .unwrap();
        assert_eq!(sim.values.len(), 1);
        assert!((sim.values.values[0] - 550.0).abs() < 1e-9);
        assert_eq!(sim.total_contributed(), 500.0);
        assert_eq!(sim.values.dates, vec![date(2024, 1, 31)]);
    }
}
