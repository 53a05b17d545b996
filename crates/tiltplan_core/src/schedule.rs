//! Regime to target weights

use crate::model::{Pair, RegimeTable, RegimeWeights, WeightSchedule};

/// Daily target weights for the pair, one row per regime date.
///
/// Unclassified dates get the neutral pair.
#[must_use]
pub fn schedule(regimes: &RegimeTable, weights: &RegimeWeights, pair: &Pair) -> WeightSchedule {
    let rows: Vec<f64> = regimes
        .regimes
        .iter()
        .flat_map(|r| weights.lookup(*r).as_array())
        .collect();
    WeightSchedule::from_parts(regimes.dates.clone(), pair.instruments().to_vec(), rows)
}
