//! Target portfolio weights

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::ids::InstrumentId;
use super::regime::Regime;
use crate::error::ConfigError;

/// Tolerance on the sum of a weight pair
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Allocation between the benchmark and growth instruments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPair {
    pub benchmark: f64,
    pub growth: f64,
}

impl WeightPair {
    #[must_use]
    pub const fn new(benchmark: f64, growth: f64) -> Self {
        Self { benchmark, growth }
    }

    /// 50/50 split, used whenever there is no regime signal
    #[must_use]
    pub const fn even() -> Self {
        Self::new(0.5, 0.5)
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.benchmark + self.growth
    }

    /// Weights in column order (benchmark first)
    #[must_use]
    pub fn as_array(&self) -> [f64; 2] {
        [self.benchmark, self.growth]
    }
}

/// Regime to weight lookup table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeWeights {
    pub strong: WeightPair,
    pub weak: WeightPair,
    pub neutral: WeightPair,
}

impl Default for RegimeWeights {
    fn default() -> Self {
        Self {
            strong: WeightPair::new(0.3, 0.7),
            weak: WeightPair::new(0.7, 0.3),
            neutral: WeightPair::even(),
        }
    }
}

impl RegimeWeights {
    /// Weights for a date's regime; unclassified dates get the neutral pair
    #[must_use]
    pub fn lookup(&self, regime: Option<Regime>) -> WeightPair {
        match regime {
            Some(Regime::Strong) => self.strong,
            Some(Regime::Weak) => self.weak,
            Some(Regime::Neutral) | None => self.neutral,
        }
    }

    /// Check every pair lies in `[0, 1]` and sums to 1
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (regime, pair) in self.entries() {
            let in_range = pair
                .as_array()
                .iter()
                .all(|w| w.is_finite() && (0.0..=1.0).contains(w));
            if !in_range || (pair.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(ConfigError::InvalidWeights {
                    regime,
                    benchmark: pair.benchmark,
                    growth: pair.growth,
                });
            }
        }
        Ok(())
    }

    /// Every entry, labelled, in a fixed order
    #[must_use]
    pub fn entries(&self) -> [(&'static str, WeightPair); 3] {
        [
            ("strong", self.strong),
            ("weak", self.weak),
            ("neutral", self.neutral),
        ]
    }
}

/// Date-indexed weights, one per instrument, stored row-major.
///
/// Row `i` holds the weights in force on `dates[i]`, in `instruments` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSchedule {
    dates: Vec<Date>,
    instruments: Vec<InstrumentId>,
    weights: Vec<f64>,
}

impl WeightSchedule {
    /// Build a schedule from rows, or `None` if any row has the wrong width
    #[must_use]
    pub fn from_rows(
        dates: Vec<Date>,
        instruments: Vec<InstrumentId>,
        rows: impl IntoIterator<Item = Vec<f64>>,
    ) -> Option<Self> {
        let width = instruments.len();
        let mut weights = Vec::with_capacity(dates.len() * width);
        let mut count = 0;
        for row in rows {
            if row.len() != width {
                return None;
            }
            weights.extend(row);
            count += 1;
        }
        (count == dates.len()).then_some(Self {
            dates,
            instruments,
            weights,
        })
    }

    /// Assemble a schedule whose shape the caller already guarantees
    pub(crate) fn from_parts(
        dates: Vec<Date>,
        instruments: Vec<InstrumentId>,
        weights: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(weights.len(), dates.len() * instruments.len());
        Self {
            dates,
            instruments,
            weights,
        }
    }

    /// Two-instrument schedule from weight pairs, or `None` unless there is
    /// exactly one pair per date
    #[must_use]
    pub fn from_pairs(
        dates: Vec<Date>,
        instruments: [InstrumentId; 2],
        pairs: impl IntoIterator<Item = WeightPair>,
    ) -> Option<Self> {
        let weights: Vec<f64> = pairs.into_iter().flat_map(|p| p.as_array()).collect();
        (weights.len() == dates.len() * 2).then(|| Self {
            dates,
            instruments: instruments.to_vec(),
            weights,
        })
    }

    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    #[must_use]
    pub fn instruments(&self) -> &[InstrumentId] {
        &self.instruments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Weights on row `i`
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        let width = self.instruments.len();
        &self.weights[i * width..(i + 1) * width]
    }

    pub fn rows(&self) -> impl Iterator<Item = (Date, &[f64])> + '_ {
        let width = self.instruments.len().max(1);
        self.dates
            .iter()
            .copied()
            .zip(self.weights.chunks(width))
    }

    /// Copy holding only the given rows, in the given order
    pub(crate) fn select_rows(&self, rows: &[usize]) -> Self {
        let mut dates = Vec::new();
        let mut weights = Vec::new();
        for &i in rows {
            dates.push(self.dates[i]);
            weights.extend_from_slice(self.row(i));
        }
        Self {
            dates,
            instruments: self.instruments.clone(),
            weights,
        }
    }

    /// Weight of one instrument across all dates
    #[must_use]
    pub fn column(&self, instrument: &InstrumentId) -> Option<Vec<f64>> {
        let col = self.instruments.iter().position(|id| id == instrument)?;
        Some((0..self.len()).map(|i| self.row(i)[col]).collect())
    }
}
