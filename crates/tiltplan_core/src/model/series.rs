//! Single-column date-indexed series

use std::collections::BTreeMap;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Clean closing prices of one instrument.
///
/// Dates are strictly increasing and every value is positive and finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    dates: Vec<Date>,
    values: Vec<f64>,
}

impl PriceSeries {
    /// Build a validated series, or `None` if the inputs break an invariant
    #[must_use]
    pub fn new(dates: Vec<Date>, values: Vec<f64>) -> Option<Self> {
        let increasing = dates.windows(2).all(|w| w[0] < w[1]);
        let positive = values.iter().all(|v| v.is_finite() && *v > 0.0);
        (dates.len() == values.len() && increasing && positive).then_some(Self { dates, values })
    }

    /// Build a series from unordered observations.
    ///
    /// Non-positive and non-finite prices are dropped; when several
    /// observations share a date the last one wins.
    pub fn from_observations(observations: impl IntoIterator<Item = (Date, f64)>) -> Self {
        let by_date: BTreeMap<Date, f64> = observations
            .into_iter()
            .filter(|(_, price)| price.is_finite() && *price > 0.0)
            .collect();
        let (dates, values) = by_date.into_iter().unzip();
        Self { dates, values }
    }

    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Simple returns between consecutive observations.
    ///
    /// The first observation has no predecessor and is left out.
    #[must_use]
    pub fn returns(&self) -> ReturnSeries {
        let values = self.values.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
        ReturnSeries {
            dates: self.dates.iter().skip(1).copied().collect(),
            values,
        }
    }
}

/// Simple returns of one instrument, keyed by the later date of each pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    dates: Vec<Date>,
    values: Vec<f64>,
}

impl ReturnSeries {
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Simulated account value over time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueSeries {
    pub dates: Vec<Date>,
    pub values: Vec<f64>,
}

impl ValueSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<(Date, f64)> {
        Some((*self.dates.first()?, *self.values.first()?))
    }

    #[must_use]
    pub fn last(&self) -> Option<(Date, f64)> {
        Some((*self.dates.last()?, *self.values.last()?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}
