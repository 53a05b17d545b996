//! Momentum and regime classification outputs

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Market state derived from relative momentum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    /// Momentum above the upper threshold; growth instrument leads
    Strong,
    /// Momentum below the lower threshold; benchmark leads
    Weak,
    Neutral,
}

impl Regime {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Regime::Strong => "Strong",
            Regime::Weak => "Weak",
            Regime::Neutral => "Neutral",
        }
    }
}

/// Rate-of-change momentum of the growth/benchmark ratio.
///
/// One entry per price date; the first `window` entries are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumSeries {
    pub dates: Vec<Date>,
    pub values: Vec<Option<f64>>,
    pub window: usize,
}

impl MomentumSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Values that are defined, in date order
    pub fn defined(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v)
    }

    #[must_use]
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Quantile cut-offs computed over the whole defined momentum history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Momentum strictly above this is `Strong`
    pub strong: f64,
    /// Momentum strictly below this is `Weak`
    pub weak: f64,
}

impl Thresholds {
    #[must_use]
    pub fn classify(&self, momentum: f64) -> Regime {
        if momentum > self.strong {
            Regime::Strong
        } else if momentum < self.weak {
            Regime::Weak
        } else {
            Regime::Neutral
        }
    }
}

/// Regime per price date; `None` where momentum is undefined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeTable {
    pub dates: Vec<Date>,
    pub regimes: Vec<Option<Regime>>,
    /// `None` when no momentum value was defined
    pub thresholds: Option<Thresholds>,
}

impl RegimeTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Date, Option<Regime>)> + '_ {
        self.dates.iter().copied().zip(self.regimes.iter().copied())
    }

    #[must_use]
    pub fn counts(&self) -> RegimeCounts {
        let mut counts = RegimeCounts::default();
        for regime in &self.regimes {
            match regime {
                Some(Regime::Strong) => counts.strong += 1,
                Some(Regime::Weak) => counts.weak += 1,
                Some(Regime::Neutral) => counts.neutral += 1,
                None => counts.unclassified += 1,
            }
        }
        counts
    }
}

/// Number of dates spent in each regime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeCounts {
    pub strong: usize,
    pub weak: usize,
    pub neutral: usize,
    pub unclassified: usize,
}

impl RegimeCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.strong + self.weak + self.neutral + self.unclassified
    }
}
