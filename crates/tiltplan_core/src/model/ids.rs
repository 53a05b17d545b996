//! Identifiers for instruments and instrument pairs
//!
//! Instruments are keyed by ticker. A `Pair` fixes which instrument plays the
//! benchmark role (A) and which plays the growth role (B); the relative
//! strength ratio is always growth over benchmark.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ticker-style identifier for a tradable instrument
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(pub String);

impl InstrumentId {
    #[must_use]
    pub fn new(ticker: impl Into<String>) -> Self {
        Self(ticker.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstrumentId {
    fn from(ticker: &str) -> Self {
        Self(ticker.to_string())
    }
}

impl From<String> for InstrumentId {
    fn from(ticker: String) -> Self {
        Self(ticker)
    }
}

/// The two instruments a regime analysis compares
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    /// Instrument A, the broad-market reference
    pub benchmark: InstrumentId,
    /// Instrument B, the instrument whose relative strength is measured
    pub growth: InstrumentId,
}

impl Pair {
    #[must_use]
    pub fn new(benchmark: impl Into<InstrumentId>, growth: impl Into<InstrumentId>) -> Self {
        Self {
            benchmark: benchmark.into(),
            growth: growth.into(),
        }
    }

    /// Both instruments in column order (benchmark first)
    #[must_use]
    pub fn instruments(&self) -> [InstrumentId; 2] {
        [self.benchmark.clone(), self.growth.clone()]
    }
}

impl Default for Pair {
    fn default() -> Self {
        Self::new("SPY", "QQQ")
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.growth, self.benchmark)
    }
}
