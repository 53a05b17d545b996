//! Raw price input as delivered by a data collaborator
//!
//! A `RawPriceFrame` is an untyped table: a timestamp per row plus any number
//! of named columns whose cells may be absent. Which column carries the close
//! price is resolved exactly once, through `PriceColumn::resolve`.

use jiff::Zoned;
use jiff::civil::{Date, DateTime, Time};
use serde::{Deserialize, Serialize};

use super::ids::InstrumentId;

/// Timestamp attached to a raw observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTimestamp {
    /// Timezone-naive wall-clock time
    Civil(DateTime),
    /// Timezone-aware time
    Zoned(Zoned),
}

impl RawTimestamp {
    /// The timezone-naive trading date of this observation.
    ///
    /// Zoned timestamps keep their own wall-clock date, so two timestamps
    /// that differ only by offset land on the same date.
    #[must_use]
    pub fn trading_date(&self) -> Date {
        match self {
            RawTimestamp::Civil(dt) => dt.date(),
            RawTimestamp::Zoned(zdt) => zdt.date(),
        }
    }
}

impl From<Date> for RawTimestamp {
    fn from(date: Date) -> Self {
        RawTimestamp::Civil(date.to_datetime(Time::midnight()))
    }
}

impl From<DateTime> for RawTimestamp {
    fn from(dt: DateTime) -> Self {
        RawTimestamp::Civil(dt)
    }
}

impl From<Zoned> for RawTimestamp {
    fn from(zdt: Zoned) -> Self {
        RawTimestamp::Zoned(zdt)
    }
}

/// Untyped price table for one instrument.
///
/// Column cells are matched to timestamps by position; cells past the end of
/// `timestamps` are ignored and missing trailing cells count as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPriceFrame {
    pub timestamps: Vec<RawTimestamp>,
    columns: Vec<(String, Vec<Option<f64>>)>,
}

impl RawPriceFrame {
    #[must_use]
    pub fn new(timestamps: Vec<RawTimestamp>) -> Self {
        Self {
            timestamps,
            columns: Vec::new(),
        }
    }

    /// Frame with a single `Close` column, every value present
    #[must_use]
    pub fn from_closes(dates: &[Date], closes: &[f64]) -> Self {
        Self::new(dates.iter().copied().map(RawTimestamp::from).collect())
            .with_column(PriceColumn::CLOSE, closes.iter().copied().map(Some).collect())
    }

    /// Add (or replace) a named column
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        self.insert_column(name, values);
        self
    }

    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Which column of a raw frame supplies the close price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceColumn {
    Close,
    AdjustedClose,
    Missing,
}

impl PriceColumn {
    /// Primary close column name
    pub const CLOSE: &'static str = "Close";
    /// Accepted spellings of the adjusted-close fallback
    pub const ADJUSTED_CLOSE: [&'static str; 2] = ["Adj Close", "Adj_Close"];

    /// Pick the close column of a frame: `Close` if present, else adjusted close.
    #[must_use]
    pub fn resolve(frame: &RawPriceFrame) -> Self {
        Self::locate(frame).map_or(PriceColumn::Missing, |(column, _)| column)
    }

    /// Resolve the close column and borrow its values in one step
    #[must_use]
    pub fn locate(frame: &RawPriceFrame) -> Option<(Self, &[Option<f64>])> {
        if let Some(values) = frame.column(Self::CLOSE) {
            return Some((PriceColumn::Close, values));
        }
        Self::ADJUSTED_CLOSE
            .iter()
            .find_map(|name| frame.column(name))
            .map(|values| (PriceColumn::AdjustedClose, values))
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PriceColumn::Close => Self::CLOSE,
            PriceColumn::AdjustedClose => Self::ADJUSTED_CLOSE[0],
            PriceColumn::Missing => "missing",
        }
    }
}

/// Why an instrument was left out of an alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExclusionReason {
    /// Neither `Close` nor an adjusted-close column exists
    MissingPriceColumn,
    /// The close column exists but holds no positive, finite value
    NoValidObservations,
}

impl ExclusionReason {
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            ExclusionReason::MissingPriceColumn => "no Close or Adj Close column",
            ExclusionReason::NoValidObservations => "no valid close prices",
        }
    }
}

/// An instrument the aligner could not use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedInstrument {
    pub instrument: InstrumentId,
    pub reason: ExclusionReason,
}
