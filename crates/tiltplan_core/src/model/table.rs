//! Multi-instrument tables on a shared calendar

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::ids::InstrumentId;

/// Date-aligned, fully populated table with one column per instrument.
///
/// Used both for prices and for simple returns. Every column has exactly one
/// value per date and dates are strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedTable {
    dates: Vec<Date>,
    instruments: Vec<InstrumentId>,
    columns: Vec<Vec<f64>>,
}

impl AlignedTable {
    /// Build a validated table, or `None` if shapes disagree, dates are not
    /// strictly increasing, an instrument repeats, or a value is not finite.
    #[must_use]
    pub fn new(
        dates: Vec<Date>,
        instruments: Vec<InstrumentId>,
        columns: Vec<Vec<f64>>,
    ) -> Option<Self> {
        let shaped =
            instruments.len() == columns.len() && columns.iter().all(|c| c.len() == dates.len());
        let increasing = dates.windows(2).all(|w| w[0] < w[1]);
        let unique = instruments
            .iter()
            .enumerate()
            .all(|(i, id)| !instruments[..i].contains(id));
        let finite = columns.iter().flatten().all(|v| v.is_finite());
        (shaped && increasing && unique && finite).then_some(Self {
            dates,
            instruments,
            columns,
        })
    }

    /// Assemble a table whose invariants the caller already guarantees
    pub(crate) fn from_parts(
        dates: Vec<Date>,
        instruments: Vec<InstrumentId>,
        columns: Vec<Vec<f64>>,
    ) -> Self {
        debug_assert_eq!(instruments.len(), columns.len());
        debug_assert!(columns.iter().all(|c| c.len() == dates.len()));
        Self {
            dates,
            instruments,
            columns,
        }
    }

    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    #[must_use]
    pub fn instruments(&self) -> &[InstrumentId] {
        &self.instruments
    }

    /// Number of rows (dates)
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    #[must_use]
    pub fn position(&self, instrument: &InstrumentId) -> Option<usize> {
        self.instruments.iter().position(|id| id == instrument)
    }

    #[must_use]
    pub fn column(&self, instrument: &InstrumentId) -> Option<&[f64]> {
        self.position(instrument).map(|idx| self.columns[idx].as_slice())
    }

    #[must_use]
    pub fn column_at(&self, idx: usize) -> &[f64] {
        &self.columns[idx]
    }

    /// Value of one instrument on one row
    #[must_use]
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.columns[col][row]
    }

    /// Copy holding only the given rows, in the given order
    pub(crate) fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            dates: rows.iter().map(|&i| self.dates[i]).collect(),
            instruments: self.instruments.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| rows.iter().map(|&i| c[i]).collect())
                .collect(),
        }
    }

    /// Copy of the table restricted to the given instruments, in that order
    #[must_use]
    pub fn select(&self, instruments: &[InstrumentId]) -> Option<Self> {
        let columns = instruments
            .iter()
            .map(|id| self.column(id).map(<[f64]>::to_vec))
            .collect::<Option<Vec<_>>>()?;
        Some(Self::from_parts(
            self.dates.clone(),
            instruments.to_vec(),
            columns,
        ))
    }
}
