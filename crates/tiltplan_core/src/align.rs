//! Series alignment: raw frames to a clean, date-intersected table
//!
//! Each instrument is cleaned on its own calendar first (close column
//! resolution, timezone normalisation, invalid-price removal, duplicate
//! dates). The per-instrument series are then joined on the intersection of
//! their calendars. Returns are computed per instrument before the join, so a
//! return on an aligned date always refers to that instrument's own previous
//! observation.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AlignError;
use crate::model::{
    AlignedTable, ExcludedInstrument, ExclusionReason, InstrumentId, PriceColumn, PriceSeries,
    RawPriceFrame,
};

/// Output of a successful alignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    /// Close prices on dates every usable instrument traded
    pub prices: AlignedTable,
    /// Simple returns on dates where every usable instrument has one
    pub returns: AlignedTable,
    /// Close column each included instrument was read from
    pub columns: Vec<(InstrumentId, PriceColumn)>,
    /// Instruments left out, with the reason
    pub excluded: Vec<ExcludedInstrument>,
}

impl Alignment {
    /// Whether every supplied instrument made it into the table
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.excluded.is_empty()
    }

    #[must_use]
    pub fn exclusion(&self, instrument: &InstrumentId) -> Option<ExclusionReason> {
        self.excluded
            .iter()
            .find(|e| &e.instrument == instrument)
            .map(|e| e.reason)
    }
}

/// Turn one raw frame into a clean price series
pub fn clean_series(frame: &RawPriceFrame) -> Result<(PriceColumn, PriceSeries), ExclusionReason> {
    let (column, values) = PriceColumn::locate(frame).ok_or(ExclusionReason::MissingPriceColumn)?;

    let observations = frame
        .timestamps
        .iter()
        .zip(values)
        .filter_map(|(ts, value)| value.map(|v| (ts.trading_date(), v)));
    let series = PriceSeries::from_observations(observations);

    if series.is_empty() {
        return Err(ExclusionReason::NoValidObservations);
    }
    Ok((column, series))
}

/// Align raw frames on the intersection of their calendars.
///
/// Instruments without a usable close column are excluded and listed in the
/// result. Fails when nothing usable remains or the calendars share no date.
pub fn align<'a>(
    raw: impl IntoIterator<Item = (&'a InstrumentId, &'a RawPriceFrame)>,
) -> Result<Alignment, AlignError> {
    let mut frames: Vec<_> = raw.into_iter().collect();
    // Column order must not depend on map iteration order
    frames.sort_by(|a, b| a.0.cmp(b.0));

    let mut series = Vec::with_capacity(frames.len());
    let mut columns = Vec::with_capacity(frames.len());
    let mut excluded = Vec::new();

    for (id, frame) in frames {
        match clean_series(frame) {
            Ok((column, s)) => {
                debug!(
                    instrument = %id,
                    column = column.label(),
                    raw_rows = frame.len(),
                    clean_rows = s.len(),
                    "cleaned price series"
                );
                columns.push((id.clone(), column));
                series.push((id.clone(), s));
            }
            Err(reason) => {
                warn!(instrument = %id, reason = reason.describe(), "excluding instrument");
                excluded.push(ExcludedInstrument {
                    instrument: id.clone(),
                    reason,
                });
            }
        }
    }

    if series.is_empty() {
        return Err(AlignError::NoUsableData { excluded });
    }

    let prices = join_prices(&series);
    if prices.is_empty() {
        return Err(AlignError::EmptyAlignment {
            instruments: series.into_iter().map(|(id, _)| id).collect(),
        });
    }
    let returns = join_returns(&series);

    debug!(
        instruments = series.len(),
        price_rows = prices.len(),
        return_rows = returns.len(),
        "aligned price table"
    );

    Ok(Alignment {
        prices,
        returns,
        columns,
        excluded,
    })
}

/// Join price series on the dates they all share
pub fn join_prices(series: &[(InstrumentId, PriceSeries)]) -> AlignedTable {
    let calendars: Vec<_> = series.iter().map(|(_, s)| s.dates()).collect();
    let dates = intersect_all(&calendars);
    let columns = series
        .iter()
        .map(|(_, s)| pick(s.dates(), s.values(), &dates))
        .collect();
    AlignedTable::from_parts(
        dates,
        series.iter().map(|(id, _)| id.clone()).collect(),
        columns,
    )
}

/// Per-instrument simple returns joined on the dates they all share
pub fn join_returns(series: &[(InstrumentId, PriceSeries)]) -> AlignedTable {
    let returns: Vec<_> = series.iter().map(|(_, s)| s.returns()).collect();
    let calendars: Vec<_> = returns.iter().map(|r| r.dates()).collect();
    let dates = intersect_all(&calendars);
    let columns = returns
        .iter()
        .map(|r| pick(r.dates(), r.values(), &dates))
        .collect();
    AlignedTable::from_parts(
        dates,
        series.iter().map(|(id, _)| id.clone()).collect(),
        columns,
    )
}

/// Intersection of several strictly increasing calendars
fn intersect_all<T: Ord + Copy>(calendars: &[&[T]]) -> Vec<T> {
    let Some((first, rest)) = calendars.split_first() else {
        return Vec::new();
    };
    rest.iter()
        .fold(first.to_vec(), |acc, cal| intersect_sorted(&acc, cal))
}

/// Intersection of two strictly increasing slices
pub(crate) fn intersect_sorted<T: Ord + Copy>(a: &[T], b: &[T]) -> Vec<T> {
    matching_indices(a, b).into_iter().map(|(i, _)| a[i]).collect()
}

/// Index pairs `(i, j)` with `a[i] == b[j]`, for strictly increasing inputs
pub(crate) fn matching_indices<T: Ord>(a: &[T], b: &[T]) -> Vec<(usize, usize)> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push((i, j));
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Values of a sorted series on a subset of its dates
fn pick<T: Ord + Copy>(dates: &[T], values: &[f64], subset: &[T]) -> Vec<f64> {
    matching_indices(dates, subset)
        .into_iter()
        .map(|(i, _)| values[i])
        .collect()
}
