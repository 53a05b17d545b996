//! CSV price ingestion and data quality checks
//!
//! Directory layout:
//! <data_dir>/
//!   SPY/
//!     price/
//!       daily_prices.csv     # Date, Open, High, Low, Close, Adj Close, ...
//!   QQQ/
//!     price/
//!       daily_prices.csv

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use jiff::Zoned;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use tiltplan_core::RawFrames;
use tiltplan_core::date_math;
use tiltplan_core::model::{InstrumentId, PriceColumn, RawPriceFrame, RawTimestamp};
use tracing::{debug, info, warn};

/// Columns a complete daily price file carries
pub const EXPECTED_COLUMNS: [&str; 5] = ["Open", "High", "Low", "Close", "Adj Close"];

/// Header names accepted for the timestamp column
const DATE_HEADERS: [&str; 3] = ["Date", "Datetime", "date"];

/// Error types for ingestion
#[derive(Debug)]
pub enum IngestError {
    Io(String),
    Parse(String),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Io(msg) => write!(f, "IO error: {msg}"),
            IngestError::Parse(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for IngestError {}

/// Location of an instrument's daily price file
pub fn price_file(data_dir: &Path, ticker: &InstrumentId) -> PathBuf {
    data_dir
        .join(ticker.as_str())
        .join("price")
        .join("daily_prices.csv")
}

/// Parse one timestamp cell.
///
/// Accepts zoned timestamps (`2020-01-02T00:00:00-05:00[America/New_York]`),
/// and anything starting with a civil date (`2020-01-02`,
/// `2020-01-02 00:00:00-05:00`, `2020-01-02T00:00:00Z`). For the latter only
/// the written date is kept, which is the local trading date.
pub fn parse_timestamp(cell: &str) -> Option<RawTimestamp> {
    let cell = cell.trim();
    if let Ok(zoned) = cell.parse::<Zoned>() {
        return Some(RawTimestamp::Zoned(zoned));
    }
    let date_part = cell.split([' ', 'T']).next()?;
    date_part.parse::<Date>().ok().map(RawTimestamp::from)
}

/// Parse one numeric cell; blanks and non-numbers are missing
fn parse_value(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a daily price CSV into a raw frame.
///
/// The timestamp column is the first header named `Date`, `Datetime` or
/// `date`, else the first column. Every other column becomes a numeric column
/// with absent cells where a value is blank or not a number. Rows whose
/// timestamp cannot be parsed are skipped.
pub fn parse_price_csv<R: Read>(reader: R, source: &str) -> Result<RawPriceFrame, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| IngestError::Parse(format!("Failed to read header of {source}: {e}")))?
        .clone();
    if headers.is_empty() {
        return Err(IngestError::Parse(format!("{source} has no header row")));
    }

    let date_col = headers
        .iter()
        .position(|h| DATE_HEADERS.contains(&h))
        .unwrap_or(0);
    let value_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_col)
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut timestamps = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); value_cols.len()];
    let mut skipped = 0usize;

    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| {
            IngestError::Parse(format!("Failed to read row {} of {source}: {e}", line + 2))
        })?;
        let Some(timestamp) = record.get(date_col).and_then(parse_timestamp) else {
            skipped += 1;
            continue;
        };
        timestamps.push(timestamp);
        for (column, (idx, _)) in columns.iter_mut().zip(&value_cols) {
            column.push(record.get(*idx).and_then(parse_value));
        }
    }

    if skipped > 0 {
        warn!(source, skipped, "skipped rows with unreadable timestamps");
    }
    debug!(source, rows = timestamps.len(), columns = value_cols.len(), "parsed price file");

    let frame = value_cols
        .into_iter()
        .zip(columns)
        .fold(RawPriceFrame::new(timestamps), |frame, ((_, name), values)| {
            frame.with_column(name, values)
        });
    Ok(frame)
}

/// Load one daily price file
pub fn load_price_file(path: &Path) -> Result<RawPriceFrame, IngestError> {
    let file = File::open(path)
        .map_err(|e| IngestError::Io(format!("Failed to open {}: {e}", path.display())))?;
    parse_price_csv(file, &path.display().to_string())
}

/// Load the price files of several instruments from a data directory.
///
/// Instruments without a price file are left out of the result (and logged);
/// the analysis then reports them as missing.
pub fn load_frames(data_dir: &Path, tickers: &[InstrumentId]) -> Result<RawFrames, IngestError> {
    let mut frames = RawFrames::default();
    for ticker in tickers {
        let path = price_file(data_dir, ticker);
        if !path.exists() {
            warn!(instrument = %ticker, path = %path.display(), "no price file");
            continue;
        }
        let frame = load_price_file(&path)?;
        info!(instrument = %ticker, rows = frame.len(), "loaded prices");
        frames.insert(ticker.clone(), frame);
    }
    Ok(frames)
}

/// Thresholds for `verify`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyOptions {
    /// Largest tolerated share of missing cells in the close column
    pub max_missing_share: f64,
    /// Required span between first and last observation; 0 disables the check
    pub min_history_years: f64,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            max_missing_share: 0.10,
            min_history_years: 0.0,
        }
    }
}

/// A data quality problem found by `verify`
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    Empty,
    MissingColumns(Vec<String>),
    NoCloseColumn,
    TooManyMissing { column: String, share: f64 },
    ShortHistory { first: Date, last: Date, years: f64 },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::Empty => write!(f, "no rows"),
            Finding::MissingColumns(cols) => write!(f, "missing columns: {}", cols.join(", ")),
            Finding::NoCloseColumn => write!(f, "no Close or Adj Close column"),
            Finding::TooManyMissing { column, share } => {
                write!(f, "{column} is {:.1}% missing", share * 100.0)
            }
            Finding::ShortHistory { first, last, years } => {
                write!(f, "only {years:.1} years of history ({first} to {last})")
            }
        }
    }
}

/// Quality checks on a raw frame, reported rather than enforced
pub fn verify(frame: &RawPriceFrame, options: &VerifyOptions) -> Vec<Finding> {
    if frame.is_empty() {
        return vec![Finding::Empty];
    }
    let mut findings = Vec::new();

    let missing: Vec<String> = EXPECTED_COLUMNS
        .iter()
        .filter(|name| {
            frame.column(name).is_none()
                && !(**name == "Adj Close" && frame.column("Adj_Close").is_some())
        })
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        findings.push(Finding::MissingColumns(missing));
    }
    match PriceColumn::locate(frame) {
        None => findings.push(Finding::NoCloseColumn),
        Some((column, values)) => {
            let rows = frame.len();
            let present = values.iter().take(rows).filter(|v| v.is_some()).count();
            let share = (rows - present) as f64 / rows as f64;
            if share > options.max_missing_share {
                findings.push(Finding::TooManyMissing {
                    column: column.label().to_string(),
                    share,
                });
            }
        }
    }

    if options.min_history_years > 0.0 {
        let dates = frame.timestamps.iter().map(RawTimestamp::trading_date);
        if let (Some(first), Some(last)) = (dates.clone().min(), dates.max()) {
            let years = date_math::years_between(first, last);
            if years < options.min_history_years {
                findings.push(Finding::ShortHistory { first, last, years });
            }
        }
    }

    findings
}

/// Run `verify` on every frame and log what it finds
pub fn verify_all(frames: &RawFrames, options: &VerifyOptions) -> Vec<(InstrumentId, Finding)> {
    let mut tickers: Vec<&InstrumentId> = frames.keys().collect();
    tickers.sort();

    let mut all = Vec::new();
    for ticker in tickers {
        let findings = verify(&frames[ticker], options);
        if findings.is_empty() {
            debug!(instrument = %ticker, "price data passed verification");
        }
        for finding in findings {
            warn!(instrument = %ticker, %finding, "price data verification");
            all.push((ticker.clone(), finding));
        }
    }
    all
}
