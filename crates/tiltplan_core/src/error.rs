use std::fmt;

use crate::model::{ExcludedInstrument, ExclusionReason, InstrumentId};

/// Errors from building an aligned table
#[derive(Debug, Clone, PartialEq)]
pub enum AlignError {
    /// No instrument had a usable close column
    NoUsableData { excluded: Vec<ExcludedInstrument> },
    /// Instruments had data but no date in common
    EmptyAlignment { instruments: Vec<InstrumentId> },
}

impl fmt::Display for AlignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignError::NoUsableData { excluded } => {
                write!(f, "no usable price data")?;
                for (i, e) in excluded.iter().enumerate() {
                    let sep = if i == 0 { ": " } else { ", " };
                    write!(f, "{sep}{} ({})", e.instrument, e.reason.describe())?;
                }
                Ok(())
            }
            AlignError::EmptyAlignment { instruments } => {
                let names: Vec<&str> = instruments.iter().map(InstrumentId::as_str).collect();
                write!(f, "no date common to all of {}", names.join(", "))
            }
        }
    }
}

impl std::error::Error for AlignError {}

/// Invalid analysis parameters
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroWindow,
    QuantileOutOfRange {
        name: &'static str,
        value: f64,
    },
    InvertedQuantiles {
        weak: f64,
        strong: f64,
    },
    InvalidWeights {
        regime: &'static str,
        benchmark: f64,
        growth: f64,
    },
    InvalidAmount {
        name: &'static str,
        value: f64,
    },
    SameInstrument(InstrumentId),
    /// Rolling statistics need at least two observations per window
    ShortStatsWindow {
        name: &'static str,
        value: usize,
    },
    NonFiniteRate(f64),
    /// Synthetic price generator parameters
    InvalidSynthetic {
        parameter: &'static str,
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroWindow => write!(f, "momentum window must be at least 1"),
            ConfigError::QuantileOutOfRange { name, value } => {
                write!(f, "{name} quantile {value} is outside [0, 1]")
            }
            ConfigError::InvertedQuantiles { weak, strong } => {
                write!(
                    f,
                    "weak quantile {weak} must not exceed strong quantile {strong}"
                )
            }
            ConfigError::InvalidWeights {
                regime,
                benchmark,
                growth,
            } => write!(
                f,
                "{regime} weights ({benchmark}, {growth}) must lie in [0, 1] and sum to 1"
            ),
            ConfigError::InvalidAmount { name, value } => {
                write!(f, "{name} must be finite and non-negative, got {value}")
            }
            ConfigError::SameInstrument(id) => {
                write!(f, "benchmark and growth instrument are both {id}")
            }
            ConfigError::ShortStatsWindow { name, value } => {
                write!(f, "{name} window must be at least 2, got {value}")
            }
            ConfigError::NonFiniteRate(rate) => write!(f, "risk-free rate must be finite, got {rate}"),
            ConfigError::InvalidSynthetic { parameter, value } => {
                write!(f, "invalid synthetic {parameter}: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors from a pairwise regime analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// One instrument of the pair has no usable prices.
    ///
    /// `reason` is `None` when the instrument was not supplied at all.
    MissingInstrumentData {
        instrument: InstrumentId,
        reason: Option<ExclusionReason>,
    },
    Align(AlignError),
    Config(ConfigError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::MissingInstrumentData { instrument, reason } => match reason {
                Some(reason) => write!(
                    f,
                    "missing data for {instrument}: {}",
                    reason.describe()
                ),
                None => write!(f, "missing data for {instrument}: not supplied"),
            },
            AnalysisError::Align(e) => write!(f, "{e}"),
            AnalysisError::Config(e) => write!(f, "configuration error: {e}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Align(e) => Some(e),
            AnalysisError::Config(e) => Some(e),
            AnalysisError::MissingInstrumentData { .. } => None,
        }
    }
}

impl From<AlignError> for AnalysisError {
    fn from(err: AlignError) -> Self {
        AnalysisError::Align(err)
    }
}

impl From<ConfigError> for AnalysisError {
    fn from(err: ConfigError) -> Self {
        AnalysisError::Config(err)
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_usable_data_names_every_instrument() {
        let err = AlignError::NoUsableData {
            excluded: vec![
                ExcludedInstrument {
                    instrument: "SPY".into(),
                    reason: ExclusionReason::MissingPriceColumn,
                },
                ExcludedInstrument {
                    instrument: "QQQ".into(),
                    reason: ExclusionReason::NoValidObservations,
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "no usable price data: SPY (no Close or Adj Close column), QQQ (no valid close prices)"
        );
    }

    #[test]
    fn test_analysis_error_chains_source() {
        use std::error::Error;

        let err = AnalysisError::from(ConfigError::ZeroWindow);
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "configuration error: momentum window must be at least 1"
        );
    }
}
