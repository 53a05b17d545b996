//! Analysis parameters
//!
//! `AnalysisConfig` holds everything one pairwise analysis needs besides the
//! price data. Every field has a serde default, so a partial YAML document
//! deserializes into a complete configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{Pair, Period, PeriodAggregation, RegimeWeights};

fn default_window() -> usize {
    60
}

fn default_strong_quantile() -> f64 {
    0.70
}

fn default_weak_quantile() -> f64 {
    0.30
}

fn default_correlation_window() -> usize {
    60
}

fn default_volatility_window() -> usize {
    252
}

fn default_risk_free_rate() -> f64 {
    0.03
}

fn default_lump_sum() -> f64 {
    50_000.0
}

fn default_periodic_deposit() -> f64 {
    7_500.0
}

/// Momentum lookback and regime cut-offs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Lookback in observations
    #[serde(default = "default_window")]
    pub window: usize,
    /// Quantile above which momentum is `Strong`
    #[serde(default = "default_strong_quantile")]
    pub strong_quantile: f64,
    /// Quantile below which momentum is `Weak`
    #[serde(default = "default_weak_quantile")]
    pub weak_quantile: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            strong_quantile: default_strong_quantile(),
            weak_quantile: default_weak_quantile(),
        }
    }
}

impl MomentumConfig {
    #[must_use]
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        for (name, value) in [
            ("strong", self.strong_quantile),
            ("weak", self.weak_quantile),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::QuantileOutOfRange { name, value });
            }
        }
        if self.weak_quantile > self.strong_quantile {
            return Err(ConfigError::InvertedQuantiles {
                weak: self.weak_quantile,
                strong: self.strong_quantile,
            });
        }
        Ok(())
    }
}

/// Windows and rates for the pair statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Rows per rolling correlation window
    #[serde(default = "default_correlation_window")]
    pub correlation_window: usize,
    /// Rows per rolling volatility window
    #[serde(default = "default_volatility_window")]
    pub volatility_window: usize,
    /// Annual rate subtracted in the Sharpe ratio
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            correlation_window: default_correlation_window(),
            volatility_window: default_volatility_window(),
            risk_free_rate: default_risk_free_rate(),
        }
    }
}

impl StatsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("correlation", self.correlation_window),
            ("volatility", self.volatility_window),
        ] {
            if value < 2 {
                return Err(ConfigError::ShortStatsWindow { name, value });
            }
        }
        if !self.risk_free_rate.is_finite() {
            return Err(ConfigError::NonFiniteRate(self.risk_free_rate));
        }
        Ok(())
    }
}

/// Complete configuration of one pairwise analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub pair: Pair,
    #[serde(default)]
    pub momentum: MomentumConfig,
    #[serde(default)]
    pub weights: RegimeWeights,

    /// Initial deposit of the lump-sum simulation
    #[serde(default = "default_lump_sum")]
    pub lump_sum: f64,
    /// Deposit made at the start of every period
    #[serde(default = "default_periodic_deposit")]
    pub periodic_deposit: f64,
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub aggregation: PeriodAggregation,
    #[serde(default)]
    pub stats: StatsConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pair: Pair::default(),
            momentum: MomentumConfig::default(),
            weights: RegimeWeights::default(),
            lump_sum: default_lump_sum(),
            periodic_deposit: default_periodic_deposit(),
            period: Period::default(),
            aggregation: PeriodAggregation::default(),
            stats: StatsConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pair.benchmark == self.pair.growth {
            return Err(ConfigError::SameInstrument(self.pair.growth.clone()));
        }
        self.momentum.validate()?;
        self.weights.validate()?;
        self.stats.validate()?;
        for (name, value) in [
            ("lump sum", self.lump_sum),
            ("periodic deposit", self.periodic_deposit),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidAmount { name, value });
            }
        }
        Ok(())
    }
}
