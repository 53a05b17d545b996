//! Relative-momentum allocation library
//!
//! This crate turns two price histories into a regime-tilted allocation and
//! simulates what that allocation would have done to invested capital.
//! It supports:
//! - Alignment of raw price frames onto a common timezone-naive calendar
//! - A relative-momentum regime classifier (growth over benchmark)
//! - Regime-conditioned target weights from a fixed lookup table
//! - Lump-sum simulation with daily compounding
//! - Periodic-contribution simulation with per-period compounding
//! - Summary statistics and batch evaluation of many instrument pairs
//! - Pair risk statistics: volatility, Sharpe ratio, rolling correlation
//!
//! # Pipeline
//!
//! ```ignore
//! use tiltplan_core::{AnalysisConfig, analyze};
//!
//! let config = AnalysisConfig::default(); // SPY vs QQQ, 60-day window
//! let report = analyze(&raw_frames, &config)?;
//!
//! println!("lump sum final value: {:?}", report.lump_sum.last());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod align;
pub mod analysis;
pub mod date_math;
pub mod error;
pub mod momentum;
pub mod schedule;
pub mod simulation;
pub mod stats;
pub mod summary;
pub mod synthetic;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analysis::{AnalysisReport, PairRequest, RawFrames, analyze, analyze_aligned, analyze_batch};
pub use config::{AnalysisConfig, MomentumConfig, StatsConfig};
pub use error::{AlignError, AnalysisError, ConfigError};
