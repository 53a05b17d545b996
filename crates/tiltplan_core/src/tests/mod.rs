//! Scenario tests for the analysis pipeline
//!
//! Tests are organized by topic:
//! - `alignment` - Cleaning and calendar intersection of raw frames
//! - `regimes` - Momentum, thresholds and the weight lookup
//! - `simulation` - Lump-sum and periodic-contribution simulators
//! - `pipeline` - End-to-end analysis, batches and determinism

mod regimes;
mod simulation;
