//! Command-line front end for the relative-momentum allocation analysis
//!
//! This crate supplies what the numeric core leaves to its collaborators:
//! - CSV ingestion of downloaded daily prices, with data quality checks
//! - YAML configuration stored under `~/.tiltplan/`
//! - File logging with size-based rotation
//! - Text and JSON reports

pub mod app;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod report;
pub mod util;

pub use app::{demo, init_config, run};
pub use config::{AppConfig, DataConfig};
pub use logging::init_logging;
