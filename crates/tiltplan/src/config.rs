//! Application configuration stored as YAML
//!
//! Directory structure:
//! ~/.tiltplan/
//!   config.yaml          # Pair, momentum, weights, deposits, data location
//!   tiltplan.log
//!   data/
//!     SPY/price/daily_prices.csv
//!     QQQ/price/daily_prices.csv

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use tiltplan_core::AnalysisConfig;
use tracing::{debug, info};

use crate::ingest::VerifyOptions;
use crate::util::io::atomic_write;

/// Name of the configuration file inside the home directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Where price files live and how strictly they are checked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DataConfig {
    /// Root of the `<TICKER>/price/daily_prices.csv` tree (default: ~/.tiltplan/data)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub verify: VerifyOptions,
}

/// Configuration stored in config.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub data: DataConfig,
}

impl AppConfig {
    /// Get the default home directory (~/.tiltplan/)
    pub fn default_home() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tiltplan")
    }

    /// Get the default config path (~/.tiltplan/config.yaml)
    pub fn default_path() -> PathBuf {
        Self::default_home().join(CONFIG_FILE)
    }

    /// The configured data directory, or `<home>/data`
    pub fn data_dir(&self) -> PathBuf {
        self.data
            .data_dir
            .clone()
            .unwrap_or_else(|| Self::default_home().join("data"))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    /// Load a configuration file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .wrap_err_with(|| format!("Failed to parse config {}", path.display()))?;

        config
            .analysis
            .validate()
            .wrap_err_with(|| format!("Invalid analysis settings in {}", path.display()))?;

        info!(path = %path.display(), pair = %config.analysis.pair, "loaded config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = self.to_yaml().wrap_err("Failed to serialize config")?;
        atomic_write(path, &yaml)
            .wrap_err_with(|| format!("Failed to write config {}", path.display()))?;

        info!(path = %path.display(), "saved config");
        Ok(())
    }
}
