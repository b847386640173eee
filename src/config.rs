//! Configuration loader - optional YAML page config + .env runtime settings
//!
//! Every value has a built-in default, so the dashboard runs with no config
//! file, no environment and no flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "spacex_launch_dash.csv";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8050;
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Page-level settings loaded from dashboard.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub dropdown: DropdownConfig,
    pub slider: SliderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropdownConfig {
    pub all_label: String,
    pub placeholder: String,
    pub searchable: bool,
}

/// Payload range slider bounds. Independent of the data's own payload range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub marks: Vec<f64>,
    pub value: [f64; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "SpaceX Launch Records Dashboard".to_string(),
            dropdown: DropdownConfig::default(),
            slider: SliderConfig::default(),
        }
    }
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            all_label: "All Sites".to_string(),
            placeholder: "Select a Launch Site".to_string(),
            searchable: true,
        }
    }
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 10000.0,
            step: 1000.0,
            marks: vec![0.0, 2500.0, 5000.0, 7500.0, 10000.0],
            value: [2500.0, 7500.0],
        }
    }
}

impl DashboardConfig {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: DashboardConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!("Loading dashboard config from {:?}", path);
            Self::load(path)
        } else {
            tracing::debug!("Dashboard config {:?} not found, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.slider;
        anyhow::ensure!(
            s.min >= 0.0 && s.min < s.max,
            "slider bounds must satisfy 0 <= min < max, got [{}, {}]",
            s.min,
            s.max
        );
        anyhow::ensure!(s.step > 0.0, "slider step must be positive, got {}", s.step);
        anyhow::ensure!(
            s.value[0] <= s.value[1] && s.value[0] >= s.min && s.value[1] <= s.max,
            "slider default {:?} must lie within [{}, {}]",
            s.value,
            s.min,
            s.max
        );
        Ok(())
    }
}

/// Runtime settings loaded from .env / environment
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_file: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_dir: DEFAULT_LOG_DIR.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from .env file and the process environment
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Settings::default();
        Settings {
            data_file: lookup("DASH_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            host: lookup("DASH_HOST").unwrap_or(defaults.host),
            port: lookup("DASH_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            log_dir: lookup("DASH_LOG_DIR").unwrap_or(defaults.log_dir),
        }
    }
}
