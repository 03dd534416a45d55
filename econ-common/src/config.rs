//! Configuration management for the economic complexity tools.
//!
//! All tools share a configuration file at `~/.econci/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (ECON_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `ECON_M_CP_THRESH` → complexity.m_cp_thresh
//! - `ECON_EDGE_WEIGHT_THRESH` → complexity.edge_weight_thresh
//! - `ECON_OUTPUT_DIR` → export.output_dir
//! - `ECON_LOG_LEVEL` → observability.log_level
//! - `ECON_LOG_FORMAT` → observability.log_format

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".econci"),
        |dirs| dirs.home_dir().join(".econci"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Complexity Configuration
// ============================================================================

/// Thresholds used by the index pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityConfig {
    /// RCA values greater than or equal to this become 1 in Mcp
    #[serde(default = "default_m_cp_thresh")]
    pub m_cp_thresh: f64,

    /// Proximity at or above which extra edges join the spanning tree
    #[serde(default = "default_edge_weight_thresh")]
    pub edge_weight_thresh: f64,
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        Self {
            m_cp_thresh: default_m_cp_thresh(),
            edge_weight_thresh: default_edge_weight_thresh(),
        }
    }
}

impl ComplexityConfig {
    /// Override the Mcp threshold.
    pub fn with_m_cp_thresh(mut self, thresh: f64) -> Self {
        self.m_cp_thresh = thresh;
        self
    }

    /// Override the product space edge threshold.
    pub fn with_edge_weight_thresh(mut self, thresh: f64) -> Self {
        self.edge_weight_thresh = thresh;
        self
    }
}

fn default_m_cp_thresh() -> f64 {
    1.0
}

fn default_edge_weight_thresh() -> f64 {
    0.65
}

// ============================================================================
// Column Configuration
// ============================================================================

/// Names of the columns holding country, product, and export value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(default = "default_country_column")]
    pub country: String,

    #[serde(default = "default_product_column")]
    pub product: String,

    #[serde(default = "default_value_column")]
    pub value: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            country: default_country_column(),
            product: default_product_column(),
            value: default_value_column(),
        }
    }
}

impl ColumnConfig {
    /// Create a column mapping from explicit names.
    pub fn new(
        country: impl Into<String>,
        product: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            product: product.into(),
            value: value.into(),
        }
    }
}

fn default_country_column() -> String {
    "country".into()
}

fn default_product_column() -> String {
    "product".into()
}

fn default_value_column() -> String {
    "export".into()
}

// ============================================================================
// Export Configuration
// ============================================================================

/// Where command line runs write their CSV files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets to hold at `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration shared by the library and the CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub complexity: ComplexityConfig,

    #[serde(default)]
    pub columns: ColumnConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration (explicit path or default) with environment overrides.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("ECON_M_CP_THRESH") {
            match value.parse() {
                Ok(v) => self.complexity.m_cp_thresh = v,
                Err(_) => tracing::warn!(value = %value, "Ignoring unparsable ECON_M_CP_THRESH"),
            }
        }
        if let Ok(value) = std::env::var("ECON_EDGE_WEIGHT_THRESH") {
            match value.parse() {
                Ok(v) => self.complexity.edge_weight_thresh = v,
                Err(_) => {
                    tracing::warn!(value = %value, "Ignoring unparsable ECON_EDGE_WEIGHT_THRESH")
                }
            }
        }
        if let Ok(dir) = std::env::var("ECON_OUTPUT_DIR") {
            self.export.output_dir = PathBuf::from(dir);
        }
        if let Ok(level) = std::env::var("ECON_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(format) = std::env::var("ECON_LOG_FORMAT") {
            self.observability.log_format = format;
        }
    }

    /// Save configuration to the given path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create config directory {}", dir.display())
                })?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }
}
