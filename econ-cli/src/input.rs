//! Input table options shared by the computing subcommands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use econ_common::config::{ColumnConfig, ComplexityConfig, Config};
use econ_complexity::{Complexity, RecordTable};
use tracing::info;

/// Where the trade table comes from and how to read it.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// CSV file with one row per (country, product, value)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Country column name (default from config: "country")
    #[arg(long)]
    pub country_col: Option<String>,

    /// Product column name (default from config: "product")
    #[arg(long)]
    pub product_col: Option<String>,

    /// Value column name (default from config: "export")
    #[arg(long)]
    pub value_col: Option<String>,

    /// RCA threshold for Mcp (default from config: 1.0)
    #[arg(long)]
    pub m_cp_thresh: Option<f64>,
}

impl InputArgs {
    /// Config columns with command line overrides applied.
    pub fn columns(&self, config: &Config) -> ColumnConfig {
        let defaults = &config.columns;
        ColumnConfig::new(
            self.country_col.as_deref().unwrap_or(&defaults.country),
            self.product_col.as_deref().unwrap_or(&defaults.product),
            self.value_col.as_deref().unwrap_or(&defaults.value),
        )
    }

    /// Config thresholds with command line overrides applied.
    pub fn thresholds(&self, config: &Config) -> ComplexityConfig {
        match self.m_cp_thresh {
            Some(thresh) => config.complexity.with_m_cp_thresh(thresh),
            None => config.complexity,
        }
    }

    /// Read the table and wrap it in a computation object.
    pub fn load(&self, config: &Config, thresholds: ComplexityConfig) -> Result<Complexity> {
        let table = RecordTable::from_csv_path(&self.input)
            .with_context(|| format!("Failed to read input table {}", self.input.display()))?;
        info!(path = %self.input.display(), rows = table.len(), "Loaded input table");

        Complexity::new(table, self.columns(config), thresholds)
            .with_context(|| format!("Invalid input table {}", self.input.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> InputArgs {
        InputArgs {
            input: PathBuf::from("trade.csv"),
            country_col: None,
            product_col: Some("hs4".into()),
            value_col: None,
            m_cp_thresh: None,
        }
    }

    #[test]
    fn test_column_overrides() {
        let columns = args().columns(&Config::default());
        assert_eq!(columns, ColumnConfig::new("country", "hs4", "export"));
    }

    #[test]
    fn test_threshold_override() {
        let config = Config::default();
        assert_eq!(args().thresholds(&config), config.complexity);

        let mut overridden = args();
        overridden.m_cp_thresh = Some(0.5);
        let thresholds = overridden.thresholds(&config);
        assert!((thresholds.m_cp_thresh - 0.5).abs() < f64::EPSILON);
        assert!((thresholds.edge_weight_thresh - 0.65).abs() < f64::EPSILON);
    }
}
