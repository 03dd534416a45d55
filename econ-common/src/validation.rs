//! Configuration validation.
//!
//! Checks thresholds, column names, and logging options before a run starts
//! so that bad settings fail fast instead of producing meaningless indexes.

use thiserror::Error;

use crate::config::{ColumnConfig, ComplexityConfig, Config, ObservabilityConfig};

/// Log formats understood by [`crate::logging::init_logging`].
pub const LOG_FORMATS: &[&str] = &["json", "pretty"];

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration conflict: {reason}")]
    Conflict { reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Validate for Config {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.complexity.validate() {
            errors.push(e);
        }
        if let Err(e) = self.columns.validate() {
            errors.push(e);
        }
        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }
}

impl Config {
    /// Load, apply environment overrides, and validate.
    pub fn load_and_validate(path: Option<&std::path::Path>) -> anyhow::Result<Self> {
        let config = Self::load_with_env(path)?;
        config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(config)
    }
}

impl Validate for ComplexityConfig {
    fn validate(&self) -> ValidationResult<()> {
        if !self.m_cp_thresh.is_finite() || self.m_cp_thresh < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "complexity.m_cp_thresh".into(),
                reason: format!("must be a finite non-negative number, got {}", self.m_cp_thresh),
            });
        }

        if !self.edge_weight_thresh.is_finite()
            || !(0.0..=1.0).contains(&self.edge_weight_thresh)
        {
            return Err(ValidationError::InvalidValue {
                field: "complexity.edge_weight_thresh".into(),
                reason: format!("must lie in [0, 1], got {}", self.edge_weight_thresh),
            });
        }

        Ok(())
    }
}

impl Validate for ColumnConfig {
    fn validate(&self) -> ValidationResult<()> {
        let fields = [
            ("columns.country", &self.country),
            ("columns.product", &self.product),
            ("columns.value", &self.value),
        ];

        for (field, name) in fields {
            if name.trim().is_empty() {
                return Err(ValidationError::MissingField {
                    field: field.into(),
                });
            }
        }

        for i in 0..fields.len() {
            for j in (i + 1)..fields.len() {
                if fields[i].1 == fields[j].1 {
                    return Err(ValidationError::Conflict {
                        reason: format!(
                            "Column '{}' is used by both {} and {}",
                            fields[i].1, fields[i].0, fields[j].0
                        ),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("expected one of {:?}, got '{}'", LOG_FORMATS, self.log_format),
            });
        }

        Ok(())
    }
}
