//! Econ Common - Shared configuration and utilities for the economic complexity tools.
//!
//! This crate provides:
//! - Configuration types and loading
//! - Configuration validation
//! - Logging setup

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod logging;
pub mod validation;

pub use config::{ColumnConfig, ComplexityConfig, Config, ExportConfig, ObservabilityConfig};
pub use validation::{Validate, ValidationError, ValidationResult};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{ColumnConfig, ComplexityConfig, Config};
    pub use crate::logging::init_logging;
    pub use crate::validation::{Validate, ValidationError};
}
