//! Error types for the complexity pipeline.

use econ_common::validation::ValidationError;
use thiserror::Error;

/// Result type alias using the complexity error type.
pub type Result<T> = std::result::Result<T, ComplexityError>;

/// Unified error type for the index pipeline.
#[derive(Error, Debug)]
pub enum ComplexityError {
    /// Malformed or missing input columns, non-numeric or negative values
    #[error("Data error: {0}")]
    Data(String),

    /// A derived artifact was requested before its calculate step ran
    #[error("State error: '{0}' has not been computed yet")]
    State(&'static str),

    /// Degenerate matrix or out-of-order pipeline call
    #[error("Computation error: {0}")]
    Computation(String),

    /// Invalid thresholds or column configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ValidationError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ComplexityError>,
    },
}

impl ComplexityError {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping context wrappers.
    pub fn root(&self) -> &Self {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this is an input data error.
    pub fn is_data(&self) -> bool {
        matches!(self.root(), Self::Data(_))
    }

    /// Check if this is a not-yet-computed error.
    pub fn is_state(&self) -> bool {
        matches!(self.root(), Self::State(_))
    }

    /// Check if this is a computation error.
    pub fn is_computation(&self) -> bool {
        matches!(self.root(), Self::Computation(_))
    }
}

/// Extension trait for adding context to any error type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<ComplexityError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}
