//! Error types for the pricing engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for the few conditions the engine signals instead of degrading to zero.

use rust_decimal::Decimal;
use thiserror::Error;

/// Broad classification of an [`EngineError`].
///
/// Callers use this to decide how to surface a failure: configuration
/// problems are operator issues, validation errors are business-rule
/// rejections of the supplied input, and system errors indicate input that
/// is structurally unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The engine configuration could not be read or parsed.
    Configuration,
    /// The input violated a business rule (e.g. a 100% margin).
    Validation,
    /// The input was structurally invalid or the calculation itself failed.
    System,
}

/// The main error type for the pricing engine.
///
/// # Example
///
/// ```
/// use desk_pricing_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A margin configuration that cannot produce a finite price.
    #[error("Invalid margin {value}: {message}")]
    InvalidMargin {
        /// The offending margin value.
        value: Decimal,
        /// Why the margin was rejected.
        message: String,
    },

    /// Input that is structurally unusable by the engine.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The field or request part that was invalid.
        field: String,
        /// A description of what made it invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Returns the broad category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ErrorCategory::Configuration
            }
            EngineError::InvalidMargin { .. } => ErrorCategory::Validation,
            EngineError::InvalidInput { .. } | EngineError::CalculationError { .. } => {
                ErrorCategory::System
            }
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
