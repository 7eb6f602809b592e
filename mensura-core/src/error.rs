//! Structured errors for adapters
//!
//! The measurement engine reports failures with typed errors. Adapters that
//! talk to the outside world (the CLI, serializers, form layers) flatten them
//! into `MensuraError`, which carries a machine-readable code and a hint.

use crate::NumberError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const CONVERSION_ERROR: &str = "CONVERSION_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const INTERNAL: &str = "INTERNAL";
}

/// A business-rule failure raised by adapters layered on the engine
/// (range checks, required fields). The engine itself never raises it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { field: field.into(), reason: reason.into() }
    }

    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "is required")
    }
}

/// Structured error for adapter boundaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MensuraError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Offending input fragment, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl MensuraError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            fragment: None,
            suggestion: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: record the offending fragment
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    // ========== Common Error Constructors ==========

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
            .with_suggestion("Write a number followed by a unit, e.g. \"1 1/2 lb\"")
    }

    pub fn conversion_error(details: impl Into<String>) -> Self {
        Self::new(codes::CONVERSION_ERROR, format!("Conversion error: {}", details.into()))
            .with_suggestion("Only measurements of the same category can be combined")
    }

    pub fn validation_error(details: impl Into<String>) -> Self {
        Self::new(codes::VALIDATION_ERROR, format!("Validation error: {}", details.into()))
    }

    pub fn div_zero() -> Self {
        Self::new(codes::DIV_ZERO, "Division by zero")
            .with_suggestion("Ensure divisor is not zero")
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
    }
}

impl std::fmt::Display for MensuraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for MensuraError {}

impl From<NumberError> for MensuraError {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::ParseError(s) => Self::parse_error(format!("invalid number {:?}", s)).with_fragment(s),
            NumberError::DivisionByZero => Self::div_zero(),
        }
    }
}

impl From<ValidationError> for MensuraError {
    fn from(err: ValidationError) -> Self {
        Self::validation_error(err.to_string()).with_fragment(err.field)
    }
}
