//! Calculation error types.

use thiserror::Error;

/// Calculation-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculationError {
    /// The requested calculation type does not exist.
    #[error("Unsupported calculation type: {0}")]
    UnsupportedType(String),

    /// One or more required parameters were not supplied.
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),

    /// A parameter was supplied but could not be interpreted.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name as sent by the caller.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A formula divided by zero.
    #[error("Division by zero while computing {context}")]
    DivisionByZero {
        /// Formula step that failed.
        context: &'static str,
    },

    /// A formula has no real result, e.g. a fractional power of a negative number.
    #[error("No real result while computing {context}")]
    NonReal {
        /// Formula step that failed.
        context: &'static str,
    },

    /// A formula produced a value outside the decimal range.
    #[error("Numeric overflow while computing {context}")]
    Overflow {
        /// Formula step that failed.
        context: &'static str,
    },
}

impl CalculationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedType(_) => "INVALID_CALCULATION_TYPE",
            Self::MissingParameters(_) => "MISSING_PARAMETERS",
            Self::InvalidParameter { .. } => "INVALID_PARAMETER",
            Self::DivisionByZero { .. } | Self::NonReal { .. } | Self::Overflow { .. } => {
                "CALCULATION_ERROR"
            }
        }
    }

    /// Returns true for errors caused by the shape of the request rather
    /// than by the arithmetic.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedType(_) | Self::MissingParameters(_) | Self::InvalidParameter { .. }
        )
    }

    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
