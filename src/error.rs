//! Error types shared by every calculator
//!
//! Calculation failures are always caller errors and surface as
//! [`CalcError::Validation`]. The remaining variants cover the export and
//! loader surface.

use thiserror::Error;

/// Result type alias using [`CalcError`]
pub type Result<T> = std::result::Result<T, CalcError>;

#[derive(Debug, Error)]
pub enum CalcError {
    /// An input fell outside its allowed domain
    #[error("invalid {field}: {constraint}")]
    Validation {
        field: &'static str,
        constraint: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CalcError {
    pub fn validation(field: &'static str, constraint: impl Into<String>) -> Self {
        CalcError::Validation {
            field,
            constraint: constraint.into(),
        }
    }

    /// Name of the offending field for validation failures
    pub fn field(&self) -> Option<&'static str> {
        match self {
            CalcError::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Reject values outside the closed interval `[lo, hi]` (NaN included)
pub(crate) fn check_range(field: &'static str, value: f64, lo: f64, hi: f64) -> Result<()> {
    if value.is_nan() || value < lo || value > hi {
        return Err(CalcError::validation(
            field,
            format!("{field} must be in [{lo},{hi}], got {value}"),
        ));
    }
    Ok(())
}

/// Reject values that are not finite and strictly positive
pub(crate) fn check_positive(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::validation(
            field,
            format!("{field} must be > 0, got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = check_range("age", 130.0, 0.0, 120.0).unwrap_err();
        assert_eq!(err.field(), Some("age"));
        assert_eq!(err.to_string(), "invalid age: age must be in [0,120], got 130");
    }

    #[test]
    fn test_nan_rejected() {
        assert!(check_range("interest_rate", f64::NAN, 0.0, 1.0).is_err());
        assert!(check_positive("payment", f64::NAN).is_err());
        assert!(check_positive("payment", f64::INFINITY).is_err());
    }

    #[test]
    fn test_bounds_inclusive() {
        assert!(check_range("interest_rate", 0.0, 0.0, 1.0).is_ok());
        assert!(check_range("interest_rate", 1.0, 0.0, 1.0).is_ok());
        assert!(check_positive("payment", 0.0).is_err());
    }
}
