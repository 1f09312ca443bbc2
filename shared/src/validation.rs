//! Validation utilities for FishSpot
//!
//! The scoring functions are pure, so the only way they can fail is bad
//! input. Every failure surfaces as a [`ValidationError`] and is never
//! silently replaced by a default.

use thiserror::Error;

/// Input validation failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("{field} out of range: {message}")]
    OutOfRange { field: &'static str, message: String },

    #[error("Invalid alert configuration: {0}")]
    InvalidConfig(String),
}

impl ValidationError {
    pub fn unknown(kind: &'static str, value: &str) -> Self {
        ValidationError::UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }

    /// Name of the offending field, when there is one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::UnknownVariant { kind, .. } => Some(kind),
            ValidationError::OutOfRange { field, .. } => Some(field),
            ValidationError::InvalidConfig(_) => None,
        }
    }
}

/// Validate an hour of the day (0-23)
pub fn validate_hour_of_day(hour: u32) -> Result<(), ValidationError> {
    if hour >= 24 {
        return Err(ValidationError::OutOfRange {
            field: "hour_of_day",
            message: format!("{} is not within 0..24", hour),
        });
    }
    Ok(())
}

/// Validate a calendar month (1-12)
pub fn validate_month(month: u32) -> Result<(), ValidationError> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "month",
            message: format!("{} is not within 1..=12", month),
        });
    }
    Ok(())
}

/// Reject NaN and infinities in a measurement
pub fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::OutOfRange {
            field,
            message: format!("{} is not a finite number", value),
        });
    }
    Ok(())
}

/// Validate a score on the 0-100 scale
pub fn validate_score(field: &'static str, score: f64) -> Result<(), ValidationError> {
    validate_finite(field, score)?;
    if !(0.0..=100.0).contains(&score) {
        return Err(ValidationError::OutOfRange {
            field,
            message: format!("{} is not within 0..=100", score),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_hour_of_day() {
        assert!(validate_hour_of_day(0).is_ok());
        assert!(validate_hour_of_day(23).is_ok());
        assert!(validate_hour_of_day(24).is_err());
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("pressure", 1013.0).is_ok());
        assert!(validate_finite("pressure", f64::NAN).is_err());
        assert!(validate_finite("pressure", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_score() {
        assert!(validate_score("threshold", 0.0).is_ok());
        assert!(validate_score("threshold", 100.0).is_ok());
        assert!(validate_score("threshold", -0.5).is_err());
        assert!(validate_score("threshold", 100.5).is_err());
    }

    #[test]
    fn test_error_field() {
        let err = ValidationError::unknown("moon_phase", "blue");
        assert_eq!(err.field(), Some("moon_phase"));
        assert_eq!(err.to_string(), "Unknown moon_phase: 'blue'");
        assert_eq!(ValidationError::InvalidConfig("x".into()).field(), None);
    }
}
