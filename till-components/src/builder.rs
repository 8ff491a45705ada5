//! Configuration validation helpers
//!
//! Model configurations implement [`Validate`] and build their checks out of
//! the small helpers below, so every violation names the offending field with
//! its dotted path (for example `cashier.service.std`).

/// Validation result for model configuration
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Field '{field}' must be {constraint}")]
    ConstraintViolation { field: String, constraint: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ValidationError {
    /// Dotted path of the field at fault, if the error concerns one field.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::InvalidValue { field, .. }
            | ValidationError::ConstraintViolation { field, .. } => Some(field),
            ValidationError::Configuration(_) => None,
        }
    }
}

/// Trait for validating configurations before a run is built from them.
pub trait Validate {
    /// Check that every field value is legal and that the fields are
    /// consistent with each other.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    fn validate(&self) -> ValidationResult<()> {
        Ok(())
    }
}

/// Helper for validating numeric ranges
pub fn validate_range<T: PartialOrd + std::fmt::Display>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> ValidationResult<()> {
    // Written so that an unordered value (NaN) fails too.
    if !(value >= min && value <= max) {
        Err(ValidationError::ConstraintViolation {
            field: field.to_string(),
            constraint: format!("between {min} and {max}"),
        })
    } else {
        Ok(())
    }
}

/// Helper for validating that a value is positive
pub fn validate_positive<T: PartialOrd + Default + std::fmt::Display>(
    field: &str,
    value: T,
) -> ValidationResult<()> {
    if !(value > T::default()) {
        Err(ValidationError::ConstraintViolation {
            field: field.to_string(),
            constraint: "positive".to_string(),
        })
    } else {
        Ok(())
    }
}

/// Helper for validating that a value is non-negative
pub fn validate_non_negative<T: PartialOrd + Default + std::fmt::Display>(
    field: &str,
    value: T,
) -> ValidationResult<()> {
    if !(value >= T::default()) {
        Err(ValidationError::ConstraintViolation {
            field: field.to_string(),
            constraint: "non-negative".to_string(),
        })
    } else {
        Ok(())
    }
}

/// Helper for validating that a float is neither NaN nor infinite
pub fn validate_finite(field: &str, value: f64) -> ValidationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be finite, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_range() {
        assert!(validate_range("test", 5, 0, 10).is_ok());
        assert!(validate_range("test", 0, 0, 10).is_ok());
        assert!(validate_range("test", 10, 0, 10).is_ok());
        assert!(validate_range("test", -1, 0, 10).is_err());
        assert!(validate_range("test", 11, 0, 10).is_err());
        assert!(validate_range("test", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("test", 1).is_ok());
        assert!(validate_positive("test", 0).is_err());
        assert!(validate_positive("test", -1).is_err());
        assert!(validate_positive("test", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("test", 1).is_ok());
        assert!(validate_non_negative("test", 0).is_ok());
        assert!(validate_non_negative("test", -1).is_err());
        assert!(validate_non_negative("test", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("test", 0.0).is_ok());
        assert!(validate_finite("test", f64::INFINITY).is_err());
        let err = validate_finite("shopping.mean", f64::NAN).unwrap_err();
        assert_eq!(err.field(), Some("shopping.mean"));
    }
}
