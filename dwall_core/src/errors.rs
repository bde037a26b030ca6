//! # Error Types
//!
//! Structured error and warning types for dwall_core.
//!
//! Two kinds of problems exist in a takeoff:
//!
//! - **Errors** ([`CalcError`]) reject the whole calculation. A negative wall
//!   thickness or a loss rate of 45% cannot produce a meaningful quantity.
//! - **Warnings** ([`CalcWarning`]) are attached to an otherwise valid result.
//!   A zero footprint in a depth back-calculation degrades that one ratio to
//!   zero and flags it, so a batch of scenarios keeps running.
//!
//! ## Example
//!
//! ```rust
//! use dwall_core::errors::{CalcError, CalcResult};
//!
//! fn validate_thickness(thickness_m: f64) -> CalcResult<()> {
//!     if thickness_m <= 0.0 {
//!         return Err(CalcError::invalid_dimension(
//!             "thickness_m",
//!             thickness_m.to_string(),
//!             "Wall thickness must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_thickness(0.8).is_ok());
//! assert_eq!(validate_thickness(0.0).unwrap_err().error_code(), "INVALID_DIMENSION");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for dwall_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A length, width, depth or volume is negative, not finite, or zero where
    /// a positive value is required
    #[error("Invalid dimension for '{field}': {value} - {reason}")]
    InvalidDimension {
        field: String,
        value: String,
        reason: String,
    },

    /// A rate, factor or count is outside its allowed range
    #[error("Value out of range for '{field}': {value} - {reason}")]
    InvalidRange {
        field: String,
        value: String,
        reason: String,
    },

    /// A field required by the selected construction method is absent
    #[error("Construction method '{method}' requires field '{field}'")]
    MethodConfigMismatch { method: String, field: String },

    /// A required field is missing from a request record
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch in a batch document
    #[error("Version mismatch: document version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidDimension error
    pub fn invalid_dimension(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidDimension {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidRange error
    pub fn invalid_range(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidRange {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MethodConfigMismatch error
    pub fn method_config_mismatch(method: impl Into<String>, field: impl Into<String>) -> Self {
        CalcError::MethodConfigMismatch {
            method: method.into(),
            field: field.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Whether the error comes from the request values themselves
    /// (as opposed to document-level problems like a bad version)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidDimension { .. }
                | CalcError::InvalidRange { .. }
                | CalcError::MethodConfigMismatch { .. }
                | CalcError::MissingField { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidDimension { .. } => "INVALID_DIMENSION",
            CalcError::InvalidRange { .. } => "INVALID_RANGE",
            CalcError::MethodConfigMismatch { .. } => "METHOD_CONFIG_MISMATCH",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

/// Reject negative or non-finite dimensions. Zero is allowed.
pub(crate) fn check_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_dimension(
            field,
            value.to_string(),
            "Must be a finite value of zero or more",
        ));
    }
    Ok(())
}

/// Reject zero, negative or non-finite dimensions.
pub(crate) fn check_positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_dimension(
            field,
            value.to_string(),
            "Must be positive",
        ));
    }
    Ok(())
}

/// Reject counts below one.
pub(crate) fn check_count(field: &str, value: u32) -> CalcResult<()> {
    if value < 1 {
        return Err(CalcError::invalid_range(
            field,
            value.to_string(),
            "At least one is required",
        ));
    }
    Ok(())
}

/// Convert a computed whole count to `u32`, rejecting values that do not fit.
pub(crate) fn count_from_f64(field: &str, value: f64) -> CalcResult<u32> {
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(CalcError::invalid_range(
            field,
            value.to_string(),
            "Computed count is outside the supported range",
        ));
    }
    Ok(value as u32)
}

// ============================================================================
// Warnings
// ============================================================================

/// A non-fatal condition attached to a calculation result.
///
/// Warnings never abort a calculation. Each one names the quantity it
/// affected so a report can point the user at the right input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcWarning {
    /// A ratio had a zero denominator and was reported as 0
    DivisionGuarded {
        quantity: String,
        denominator: String,
    },

    /// Corner count is too large for the centerline run; inner length clamped to 0
    NegativeInnerLength { raw_inner_m: f64 },

    /// Sediment pool depth exceeds the practical limit
    PoolTooDeep { depth_m: f64, limit_m: f64 },

    /// Spoil pit depth exceeds the practical limit
    PitTooDeep { depth_m: f64, limit_m: f64 },
}

impl CalcWarning {
    pub fn division_guarded(quantity: impl Into<String>, denominator: impl Into<String>) -> Self {
        CalcWarning::DivisionGuarded {
            quantity: quantity.into(),
            denominator: denominator.into(),
        }
    }

    /// Get a short warning code for programmatic handling
    pub fn warning_code(&self) -> &'static str {
        match self {
            CalcWarning::DivisionGuarded { .. } => "DIVISION_GUARDED",
            CalcWarning::NegativeInnerLength { .. } => "NEGATIVE_INNER_LENGTH",
            CalcWarning::PoolTooDeep { .. } => "POOL_TOO_DEEP",
            CalcWarning::PitTooDeep { .. } => "PIT_TOO_DEEP",
        }
    }
}

impl std::fmt::Display for CalcWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalcWarning::DivisionGuarded { quantity, denominator } => {
                write!(f, "{} reported as 0 because {} is zero", quantity, denominator)
            }
            CalcWarning::NegativeInnerLength { raw_inner_m } => {
                write!(f, "Inner run length would be {:.2} m; corner count too large for the centerline", raw_inner_m)
            }
            CalcWarning::PoolTooDeep { depth_m, limit_m } => {
                write!(f, "Pool depth {:.2} m exceeds {:.1} m; add pools or enlarge the footprint", depth_m, limit_m)
            }
            CalcWarning::PitTooDeep { depth_m, limit_m } => {
                write!(f, "Pit depth {:.2} m exceeds {:.1} m; add pits or increase hauling", depth_m, limit_m)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_dimension("thickness_m", "-0.8", "Must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidDimension\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(
            CalcError::method_config_mismatch("AllCasing", "casing_diameter").error_code(),
            "METHOD_CONFIG_MISMATCH"
        );
        assert_eq!(CalcError::invalid_range("loss_rate_pct", "45", "").error_code(), "INVALID_RANGE");
    }

    #[test]
    fn test_mismatch_message_names_field() {
        let err = CalcError::method_config_mismatch("AllCasing", "casing_diameter");
        assert_eq!(
            err.to_string(),
            "Construction method 'AllCasing' requires field 'casing_diameter'"
        );
    }

    #[test]
    fn test_validation_helpers() {
        assert!(check_non_negative("x", 0.0).is_ok());
        assert!(check_non_negative("x", -0.1).is_err());
        assert!(check_non_negative("x", f64::NAN).is_err());
        assert!(check_positive("x", 0.0).is_err());
        assert!(check_positive("x", f64::INFINITY).is_err());
        assert!(check_count("n", 0).is_err());
        assert!(check_count("n", 1).is_ok());
    }

    #[test]
    fn test_count_from_f64() {
        assert_eq!(count_from_f64("n", 0.0).unwrap(), 0);
        assert_eq!(count_from_f64("n", 20.0).unwrap(), 20);
        assert_eq!(count_from_f64("n", f64::from(u32::MAX)).unwrap(), u32::MAX);
        assert_eq!(count_from_f64("n", 1e10).unwrap_err().error_code(), "INVALID_RANGE");
        assert!(count_from_f64("n", f64::INFINITY).is_err());
    }

    #[test]
    fn test_warning_display() {
        let w = CalcWarning::division_guarded("required_depth_m", "total_footprint_m2");
        assert_eq!(w.warning_code(), "DIVISION_GUARDED");
        assert!(w.to_string().contains("total_footprint_m2"));
    }
}
