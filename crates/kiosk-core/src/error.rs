//! # Error Types
//!
//! Domain-specific error types for kiosk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kiosk-core errors (this file)                                         │
//! │  ├── CoreError        - Engine and catalog failures                    │
//! │  └── ValidationError  - Catalog document rule violations               │
//! │                                                                         │
//! │  configurator errors (app crate)                                       │
//! │  └── ApiError         - What the page sees (serialized)                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Page                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! Unknown feature or option identifiers arriving from page events are
//! reported through [`crate::engine::SelectionOutcome::UnknownReference`] and
//! leave the selection untouched. The reactive loop never fails on them.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core configuration errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A version identifier that the catalog does not define.
    ///
    /// ## When This Occurs
    /// - The version radio group and the catalog disagree (wiring bug)
    /// - A stale event refers to a version removed from a reloaded catalog
    #[error("Unknown kiosk version: {0}")]
    UnknownVersion(String),

    /// An operation needs an active version and none is selected.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "Download Quote" / "View in 3D"
    ///      │
    ///      ▼
    /// No version radio checked
    ///      │
    ///      ▼
    /// NoActiveVersion
    ///      │
    ///      ▼
    /// UI shows: "Please select a version first."
    /// ```
    #[error("No kiosk version selected")]
    NoActiveVersion,

    /// A catalog document could not be parsed.
    #[error("Failed to parse {format} catalog: {reason}")]
    CatalogParse { format: &'static str, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Catalog validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., path separators in a file name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two features sharing a layer slot).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Reference to something the catalog does not define.
    #[error("{field} refers to unknown '{value}'")]
    UnknownReference { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownVersion("v9".to_string());
        assert_eq!(err.to_string(), "Unknown kiosk version: v9");

        let err = CoreError::CatalogParse {
            format: "TOML",
            reason: "expected `=`".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to parse TOML catalog: expected `=`");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Duplicate {
            field: "layer".to_string(),
            value: "layer-sos".to_string(),
        };
        assert_eq!(err.to_string(), "layer 'layer-sos' already exists");

        let err = ValidationError::UnknownReference {
            field: "features.ptz_camera.only_versions".to_string(),
            value: "v9".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "features.ptz_camera.only_versions refers to unknown 'v9'"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "versions".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
