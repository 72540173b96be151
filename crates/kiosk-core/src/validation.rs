//! # Validation Module
//!
//! Rules a catalog document must satisfy before the engine will use it.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Field presence and types                                          │
//! │  └── Defaults for price, category, only_versions                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (per-field rules)                                │
//! │  ├── Identifiers, prices, file names, folders                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Catalog::from_document (cross-entry rules)                   │
//! │  ├── Unique ids and layer slots                                        │
//! │  └── only_versions references known versions                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kiosk_core::validation::{validate_file_name, validate_identifier};
//!
//! assert!(validate_identifier("feature", "aed_kit").is_ok());
//! assert!(validate_file_name("image", "../secret.png").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_IDENTIFIER_LEN, MAX_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog identifier (version, feature, group, option, slot).
///
/// ## Rules
/// - Must not be empty
/// - At most `MAX_IDENTIFIER_LEN` characters
/// - Only letters, digits, hyphens and underscores
pub fn validate_identifier(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_IDENTIFIER_LEN,
        });
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display label.
pub fn validate_label(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an image or model file name.
///
/// ## Rules
/// - Must not be empty
/// - A bare file name: no `/`, `\` or `..`
/// - Must have an extension
pub fn validate_file_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.contains('/') || value.contains('\\') || value.contains("..") {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a file name, not a path".to_string(),
        });
    }

    match value.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must have a file extension".to_string(),
        }),
    }
}

/// Validates a version's asset folder.
///
/// ## Rules
/// - Must not be empty
/// - Relative (no leading `/`) and without `..` segments
pub fn validate_asset_folder(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.starts_with('/') || value.split('/').any(|segment| segment == "..") {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a relative folder inside the asset root".to_string(),
        });
    }

    Ok(())
}

/// Normalises an asset folder so image paths can be built by concatenation.
///
/// ## Example
/// ```rust
/// use kiosk_core::validation::normalize_folder;
///
/// assert_eq!(normalize_folder("v4/img"), "v4/img/");
/// assert_eq!(normalize_folder(" v5/img/ "), "v5/img/");
/// ```
pub fn normalize_folder(value: &str) -> String {
    let value = value.trim();
    if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{}/", value)
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a catalog price.
///
/// ## Rules
/// - Must be non-negative and at most `MAX_PRICE`
/// - Zero is allowed (included items, unpriced entries)
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.amount() > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("feature", "sos_standard").is_ok());
        assert!(validate_identifier("layer", "layer-cctv-ptz").is_ok());
        assert!(validate_identifier("version", "V4").is_ok());

        assert!(validate_identifier("feature", "").is_err());
        assert!(validate_identifier("feature", "   ").is_err());
        assert!(validate_identifier("feature", "has space").is_err());
        assert!(validate_identifier("feature", &"a".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_label() {
        assert!(validate_label("label", "AED Kit").is_ok());
        assert!(validate_label("label", "").is_err());
        assert!(validate_label("label", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("image", "layer_sos.png").is_ok());
        assert!(validate_file_name("image", "model.glb").is_ok());

        assert!(validate_file_name("image", "").is_err());
        assert!(validate_file_name("image", "img/layer.png").is_err());
        assert!(validate_file_name("image", "..png").is_err());
        assert!(validate_file_name("image", "layer").is_err());
        assert!(validate_file_name("image", ".png").is_err());
    }

    #[test]
    fn test_validate_asset_folder() {
        assert!(validate_asset_folder("asset_folder", "v4/img/").is_ok());
        assert!(validate_asset_folder("asset_folder", "v4").is_ok());

        assert!(validate_asset_folder("asset_folder", "").is_err());
        assert!(validate_asset_folder("asset_folder", "/etc/").is_err());
        assert!(validate_asset_folder("asset_folder", "v4/../../").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("price", Money::zero()).is_ok());
        assert!(validate_price("price", Money::new(250_000)).is_ok());
        assert!(validate_price("price", Money::new(-1)).is_err());
        assert!(validate_price("price", Money::new(MAX_PRICE)).is_ok());

        let err = validate_price("price", Money::new(i64::MAX)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange { max: MAX_PRICE, .. }
        ));
    }
}
