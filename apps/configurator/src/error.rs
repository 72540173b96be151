//! # API Error Type
//!
//! Unified error type for configurator commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Configurator                       │
//! │                                                                         │
//! │  Page                         Rust Host                                 │
//! │  ────                         ─────────                                 │
//! │                                                                         │
//! │  click "Download Quote"                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  No version? ─── CoreError::NoActiveVersion ──────┐             │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Export failed? ─── ExportError::Render ───────► ApiError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  e.code = "NO_ACTIVE_VERSION"                                           │
//! │  e.message = "Please select a version first."                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kiosk_core::CoreError;
use serde::Serialize;
use thiserror::Error;

/// Prompt shown when export or the 3D view is requested without a version.
pub const SELECT_VERSION_PROMPT: &str = "Please select a version first.";

/// API error returned from configurator commands.
///
/// ## Serialization
/// This is what the page receives when a command fails:
/// ```json
/// {
///   "code": "NO_ACTIVE_VERSION",
///   "message": "Please select a version first."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (catalog file, summary region)
    NotFound,

    /// Catalog or input validation failed
    ValidationError,

    /// Version id the catalog does not define
    UnknownVersion,

    /// Operation needs a version and none is selected
    NoActiveVersion,

    /// Quote export collaborator failed
    ExportFailed,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates the "select a version first" error.
    pub fn no_active_version() -> Self {
        ApiError::new(ErrorCode::NoActiveVersion, SELECT_VERSION_PROMPT)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownVersion(id) => ApiError::new(
                ErrorCode::UnknownVersion,
                format!("Unknown kiosk version: {}", id),
            ),
            CoreError::NoActiveVersion => ApiError::no_active_version(),
            CoreError::CatalogParse { format, reason } => {
                tracing::error!(format, %reason, "catalog parse failed");
                ApiError::validation(format!("Invalid {} catalog", format))
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

// =============================================================================
// Export Error
// =============================================================================

/// Failures reported by a quote exporter.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The region to capture is missing from the page.
    #[error("Summary content not found: {0}")]
    RegionNotFound(String),

    /// The renderer failed to produce the document.
    #[error("Failed to render quote: {0}")]
    Render(String),

    /// The user or host cancelled the export.
    #[error("Export cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::RegionNotFound(region) => ApiError::not_found("Summary content", &region),
            ExportError::Cancelled => ApiError::new(ErrorCode::ExportFailed, "Export cancelled"),
            ExportError::Render(e) => {
                tracing::error!("Quote render failed: {}", e);
                ApiError::new(ErrorCode::ExportFailed, "Failed to generate quote")
            }
            ExportError::Io(e) => {
                tracing::error!("Quote write failed: {}", e);
                ApiError::new(ErrorCode::ExportFailed, "Failed to save quote")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
