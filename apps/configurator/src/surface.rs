//! # Host Collaborators
//!
//! Traits for the pieces of the page that live outside Rust: the PDF
//! exporter, the export controls that must not appear in the capture, and the
//! 3D model viewer. The layer surface itself is [`kiosk_core::LayerSurface`].
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │  commands::export    │────►│  dyn QuoteExporter   │  (async)
//! │                      │────►│  dyn ExportControls  │
//! └──────────────────────┘     └──────────────────────┘
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │  commands::viewer    │────►│  dyn ModelViewer     │
//! └──────────────────────┘     └──────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kiosk_core::Summary;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::ExportError;
use crate::state::ExportOptions;

/// Snapshot of the configuration handed to the exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDocument {
    /// Quote reference printed on the document.
    pub reference: Uuid,
    pub generated_at: DateTime<Utc>,
    pub summary: Summary,
}

/// Everything an exporter needs for one export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub document: QuoteDocument,
    pub options: ExportOptions,
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFile {
    pub file_name: String,
    /// Where the file was saved, when the exporter knows.
    pub path: Option<PathBuf>,
    pub reference: Uuid,
}

/// Renders the summary region into a downloadable document.
#[async_trait]
pub trait QuoteExporter: Send + Sync {
    async fn export(&self, request: &ExportRequest) -> Result<ExportedFile, ExportError>;
}

/// Buttons that must be hidden while the summary is captured.
pub trait ExportControls {
    fn hide_for_export(&mut self);
    fn restore_after_export(&mut self);
}

/// Modal 3D model viewer.
pub trait ModelViewer {
    fn show(&mut self, model_path: &str, title: &str);
    fn hide(&mut self);
}
