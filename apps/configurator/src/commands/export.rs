//! # Export Commands
//!
//! "Download Quote": captures the summary into a document.
//!
//! ## Export Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  click "Download Quote"                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  version active? ── no ──► NO_ACTIVE_VERSION ("Please select a version  │
//! │         │                   first.")                                    │
//! │        yes                                                              │
//! │         ▼                                                               │
//! │  snapshot summary ──► QuoteDocument { reference, generated_at }         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  hide export controls  ◄──── ControlsGuard                              │
//! │         │                          │                                    │
//! │         ▼                          │ Drop: restore controls on          │
//! │  exporter.export().await           │ success, failure and cancellation  │
//! │         │                          ▼                                    │
//! │         ▼                                                               │
//! │  ExportedFile / EXPORT_FAILED                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use kiosk_core::render_summary;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{ConfigState, SessionState};
use crate::surface::{ExportControls, ExportRequest, ExportedFile, QuoteDocument, QuoteExporter};

/// Keeps the export controls hidden for as long as it lives.
struct ControlsGuard<'a> {
    controls: &'a mut dyn ExportControls,
}

impl<'a> ControlsGuard<'a> {
    fn hide(controls: &'a mut dyn ExportControls) -> Self {
        controls.hide_for_export();
        ControlsGuard { controls }
    }
}

impl Drop for ControlsGuard<'_> {
    fn drop(&mut self) {
        self.controls.restore_after_export();
    }
}

/// Builds the document for the current configuration.
///
/// Fails with `NO_ACTIVE_VERSION` before a version is chosen.
pub fn prepare_quote(session: &SessionState, config: &ConfigState) -> Result<QuoteDocument, ApiError> {
    let summary = session.with_session(|s| {
        s.engine.require_active_version()?;
        Ok::<_, ApiError>(render_summary(
            s.engine.breakdown(),
            s.engine.catalog(),
            &config.summary_options(),
        ))
    })?;

    Ok(QuoteDocument {
        reference: Uuid::new_v4(),
        generated_at: Utc::now(),
        summary,
    })
}

/// Exports the current configuration as a quote document.
///
/// The session lock is released before the exporter is awaited, so page
/// events keep flowing while the document renders.
pub async fn export_quote(
    session: &SessionState,
    config: &ConfigState,
    exporter: &dyn QuoteExporter,
    controls: &mut dyn ExportControls,
) -> Result<ExportedFile, ApiError> {
    let document = prepare_quote(session, config)?;
    let reference = document.reference;
    let request = ExportRequest {
        document,
        options: config.export.clone(),
    };

    info!(%reference, file = %request.options.file_name, "Exporting quote");

    let _guard = ControlsGuard::hide(controls);
    let file = exporter.export(&request).await.map_err(|e| {
        warn!(%reference, error = %e, "Quote export failed");
        ApiError::from(e)
    })?;

    info!(%reference, file = %file.file_name, "Quote exported");
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, ExportError};
    use async_trait::async_trait;
    use kiosk_core::SummaryBody;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingControls {
        calls: Vec<&'static str>,
    }

    impl ExportControls for RecordingControls {
        fn hide_for_export(&mut self) {
            self.calls.push("hide");
        }

        fn restore_after_export(&mut self) {
            self.calls.push("restore");
        }
    }

    #[derive(Default)]
    struct CapturingExporter {
        requests: Mutex<Vec<ExportRequest>>,
    }

    #[async_trait]
    impl QuoteExporter for CapturingExporter {
        async fn export(&self, request: &ExportRequest) -> Result<ExportedFile, ExportError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(ExportedFile {
                file_name: request.options.file_name.clone(),
                path: None,
                reference: request.document.reference,
            })
        }
    }

    struct FailingExporter;

    #[async_trait]
    impl QuoteExporter for FailingExporter {
        async fn export(&self, _request: &ExportRequest) -> Result<ExportedFile, ExportError> {
            Err(ExportError::Render("canvas error".to_string()))
        }
    }

    struct StalledExporter;

    #[async_trait]
    impl QuoteExporter for StalledExporter {
        async fn export(&self, _request: &ExportRequest) -> Result<ExportedFile, ExportError> {
            std::future::pending().await
        }
    }

    fn session_with_version() -> SessionState {
        let session = SessionState::default();
        session
            .with_session_mut(|s| s.engine.set_version(Some("v4")))
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_export_requires_version() {
        let session = SessionState::default();
        let mut controls = RecordingControls::default();

        let err = export_quote(
            &session,
            &ConfigState::default(),
            &CapturingExporter::default(),
            &mut controls,
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::NoActiveVersion);
        assert_eq!(err.message, "Please select a version first.");
        assert!(controls.calls.is_empty());
    }

    #[tokio::test]
    async fn test_export_success_restores_controls() {
        let session = session_with_version();
        let exporter = CapturingExporter::default();
        let mut controls = RecordingControls::default();

        let file = export_quote(&session, &ConfigState::default(), &exporter, &mut controls)
            .await
            .unwrap();

        assert_eq!(file.file_name, "Kiosk_Quote.pdf");
        assert_eq!(controls.calls, vec!["hide", "restore"]);

        let requests = exporter.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].document.reference, file.reference);
        assert_eq!(requests[0].document.summary.title, "Janrakshak V4");
        assert!(matches!(
            requests[0].document.summary.body,
            SummaryBody::Items { .. }
        ));
    }

    #[tokio::test]
    async fn test_export_failure_restores_controls() {
        let session = session_with_version();
        let mut controls = RecordingControls::default();

        let err = export_quote(&session, &ConfigState::default(), &FailingExporter, &mut controls)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ExportFailed);
        assert_eq!(controls.calls, vec!["hide", "restore"]);
    }

    #[tokio::test]
    async fn test_cancelled_export_restores_controls() {
        let session = session_with_version();
        let config = ConfigState::default();
        let mut controls = RecordingControls::default();

        {
            let export = export_quote(&session, &config, &StalledExporter, &mut controls);
            tokio::select! {
                biased;
                _ = export => panic!("stalled export completed"),
                _ = std::future::ready(()) => {}
            }
        }

        assert_eq!(controls.calls, vec!["hide", "restore"]);
    }

    #[test]
    fn test_prepare_quote_uses_fresh_reference() {
        let session = session_with_version();
        let config = ConfigState::default();
        let a = prepare_quote(&session, &config).unwrap();
        let b = prepare_quote(&session, &config).unwrap();
        assert_ne!(a.reference, b.reference);
        assert_eq!(a.summary, b.summary);
    }
}
