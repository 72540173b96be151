//! # Viewer Commands
//!
//! "View in 3D": opens the model of the active version in a modal viewer.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{ConfigState, SessionState};
use crate::surface::ModelViewer;

/// What the viewer was opened with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerTarget {
    /// `<folder short name>/<model file>`, e.g. `v4/model.glb`.
    pub model_path: String,
    pub title: String,
}

/// Opens the 3D viewer for the active version.
///
/// ## Returns
/// - The model path and title shown
/// - `NO_ACTIVE_VERSION` if no version is selected; the viewer stays closed
pub fn open_viewer(
    session: &SessionState,
    config: &ConfigState,
    viewer: &mut dyn ModelViewer,
) -> Result<ViewerTarget, ApiError> {
    let target = session.with_session(|s| {
        let version = s.engine.require_active_version()?;
        Ok::<_, ApiError>(ViewerTarget {
            model_path: version.model_path(&config.model_file),
            title: format!("{} {}", config.product_name, version.label),
        })
    })?;

    info!(model = %target.model_path, "Opening 3D viewer");
    viewer.show(&target.model_path, &target.title);
    Ok(target)
}

/// Closes the 3D viewer.
pub fn close_viewer(viewer: &mut dyn ModelViewer) {
    debug!("close_viewer command");
    viewer.hide();
}
