//! # Selection Commands
//!
//! Translates page events into engine calls and returns the refreshed view.
//!
//! ## Configuration Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Lifecycle                              │
//! │                                                                         │
//! │  ┌──────────┐  version_changed ┌──────────┐  feature_toggled           │
//! │  │   No     │─────────────────►│ Version  │◄──────────────┐            │
//! │  │ Version  │                  │ chosen   │───────────────┘            │
//! │  └──────────┘◄─────────────────└──────────┘  choice_changed            │
//! │       ▲          reset                                                   │
//! │       └── version_changed(None)                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every event is one engine call followed by one layer projection, done
//! under the session lock.

use kiosk_core::{
    render_summary, LayerPlan, LayerSurface, PriceBreakdown, SelectionOutcome, Summary,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, Session, SessionState};

/// A change coming from the page's controls.
///
/// ## Wire Format
/// ```json
/// { "type": "feature_toggled", "feature": "aed_kit", "selected": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionEvent {
    VersionChanged {
        #[serde(default)]
        version: Option<String>,
    },
    FeatureToggled {
        feature: String,
        selected: bool,
    },
    ChoiceChanged {
        group: String,
        #[serde(default)]
        value: Option<String>,
    },
    Reset,
}

/// What the page re-renders after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationView {
    pub summary: Summary,
    pub layers: LayerPlan,
    /// Raw numbers; omitted while prices are hidden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<PriceBreakdown>,
    /// Outcome of the event that produced this view.
    pub outcome: SelectionOutcome,
}

impl ConfigurationView {
    pub fn build(session: &Session, config: &ConfigState, outcome: SelectionOutcome) -> Self {
        let engine = &session.engine;
        let summary = render_summary(engine.breakdown(), engine.catalog(), &config.summary_options());
        ConfigurationView {
            summary,
            layers: engine.layer_plan().clone(),
            breakdown: config.show_prices.then(|| engine.breakdown().clone()),
            outcome,
        }
    }
}

/// Applies one page event.
///
/// ## Flow
/// ```text
/// event ──► engine call ──► LayerProjector::apply(surface) ──► view
/// ```
///
/// ## Returns
/// - The refreshed view; unknown features or options are reported through
///   `outcome`, not as errors
/// - `UNKNOWN_VERSION` if the version radio names a version the catalog lacks
pub fn dispatch(
    session: &SessionState,
    config: &ConfigState,
    event: SelectionEvent,
    surface: &mut dyn LayerSurface,
) -> Result<ConfigurationView, ApiError> {
    debug!(?event, "dispatch command");

    session.with_session_mut(|s| -> Result<ConfigurationView, ApiError> {
        let outcome = match &event {
            SelectionEvent::VersionChanged { version } => {
                let before = s.engine.selection().clone();
                s.engine.set_version(version.as_deref())?;
                if s.engine.selection() == &before {
                    SelectionOutcome::Unchanged
                } else {
                    SelectionOutcome::Changed
                }
            }
            SelectionEvent::FeatureToggled { feature, selected } => {
                s.engine.toggle_feature(feature, *selected)
            }
            SelectionEvent::ChoiceChanged { group, value } => {
                s.engine.set_choice(group, value.as_deref())
            }
            SelectionEvent::Reset => {
                s.engine.reset();
                SelectionOutcome::Changed
            }
        };

        let stats = s.project_layers(surface);
        debug!(?outcome, visible = stats.visible, "event applied");

        Ok(ConfigurationView::build(s, config, outcome))
    })
}

/// Sets or clears the active version.
pub fn set_version(
    session: &SessionState,
    config: &ConfigState,
    version: Option<String>,
    surface: &mut dyn LayerSurface,
) -> Result<ConfigurationView, ApiError> {
    dispatch(session, config, SelectionEvent::VersionChanged { version }, surface)
}

/// Selects or deselects a feature.
pub fn toggle_feature(
    session: &SessionState,
    config: &ConfigState,
    feature: String,
    selected: bool,
    surface: &mut dyn LayerSurface,
) -> Result<ConfigurationView, ApiError> {
    dispatch(
        session,
        config,
        SelectionEvent::FeatureToggled { feature, selected },
        surface,
    )
}

/// Sets or clears the option of a choice group.
pub fn set_choice(
    session: &SessionState,
    config: &ConfigState,
    group: String,
    value: Option<String>,
    surface: &mut dyn LayerSurface,
) -> Result<ConfigurationView, ApiError> {
    dispatch(session, config, SelectionEvent::ChoiceChanged { group, value }, surface)
}

/// Current view without changing anything (page load, refresh).
pub fn get_view(session: &SessionState, config: &ConfigState) -> ConfigurationView {
    debug!("get_view command");
    session.with_session(|s| ConfigurationView::build(s, config, SelectionOutcome::Unchanged))
}
