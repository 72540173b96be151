//! # Configuration State Engine
//!
//! Owns the user's [`Selection`] and recomputes the derived price breakdown
//! and layer plan every time the selection changes.
//!
//! ## Version State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Version Selection                                    │
//! │                                                                         │
//! │               set_version(None)                                         │
//! │        ┌──────────────────────────────────┐                             │
//! │        ▼                                  │                             │
//! │  ┌───────────┐  set_version("v4")  ┌──────┴────┐                        │
//! │  │ NoVersion │ ──────────────────► │ Version   │ ◄──┐ set_version("v5") │
//! │  │ (initial) │                     │ (v4, v5…) │ ───┘                   │
//! │  └───────────┘                     └───────────┘                        │
//! │                                                                         │
//! │  Entering a version first CLEARS selections it does not support        │
//! │  (e.g. the V4-only PTZ camera when switching to V5), then recomputes.  │
//! │  There is no terminal state.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Entry Points
//! The selection is mutated only through [`ConfigurationEngine::set_version`],
//! [`ConfigurationEngine::toggle_feature`], [`ConfigurationEngine::set_choice`]
//! and [`ConfigurationEngine::reset`]. Each runs synchronously and leaves the
//! cached [`PriceBreakdown`] and [`LayerPlan`] consistent with the selection.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{
    ChoiceGroup, ChoiceOption, Feature, FeatureId, GroupId, LayerSlot, Version, VersionId,
};

// =============================================================================
// Selection
// =============================================================================

/// The mutable configuration state.
///
/// ## Invariants
/// - Only catalog-known features and options are ever stored
/// - Without an active version the stored selections are inert
/// - With an active version every stored selection is supported by it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    version: Option<VersionId>,
    features: BTreeSet<FeatureId>,
    choices: BTreeMap<GroupId, String>,
}

impl Selection {
    pub fn version(&self) -> Option<&VersionId> {
        self.version.as_ref()
    }

    /// Selected features in identifier order.
    pub fn features(&self) -> impl Iterator<Item = &FeatureId> {
        self.features.iter()
    }

    pub fn is_feature_selected(&self, id: &FeatureId) -> bool {
        self.features.contains(id)
    }

    /// Selected option value of a choice group.
    pub fn choice(&self, group: &GroupId) -> Option<&str> {
        self.choices.get(group).map(String::as_str)
    }

    /// True for the initial state: no version, nothing selected.
    pub fn is_empty(&self) -> bool {
        self.version.is_none() && self.features.is_empty() && self.choices.is_empty()
    }

    fn feature_effective(&self, feature: &Feature, version: &VersionId) -> bool {
        self.features.contains(&feature.id) && feature.is_available_for(version)
    }

    fn option_effective(&self, group: &ChoiceGroup, option: &ChoiceOption, version: &VersionId) -> bool {
        self.choices.get(&group.id) == Some(&option.value) && option.is_available_for(version)
    }
}

/// What a selection entry point did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOutcome {
    /// The selection changed and derived values were recomputed.
    Changed,
    /// The selection already had the requested state.
    Unchanged,
    /// The identifier is not in the catalog; nothing happened.
    UnknownReference,
    /// The active version does not support this entry; nothing happened.
    Unsupported,
}

// =============================================================================
// Price Breakdown
// =============================================================================

/// What a priced line refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemRef {
    Feature { id: FeatureId },
    Choice { group: GroupId, value: String },
}

/// One effective selection and its price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedItem {
    pub item: ItemRef,
    pub label: String,
    pub price: Money,
}

/// Derived prices of the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Active version, `None` before one is chosen.
    pub version: Option<VersionId>,
    /// Base price of the active version (zero without one).
    pub base: Money,
    /// Effective selections: features in catalog order, then choice groups.
    pub items: Vec<PricedItem>,
    pub options_total: Money,
    pub total: Money,
}

impl PriceBreakdown {
    /// True when a version is active and the breakdown is meaningful to show.
    pub fn is_configured(&self) -> bool {
        self.version.is_some()
    }
}

/// Computes the price breakdown of a selection.
///
/// Sums the active version's base price and the price of every selected
/// feature or option whose enabling predicate holds for that version. Without
/// an active version everything is zero.
pub fn price_breakdown(catalog: &Catalog, selection: &Selection) -> PriceBreakdown {
    let Some(version) = active_version(catalog, selection) else {
        return PriceBreakdown::default();
    };

    let mut items = Vec::new();
    for feature in catalog.features() {
        if selection.feature_effective(feature, &version.id) {
            items.push(PricedItem {
                item: ItemRef::Feature {
                    id: feature.id.clone(),
                },
                label: feature.label.clone(),
                price: feature.price,
            });
        }
    }
    for group in catalog.choice_groups() {
        for option in &group.options {
            if selection.option_effective(group, option, &version.id) {
                items.push(PricedItem {
                    item: ItemRef::Choice {
                        group: group.id.clone(),
                        value: option.value.clone(),
                    },
                    label: format!("{}: {}", group.label, option.label),
                    price: option.price,
                });
            }
        }
    }

    let options_total: Money = items.iter().map(|i| i.price).sum();
    PriceBreakdown {
        version: Some(version.id.clone()),
        base: version.base_price,
        items,
        options_total,
        total: version.base_price + options_total,
    }
}

// =============================================================================
// Layer Plan
// =============================================================================

/// Visibility and source of one image slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LayerState {
    pub slot: LayerSlot,
    pub visible: bool,
    /// Image path inside the active version's folder; `None` without a version.
    pub source: Option<String>,
}

/// Derived plan for the stacked product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LayerPlan {
    /// Asset folder of the active version.
    pub folder: Option<String>,
    pub base: LayerState,
    /// One entry per feature, then per choice option, in catalog order.
    pub layers: Vec<LayerState>,
}

impl LayerPlan {
    /// True when a version is active and the layer stack should be shown.
    pub fn is_active(&self) -> bool {
        self.folder.is_some()
    }

    /// Number of visible layers, base included.
    pub fn visible_count(&self) -> usize {
        self.all().filter(|l| l.visible).count()
    }

    /// Base layer followed by every optional layer.
    pub fn all(&self) -> impl Iterator<Item = &LayerState> {
        std::iter::once(&self.base).chain(self.layers.iter())
    }

    pub fn layer(&self, slot: &LayerSlot) -> Option<&LayerState> {
        self.all().find(|l| &l.slot == slot)
    }
}

/// Computes the layer plan of a selection.
///
/// ## Rules
/// - No active version: every layer hidden, base included, no sources
/// - Active version: base visible; each optional layer visible iff selected
///   and enabled; every slot sourced from the version's folder
pub fn layer_plan(catalog: &Catalog, selection: &Selection) -> LayerPlan {
    let version = active_version(catalog, selection);

    let base = LayerState {
        slot: catalog.base_layer().clone(),
        visible: version.is_some(),
        source: version.map(Version::base_image_path),
    };

    let mut layers = Vec::new();
    for feature in catalog.features() {
        layers.push(LayerState {
            slot: feature.layer.clone(),
            visible: version.is_some_and(|v| selection.feature_effective(feature, &v.id)),
            source: version.map(|v| v.image_path(&feature.image)),
        });
    }
    for group in catalog.choice_groups() {
        for option in &group.options {
            layers.push(LayerState {
                slot: option.layer.clone(),
                visible: version.is_some_and(|v| selection.option_effective(group, option, &v.id)),
                source: version.map(|v| v.image_path(&option.image)),
            });
        }
    }

    LayerPlan {
        folder: version.map(|v| v.asset_folder.clone()),
        base,
        layers,
    }
}

fn active_version<'a>(catalog: &'a Catalog, selection: &Selection) -> Option<&'a Version> {
    selection.version.as_ref().and_then(|id| catalog.version(id))
}

// =============================================================================
// Engine
// =============================================================================

/// The configuration state engine.
///
/// One instance per configurator page. Holds the catalog, the selection and
/// the derived values of the last recomputation.
#[derive(Debug, Clone)]
pub struct ConfigurationEngine {
    catalog: Arc<Catalog>,
    selection: Selection,
    breakdown: PriceBreakdown,
    plan: LayerPlan,
}

impl ConfigurationEngine {
    /// Creates an engine in the initial no-version state.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let selection = Selection::default();
        let breakdown = price_breakdown(&catalog, &selection);
        let plan = layer_plan(&catalog, &selection);
        ConfigurationEngine {
            catalog,
            selection,
            breakdown,
            plan,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Breakdown from the last recomputation.
    pub fn breakdown(&self) -> &PriceBreakdown {
        &self.breakdown
    }

    /// Layer plan from the last recomputation.
    pub fn layer_plan(&self) -> &LayerPlan {
        &self.plan
    }

    /// Recomputes the breakdown from scratch.
    pub fn compute_price_breakdown(&self) -> PriceBreakdown {
        price_breakdown(&self.catalog, &self.selection)
    }

    /// Recomputes the layer plan from scratch.
    pub fn compute_layer_plan(&self) -> LayerPlan {
        layer_plan(&self.catalog, &self.selection)
    }

    pub fn active_version(&self) -> Option<&Version> {
        active_version(&self.catalog, &self.selection)
    }

    /// The active version, or `NoActiveVersion` for export and 3D view.
    pub fn require_active_version(&self) -> CoreResult<&Version> {
        self.active_version().ok_or(CoreError::NoActiveVersion)
    }

    // -------------------------------------------------------------------------
    // Entry Points
    // -------------------------------------------------------------------------

    /// Sets or clears the active version.
    ///
    /// ## Behavior
    /// - `None`, `""` or whitespace: clears the version; selections are kept
    ///   but become inert
    /// - Known id (case-insensitive): clears selections the version does not
    ///   support, then activates it
    /// - Unknown id: `CoreError::UnknownVersion`, selection untouched
    pub fn set_version(&mut self, version: Option<&str>) -> CoreResult<()> {
        let catalog = Arc::clone(&self.catalog);

        let next = match version.map(str::trim).filter(|v| !v.is_empty()) {
            None => None,
            Some(raw) => {
                let id = VersionId::new(raw);
                if catalog.version(&id).is_none() {
                    warn!(version = %raw, "rejecting unknown kiosk version");
                    return Err(CoreError::UnknownVersion(raw.to_string()));
                }
                Some(id)
            }
        };

        if let Some(id) = &next {
            self.clear_unsupported(&catalog, id);
        }

        if self.selection.version != next {
            info!(
                from = ?self.selection.version.as_ref().map(VersionId::as_str),
                to = ?next.as_ref().map(VersionId::as_str),
                "kiosk version changed"
            );
        }
        self.selection.version = next;
        self.recompute();
        Ok(())
    }

    /// Selects or deselects a feature.
    ///
    /// ## Behavior
    /// - Unknown id: `UnknownReference`, no change
    /// - Selecting a feature the active version lacks: `Unsupported`
    /// - Otherwise `Changed` or `Unchanged`; repeating a call is a no-op
    pub fn toggle_feature(&mut self, feature: &str, selected: bool) -> SelectionOutcome {
        let catalog = Arc::clone(&self.catalog);
        let id = FeatureId::new(feature);

        let Some(entry) = catalog.feature(&id) else {
            warn!(feature = %id, "ignoring toggle of unknown feature");
            return SelectionOutcome::UnknownReference;
        };

        if selected {
            if let Some(version) = &self.selection.version {
                if !entry.is_available_for(version) {
                    debug!(feature = %id, version = %version, "feature not available on version");
                    return SelectionOutcome::Unsupported;
                }
            }
        }

        let changed = if selected {
            self.selection.features.insert(id.clone())
        } else {
            self.selection.features.remove(&id)
        };
        if !changed {
            return SelectionOutcome::Unchanged;
        }

        debug!(feature = %id, selected, "feature toggled");
        self.recompute();
        SelectionOutcome::Changed
    }

    /// Sets or clears the option of a single-choice group.
    ///
    /// Selecting an option replaces the group's previous option. `None` or an
    /// empty value clears the group.
    pub fn set_choice(&mut self, group: &str, value: Option<&str>) -> SelectionOutcome {
        let catalog = Arc::clone(&self.catalog);
        let group_id = GroupId::new(group);

        let Some(entry) = catalog.choice_group(&group_id) else {
            warn!(group = %group_id, "ignoring change of unknown choice group");
            return SelectionOutcome::UnknownReference;
        };

        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => {
                if self.selection.choices.remove(&group_id).is_none() {
                    return SelectionOutcome::Unchanged;
                }
                debug!(group = %group_id, "choice cleared");
            }
            Some(value) => {
                let Some(option) = entry.option(value) else {
                    warn!(group = %group_id, value, "ignoring unknown choice option");
                    return SelectionOutcome::UnknownReference;
                };
                if let Some(version) = &self.selection.version {
                    if !option.is_available_for(version) {
                        debug!(group = %group_id, value, version = %version, "option not available on version");
                        return SelectionOutcome::Unsupported;
                    }
                }
                if self.selection.choice(&group_id) == Some(value) {
                    return SelectionOutcome::Unchanged;
                }
                self.selection
                    .choices
                    .insert(group_id.clone(), value.to_string());
                debug!(group = %group_id, value, "choice selected");
            }
        }

        self.recompute();
        SelectionOutcome::Changed
    }

    /// Returns to the initial no-version, nothing-selected state.
    pub fn reset(&mut self) {
        info!("configuration reset");
        self.selection = Selection::default();
        self.recompute();
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Forced transition run when entering a version.
    fn clear_unsupported(&mut self, catalog: &Catalog, version: &VersionId) {
        self.selection.features.retain(|id| {
            let keep = catalog
                .feature(id)
                .map_or(true, |f| f.is_available_for(version));
            if !keep {
                info!(feature = %id, version = %version, "clearing feature unsupported on version");
            }
            keep
        });

        self.selection.choices.retain(|group, value| {
            let keep = catalog
                .choice_option(group, value)
                .map_or(true, |o| o.is_available_for(version));
            if !keep {
                info!(group = %group, value = %value, version = %version, "clearing option unsupported on version");
            }
            keep
        });
    }

    fn recompute(&mut self) {
        self.breakdown = price_breakdown(&self.catalog, &self.selection);
        self.plan = layer_plan(&self.catalog, &self.selection);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
