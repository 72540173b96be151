//! # Presentation Projector
//!
//! Turns the engine's derived values into what the page shows: the summary
//! panel and the visibility of each stacked product image.
//!
//! ## Data Flow
//! ```text
//! ┌──────────────────┐   render_summary    ┌──────────────────┐
//! │  PriceBreakdown  │ ──────────────────► │     Summary      │ ──► summary panel
//! └──────────────────┘  (SummaryOptions)   └──────────────────┘
//!
//! ┌──────────────────┐ LayerProjector::apply ┌──────────────────┐
//! │    LayerPlan     │ ────────────────────► │  dyn LayerSurface│ ──► image stack
//! └──────────────────┘ (re-source changed    └──────────────────┘
//!                        slots only)
//! ```
//!
//! Both halves are pure with respect to the engine: they only read the
//! breakdown and plan, and the layer half writes through the [`LayerSurface`]
//! seam so any backend (web view, test recorder) can sit behind it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::engine::{LayerPlan, PriceBreakdown};
use crate::money::{CurrencyFormat, Money};
use crate::types::LayerSlot;

/// Text shown in place of the summary before a version is chosen.
pub const NO_VERSION_MESSAGE: &str = "Select a Kiosk Version to begin configuration.";

// =============================================================================
// Summary
// =============================================================================

/// Whether prices appear in the rendered summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceVisibility {
    #[default]
    Hidden,
    Shown,
}

impl PriceVisibility {
    pub fn from_flag(show_prices: bool) -> Self {
        if show_prices {
            PriceVisibility::Shown
        } else {
            PriceVisibility::Hidden
        }
    }

    pub fn is_shown(self) -> bool {
        self == PriceVisibility::Shown
    }
}

/// Presentation settings for [`render_summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Product name used in the title ("Janrakshak").
    pub product_name: String,
    pub prices: PriceVisibility,
    pub currency: CurrencyFormat,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        SummaryOptions {
            product_name: crate::DEFAULT_PRODUCT_NAME.to_string(),
            prices: PriceVisibility::Hidden,
            currency: CurrencyFormat::default(),
        }
    }
}

/// One row of the summary list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLine {
    pub label: String,
    /// Formatted price, absent while prices are hidden.
    pub price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummaryBody {
    /// No version chosen yet.
    Placeholder { message: String },
    /// Base model line first, then one line per effective selection.
    Items { lines: Vec<SummaryLine> },
}

/// Formatted totals block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    pub base: String,
    pub options: String,
    pub grand: String,
}

/// The rendered summary panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub title: String,
    pub body: SummaryBody,
    /// Present only when a version is active and prices are shown.
    pub totals: Option<SummaryTotals>,
    pub prices_visible: bool,
}

impl Summary {
    pub fn lines(&self) -> &[SummaryLine] {
        match &self.body {
            SummaryBody::Items { lines } => lines,
            SummaryBody::Placeholder { .. } => &[],
        }
    }
}

/// Renders the summary panel for a breakdown.
///
/// ## Layout
/// ```text
/// ┌───────────────────────────────────┐
/// │ Janrakshak V4                     │  title
/// │  • Base Model (V4)     ₹2,50,000  │  always first
/// │  • SOS Emergency Button   ₹15,000 │  catalog order
/// │  • LED Screen: 24 inch    ₹20,000 │  "<group>: <option>"
/// │ Base / Options / Total            │  totals (prices shown only)
/// └───────────────────────────────────┘
/// ```
pub fn render_summary(
    breakdown: &PriceBreakdown,
    catalog: &Catalog,
    options: &SummaryOptions,
) -> Summary {
    let prices_visible = options.prices.is_shown();
    let version = breakdown.version.as_ref().and_then(|id| catalog.version(id));

    let Some(version) = version else {
        return Summary {
            title: format!("{} Kiosk", options.product_name),
            body: SummaryBody::Placeholder {
                message: NO_VERSION_MESSAGE.to_string(),
            },
            totals: None,
            prices_visible,
        };
    };

    let price_text = |money: Money| prices_visible.then(|| money.format(&options.currency));

    let mut lines = Vec::with_capacity(breakdown.items.len() + 1);
    lines.push(SummaryLine {
        label: format!("Base Model ({})", version.label),
        price: price_text(breakdown.base),
    });
    lines.extend(breakdown.items.iter().map(|item| SummaryLine {
        label: item.label.clone(),
        price: price_text(item.price),
    }));

    let totals = prices_visible.then(|| SummaryTotals {
        base: breakdown.base.format(&options.currency),
        options: breakdown.options_total.format(&options.currency),
        grand: breakdown.total.format(&options.currency),
    });

    Summary {
        title: format!("{} {}", options.product_name, version.label),
        body: SummaryBody::Items { lines },
        totals,
        prices_visible,
    }
}

// =============================================================================
// Layer Surface
// =============================================================================

/// Contract implemented by whatever draws the stacked product image.
///
/// The projector hands over slot-level commands only, so the surface never
/// needs to know about versions, features or prices.
pub trait LayerSurface {
    /// Shows the layer stack (`true`) or the "select a version" placeholder.
    fn set_stage_visible(&mut self, visible: bool);

    /// Points a slot at a new image.
    fn set_source(&mut self, slot: &LayerSlot, source: &str);

    fn set_visible(&mut self, slot: &LayerSlot, visible: bool);
}

/// Headless surface that records the last command per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSurface {
    pub stage_visible: Option<bool>,
    pub sources: BTreeMap<LayerSlot, String>,
    pub visibility: BTreeMap<LayerSlot, bool>,
    /// Number of `set_source` calls received so far.
    pub source_writes: usize,
}

impl RecordingSurface {
    pub fn is_visible(&self, slot: &LayerSlot) -> bool {
        self.visibility.get(slot).copied().unwrap_or(false)
    }

    pub fn source(&self, slot: &LayerSlot) -> Option<&str> {
        self.sources.get(slot).map(String::as_str)
    }

    pub fn visible_count(&self) -> usize {
        self.visibility.values().filter(|v| **v).count()
    }
}

impl LayerSurface for RecordingSurface {
    fn set_stage_visible(&mut self, visible: bool) {
        self.stage_visible = Some(visible);
    }

    fn set_source(&mut self, slot: &LayerSlot, source: &str) {
        self.sources.insert(slot.clone(), source.to_string());
        self.source_writes += 1;
    }

    fn set_visible(&mut self, slot: &LayerSlot, visible: bool) {
        self.visibility.insert(slot.clone(), visible);
    }
}

// =============================================================================
// Layer Projector
// =============================================================================

/// What one [`LayerProjector::apply`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectionStats {
    /// The asset folder differed from the last applied one.
    pub folder_changed: bool,
    pub sources_updated: usize,
    pub visibility_updates: usize,
    /// Visible layers after the call, base included.
    pub visible: usize,
}

/// Applies layer plans to a surface.
///
/// Remembers the last source written to each slot so an image is written
/// only when the planned path differs. Versions may share an asset folder
/// with different base images, so the cache is per slot rather than per
/// folder. It survives clearing the version: re-selecting the same version
/// does not re-source anything.
#[derive(Debug, Clone, Default)]
pub struct LayerProjector {
    applied_folder: Option<String>,
    applied_sources: BTreeMap<LayerSlot, String>,
}

impl LayerProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied_folder(&self) -> Option<&str> {
        self.applied_folder.as_deref()
    }

    /// Last source written to a slot.
    pub fn applied_source(&self, slot: &LayerSlot) -> Option<&str> {
        self.applied_sources.get(slot).map(String::as_str)
    }

    pub fn apply(&mut self, plan: &LayerPlan, surface: &mut dyn LayerSurface) -> ProjectionStats {
        let mut stats = ProjectionStats::default();

        surface.set_stage_visible(plan.is_active());

        if let Some(folder) = &plan.folder {
            stats.folder_changed = self.applied_folder.as_ref() != Some(folder);
            for layer in plan.all() {
                let Some(source) = &layer.source else {
                    continue;
                };
                if self.applied_sources.get(&layer.slot) != Some(source) {
                    surface.set_source(&layer.slot, source);
                    self.applied_sources.insert(layer.slot.clone(), source.clone());
                    stats.sources_updated += 1;
                }
            }
            if stats.sources_updated > 0 {
                debug!(
                    from = ?self.applied_folder,
                    to = %folder,
                    updated = stats.sources_updated,
                    "re-sourced layer images"
                );
            }
            self.applied_folder = Some(folder.clone());
        }

        for layer in plan.all() {
            surface.set_visible(&layer.slot, layer.visible);
            stats.visibility_updates += 1;
        }
        stats.visible = plan.visible_count();

        stats
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ConfigurationEngine, SelectionOutcome};
    use std::sync::Arc;

    fn engine() -> ConfigurationEngine {
        ConfigurationEngine::new(Arc::new(Catalog::builtin()))
    }

    fn shown() -> SummaryOptions {
        SummaryOptions {
            prices: PriceVisibility::Shown,
            ..SummaryOptions::default()
        }
    }

    #[test]
    fn test_placeholder_without_version() {
        let engine = engine();
        let summary = render_summary(engine.breakdown(), engine.catalog(), &shown());

        assert_eq!(summary.title, "Janrakshak Kiosk");
        assert_eq!(
            summary.body,
            SummaryBody::Placeholder {
                message: NO_VERSION_MESSAGE.to_string()
            }
        );
        assert!(summary.totals.is_none());
        assert!(summary.lines().is_empty());
    }

    #[test]
    fn test_placeholder_after_toggles_without_version() {
        let mut engine = engine();
        assert_eq!(engine.toggle_feature("sos_standard", true), SelectionOutcome::Changed);
        assert_eq!(engine.toggle_feature("front_dome", true), SelectionOutcome::Changed);

        let summary = render_summary(engine.breakdown(), engine.catalog(), &shown());
        assert_eq!(
            summary.body,
            SummaryBody::Placeholder {
                message: NO_VERSION_MESSAGE.to_string()
            }
        );
        assert!(summary.totals.is_none());
        assert!(engine.breakdown().total.is_zero());
        assert!(!engine.layer_plan().is_active());
    }

    #[test]
    fn test_summary_lines_with_prices() {
        let mut engine = engine();
        engine.set_version(Some("v4")).unwrap();
        engine.toggle_feature("sos_standard", true);
        engine.toggle_feature("aed_kit", true);

        let summary = render_summary(engine.breakdown(), engine.catalog(), &shown());
        assert_eq!(summary.title, "Janrakshak V4");

        let lines = summary.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].label, "Base Model (V4)");
        assert_eq!(lines[0].price.as_deref(), Some("₹2,50,000"));
        assert_eq!(lines[1].label, "SOS Emergency Button");
        assert_eq!(lines[1].price.as_deref(), Some("₹15,000"));
        assert_eq!(lines[2].label, "AED Kit");
        assert_eq!(lines[2].price.as_deref(), Some("₹0"));

        let totals = summary.totals.unwrap();
        assert_eq!(totals.base, "₹2,50,000");
        assert_eq!(totals.options, "₹15,000");
        assert_eq!(totals.grand, "₹2,65,000");
    }

    #[test]
    fn test_hidden_prices_drop_price_text() {
        let mut engine = engine();
        engine.set_version(Some("v5")).unwrap();
        engine.toggle_feature("led_28", true);

        let summary = render_summary(engine.breakdown(), engine.catalog(), &SummaryOptions::default());
        assert!(!summary.prices_visible);
        assert!(summary.totals.is_none());
        assert!(summary.lines().iter().all(|l| l.price.is_none()));
        assert_eq!(summary.lines().len(), 2);

        // The breakdown keeps the numbers regardless.
        assert_eq!(engine.breakdown().total.amount(), 450_000 + 45_000);
    }

    #[test]
    fn test_custom_product_name_and_currency() {
        let mut engine = engine();
        engine.set_version(Some("v4")).unwrap();

        let options = SummaryOptions {
            product_name: "Sentinel".to_string(),
            prices: PriceVisibility::Shown,
            currency: CurrencyFormat {
                symbol: "$".to_string(),
                decimals: 0,
                grouping: crate::money::DigitGrouping::Western,
            },
        };
        let summary = render_summary(engine.breakdown(), engine.catalog(), &options);
        assert_eq!(summary.title, "Sentinel V4");
        assert_eq!(summary.lines()[0].price.as_deref(), Some("$250,000"));
    }

    #[test]
    fn test_projector_hides_stage_without_version() {
        let engine = engine();
        let mut projector = LayerProjector::new();
        let mut surface = RecordingSurface::default();

        let stats = projector.apply(engine.layer_plan(), &mut surface);
        assert_eq!(surface.stage_visible, Some(false));
        assert_eq!(surface.source_writes, 0);
        assert_eq!(surface.visible_count(), 0);
        assert_eq!(stats.visible, 0);
        assert!(!stats.folder_changed);
    }

    #[test]
    fn test_projector_sources_and_visibility() {
        let mut engine = engine();
        let mut projector = LayerProjector::new();
        let mut surface = RecordingSurface::default();

        engine.set_version(Some("v4")).unwrap();
        engine.toggle_feature("front_dome", true);
        let stats = projector.apply(engine.layer_plan(), &mut surface);

        assert!(stats.folder_changed);
        assert_eq!(stats.sources_updated, engine.layer_plan().layers.len() + 1);
        assert_eq!(surface.stage_visible, Some(true));
        assert_eq!(
            surface.source(&LayerSlot::new("layer-base")),
            Some("v4/img/kiosk_base_v4.png")
        );
        assert!(surface.is_visible(&LayerSlot::new("layer-cctv-front")));
        assert!(!surface.is_visible(&LayerSlot::new("layer-sos")));
        assert_eq!(surface.visible_count(), 2);
        assert_eq!(projector.applied_folder(), Some("v4/img/"));
    }

    #[test]
    fn test_projector_skips_unchanged_folder() {
        let mut engine = engine();
        let mut projector = LayerProjector::new();
        let mut surface = RecordingSurface::default();

        engine.set_version(Some("v4")).unwrap();
        projector.apply(engine.layer_plan(), &mut surface);
        let writes = surface.source_writes;

        engine.toggle_feature("sos_standard", true);
        let stats = projector.apply(engine.layer_plan(), &mut surface);
        assert!(!stats.folder_changed);
        assert_eq!(surface.source_writes, writes);

        // Clearing and re-selecting the same version keeps the sources.
        engine.set_version(None).unwrap();
        projector.apply(engine.layer_plan(), &mut surface);
        assert_eq!(surface.stage_visible, Some(false));
        engine.set_version(Some("v4")).unwrap();
        projector.apply(engine.layer_plan(), &mut surface);
        assert_eq!(surface.source_writes, writes);
        assert!(surface.is_visible(&LayerSlot::new("layer-sos")));
    }

    #[test]
    fn test_projector_resources_on_version_switch() {
        let mut engine = engine();
        let mut projector = LayerProjector::new();
        let mut surface = RecordingSurface::default();

        engine.set_version(Some("v4")).unwrap();
        projector.apply(engine.layer_plan(), &mut surface);
        engine.set_version(Some("v5")).unwrap();
        let stats = projector.apply(engine.layer_plan(), &mut surface);

        assert!(stats.folder_changed);
        assert_eq!(
            surface.source(&LayerSlot::new("layer-sos")),
            Some("v5/img/layer_sos.png")
        );
    }

    #[test]
    fn test_projector_resources_base_within_shared_folder() {
        let mut document = Catalog::builtin().to_document();
        for version in &mut document.versions {
            version.asset_folder = "img/".to_string();
        }
        let catalog = Arc::new(Catalog::from_document(document).unwrap());
        let mut engine = ConfigurationEngine::new(catalog);
        let mut projector = LayerProjector::new();
        let mut surface = RecordingSurface::default();
        let base = LayerSlot::new("layer-base");

        engine.set_version(Some("v4")).unwrap();
        projector.apply(engine.layer_plan(), &mut surface);
        assert_eq!(surface.source(&base), Some("img/kiosk_base_v4.png"));
        let writes = surface.source_writes;

        engine.set_version(Some("v5")).unwrap();
        let stats = projector.apply(engine.layer_plan(), &mut surface);

        assert!(!stats.folder_changed);
        assert_eq!(stats.sources_updated, 1);
        assert_eq!(surface.source_writes, writes + 1);
        assert_eq!(
            surface.source(&base),
            engine.layer_plan().base.source.as_deref()
        );
        assert_eq!(surface.source(&base), Some("img/kiosk_base_v5.png"));
        assert_eq!(projector.applied_source(&base), Some("img/kiosk_base_v5.png"));
    }
}
