//! # kiosk-core: Pure Configuration Logic for the Kiosk Configurator
//!
//! This crate is the **heart** of the configurator. It maps a user's
//! selections (version, add-ons, single-choice options) to a price breakdown
//! and a plan for the stacked product image, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Configurator Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Configurator Page                            │   │
//! │  │    Version radios ──► Add-on checkboxes ──► Summary ──► Quote   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ SelectionEvent                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/configurator                            │   │
//! │  │    dispatch, export_quote, open_viewer                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kiosk-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │  engine   │  │ projector │  │   money   │  │   │
//! │  │   │ versions  │  │ Selection │  │  Summary  │  │   Money   │  │   │
//! │  │   │ features  │  │ LayerPlan │  │  Layers   │  │  format   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DOM • NO NETWORK • DETERMINISTIC                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Identifiers and catalog entries (Version, Feature, ChoiceGroup)
//! - [`catalog`] - The immutable catalog and its document formats
//! - [`engine`] - Configuration State Engine
//! - [`projector`] - Summary rendering and layer visibility projection
//! - [`money`] - Integer money and currency formatting
//! - [`error`] - Domain error types
//! - [`validation`] - Catalog validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use kiosk_core::{Catalog, ConfigurationEngine};
//!
//! let mut engine = ConfigurationEngine::new(Arc::new(Catalog::builtin()));
//! engine.set_version(Some("v4")).unwrap();
//! engine.toggle_feature("sos_standard", true);
//!
//! let breakdown = engine.breakdown();
//! assert_eq!(breakdown.base.amount(), 250_000);
//! assert_eq!(engine.layer_plan().visible_count(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod engine;
pub mod error;
pub mod money;
pub mod projector;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::Catalog;
pub use engine::{
    ConfigurationEngine, ItemRef, LayerPlan, LayerState, PriceBreakdown, PricedItem, Selection,
    SelectionOutcome,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{CurrencyFormat, DigitGrouping, Money, MAX_CURRENCY_DECIMALS};
pub use projector::{
    render_summary, LayerProjector, LayerSurface, PriceVisibility, ProjectionStats,
    RecordingSurface, Summary, SummaryBody, SummaryLine, SummaryOptions, SummaryTotals,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Layer slot holding the version's base image.
pub const DEFAULT_BASE_LAYER: &str = "layer-base";

/// Product name used in summary titles and the 3D viewer.
pub const DEFAULT_PRODUCT_NAME: &str = "Janrakshak";

/// Model file expected in every version folder.
pub const DEFAULT_MODEL_FILE: &str = "model.glb";

/// Maximum length of any catalog identifier.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Largest price a single catalog entry may carry, in the smallest unit.
pub const MAX_PRICE: i64 = 1_000_000_000_000;
