//! # Domain Types
//!
//! Identifiers and catalog entries used throughout the configurator.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Entries                                 │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Version      │   │    Feature      │   │  ChoiceGroup    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id ("v4")      │   │  id             │   │  id             │       │
//! │  │  base_price     │   │  price          │   │  options[]      │       │
//! │  │  asset_folder   │   │  layer (slot)   │   │   value, price  │       │
//! │  │  base_image     │   │  image          │   │   layer, image  │       │
//! │  └─────────────────┘   │  only_versions  │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Explicit Layer Mapping
//! A feature names its layer slot explicitly (`layer`). The feature id, the
//! slot id and the image file are three independent keys; nothing relies on a
//! feature id happening to equal an element id on the page.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a kiosk version.
///
/// Stored lower-cased so the page's `"V4"` radio value and a catalog's `"v4"`
/// refer to the same version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VersionId(String);

impl VersionId {
    /// Creates a normalised version id (trimmed, lower-case).
    pub fn new(raw: &str) -> Self {
        VersionId(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an optional feature (one checkbox on the page).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FeatureId(String);

impl FeatureId {
    pub fn new(raw: &str) -> Self {
        FeatureId(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a single-choice group (one select on the page).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(raw: &str) -> Self {
        GroupId(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an image slot in the layered product picture.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LayerSlot(String);

impl LayerSlot {
    pub fn new(raw: &str) -> Self {
        LayerSlot(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Version
// =============================================================================

/// A purchasable base version of the kiosk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Normalised identifier ("v4").
    pub id: VersionId,

    /// Display label ("V4"). Filled from the id when the document omits it.
    #[serde(default)]
    pub label: String,

    /// Base price in the smallest currency unit.
    pub base_price: Money,

    /// Folder holding this version's layer images, always ending in `/`.
    pub asset_folder: String,

    /// File name of the base product image inside `asset_folder`.
    pub base_image: String,
}

impl Version {
    /// Path of an image file inside this version's asset folder.
    pub fn image_path(&self, file_name: &str) -> String {
        format!("{}{}", self.asset_folder, file_name)
    }

    /// Path of the base product image.
    pub fn base_image_path(&self) -> String {
        self.image_path(&self.base_image)
    }

    /// First segment of the asset folder ("v4/img/" → "v4").
    pub fn folder_short_name(&self) -> &str {
        self.asset_folder
            .split('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(self.id.as_str())
    }

    /// Path of the 3D model: `<folder short name>/<model file>`.
    pub fn model_path(&self, model_file: &str) -> String {
        format!("{}/{}", self.folder_short_name(), model_file)
    }
}

// =============================================================================
// Features
// =============================================================================

/// Section of the page a feature is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCategory {
    /// SOS buttons, sirens, first aid, AED.
    Safety,
    /// LED screens and backlit boards.
    Advertising,
    /// Dome, side and PTZ cameras.
    Cctv,
    #[default]
    Other,
}

/// An optional add-on toggled by a checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,

    /// Label shown in the summary.
    pub label: String,

    #[serde(default)]
    pub category: FeatureCategory,

    /// Price; entries without one price at zero.
    #[serde(default)]
    pub price: Money,

    /// Image slot this feature shows.
    pub layer: LayerSlot,

    /// Image file name inside the active version's asset folder.
    pub image: String,

    /// Versions this feature is available on. Empty means every version.
    #[serde(default)]
    pub only_versions: Vec<VersionId>,
}

impl Feature {
    /// Enabling predicate for the given version.
    pub fn is_available_for(&self, version: &VersionId) -> bool {
        available_on(&self.only_versions, version)
    }
}

// =============================================================================
// Choice Groups
// =============================================================================

/// A single-choice control: at most one option is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceGroup {
    pub id: GroupId,
    pub label: String,
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
}

impl ChoiceGroup {
    /// Looks up an option by its value.
    pub fn option(&self, value: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

/// One alternative inside a [`ChoiceGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Value the select control emits ("24").
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub price: Money,
    pub layer: LayerSlot,
    pub image: String,
    #[serde(default)]
    pub only_versions: Vec<VersionId>,
}

impl ChoiceOption {
    pub fn is_available_for(&self, version: &VersionId) -> bool {
        available_on(&self.only_versions, version)
    }
}

fn available_on(only_versions: &[VersionId], version: &VersionId) -> bool {
    only_versions.is_empty() || only_versions.contains(version)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn v4() -> Version {
        Version {
            id: VersionId::new("V4"),
            label: "V4".to_string(),
            base_price: Money::new(250_000),
            asset_folder: "v4/img/".to_string(),
            base_image: "kiosk_base_v4.png".to_string(),
        }
    }

    #[test]
    fn test_version_id_is_normalised() {
        assert_eq!(VersionId::new(" V4 "), VersionId::new("v4"));
        assert_eq!(VersionId::new("V5").as_str(), "v5");
    }

    #[test]
    fn test_version_paths() {
        let version = v4();
        assert_eq!(version.base_image_path(), "v4/img/kiosk_base_v4.png");
        assert_eq!(version.image_path("layer_sos.png"), "v4/img/layer_sos.png");
        assert_eq!(version.folder_short_name(), "v4");
        assert_eq!(version.model_path("model.glb"), "v4/model.glb");
    }

    #[test]
    fn test_folder_short_name_falls_back_to_id() {
        let version = Version {
            asset_folder: "/".to_string(),
            ..v4()
        };
        assert_eq!(version.folder_short_name(), "v4");
    }

    #[test]
    fn test_feature_availability() {
        let ptz = Feature {
            id: FeatureId::new("ptz_camera"),
            label: "PTZ Camera".to_string(),
            category: FeatureCategory::Cctv,
            price: Money::new(40_000),
            layer: LayerSlot::new("layer-cctv-ptz"),
            image: "layer_cctv_ptz.png".to_string(),
            only_versions: vec![VersionId::new("v4")],
        };
        assert!(ptz.is_available_for(&VersionId::new("v4")));
        assert!(!ptz.is_available_for(&VersionId::new("v5")));

        let unrestricted = Feature {
            only_versions: Vec::new(),
            ..ptz
        };
        assert!(unrestricted.is_available_for(&VersionId::new("v5")));
    }

    #[test]
    fn test_feature_category_default() {
        assert_eq!(FeatureCategory::default(), FeatureCategory::Other);
    }
}
