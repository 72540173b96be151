//! # Catalog
//!
//! The immutable set of versions, optional features and single-choice groups.
//!
//! ## Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Sources                                 │
//! │                                                                         │
//! │  Catalog::builtin()          Janrakshak V4 / V5 line, compiled in      │
//! │                                                                         │
//! │  Catalog::from_toml_str()    catalog.toml shipped next to the page     │
//! │  Catalog::from_json_str()    catalog.json embedded in the page         │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  CatalogDocument ──► normalise ──► validate ──► Catalog                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reading files is the host's job; this module only parses strings.
//!
//! ## Document Format
//! ```toml
//! base_layer = "layer-base"
//!
//! [[versions]]
//! id = "v4"
//! base_price = 250000
//! asset_folder = "v4/img/"
//! base_image = "kiosk_base_v4.png"
//!
//! [[features]]
//! id = "ptz_camera"
//! label = "PTZ Camera"
//! category = "cctv"
//! price = 40000
//! layer = "layer-cctv-ptz"
//! image = "layer_cctv_ptz.png"
//! only_versions = ["v4"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{
    ChoiceGroup, ChoiceOption, Feature, FeatureCategory, FeatureId, GroupId, LayerSlot, Version,
    VersionId,
};
use crate::validation::{
    normalize_folder, validate_asset_folder, validate_file_name, validate_identifier,
    validate_label, validate_price, ValidationResult,
};
use crate::DEFAULT_BASE_LAYER;

// =============================================================================
// Catalog Document
// =============================================================================

/// Serialized form of a catalog, as found in catalog files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Slot holding the version's base image.
    #[serde(default = "default_base_layer")]
    pub base_layer: LayerSlot,

    #[serde(default)]
    pub versions: Vec<Version>,

    #[serde(default)]
    pub features: Vec<Feature>,

    #[serde(default)]
    pub choice_groups: Vec<ChoiceGroup>,
}

fn default_base_layer() -> LayerSlot {
    LayerSlot::new(DEFAULT_BASE_LAYER)
}

// =============================================================================
// Catalog
// =============================================================================

/// Validated, immutable catalog. Entries keep their document order, which is
/// also the order of summary lines and image layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    base_layer: LayerSlot,
    versions: Vec<Version>,
    features: Vec<Feature>,
    choice_groups: Vec<ChoiceGroup>,
}

impl Catalog {
    /// Parses a TOML catalog document.
    pub fn from_toml_str(source: &str) -> CoreResult<Self> {
        let document: CatalogDocument =
            toml::from_str(source).map_err(|e| CoreError::CatalogParse {
                format: "TOML",
                reason: e.to_string(),
            })?;
        Self::from_document(document)
    }

    /// Parses a JSON catalog document.
    pub fn from_json_str(source: &str) -> CoreResult<Self> {
        let document: CatalogDocument =
            serde_json::from_str(source).map_err(|e| CoreError::CatalogParse {
                format: "JSON",
                reason: e.to_string(),
            })?;
        Self::from_document(document)
    }

    /// Normalises and validates a document.
    ///
    /// ## Normalisation
    /// - Version ids are lower-cased, labels default to the upper-cased id
    /// - Asset folders gain a trailing `/`
    /// - Identifiers and file names are trimmed
    pub fn from_document(mut document: CatalogDocument) -> CoreResult<Self> {
        normalize(&mut document);
        validate_document(&document)?;

        Ok(Catalog {
            base_layer: document.base_layer,
            versions: document.versions,
            features: document.features,
            choice_groups: document.choice_groups,
        })
    }

    /// Converts back into the serializable document form.
    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            base_layer: self.base_layer.clone(),
            versions: self.versions.clone(),
            features: self.features.clone(),
            choice_groups: self.choice_groups.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    pub fn base_layer(&self) -> &LayerSlot {
        &self.base_layer
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn choice_groups(&self) -> &[ChoiceGroup] {
        &self.choice_groups
    }

    pub fn version(&self, id: &VersionId) -> Option<&Version> {
        self.versions.iter().find(|v| &v.id == id)
    }

    pub fn feature(&self, id: &FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| &f.id == id)
    }

    pub fn choice_group(&self, id: &GroupId) -> Option<&ChoiceGroup> {
        self.choice_groups.iter().find(|g| &g.id == id)
    }

    pub fn choice_option(&self, group: &GroupId, value: &str) -> Option<&ChoiceOption> {
        self.choice_group(group).and_then(|g| g.option(value))
    }

    /// Every optional layer slot, features first, then choice options.
    pub fn optional_layers(&self) -> impl Iterator<Item = &LayerSlot> {
        self.features.iter().map(|f| &f.layer).chain(
            self.choice_groups
                .iter()
                .flat_map(|g| g.options.iter().map(|o| &o.layer)),
        )
    }

    // -------------------------------------------------------------------------
    // Built-in Catalog
    // -------------------------------------------------------------------------

    /// The Janrakshak kiosk line.
    ///
    /// Prices are whole rupees. The AED kit carries no price of its own and
    /// the PTZ camera mounts only on V4 hardware. The LED screen-size select
    /// has no layers defined yet, so no choice group is declared.
    pub fn builtin() -> Self {
        use FeatureCategory::{Advertising, Cctv, Safety};

        let versions = vec![
            builtin_version("v4", 250_000, "v4/img/", "kiosk_base_v4.png"),
            builtin_version("v5", 450_000, "v5/img/", "kiosk_base_v5.png"),
        ];

        let mut features = vec![
            builtin_feature("sos_standard", "SOS Emergency Button", Safety, 15_000, "layer-sos", "layer_sos.png"),
            builtin_feature("emergency_siren", "Emergency Siren & Beacon", Safety, 8_000, "layer-siren", "layer_siren_beacon.png"),
            builtin_feature("fire_ex_service", "Fire Extinguisher", Safety, 5_000, "layer-fire-ex", "layer_fire_extinguisher.png"),
            builtin_feature("first_aid_service", "First Aid Kit", Safety, 3_500, "layer-first-aid", "layer_first_aid_kit.png"),
            builtin_feature("common_request_btn", "Medical Request Button", Safety, 6_000, "layer-medical", "layer_medical.png"),
            builtin_feature("aed_kit", "AED Kit", Safety, 0, "layer-aed", "layer_aed_box.png"),
            builtin_feature("sos_extra", "Additional SOS Panel", Safety, 12_000, "layer-extra", "layer_extra.png"),
            builtin_feature("led_28", "28\" LED Display", Advertising, 45_000, "layer-led-28", "layer_led_28in.png"),
            builtin_feature("led_56_dual", "Dual 56\" LED Display", Advertising, 120_000, "layer-led-56", "layer_led_56in_dual.png"),
            builtin_feature("backlight_boards", "Backlit Advertising Boards", Advertising, 30_000, "layer-backlight", "layer_backlight_board.png"),
            builtin_feature("front_dome", "Front Dome Camera", Cctv, 9_000, "layer-cctv-front", "layer_cctv_front_dome.png"),
            builtin_feature("side_domes", "Side Dome Cameras", Cctv, 16_000, "layer-cctv-side", "layer_cctv_side_domes.png"),
            builtin_feature("ptz_camera", "PTZ Camera", Cctv, 40_000, "layer-cctv-ptz", "layer_cctv_ptz.png"),
        ];
        if let Some(ptz) = features.iter_mut().find(|f| f.id.as_str() == "ptz_camera") {
            ptz.only_versions = vec![VersionId::new("v4")];
        }

        Catalog {
            base_layer: default_base_layer(),
            versions,
            features,
            choice_groups: Vec::new(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builtin()
    }
}

fn builtin_version(id: &str, base_price: i64, folder: &str, base_image: &str) -> Version {
    Version {
        id: VersionId::new(id),
        label: id.to_uppercase(),
        base_price: Money::new(base_price),
        asset_folder: folder.to_string(),
        base_image: base_image.to_string(),
    }
}

fn builtin_feature(
    id: &str,
    label: &str,
    category: FeatureCategory,
    price: i64,
    layer: &str,
    image: &str,
) -> Feature {
    Feature {
        id: FeatureId::new(id),
        label: label.to_string(),
        category,
        price: Money::new(price),
        layer: LayerSlot::new(layer),
        image: image.to_string(),
        only_versions: Vec::new(),
    }
}

// =============================================================================
// Normalisation & Cross-Entry Validation
// =============================================================================

fn normalize(document: &mut CatalogDocument) {
    document.base_layer = LayerSlot::new(document.base_layer.as_str());

    for version in &mut document.versions {
        version.id = VersionId::new(version.id.as_str());
        version.label = version.label.trim().to_string();
        if version.label.is_empty() {
            version.label = version.id.as_str().to_uppercase();
        }
        version.asset_folder = normalize_folder(&version.asset_folder);
        version.base_image = version.base_image.trim().to_string();
    }

    for feature in &mut document.features {
        feature.id = FeatureId::new(feature.id.as_str());
        feature.layer = LayerSlot::new(feature.layer.as_str());
        feature.image = feature.image.trim().to_string();
        normalize_versions(&mut feature.only_versions);
    }

    for group in &mut document.choice_groups {
        group.id = GroupId::new(group.id.as_str());
        for option in &mut group.options {
            option.value = option.value.trim().to_string();
            option.layer = LayerSlot::new(option.layer.as_str());
            option.image = option.image.trim().to_string();
            normalize_versions(&mut option.only_versions);
        }
    }
}

fn normalize_versions(versions: &mut [VersionId]) {
    for id in versions.iter_mut() {
        *id = VersionId::new(id.as_str());
    }
}

fn validate_document(document: &CatalogDocument) -> ValidationResult<()> {
    if document.versions.is_empty() {
        return Err(ValidationError::Required {
            field: "versions".to_string(),
        });
    }

    validate_identifier("base_layer", document.base_layer.as_str())?;
    let mut layers = HashSet::new();
    layers.insert(document.base_layer.as_str());

    let mut version_ids = HashSet::new();
    for version in &document.versions {
        let id = version.id.as_str();
        validate_identifier("versions.id", id)?;
        unique(&mut version_ids, "version", id)?;
        validate_price(&format!("versions.{id}.base_price"), version.base_price)?;
        validate_asset_folder(&format!("versions.{id}.asset_folder"), &version.asset_folder)?;
        validate_file_name(&format!("versions.{id}.base_image"), &version.base_image)?;
    }

    let mut feature_ids = HashSet::new();
    for feature in &document.features {
        let id = feature.id.as_str();
        validate_identifier("features.id", id)?;
        unique(&mut feature_ids, "feature", id)?;
        validate_label(&format!("features.{id}.label"), &feature.label)?;
        validate_price(&format!("features.{id}.price"), feature.price)?;
        validate_identifier(&format!("features.{id}.layer"), feature.layer.as_str())?;
        unique(&mut layers, "layer", feature.layer.as_str())?;
        validate_file_name(&format!("features.{id}.image"), &feature.image)?;
        known_versions(
            &version_ids,
            &format!("features.{id}.only_versions"),
            &feature.only_versions,
        )?;
    }

    let mut group_ids = HashSet::new();
    for group in &document.choice_groups {
        let id = group.id.as_str();
        validate_identifier("choice_groups.id", id)?;
        unique(&mut group_ids, "choice group", id)?;
        validate_label(&format!("choice_groups.{id}.label"), &group.label)?;

        let mut values = HashSet::new();
        for option in &group.options {
            let field = format!("choice_groups.{id}.{}", option.value);
            validate_identifier(&format!("choice_groups.{id}.value"), &option.value)?;
            unique(&mut values, "option value", &option.value)?;
            validate_label(&format!("{field}.label"), &option.label)?;
            validate_price(&format!("{field}.price"), option.price)?;
            validate_identifier(&format!("{field}.layer"), option.layer.as_str())?;
            unique(&mut layers, "layer", option.layer.as_str())?;
            validate_file_name(&format!("{field}.image"), &option.image)?;
            known_versions(&version_ids, &format!("{field}.only_versions"), &option.only_versions)?;
        }
    }

    worst_case_total(document)?;

    Ok(())
}

/// Most expensive configuration the document allows: the dearest version
/// with every feature and the dearest option of each group. Rejects documents
/// whose total would not fit in `Money`.
fn worst_case_total(document: &CatalogDocument) -> ValidationResult<Money> {
    let base = document
        .versions
        .iter()
        .map(|v| v.base_price)
        .max()
        .unwrap_or_default();
    let features = document.features.iter().map(|f| f.price);
    let choices = document
        .choice_groups
        .iter()
        .filter_map(|g| g.options.iter().map(|o| o.price).max());

    features
        .chain(choices)
        .try_fold(base, Money::checked_add)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "catalog total".to_string(),
            min: 0,
            max: i64::MAX,
        })
}

fn unique<'a>(seen: &mut HashSet<&'a str>, field: &str, value: &'a str) -> ValidationResult<()> {
    if seen.insert(value) {
        Ok(())
    } else {
        Err(ValidationError::Duplicate {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

fn known_versions(known: &HashSet<&str>, field: &str, versions: &[VersionId]) -> ValidationResult<()> {
    match versions.iter().find(|v| !known.contains(v.as_str())) {
        Some(unknown) => Err(ValidationError::UnknownReference {
            field: field.to_string(),
            value: unknown.to_string(),
        }),
        None => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_CATALOG: &str = r#"
[[versions]]
id = "V4"
base_price = 250000
asset_folder = "v4/img"
base_image = "kiosk_base_v4.png"

[[versions]]
id = "v5"
label = "V5 Pro"
base_price = 450000
asset_folder = "v5/img/"
base_image = "kiosk_base_v5.png"

[[features]]
id = "aed_kit"
label = "AED Kit"
category = "safety"
layer = "layer-aed"
image = "layer_aed_box.png"

[[features]]
id = "ptz_camera"
label = "PTZ Camera"
category = "cctv"
price = 40000
layer = "layer-cctv-ptz"
image = "layer_cctv_ptz.png"
only_versions = ["V4"]

[[choice_groups]]
id = "led_screen_size"
label = "LED Screen"

[[choice_groups.options]]
value = "24"
label = "24 inch"
price = 20000
layer = "layer-led-24"
image = "layer_led_24in.png"
"#;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let builtin = Catalog::builtin();
        let reparsed = Catalog::from_document(builtin.to_document()).unwrap();
        assert_eq!(builtin, reparsed);

        assert_eq!(builtin.versions().len(), 2);
        assert_eq!(builtin.features().len(), 13);
        assert!(builtin.choice_groups().is_empty());
    }

    #[test]
    fn test_builtin_ptz_is_v4_only() {
        let catalog = Catalog::builtin();
        let ptz = catalog.feature(&FeatureId::new("ptz_camera")).unwrap();
        assert!(ptz.is_available_for(&VersionId::new("v4")));
        assert!(!ptz.is_available_for(&VersionId::new("v5")));
    }

    #[test]
    fn test_builtin_aed_kit_has_no_price() {
        let catalog = Catalog::builtin();
        let aed = catalog.feature(&FeatureId::new("aed_kit")).unwrap();
        assert!(aed.price.is_zero());
    }

    #[test]
    fn test_parse_toml_normalises_entries() {
        let catalog = Catalog::from_toml_str(SMALL_CATALOG).unwrap();

        let v4 = catalog.version(&VersionId::new("v4")).unwrap();
        assert_eq!(v4.label, "V4");
        assert_eq!(v4.asset_folder, "v4/img/");

        let v5 = catalog.version(&VersionId::new("V5")).unwrap();
        assert_eq!(v5.label, "V5 Pro");

        let aed = catalog.feature(&FeatureId::new("aed_kit")).unwrap();
        assert!(aed.price.is_zero());

        let ptz = catalog.feature(&FeatureId::new("ptz_camera")).unwrap();
        assert_eq!(ptz.only_versions, vec![VersionId::new("v4")]);

        assert_eq!(catalog.base_layer().as_str(), "layer-base");
        let option = catalog
            .choice_option(&GroupId::new("led_screen_size"), "24")
            .unwrap();
        assert_eq!(option.price.amount(), 20_000);
        assert_eq!(catalog.optional_layers().count(), 3);
    }

    #[test]
    fn test_parse_json() {
        let json = serde_json::to_string(&Catalog::builtin().to_document()).unwrap();
        let catalog = Catalog::from_json_str(&json).unwrap();
        assert_eq!(catalog, Catalog::builtin());
    }

    #[test]
    fn test_parse_errors() {
        let err = Catalog::from_toml_str("versions = 3").unwrap_err();
        assert!(matches!(err, CoreError::CatalogParse { format: "TOML", .. }));

        let err = Catalog::from_json_str("{").unwrap_err();
        assert!(matches!(err, CoreError::CatalogParse { format: "JSON", .. }));
    }

    #[test]
    fn test_rejects_empty_catalog() {
        let err = Catalog::from_toml_str("").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_rejects_shared_layer_slot() {
        let mut document = Catalog::builtin().to_document();
        document.features[1].layer = document.features[0].layer.clone();

        let err = Catalog::from_document(document).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_rejects_feature_on_base_slot() {
        let mut document = Catalog::builtin().to_document();
        document.features[0].layer = LayerSlot::new("layer-base");

        assert!(Catalog::from_document(document).is_err());
    }

    #[test]
    fn test_rejects_unknown_only_version() {
        let mut document = Catalog::builtin().to_document();
        document.features[0].only_versions = vec![VersionId::new("v9")];

        let err = Catalog::from_document(document).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::UnknownReference { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_price() {
        let mut document = Catalog::builtin().to_document();
        document.features[0].price = Money::new(-1);

        assert!(Catalog::from_document(document).is_err());
    }

    #[test]
    fn test_rejects_price_above_maximum() {
        let mut document = Catalog::builtin().to_document();
        document.versions[0].base_price = Money::new(i64::MAX);

        let err = Catalog::from_document(document).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_worst_case_total_of_builtin() {
        let document = Catalog::builtin().to_document();
        let expected = Money::new(450_000)
            + document.features.iter().map(|f| f.price).sum::<Money>();
        assert_eq!(worst_case_total(&document).unwrap(), expected);
    }

    #[test]
    fn test_rejects_document_whose_total_overflows() {
        let mut document = Catalog::builtin().to_document();
        document.features[0].price = Money::new(i64::MAX);
        assert!(worst_case_total(&document).is_err());
    }

    #[test]
    fn test_rejects_duplicate_version() {
        let mut document = Catalog::builtin().to_document();
        let mut duplicate = document.versions[0].clone();
        duplicate.id = VersionId::new("V4");
        document.versions.push(duplicate);

        let err = Catalog::from_document(document).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Duplicate { .. })
        ));
    }
}
