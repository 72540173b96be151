//! # Configuration State
//!
//! Stores configurator settings loaded at startup.
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file (`configurator.toml`)
//! 3. Environment variables (`KIOSK_*`)
//!
//! ## Example `configurator.toml`
//! ```toml
//! productName = "Janrakshak"
//! showPrices = true
//! catalogPath = "/etc/kiosk/catalog.toml"
//!
//! [currency]
//! symbol = "₹"
//! decimals = 0
//! grouping = "indian"
//!
//! [export]
//! fileName = "Kiosk_Quote.pdf"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use directories::ProjectDirs;
use kiosk_core::{
    Catalog, CoreError, CurrencyFormat, PriceVisibility, SummaryOptions, MAX_CURRENCY_DECIMALS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CoreError),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Page-to-document settings for the quote export.
///
/// Mirrors what the page's PDF library needs: margins, file name, image
/// quality, render scale and paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    /// Element id of the region captured into the document.
    pub region: String,
    /// Top/bottom and left/right margins in millimetres.
    pub margin_mm: [u32; 2],
    pub file_name: String,
    /// JPEG quality between 0 and 1.
    pub image_quality: f32,
    /// Render scale of the page capture.
    pub scale: u32,
    pub letter_rendering: bool,
    pub paper: PaperFormat,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperFormat {
    #[default]
    A4,
    Letter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            region: "summary-content".to_string(),
            margin_mm: [10, 10],
            file_name: "Kiosk_Quote.pdf".to_string(),
            image_quality: 0.98,
            scale: 2,
            letter_rendering: true,
            paper: PaperFormat::A4,
            orientation: Orientation::Portrait,
        }
    }
}

/// Configurator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigState {
    /// Product name used in titles ("Janrakshak V4").
    pub product_name: String,

    /// Whether prices appear in the summary. Off by default: the kiosk is
    /// shown to customers before a quote is agreed.
    pub show_prices: bool,

    pub currency: CurrencyFormat,

    /// Catalog file (TOML or JSON). `None` uses the built-in catalog.
    pub catalog_path: Option<PathBuf>,

    /// 3D model file name inside each version's folder.
    pub model_file: String,

    pub export: ExportOptions,
}

impl Default for ConfigState {
    /// Returns the stock Janrakshak kiosk configuration.
    ///
    /// ## Default Values
    /// - Product: "Janrakshak"
    /// - Prices: hidden
    /// - Currency: ₹ with Indian digit grouping, whole rupees
    /// - Catalog: built-in
    fn default() -> Self {
        ConfigState {
            product_name: kiosk_core::DEFAULT_PRODUCT_NAME.to_string(),
            show_prices: false,
            currency: CurrencyFormat::default(),
            catalog_path: None,
            model_file: kiosk_core::DEFAULT_MODEL_FILE.to_string(),
            export: ExportOptions::default(),
        }
    }
}

impl ConfigState {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`configurator.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading configurator config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load configurator config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Platform config file location.
    ///
    /// - **Linux**: `~/.config/configurator/configurator.toml`
    /// - **macOS**: `~/Library/Application Support/com.janrakshak.configurator/configurator.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "janrakshak", "configurator")
            .map(|dirs| dirs.config_dir().join("configurator.toml"))
    }

    /// Applies `KIOSK_*` overrides read through `lookup`.
    ///
    /// ## Environment Variables
    /// - `KIOSK_PRODUCT_NAME`: Override product name
    /// - `KIOSK_SHOW_PRICES`: `true`/`false`/`1`/`0`
    /// - `KIOSK_CATALOG_PATH`: Catalog file
    /// - `KIOSK_CURRENCY_SYMBOL`: Override currency symbol
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("KIOSK_PRODUCT_NAME") {
            self.product_name = name;
        }

        if let Some(flag) = lookup("KIOSK_SHOW_PRICES") {
            match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.show_prices = true,
                "0" | "false" | "no" => self.show_prices = false,
                other => warn!(value = other, "Ignoring invalid KIOSK_SHOW_PRICES"),
            }
        }

        if let Some(path) = lookup("KIOSK_CATALOG_PATH") {
            debug!(%path, "Overriding catalog path from environment");
            self.catalog_path = Some(PathBuf::from(path));
        }

        if let Some(symbol) = lookup("KIOSK_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.product_name.trim().is_empty() {
            return Err(ConfigError::Invalid("product_name must not be empty".into()));
        }

        kiosk_core::validation::validate_file_name("model_file", &self.model_file)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        kiosk_core::validation::validate_file_name("export.file_name", &self.export.file_name)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if !(0.0..=1.0).contains(&self.export.image_quality) {
            return Err(ConfigError::Invalid(
                "export.image_quality must be between 0 and 1".into(),
            ));
        }

        if self.export.scale == 0 {
            return Err(ConfigError::Invalid("export.scale must be greater than 0".into()));
        }

        if self.currency.decimals > MAX_CURRENCY_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "currency.decimals must be at most {MAX_CURRENCY_DECIMALS}"
            )));
        }

        Ok(())
    }

    /// Loads the configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog_path {
            None => Ok(Catalog::builtin()),
            Some(path) => {
                let catalog = read_catalog(path)?;
                info!(
                    ?path,
                    versions = catalog.versions().len(),
                    features = catalog.features().len(),
                    "Catalog loaded"
                );
                Ok(catalog)
            }
        }
    }

    /// Summary presentation settings derived from this configuration.
    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            product_name: self.product_name.clone(),
            prices: PriceVisibility::from_flag(self.show_prices),
            currency: self.currency.clone(),
        }
    }
}

fn read_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let catalog = if is_json {
        Catalog::from_json_str(&contents)?
    } else {
        Catalog::from_toml_str(&contents)?
    };
    Ok(catalog)
}
