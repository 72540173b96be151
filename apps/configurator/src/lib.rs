//! # Kiosk Configurator Host
//!
//! Host library for the Janrakshak kiosk configurator page. Whatever embeds
//! the page (web view, kiosk shell, test harness) calls [`bootstrap`] once and
//! then forwards page events to [`commands::selection::dispatch`].
//!
//! ## Module Organization
//! ```text
//! kiosk_configurator/
//! ├── lib.rs          ◄─── You are here (logging & startup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── Engine + layer projector behind a mutex
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── selection.rs◄─── Page events
//! │   ├── config.rs   ◄─── Config and catalog retrieval
//! │   ├── export.rs   ◄─── Quote export
//! │   └── viewer.rs   ◄─── 3D viewer
//! ├── surface.rs      ◄─── Exporter, export controls, model viewer traits
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;
pub mod surface;

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use state::{ConfigError, ConfigState, SessionState};

/// Everything a host needs to serve one configurator page.
#[derive(Debug, Clone)]
pub struct App {
    pub config: ConfigState,
    pub session: SessionState,
}

/// Loads configuration and catalog and creates the session.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Configurator Startup                              │
/// │                                                                         │
/// │  1. Load Config ──────────────────────────────────────────────────────► │
/// │     • defaults → configurator.toml → KIOSK_* environment                │
/// │                                                                         │
/// │  2. Load Catalog ─────────────────────────────────────────────────────► │
/// │     • catalog_path (TOML or JSON) or the built-in V4/V5 catalog         │
/// │     • validated before use                                              │
/// │                                                                         │
/// │  3. Initialize Session ───────────────────────────────────────────────► │
/// │     • No version, nothing selected, layer stack hidden                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn bootstrap(config_path: Option<PathBuf>) -> Result<App, ConfigError> {
    let config = ConfigState::load(config_path)?;
    let catalog = config.load_catalog()?;

    info!(
        product = %config.product_name,
        show_prices = config.show_prices,
        versions = catalog.versions().len(),
        "Configurator initialized"
    );

    Ok(App {
        session: SessionState::new(Arc::new(catalog)),
        config,
    })
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kiosk_core=trace` - Show trace for the engine only
/// - Default: INFO, DEBUG for the kiosk crates
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kiosk_core=debug,kiosk_configurator=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
