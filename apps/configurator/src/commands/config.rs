//! # Config Commands
//!
//! Commands for retrieving configurator settings and the catalog.

use kiosk_core::catalog::CatalogDocument;
use tracing::debug;

use crate::state::{ConfigState, SessionState};

/// Gets the current configurator configuration.
///
/// ## When Used
/// - Page load (price visibility, product name, currency)
/// - Export button setup (file name, paper)
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}

/// Gets the catalog the session runs on, for building the page controls.
pub fn get_catalog(session: &SessionState) -> CatalogDocument {
    debug!("get_catalog command");
    session.with_session(|s| s.engine.catalog().to_document())
}
