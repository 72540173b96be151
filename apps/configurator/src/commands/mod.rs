//! # Commands Module
//!
//! All commands exposed to the configurator page.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── selection.rs  ◄─── Version, feature and choice events
//! ├── config.rs     ◄─── Configuration and catalog retrieval
//! ├── export.rs     ◄─── "Download Quote"
//! └── viewer.rs     ◄─── "View in 3D"
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Page                                                                   │
//! │  ────                                                                   │
//! │  checkbox change ──► { "type": "feature_toggled", ... }                 │
//! │         │                                                               │
//! │         │ (host bridge)                                                 │
//! │         ▼                                                               │
//! │  Rust Host                                                              │
//! │  ─────────                                                              │
//! │  dispatch(                                                              │
//! │      &SessionState,        ◄── engine + layer projector                 │
//! │      &ConfigState,         ◄── price visibility, product name           │
//! │      SelectionEvent,       ◄── from the page                            │
//! │      &mut dyn LayerSurface ◄── image stack                              │
//! │  ) -> Result<ConfigurationView, ApiError>                               │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  Page re-renders the summary panel                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command takes only the state and collaborators it needs.

pub mod config;
pub mod export;
pub mod selection;
pub mod viewer;
