//! # State Module
//!
//! Manages host state for the configurator.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │          ┌──────────────────────────┬─────────────────────┐            │
//! │          ▼                          ▼                                   │
//! │  ┌────────────────────────┐  ┌────────────────────────┐                │
//! │  │     SessionState       │  │     ConfigState        │                │
//! │  │                        │  │                        │                │
//! │  │  Arc<Mutex<Session>>   │  │  product_name          │                │
//! │  │   • engine             │  │  show_prices           │                │
//! │  │   • layer projector    │  │  currency, export      │                │
//! │  └────────────────────────┘  └────────────────────────┘                │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SessionState: Arc<Mutex<T>>, one event at a time                    │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::{ConfigError, ConfigState, ExportOptions, Orientation, PaperFormat};
pub use session::{Session, SessionState};
