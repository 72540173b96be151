//! # Session State
//!
//! Holds the one configuration session of the page: the engine and the layer
//! projector that mirrors it onto the image stack.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<T>>` because:
//! 1. Every page event mutates it
//! 2. Events must be applied one at a time, in arrival order
//! 3. The export command reads it while other commands may run
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Operations                                   │
//! │                                                                         │
//! │  Page Event               Command                Session Change         │
//! │  ──────────               ───────                ──────────────         │
//! │                                                                         │
//! │  Version radio ─────────► dispatch() ──────────► engine.set_version    │
//! │                                                                         │
//! │  Feature checkbox ──────► dispatch() ──────────► engine.toggle_feature │
//! │                                                                         │
//! │  Choice select ─────────► dispatch() ──────────► engine.set_choice     │
//! │                                                                         │
//! │  Download Quote ────────► export_quote() ──────► (read only)           │
//! │                                                                         │
//! │  NOTE: The lock is held for the whole event, so the next event always  │
//! │        sees a fully recomputed selection.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use kiosk_core::{Catalog, ConfigurationEngine, LayerProjector, LayerSurface, ProjectionStats};

/// One configurator page's state.
#[derive(Debug)]
pub struct Session {
    pub engine: ConfigurationEngine,
    pub layers: LayerProjector,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Session {
            engine: ConfigurationEngine::new(catalog),
            layers: LayerProjector::new(),
        }
    }

    /// Pushes the engine's current layer plan to the surface.
    pub fn project_layers(&mut self, surface: &mut dyn LayerSurface) -> ProjectionStats {
        self.layers.apply(self.engine.layer_plan(), surface)
    }
}

/// Shared handle to the session.
#[derive(Debug, Clone)]
pub struct SessionState {
    session: Arc<Mutex<Session>>,
}

impl SessionState {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(Session::new(catalog))),
        }
    }

    /// Executes a function with read access to the session.
    ///
    /// A panic inside an earlier event must not freeze the kiosk, so a
    /// poisoned lock is taken over rather than propagated.
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    /// Executes a function with write access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// session_state.with_session_mut(|s| s.engine.toggle_feature("aed_kit", true));
    /// ```
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Arc::new(Catalog::builtin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_core::RecordingSurface;

    #[test]
    fn test_session_starts_empty() {
        let state = SessionState::default();
        assert!(state.with_session(|s| s.engine.selection().is_empty()));
    }

    #[test]
    fn test_mutation_is_visible_to_clones() {
        let state = SessionState::default();
        let other = state.clone();

        state.with_session_mut(|s| s.engine.set_version(Some("v4"))).unwrap();
        assert_eq!(
            other.with_session(|s| s.engine.breakdown().total.amount()),
            250_000
        );
    }

    #[test]
    fn test_project_layers() {
        let state = SessionState::default();
        let mut surface = RecordingSurface::default();

        let stats = state.with_session_mut(|s| {
            s.engine.set_version(Some("v5"))?;
            Ok::<_, kiosk_core::CoreError>(s.project_layers(&mut surface))
        });
        assert_eq!(stats.unwrap().visible, 1);
        assert_eq!(surface.stage_visible, Some(true));
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let state = SessionState::default();
        let poisoner = state.clone();

        let _ = std::thread::spawn(move || {
            poisoner.with_session_mut(|s| {
                s.engine.set_version(Some("v4")).unwrap();
                panic!("event handler crashed");
            })
        })
        .join();

        assert_eq!(
            state.with_session(|s| s.engine.breakdown().total.amount()),
            250_000
        );
    }
}
