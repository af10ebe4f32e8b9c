//! Application state for the pricing engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::engine::Engine;

/// Shared application state.
///
/// Holds the engine, and through it the caches, shared by every handler.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Engine>,
}

impl AppState {
    /// Creates application state with a fresh engine built from `config`.
    pub fn new(config: EngineConfig) -> Self {
        Self::from_engine(Engine::new(config))
    }

    /// Creates application state around an existing engine.
    pub fn from_engine(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns a reference to the engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Returns a shared handle to the engine, for work moved off the
    /// request task.
    pub fn engine_handle(&self) -> Arc<Engine> {
        Arc::clone(&self.engine)
    }
}
