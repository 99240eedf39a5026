//! Application state.

use narr_core::{Analyzer, Settings, StructureRegistry};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self::with_registry(settings, StructureRegistry::with_builtins())
    }

    pub fn with_registry(settings: Settings, registry: StructureRegistry) -> Self {
        Self {
            analyzer: Arc::new(Analyzer::new(registry)),
            settings: Arc::new(settings),
        }
    }
}
