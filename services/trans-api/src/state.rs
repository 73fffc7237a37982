//! Application state for the transformation API.

use std::sync::Arc;

use catalog::{CrsCatalog, CustomCrsRegistry};
use pipeline::{PipelineCache, PipelineComposer, TransformEngine};

/// Shared application state.
pub struct AppState {
    /// The static CRS catalog.
    pub catalog: Arc<CrsCatalog>,

    /// Metadata for identifiers the engine's database does not know.
    pub custom: CustomCrsRegistry,

    /// The transformation engine, also used directly for CRS introspection.
    pub engine: Arc<dyn TransformEngine>,

    /// Compiled pipelines, memoized per ordered identifier pair.
    pub cache: PipelineCache,
}

impl AppState {
    pub fn new(catalog: Arc<CrsCatalog>, engine: Arc<dyn TransformEngine>) -> Self {
        let composer = PipelineComposer::new(Arc::clone(&catalog), Arc::clone(&engine));

        Self {
            catalog,
            custom: CustomCrsRegistry::new(),
            engine,
            cache: PipelineCache::new(composer),
        }
    }
}
