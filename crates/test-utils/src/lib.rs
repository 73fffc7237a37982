//! Shared test utilities for the crs-trans workspace.
//!
//! The main export is [`MockEngine`], a scripted [`TransformEngine`] for
//! exercising the composer, the cache and the HTTP service without linking
//! PROJ. Every build is counted and logged so tests can assert on what the
//! composer asked for.
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use catalog::{CrsCatalog, CrsMetadata};
use crs_common::{AreaOfInterest, Coord, CrsId};
use pipeline::{EngineError, Stage, TransformEngine};

type StageFn = Arc<dyn Fn(Coord) -> Coord + Send + Sync>;

struct ClosureStage(StageFn);

impl Stage for ClosureStage {
    fn apply(&self, coord: Coord) -> Result<Coord, EngineError> {
        Ok((self.0)(coord))
    }
}

/// The builtin catalog doubles as the test catalog; it covers native,
/// custom, compound and Global identifiers.
pub fn test_catalog() -> CrsCatalog {
    CrsCatalog::builtin().expect("builtin catalog must parse")
}

/// Scripted engine.
///
/// Unscripted builds succeed with identity stages so tests only need to
/// script what they assert on. Builds are counted for at-most-once cache
/// assertions, and the pair/expression/area arguments of every build are
/// logged for composer-shape assertions.
pub struct MockEngine {
    pair_stages: HashMap<(CrsId, CrsId), StageFn>,
    expression_stages: Vec<(String, StageFn)>,
    rejected_pairs: Vec<(CrsId, CrsId)>,
    reject_all_pairs: bool,
    panicking_pairs: Vec<(CrsId, CrsId)>,
    metadata: HashMap<CrsId, CrsMetadata>,
    builds: Arc<AtomicUsize>,
    pair_log: Arc<Mutex<Vec<(CrsId, CrsId)>>>,
    expression_log: Arc<Mutex<Vec<String>>>,
    area_log: Arc<Mutex<Vec<Option<AreaOfInterest>>>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            pair_stages: HashMap::new(),
            expression_stages: Vec::new(),
            rejected_pairs: Vec::new(),
            reject_all_pairs: false,
            panicking_pairs: Vec::new(),
            metadata: HashMap::new(),
            builds: Arc::new(AtomicUsize::new(0)),
            pair_log: Arc::new(Mutex::new(Vec::new())),
            expression_log: Arc::new(Mutex::new(Vec::new())),
            area_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script the stage built for one identifier pair.
    pub fn with_pair_stage(
        mut self,
        src: &str,
        dst: &str,
        f: impl Fn(Coord) -> Coord + Send + Sync + 'static,
    ) -> Self {
        self.pair_stages
            .insert((CrsId::new(src), CrsId::new(dst)), Arc::new(f));
        self
    }

    /// Script the stage built for any pipeline expression containing
    /// `fragment`.
    pub fn with_expression_stage(
        mut self,
        fragment: &str,
        f: impl Fn(Coord) -> Coord + Send + Sync + 'static,
    ) -> Self {
        self.expression_stages
            .push((fragment.to_string(), Arc::new(f)));
        self
    }

    /// Make the engine reject one identifier pair.
    pub fn with_rejected_pair(mut self, src: &str, dst: &str) -> Self {
        self.rejected_pairs.push((CrsId::new(src), CrsId::new(dst)));
        self
    }

    /// Make every crs-to-crs build fail.
    pub fn reject_pairs(mut self) -> Self {
        self.reject_all_pairs = true;
        self
    }

    /// Make the build for one identifier pair panic.
    pub fn with_panicking_pair(mut self, src: &str, dst: &str) -> Self {
        self.panicking_pairs
            .push((CrsId::new(src), CrsId::new(dst)));
        self
    }

    /// Script the introspection metadata for one identifier.
    pub fn with_metadata(mut self, id: &str, metadata: CrsMetadata) -> Self {
        self.metadata.insert(CrsId::new(id), metadata);
        self
    }

    /// Number of stages built so far.
    pub fn build_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.builds)
    }

    /// Identifier pairs of every crs-to-crs build, in build order.
    pub fn pair_log(&self) -> Arc<Mutex<Vec<(CrsId, CrsId)>>> {
        Arc::clone(&self.pair_log)
    }

    /// Expressions of every pipeline build, in build order.
    pub fn expression_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.expression_log)
    }

    /// Area constraint of every crs-to-crs build, in build order.
    pub fn area_log(&self) -> Arc<Mutex<Vec<Option<AreaOfInterest>>>> {
        Arc::clone(&self.area_log)
    }
}

impl TransformEngine for MockEngine {
    fn supports_authority(&self, authority: &str) -> bool {
        authority == "EPSG"
    }

    fn build_crs_to_crs(
        &self,
        src: &CrsId,
        dst: &CrsId,
        area: Option<&AreaOfInterest>,
    ) -> Result<Box<dyn Stage>, EngineError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.pair_log
            .lock()
            .unwrap()
            .push((src.clone(), dst.clone()));
        self.area_log.lock().unwrap().push(area.copied());

        let key = (src.clone(), dst.clone());
        if self.panicking_pairs.contains(&key) {
            panic!("scripted panic for {} -> {}", src, dst);
        }
        if self.reject_all_pairs || self.rejected_pairs.contains(&key) {
            return Err(EngineError::Rejected(format!("{} -> {}", src, dst)));
        }

        let f = self
            .pair_stages
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Arc::new(|c| c));
        Ok(Box::new(ClosureStage(f)))
    }

    fn build_pipeline(&self, definition: &str) -> Result<Box<dyn Stage>, EngineError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.expression_log
            .lock()
            .unwrap()
            .push(definition.to_string());

        let f = self
            .expression_stages
            .iter()
            .find(|(fragment, _)| definition.contains(fragment))
            .map(|(_, f)| f.clone())
            .unwrap_or_else(|| Arc::new(|c| c));
        Ok(Box::new(ClosureStage(f)))
    }

    fn crs_metadata(&self, id: &CrsId) -> Result<CrsMetadata, EngineError> {
        self.metadata
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::Rejected(format!("'{}' not in mock database", id)))
    }

    fn version(&self) -> String {
        "9.0.0".to_string()
    }
}

/// Plausible metadata for a projected CRS, for enrichment tests.
pub fn projected_metadata(area_of_use: &str, bounding_box: [f64; 4]) -> CrsMetadata {
    CrsMetadata {
        area_of_use: area_of_use.to_string(),
        bounding_box,
        axis_units: [Some("metre".into()), Some("metre".into()), None, None],
    }
}

/// Plausible metadata for a geographic CRS, for enrichment tests.
pub fn geographic_metadata(area_of_use: &str, bounding_box: [f64; 4]) -> CrsMetadata {
    CrsMetadata {
        area_of_use: area_of_use.to_string(),
        bounding_box,
        axis_units: [Some("degree".into()), Some("degree".into()), None, None],
    }
}
