//! The seam towards the external geodetic transformation engine.
//!
//! The composer never looks inside a stage: it asks the engine to build one
//! from an identifier pair or from a pipeline expression, then invokes it.

use catalog::CrsMetadata;
use crs_common::{AreaOfInterest, Coord, CrsId};
use thiserror::Error;

/// Errors surfaced by an engine implementation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine refused to build a stage for the given definition. The
    /// catalog may still know the identifier; the composer maps this to the
    /// invalid-CRS classification.
    #[error("CRS rejected by engine: {0}")]
    Rejected(String),

    /// A built stage failed while transforming a coordinate.
    #[error("engine fault: {0}")]
    Fault(String),
}

/// One opaque unary coordinate transformation.
///
/// Stages consume and produce the canonical 4-component coordinate form;
/// component presence is preserved, so a 2D input yields a 2D output.
pub trait Stage: Send + Sync {
    fn apply(&self, coord: Coord) -> Result<Coord, EngineError>;
}

/// The external engine contract consumed by the composer.
pub trait TransformEngine: Send + Sync {
    /// Whether the engine's own registry resolves identifiers of this
    /// authority directly. Anything else is a custom identifier realized
    /// through a hand-written pipeline expression.
    fn supports_authority(&self, authority: &str) -> bool;

    /// Build a direct transformation between two identifiers, optionally
    /// constrained to an area of interest.
    fn build_crs_to_crs(
        &self,
        src: &CrsId,
        dst: &CrsId,
        area: Option<&AreaOfInterest>,
    ) -> Result<Box<dyn Stage>, EngineError>;

    /// Build a transformation from a pipeline expression.
    fn build_pipeline(&self, definition: &str) -> Result<Box<dyn Stage>, EngineError>;

    /// Introspect a CRS known to the engine's registry: area of use,
    /// bounding box and axis units. Used for catalog enrichment only.
    fn crs_metadata(&self, id: &CrsId) -> Result<CrsMetadata, EngineError>;

    /// Engine version string, exposed by the info endpoint.
    fn version(&self) -> String;
}
