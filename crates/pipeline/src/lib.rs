//! Transformation pipeline composition and caching.
//!
//! This crate holds the decision logic of the service: given a source and
//! destination CRS identifier it resolves both against the catalog, enforces
//! the cross-region policy, picks the disambiguating area of interest,
//! composes up to three engine stages (pre, hub, post) and memoizes the
//! result per ordered identifier pair. The geodetic math itself lives
//! behind the [`engine::TransformEngine`] trait.

pub mod cache;
pub mod composer;
pub mod engine;

pub use cache::{CacheStats, PipelineCache};
pub use composer::{CompiledPipeline, PipelineComposer};
pub use engine::{EngineError, Stage, TransformEngine};
