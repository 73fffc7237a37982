//! Pipeline composition: from an identifier pair to an executable pipeline.

use crate::engine::{EngineError, Stage, TransformEngine};
use catalog::CrsCatalog;
use crs_common::{Coord, CrsId, Region, TransError, TransResult};
use std::sync::Arc;

/// An immutable, executable transformation pipeline for one ordered
/// (source, destination) pair.
///
/// At most three stages run in order: a **pre** stage lifting a custom
/// source into its geographic hub, a **hub** stage covering the engine-native
/// part of the route, and a **post** stage lowering into a custom
/// destination. An identical native pair composes to the empty pipeline,
/// which is the identity transform.
pub struct CompiledPipeline {
    pre: Option<Box<dyn Stage>>,
    hub: Option<Box<dyn Stage>>,
    post: Option<Box<dyn Stage>>,
}

impl CompiledPipeline {
    /// Run the pipeline on a coordinate.
    ///
    /// The coordinate is already in canonical 4-component form and every
    /// stage re-normalizes: component presence survives each hop. A
    /// non-finite component in the result means the coordinate fell outside
    /// the valid domain of the chosen transformation.
    pub fn apply(&self, coord: Coord) -> TransResult<Coord> {
        let mut current = coord;
        for stage in [&self.pre, &self.hub, &self.post].into_iter().flatten() {
            current = stage
                .apply(current)
                .map_err(|e| TransError::Internal(e.to_string()))?;
        }

        if current.has_infinite_component() {
            return Err(TransError::OutOfAreaOfUse);
        }

        Ok(current)
    }

    /// True when no stages are present (identical native endpoints).
    pub fn is_identity(&self) -> bool {
        self.pre.is_none() && self.hub.is_none() && self.post.is_none()
    }

    pub fn stage_count(&self) -> usize {
        [&self.pre, &self.hub, &self.post]
            .into_iter()
            .flatten()
            .count()
    }

    pub fn has_pre(&self) -> bool {
        self.pre.is_some()
    }

    pub fn has_hub(&self) -> bool {
        self.hub.is_some()
    }

    pub fn has_post(&self) -> bool {
        self.post.is_some()
    }
}

impl std::fmt::Debug for CompiledPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledPipeline")
            .field("pre", &self.pre.is_some())
            .field("hub", &self.hub.is_some())
            .field("post", &self.post.is_some())
            .finish()
    }
}

/// Pipeline expression lifting a custom identifier into geographic
/// coordinates: invert the custom definition, convert radians to degrees,
/// swap to latitude-first axis order.
fn custom_to_geographic(id: &CrsId) -> String {
    format!(
        "+proj=pipeline \
         +step +inv +init={id} \
         +step +proj=unitconvert +xy_in=rad +xy_out=deg \
         +step +proj=axisswap +order=2,1"
    )
}

/// Mirror image of [`custom_to_geographic`].
fn geographic_to_custom(id: &CrsId) -> String {
    format!(
        "+proj=pipeline \
         +step +proj=axisswap +order=2,1 \
         +step +proj=unitconvert +xy_in=deg +xy_out=rad \
         +step +init={id}"
    )
}

fn build_error(err: EngineError) -> TransError {
    match err {
        EngineError::Rejected(reason) => {
            tracing::debug!("engine rejected stage: {}", reason);
            TransError::InvalidCrs
        }
        EngineError::Fault(reason) => TransError::Internal(reason),
    }
}

/// Composes pipelines from catalog records and engine stages.
pub struct PipelineComposer {
    catalog: Arc<CrsCatalog>,
    engine: Arc<dyn TransformEngine>,
}

impl PipelineComposer {
    pub fn new(catalog: Arc<CrsCatalog>, engine: Arc<dyn TransformEngine>) -> Self {
        Self { catalog, engine }
    }

    /// Compose the pipeline for one ordered identifier pair.
    ///
    /// Both identifiers must resolve in the catalog and their regions must
    /// be compatible before any engine work happens.
    pub fn compose(&self, src: &CrsId, dst: &CrsId) -> TransResult<CompiledPipeline> {
        let src_record = self
            .catalog
            .lookup(src)
            .ok_or_else(|| TransError::UnknownCrs(src.to_string()))?;
        let dst_record = self
            .catalog
            .lookup(dst)
            .ok_or_else(|| TransError::UnknownCrs(dst.to_string()))?;

        if !src_record.country.compatible(dst_record.country) {
            return Err(TransError::IncompatibleRegions);
        }

        let area = Region::area_of_interest(src_record.country, dst_record.country);

        let src_custom = !self.engine.supports_authority(src.authority());
        let dst_custom = !self.engine.supports_authority(dst.authority());

        // Custom source: invert it into geographic coordinates first, then
        // continue as if the request had started at the region's hub.
        let mut pre = None;
        let mut effective_src = src.clone();
        if src_custom {
            let stage = self
                .engine
                .build_pipeline(&custom_to_geographic(src))
                .map_err(build_error)?;
            pre = Some(stage);

            if let Some(hub) = src_record.country.geographic_hub() {
                effective_src = hub;
            }
        }

        // Direct engine transform covering the native part of the route. A
        // custom destination routes through its region's geographic hub so
        // the post stage can take over from there.
        let mut hub = None;
        if effective_src != *dst || src_custom != dst_custom {
            let hub_dst = if dst_custom {
                dst_record
                    .country
                    .geographic_hub()
                    .unwrap_or_else(|| dst.clone())
            } else {
                dst.clone()
            };

            let stage = self
                .engine
                .build_crs_to_crs(&effective_src, &hub_dst, area.as_ref())
                .map_err(build_error)?;
            hub = Some(stage);
        }

        let mut post = None;
        if dst_custom {
            let stage = self
                .engine
                .build_pipeline(&geographic_to_custom(dst))
                .map_err(build_error)?;
            post = Some(stage);
        }

        let pipeline = CompiledPipeline { pre, hub, post };
        tracing::debug!(
            src = %src,
            dst = %dst,
            stages = pipeline.stage_count(),
            "composed pipeline"
        );
        Ok(pipeline)
    }
}
