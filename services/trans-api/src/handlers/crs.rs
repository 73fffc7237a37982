//! CRS index and CRS info handlers.
//!
//! The info endpoint exists in three revisions: v1.0 returns the bare
//! catalog record, v1.1 adds srid, area of use and bounding box, v1.2
//! adds the axis units. Each revision is its own handler over the
//! enrichment chain in the catalog crate.

use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::Json;
use metrics::counter;

use catalog::{CrsInfo, CrsInfoFull, CrsInfoWithArea, CrsMetadata, CrsRecord};
use crs_common::CrsId;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /v1.{0,1,2}/crs/ - Index of available CRS identifiers by country.
pub async fn index_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<serde_json::Value> {
    counter!("crs_index_requests_total").increment(1);

    let mut index = serde_json::Map::new();
    for (region, ids) in state.catalog.index_by_country() {
        let srids = ids
            .iter()
            .map(|id| serde_json::Value::String(id.to_string()))
            .collect();
        index.insert(region.to_string(), serde_json::Value::Array(srids));
    }

    Json(serde_json::Value::Object(index))
}

/// GET /v1.0/crs/:crs - The catalog record as-is.
pub async fn info_v1_0_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(crs): Path<String>,
) -> Result<Json<CrsInfo>, ApiError> {
    counter!("crs_info_requests_total").increment(1);

    let (_, record) = lookup(&state, &crs)?;
    Ok(Json(CrsInfo::from_record(record)))
}

/// GET /v1.1/crs/:crs - Adds srid, area of use and bounding box.
pub async fn info_v1_1_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(crs): Path<String>,
) -> Result<Json<CrsInfoWithArea>, ApiError> {
    counter!("crs_info_requests_total").increment(1);

    let (id, record) = lookup(&state, &crs)?;
    let meta = metadata(&state, &id, &crs)?;
    Ok(Json(CrsInfo::from_record(record).with_area_of_use(&id, &meta)))
}

/// GET /v1.2/crs/:crs - Adds the unit of each axis.
pub async fn info_v1_2_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(crs): Path<String>,
) -> Result<Json<CrsInfoFull>, ApiError> {
    counter!("crs_info_requests_total").increment(1);

    let (id, record) = lookup(&state, &crs)?;
    let meta = metadata(&state, &id, &crs)?;
    Ok(Json(
        CrsInfo::from_record(record)
            .with_area_of_use(&id, &meta)
            .with_units(&meta),
    ))
}

/// Resolve a path parameter against the catalog. The 404 message carries
/// the identifier as the caller wrote it.
fn lookup<'a>(state: &'a AppState, crs: &str) -> Result<(CrsId, &'a CrsRecord), ApiError> {
    let id = CrsId::new(crs);
    match state.catalog.lookup(&id) {
        Some(record) => Ok((id, record)),
        None => Err(ApiError::not_available(crs)),
    }
}

/// Engine metadata first, then the secondary registry for identifiers the
/// engine's database does not carry.
fn metadata(state: &AppState, id: &CrsId, crs: &str) -> Result<CrsMetadata, ApiError> {
    if let Ok(meta) = state.engine.crs_metadata(id) {
        return Ok(meta);
    }

    state
        .custom
        .metadata(id)
        .cloned()
        .ok_or_else(|| ApiError::not_available(crs))
}
