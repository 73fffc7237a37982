//! Transformation handler.
//!
//! One handler serves the 2D, 3D and 4D routes of every API revision:
//! the coordinate path segment is `v1,v2`, `v1,v2,v3` or `v1,v2,v3,v4`.

use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::Json;
use metrics::counter;

use crs_common::{Coord, TransError};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /v1.{0,1,2}/trans/:src/:dst/:coords - Transform one coordinate.
pub async fn trans_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((src, dst, coords)): Path<(String, String, String)>,
) -> Result<Json<Coord>, ApiError> {
    counter!("transformation_requests_total").increment(1);

    let result = transform(&state, &src, &dst, &coords);
    if result.is_err() {
        counter!("transformation_errors_total").increment(1);
    }

    result.map(Json).map_err(ApiError::from)
}

fn transform(state: &AppState, src: &str, dst: &str, coords: &str) -> Result<Coord, TransError> {
    let components = parse_components(coords)?;
    let coord = Coord::from_components(&components)?;

    let pipeline = state.cache.create(src, dst)?;
    pipeline.apply(coord)
}

fn parse_components(raw: &str) -> Result<Vec<f64>, TransError> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| TransError::InvalidCoordinate(format!("not a number: '{}'", part)))
        })
        .collect()
}
