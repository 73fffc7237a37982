//! Route table for the transformation API.

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Build the full application router.
///
/// The transformation and index routes are registered once per published
/// API revision; the handlers behind them are revision-independent.
pub fn router(state: Arc<AppState>, prometheus_handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/", get(handlers::info::root_handler))
        // CRS index
        .route("/v1.0/crs/", get(handlers::crs::index_handler))
        .route("/v1.1/crs/", get(handlers::crs::index_handler))
        .route("/v1.2/crs/", get(handlers::crs::index_handler))
        // CRS info, one revision per response shape
        .route("/v1.0/crs/:crs", get(handlers::crs::info_v1_0_handler))
        .route("/v1.1/crs/:crs", get(handlers::crs::info_v1_1_handler))
        .route("/v1.2/crs/:crs", get(handlers::crs::info_v1_2_handler))
        // Transformation
        .route(
            "/v1.0/trans/:src/:dst/:coords",
            get(handlers::trans::trans_handler),
        )
        .route(
            "/v1.1/trans/:src/:dst/:coords",
            get(handlers::trans::trans_handler),
        )
        .route(
            "/v1.2/trans/:src/:dst/:coords",
            get(handlers::trans::trans_handler),
        )
        // Component versions
        .route("/v1.2/info/", get(handlers::info::info_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Layer extensions
        .layer(Extension(state))
        .layer(Extension(prometheus_handle))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
