//! Service root and component version handlers.

use std::sync::Arc;

use axum::extract::Extension;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct InfoResponse {
    pub api_version: String,
    pub proj_version: String,
}

/// GET / - Empty document, kept for compatibility with existing clients.
pub async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({}))
}

/// GET /v1.2/info/ - Component versions.
pub async fn info_handler(Extension(state): Extension<Arc<AppState>>) -> Json<InfoResponse> {
    Json(InfoResponse {
        api_version: env!("CARGO_PKG_VERSION").to_string(),
        proj_version: state.engine.version(),
    })
}
