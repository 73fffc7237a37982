//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use crs_common::TransError;
use serde_json::json;

/// Error type returned by the API handlers.
///
/// Every error serializes as `{"message": ...}`. Transformation errors
/// carry their own status code; identifiers missing from the catalog or
/// the metadata sources answer 404 with the "not available" message the
/// API has always used.
pub enum ApiError {
    Trans(TransError),
    NotAvailable(String),
}

impl ApiError {
    /// 404 for a CRS identifier without catalog or metadata coverage.
    pub fn not_available(crs: &str) -> Self {
        ApiError::NotAvailable(crs.to_string())
    }
}

impl From<TransError> for ApiError {
    fn from(err: TransError) -> Self {
        ApiError::Trans(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Trans(err) => {
                let status = StatusCode::from_u16(err.http_status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, err.to_string())
            }
            ApiError::NotAvailable(crs) => {
                (StatusCode::NOT_FOUND, format!("'{}' not available", crs))
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
