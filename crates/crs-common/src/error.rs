//! Error types for the coordinate transformation services.

use thiserror::Error;

/// Result type alias using TransError.
pub type TransResult<T> = Result<T, TransError>;

/// Primary error type for transformation requests.
///
/// All variants are per-request and non-retryable: every classification is a
/// deterministic function of the request, so a retry cannot change the
/// outcome. Process-fatal conditions (catalog load) never surface here.
#[derive(Debug, Error)]
pub enum TransError {
    /// Identifier absent from the CRS catalog.
    #[error("Unknown CRS identifier: '{0}'")]
    UnknownCrs(String),

    /// Source and destination belong to different regions and neither is
    /// Global.
    #[error("CRS's are not compatible across countries")]
    IncompatibleRegions,

    /// The catalog accepted the identifier but the engine rejected pipeline
    /// construction.
    #[error("Invalid CRS identifier")]
    InvalidCrs,

    /// The applied pipeline produced a non-finite coordinate.
    #[error("Input coordinate outside area of use of either source or destination CRS")]
    OutOfAreaOfUse,

    /// Malformed coordinate input.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Engine fault during pipeline execution.
    #[error("Transformation failed: {0}")]
    Internal(String),
}

impl TransError {
    /// HTTP status code for this error.
    ///
    /// The four classification errors all map to 404, matching the
    /// published API contract.
    pub fn http_status_code(&self) -> u16 {
        match self {
            TransError::UnknownCrs(_)
            | TransError::IncompatibleRegions
            | TransError::InvalidCrs
            | TransError::OutOfAreaOfUse => 404,

            TransError::InvalidCoordinate(_) => 400,
            TransError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            TransError::UnknownCrs("EPSG:0".into()).http_status_code(),
            404
        );
        assert_eq!(TransError::IncompatibleRegions.http_status_code(), 404);
        assert_eq!(TransError::InvalidCrs.http_status_code(), 404);
        assert_eq!(TransError::OutOfAreaOfUse.http_status_code(), 404);
        assert_eq!(
            TransError::InvalidCoordinate("bad".into()).http_status_code(),
            400
        );
        assert_eq!(TransError::Internal("pj".into()).http_status_code(), 500);
    }

    #[test]
    fn test_messages_match_api_contract() {
        assert_eq!(
            TransError::IncompatibleRegions.to_string(),
            "CRS's are not compatible across countries"
        );
        assert_eq!(
            TransError::OutOfAreaOfUse.to_string(),
            "Input coordinate outside area of use of either source or destination CRS"
        );
        assert_eq!(TransError::InvalidCrs.to_string(), "Invalid CRS identifier");
    }
}
