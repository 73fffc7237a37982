//! HTTP integration tests for the transformation API.
//!
//! The router is exercised in-process with `tower::ServiceExt::oneshot`
//! and a scripted engine, so no PROJ installation is needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;

use catalog::CrsCatalog;
use test_utils::{geographic_metadata, projected_metadata, MockEngine};
use trans_api::router::router;
use trans_api::state::AppState;

fn app(engine: MockEngine) -> Router {
    let catalog = Arc::new(CrsCatalog::builtin().unwrap());
    let state = Arc::new(AppState::new(catalog, Arc::new(engine)));
    let handle = PrometheusBuilder::new().build_recorder().handle();
    router(state, handle)
}

async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_root_returns_empty_document() {
    let (status, body) = get(app(MockEngine::new()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({}));
}

#[tokio::test]
async fn test_crs_index_grouped_by_country() {
    let (status, body) = get(app(MockEngine::new()), "/v1.0/crs/").await;

    assert_eq!(status, StatusCode::OK);

    let dk = body["DK"].as_array().unwrap();
    assert!(dk.iter().any(|v| v == "EPSG:25832"));
    assert!(dk.iter().any(|v| v == "DK:S34J"));

    let gl = body["GL"].as_array().unwrap();
    assert!(gl.iter().any(|v| v == "EPSG:4909"));

    let global = body["Global"].as_array().unwrap();
    assert!(global.iter().any(|v| v == "EPSG:4326"));
}

#[tokio::test]
async fn test_crs_index_identical_across_revisions() {
    let (_, v1_0) = get(app(MockEngine::new()), "/v1.0/crs/").await;
    let (_, v1_2) = get(app(MockEngine::new()), "/v1.2/crs/").await;

    assert_eq!(v1_0, v1_2);
}

#[tokio::test]
async fn test_crs_info_v1_0_bare_record() {
    let (status, body) = get(app(MockEngine::new()), "/v1.0/crs/EPSG:25832").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["country"], "DK");
    assert_eq!(body["v1"], "Easting");
    assert!(body.get("srid").is_none());
    assert!(body.get("area_of_use").is_none());
}

#[tokio::test]
async fn test_crs_info_v1_1_adds_area_of_use() {
    let engine = MockEngine::new().with_metadata(
        "EPSG:25832",
        projected_metadata("Europe between 6°E and 12°E", [6.0, 38.76, 12.0, 84.33]),
    );

    let (status, body) = get(app(engine), "/v1.1/crs/EPSG:25832").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["srid"], "EPSG:25832");
    assert_eq!(body["area_of_use"], "Europe between 6°E and 12°E");
    assert_eq!(body["bounding_box"][0], 6.0);
    assert!(body.get("v1_unit").is_none());
}

#[tokio::test]
async fn test_crs_info_v1_2_adds_units() {
    let engine = MockEngine::new().with_metadata(
        "EPSG:4258",
        geographic_metadata("Europe - onshore and offshore", [-16.1, 32.88, 40.18, 84.73]),
    );

    let (status, body) = get(app(engine), "/v1.2/crs/EPSG:4258").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["srid"], "EPSG:4258");
    assert_eq!(body["v1_unit"], "degree");
    assert_eq!(body["v3_unit"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_crs_info_falls_back_to_local_registry() {
    // The engine's database does not know DK:S34J.
    let (status, body) = get(app(MockEngine::new()), "/v1.2/crs/DK:S34J").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["area_of_use"], "Denmark - Jutland onshore");
    assert_eq!(
        body["bounding_box"],
        serde_json::json!([8.0, 54.5, 11.0, 57.75])
    );
    assert_eq!(body["v1_unit"], "metre");
    assert_eq!(body["v3_unit"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_crs_info_lowercase_path_is_normalized() {
    let (status, body) = get(app(MockEngine::new()), "/v1.0/crs/dk:s34j").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title_short"], "S34J");
}

#[tokio::test]
async fn test_crs_info_unknown_identifier() {
    let (status, body) = get(app(MockEngine::new()), "/v1.0/crs/EPSG:0").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "'EPSG:0' not available");
}

#[tokio::test]
async fn test_crs_info_without_any_metadata_source() {
    // In the catalog, but neither the engine nor the local registry has
    // metadata for it.
    let (status, body) = get(app(MockEngine::new()), "/v1.1/crs/EPSG:4326").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "'EPSG:4326' not available");
}

#[tokio::test]
async fn test_transform_2d() {
    let engine = MockEngine::new().with_pair_stage("EPSG:4258", "EPSG:25832", |c| {
        crs_common::Coord {
            v1: c.v1 * 2.0,
            v2: c.v2 * 2.0,
            ..c
        }
    });

    let (status, body) = get(app(engine), "/v1.2/trans/EPSG:4258/EPSG:25832/56.0,12.0").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["v1"], 112.0);
    assert_eq!(body["v2"], 24.0);
    assert_eq!(body["v3"], serde_json::Value::Null);
    assert_eq!(body["v4"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_transform_4d_identity_pair() {
    let uri = "/v1.0/trans/EPSG:25832/EPSG:25832/1.5,2.5,3.5,2020.0";
    let (status, body) = get(app(MockEngine::new()), uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["v1"], 1.5);
    assert_eq!(body["v2"], 2.5);
    assert_eq!(body["v3"], 3.5);
    assert_eq!(body["v4"], 2020.0);
}

#[tokio::test]
async fn test_transform_3d_keeps_fourth_component_absent() {
    let uri = "/v1.1/trans/EPSG:4258/EPSG:4937/55.0,12.0,30.0";
    let (status, body) = get(app(MockEngine::new()), uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["v3"], 30.0);
    assert_eq!(body["v4"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_transform_unknown_source() {
    let (status, body) = get(app(MockEngine::new()), "/v1.0/trans/EPSG:0/EPSG:25832/1.0,2.0").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Unknown CRS identifier: 'EPSG:0'");
}

#[tokio::test]
async fn test_transform_across_incompatible_regions() {
    // Denmark to Greenland.
    let uri = "/v1.0/trans/EPSG:25832/EPSG:3184/1.0,2.0";
    let (status, body) = get(app(MockEngine::new()), uri).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "CRS's are not compatible across countries");
}

#[tokio::test]
async fn test_transform_engine_rejection() {
    let engine = MockEngine::new().with_rejected_pair("EPSG:4258", "EPSG:25832");

    let (status, body) = get(app(engine), "/v1.0/trans/EPSG:4258/EPSG:25832/56.0,12.0").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Invalid CRS identifier");
}

#[tokio::test]
async fn test_transform_outside_area_of_use() {
    let engine = MockEngine::new().with_pair_stage("EPSG:4258", "EPSG:25832", |c| {
        crs_common::Coord {
            v1: f64::INFINITY,
            ..c
        }
    });

    let (status, body) = get(app(engine), "/v1.0/trans/EPSG:4258/EPSG:25832/89.0,12.0").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "Input coordinate outside area of use of either source or destination CRS"
    );
}

#[tokio::test]
async fn test_transform_malformed_coordinates() {
    let (status, _) = get(
        app(MockEngine::new()),
        "/v1.0/trans/EPSG:4258/EPSG:25832/56.0,north",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Five components is one too many.
    let (status, _) = get(
        app(MockEngine::new()),
        "/v1.0/trans/EPSG:4258/EPSG:25832/1.0,2.0,3.0,4.0,5.0",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(MockEngine::new()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cached_pipelines"], 0);
}

#[tokio::test]
async fn test_info_reports_component_versions() {
    let (status, body) = get(app(MockEngine::new()), "/v1.2/info/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["proj_version"], "9.0.0");
    assert!(body["api_version"].as_str().is_some_and(|v| !v.is_empty()));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = app(MockEngine::new());
    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
