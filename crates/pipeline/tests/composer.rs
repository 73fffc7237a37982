use std::sync::Arc;

use crs_common::{Coord, CrsId, Region, TransError};
use pipeline::PipelineComposer;
use test_utils::{test_catalog, MockEngine};

fn composer(engine: MockEngine) -> PipelineComposer {
    PipelineComposer::new(Arc::new(test_catalog()), Arc::new(engine))
}

#[test]
fn test_unknown_source() {
    let c = composer(MockEngine::new());
    let err = c
        .compose(&CrsId::new("EPSG:9999"), &CrsId::new("EPSG:25832"))
        .unwrap_err();
    assert!(matches!(err, TransError::UnknownCrs(ref id) if id == "EPSG:9999"));
}

#[test]
fn test_unknown_destination() {
    let c = composer(MockEngine::new());
    let err = c
        .compose(&CrsId::new("EPSG:25832"), &CrsId::new("BOGUS:1"))
        .unwrap_err();
    assert!(matches!(err, TransError::UnknownCrs(ref id) if id == "BOGUS:1"));
}

#[test]
fn test_incompatible_regions_fail_before_engine() {
    let engine = MockEngine::new();
    let builds = engine.build_counter();
    let c = composer(engine);

    let err = c
        .compose(&CrsId::new("EPSG:4258"), &CrsId::new("EPSG:4909"))
        .unwrap_err();
    assert!(matches!(err, TransError::IncompatibleRegions));
    assert_eq!(builds.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[test]
fn test_identical_native_pair_is_identity() {
    let c = composer(MockEngine::new());
    let p = c
        .compose(&CrsId::new("EPSG:25832"), &CrsId::new("EPSG:25832"))
        .unwrap();
    assert!(p.is_identity());

    let coord = Coord::new3(687071.0, 6210141.0, 30.0);
    assert_eq!(p.apply(coord).unwrap(), coord);
}

#[test]
fn test_native_pair_composes_single_hub_stage() {
    let engine = MockEngine::new();
    let areas = engine.area_log();
    let c = composer(engine);

    let p = c
        .compose(&CrsId::new("EPSG:4258"), &CrsId::new("EPSG:25832"))
        .unwrap();
    assert!(!p.has_pre() && p.has_hub() && !p.has_post());

    // Same-region pair uses the Danish box.
    let log = areas.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0], Some(Region::Denmark.bounds().unwrap()));
}

#[test]
fn test_global_pair_has_no_area_constraint() {
    let engine = MockEngine::new();
    let areas = engine.area_log();
    let c = composer(engine);

    c.compose(&CrsId::new("EPSG:4326"), &CrsId::new("EPSG:3857"))
        .unwrap();
    assert_eq!(areas.lock().unwrap()[0], None);
}

#[test]
fn test_custom_source_gets_pre_and_substituted_hub() {
    let engine = MockEngine::new();
    let pairs = engine.pair_log();
    let exprs = engine.expression_log();
    let c = composer(engine);

    let p = c
        .compose(&CrsId::new("DK:S34J"), &CrsId::new("EPSG:25832"))
        .unwrap();
    assert!(p.has_pre() && p.has_hub() && !p.has_post());

    // The hub runs from the region's geographic CRS, not from the
    // custom identifier.
    assert_eq!(
        pairs.lock().unwrap()[0],
        (CrsId::new("EPSG:4258"), CrsId::new("EPSG:25832"))
    );

    let exprs = exprs.lock().unwrap();
    assert!(exprs[0].contains("+inv +init=DK:S34J"));
    assert!(exprs[0].contains("+xy_in=rad +xy_out=deg"));
}

#[test]
fn test_custom_destination_gets_hub_and_post() {
    let engine = MockEngine::new();
    let pairs = engine.pair_log();
    let exprs = engine.expression_log();
    let c = composer(engine);

    let p = c
        .compose(&CrsId::new("EPSG:25832"), &CrsId::new("DK:S34S"))
        .unwrap();
    assert!(!p.has_pre() && p.has_hub() && p.has_post());

    // Hub routes to the geographic hub feeding the post stage.
    assert_eq!(
        pairs.lock().unwrap()[0],
        (CrsId::new("EPSG:25832"), CrsId::new("EPSG:4258"))
    );

    let exprs = exprs.lock().unwrap();
    assert!(exprs[0].ends_with("+init=DK:S34S"));
    assert!(exprs[0].contains("+xy_in=deg +xy_out=rad"));
}

#[test]
fn test_custom_to_custom_has_all_three_stages() {
    let c = composer(MockEngine::new());
    let p = c
        .compose(&CrsId::new("DK:S34J"), &CrsId::new("DK:S34S"))
        .unwrap();
    assert!(p.has_pre() && p.has_hub() && p.has_post());
    assert_eq!(p.stage_count(), 3);
}

#[test]
fn test_engine_rejection_is_invalid_crs() {
    let engine = MockEngine::new().reject_pairs();
    let c = composer(engine);
    let err = c
        .compose(&CrsId::new("EPSG:4258"), &CrsId::new("EPSG:25832"))
        .unwrap_err();
    assert!(matches!(err, TransError::InvalidCrs));
}

#[test]
fn test_infinite_stage_output_is_out_of_area() {
    let engine = MockEngine::new().with_pair_stage(
        "EPSG:4258",
        "EPSG:25832",
        |_| Coord::new2(f64::INFINITY, f64::INFINITY),
    );
    let c = composer(engine);
    let p = c
        .compose(&CrsId::new("EPSG:4258"), &CrsId::new("EPSG:25832"))
        .unwrap();

    let err = p.apply(Coord::new2(12.0, 56.0)).unwrap_err();
    assert!(matches!(err, TransError::OutOfAreaOfUse));
}

#[test]
fn test_stage_order_and_renormalization() {
    // Pre and hub each shift v1; a 2D input must stay 2D throughout.
    let engine = MockEngine::new()
        .with_expression_stage("+inv +init=DK:S34J", |c| {
            Coord::new2(c.v1 + 1.0, c.v2)
        })
        .with_pair_stage("EPSG:4258", "EPSG:25832", |c| {
            Coord::new2(c.v1 * 10.0, c.v2)
        });
    let c = composer(engine);
    let p = c
        .compose(&CrsId::new("DK:S34J"), &CrsId::new("EPSG:25832"))
        .unwrap();

    let out = p.apply(Coord::new2(1.0, 2.0)).unwrap();
    assert_eq!(out, Coord::new2(20.0, 2.0));
    assert_eq!(out.dimension(), 2);
}
