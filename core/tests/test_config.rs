use std::fs;

use downwind_core::chord::NodeOrder;
use downwind_core::{load_config, save_config, AnalysisConfig, CoreError};

#[test]
fn save_and_load_roundtrip_on_disk() {
    let path = "tests/tmp_config.json";

    let mut cfg = AnalysisConfig::default();
    cfg.speed_threshold = 12.5;
    cfg.min_transition_ms = 3_000;
    cfg.chord_order = NodeOrder::Popularity;
    cfg.wind_rose.n_directions = Some(8);

    save_config(&cfg, path).expect("kunne ikke lagre config");
    let loaded = load_config(path).expect("kunne ikke laste config");
    assert_eq!(loaded, cfg);

    let seg = loaded.segment_config();
    assert_eq!(seg.speed_threshold, 12.5);
    assert_eq!(seg.min_transition_ms, 3_000);

    let _ = fs::remove_file(path);
}

#[test]
fn missing_file_gives_defaults() {
    let cfg = load_config("tests/finnes_ikke.json").unwrap();
    assert_eq!(cfg, AnalysisConfig::default());
    assert_eq!(cfg.speed_threshold, 11.0);
    assert_eq!(cfg.min_transition_ms, 5_000);
    assert_eq!(cfg.dry_limit, 0.97);
}

#[test]
fn partial_json_falls_back_per_field() {
    let cfg = AnalysisConfig::from_json(r#"{"dry_limit": 0.98, "wind_rose": {"innerHole": 20}}"#).unwrap();
    assert_eq!(cfg.dry_limit, 0.98);
    assert_eq!(cfg.split_meters, 1_000.0);
    assert_eq!(cfg.wind_rose.inner_hole, Some(20.0));
}

#[test]
fn bad_type_reports_field_path() {
    let err = AnalysisConfig::from_json(r#"{"wind_rose": {"n_directions": "many"}}"#).unwrap_err();
    match err {
        CoreError::JsonPath { path, .. } => assert_eq!(path, "wind_rose.n_directions"),
        other => panic!("forventet JsonPath, fikk {other:?}"),
    }
}
