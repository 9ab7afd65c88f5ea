use downwind_core::{analyze_run_json, wind_rose_json, Metrics};

#[test]
fn metrics_smoke() {
    let a = Metrics::new().unwrap();
    let b = Metrics::new().unwrap();
    a.segments.inc_by(3);
    b.segments.inc();

    let text = a.render().unwrap();
    assert!(text.contains("downwind_segments_total 3"), "{text}");
    assert!(text.contains("downwind_fetch_failures_total 0"));
    assert_eq!(b.segments.get(), 1, "hver instans har eget register");
}

#[test]
fn analyze_run_json_smoke() {
    let samples: Vec<serde_json::Value> = (0..120)
        .map(|i| {
            let speed = if i < 30 { 5.0 } else { 20.0 };
            serde_json::json!({
                "tsi": 1_700_000_000 + i,
                "speed": speed,
                "distance": i * 5,
                "wdir": 45,
                "wavg": 15
            })
        })
        .collect();
    let samples = serde_json::to_string(&samples).unwrap();

    let out = analyze_run_json(&samples, None, None, Some(r#"{"wind_rose": {"nDirections": 8}}"#)).unwrap();
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(v["points"], 120);
    assert_eq!(v["segments"].as_array().unwrap().len(), 2);
    assert_eq!(v["wind_rose"]["bins"]["n_directions"], 8);
    assert_eq!(v["wind_rose"]["sector_labels"][1], "NE");
    assert!(v["splits"][0].get("data").is_none());
}

#[test]
fn json_errors_carry_path() {
    // rader må være en liste
    let err = analyze_run_json(r#"{"tsi": 1}"#, None, None, None).unwrap_err();
    assert!(err.to_string().contains("json at"), "{err}");

    // ugyldige tall i en rad er ikke en feil
    assert!(analyze_run_json(r#"[{"tsi": 1, "speed": "fast"}]"#, Some(r#"{"id": 5}"#), None, None).is_ok());

    let err = analyze_run_json("[]", None, None, Some(r#"{"split_meters": "x"}"#)).unwrap_err();
    assert!(err.to_string().contains("split_meters"), "{err}");
}

#[test]
fn wind_rose_json_defaults() {
    let rows = r#"[
        {"ts": "2024-05-01T10:00:00Z", "wdir": 0, "wavg": 12},
        {"ts": "2024-05-01T10:01:00Z", "wdir": 180, "wavg": 4},
        {"ts": "2024-05-01T10:02:00Z", "wdir": null, "wavg": 4}
    ]"#;
    let out = wind_rose_json(rows, None).unwrap();
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(v["radius"], 80.0);
    assert_eq!(v["bins"]["total"], 2);
    assert_eq!(v["bins"]["dropped"], 1);
    assert_eq!(v["sector_labels"].as_array().unwrap().len(), 16);

    assert!(wind_rose_json(rows, Some(r#"{"n_directions": 0}"#)).is_err());
}

#[test]
fn json_wind_is_clipped_to_the_run() {
    let samples: Vec<serde_json::Value> = (0..120)
        .map(|i| serde_json::json!({"tsi": 1_700_000_000 + i, "speed": 15, "distance": i * 5}))
        .collect();
    let samples = serde_json::to_string(&samples).unwrap();
    // turen: 2023-11-14 22:13:20 + 120 s
    let meta = r#"{"id": "r1", "ts": 1700000000, "duration_sec": 120}"#;
    let wind = r#"[
        {"ts": "2023-11-14T22:14:00Z", "wdir": 90, "wavg": 12},
        {"ts": "2023-11-14T23:30:00Z", "wdir": 180, "wavg": 12},
        {"ts": "2023-11-15T01:00:00Z", "wdir": 270, "wavg": 12}
    ]"#;

    let out = analyze_run_json(&samples, Some(meta), Some(wind), None).unwrap();
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["wind_rose"]["bins"]["total"], 1, "bare målingen innenfor turen");
    assert_eq!(v["wind_rose"]["bins"]["cells"][0]["sector"], 4);

    // uten meta => ingen klipping
    let out = analyze_run_json(&samples, None, Some(wind), None).unwrap();
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["wind_rose"]["bins"]["total"], 3);
}
