// JSON inn / JSON ut – flaten som Python-modulen og andre FFI-klienter bruker.
use serde::de::DeserializeOwned;

use crate::analyze_run::{analyze_run, RunInputs};
use crate::chord::{build_chord, NodeOrder};
use crate::config::AnalysisConfig;
use crate::error::CoreResult;
use crate::metrics::Metrics;
use crate::normalize::{normalize_meta, normalize_samples, normalize_wind, window_wind};
use crate::types::{RawMetaRow, RawSampleRow, RawWindRow, TripEdge};
use crate::windrose::{WindRose, WindRoseOptions};

fn parse<T: DeserializeOwned>(json: &str) -> CoreResult<T> {
    let de = &mut serde_json::Deserializer::from_str(json);
    Ok(serde_path_to_error::deserialize(de)?)
}

/// samples: `[{"tsi":..,"speed":..,...}]`, meta: én meta-rad, wind: vindrader
/// (ISO `ts`). Svaret er en serialisert `RunReport`.
pub fn analyze_run_json(
    samples_json: &str,
    meta_json: Option<&str>,
    wind_json: Option<&str>,
    cfg_json: Option<&str>,
) -> CoreResult<String> {
    let cfg = match cfg_json {
        Some(s) => AnalysisConfig::from_json(s)?,
        None => AnalysisConfig::default(),
    };
    let metrics = Metrics::new()?;

    let rows: Vec<RawSampleRow> = parse(samples_json)?;
    let run = normalize_samples(&rows);
    metrics.rows_skipped.inc_by(run.skipped as u64);

    let meta = match meta_json {
        Some(s) => Some(normalize_meta(&parse::<RawMetaRow>(s)?, cfg.dry_limit)),
        None => None,
    };
    let wind = match wind_json {
        Some(s) => normalize_wind(&parse::<Vec<RawWindRow>>(s)?),
        None => Vec::new(),
    };
    // samme vindu som analyze_run_files og CsvSource::fetch_wind
    let wind = match meta.as_ref().and_then(|m| m.ts.map(|ts| (ts, m.duration_sec))) {
        Some((start, dur)) => window_wind(&wind, start, dur.unwrap_or(0.0)),
        None => wind,
    };

    let report = analyze_run(
        RunInputs { meta: meta.as_ref(), points: &run.points, wind: &wind },
        &cfg,
        &metrics,
    )?;
    Ok(serde_json::to_string(&report)?)
}

/// readings: vindrader, options: `WindRoseOptions` (camelCase-alias godtas).
pub fn wind_rose_json(readings_json: &str, options_json: Option<&str>) -> CoreResult<String> {
    let rows: Vec<RawWindRow> = parse(readings_json)?;
    let opts: WindRoseOptions = match options_json {
        Some(s) => parse(s)?,
        None => WindRoseOptions::default(),
    };
    let rose = WindRose::from_options(&normalize_wind(&rows), &opts)?;
    Ok(serde_json::to_string(&rose.snapshot())?)
}

/// edges: `[{"source":"A","target":"B","value":2}]` (start_beach/end_beach godtas).
pub fn chord_json(edges_json: &str, order: Option<&str>) -> CoreResult<String> {
    let edges: Vec<TripEdge> = parse(edges_json)?;
    let order: NodeOrder = match order {
        Some(o) => serde_json::from_value(serde_json::Value::String(o.to_string()))?,
        None => NodeOrder::default(),
    };
    Ok(serde_json::to_string(&build_chord(&edges, order))?)
}
