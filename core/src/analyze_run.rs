use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::callouts::{compute_callouts, Callout};
use crate::config::AnalysisConfig;
use crate::error::CoreResult;
use crate::metrics::Metrics;
use crate::normalize::{
    is_dry, normalize_meta, normalize_samples, normalize_wind, wind_from_points, window_wind,
};
use crate::segments::{classify_segments, foil_summary, segment_distance, FoilSummary};
use crate::source;
use crate::splits::compute_splits;
use crate::types::{RunMeta, Split, TelemetryPoint, WindReading};
use crate::windrose::{RoseSnapshot, WindRose, WindRoseConfig};

#[derive(Clone)]
pub struct RunInputs<'a> {
    pub meta: Option<&'a RunMeta>,
    /// Sortert på ts (normalize_samples gjør det)
    pub points: &'a [TelemetryPoint],
    /// Stasjonsvind for turens vindu. Tom => vindfeltene i telemetrien brukes.
    pub wind: &'a [WindReading],
}

/// Segment uten rådata – det en graf trenger for å farge tidslinja.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub on_foil: bool,
    pub points: usize,
    pub distance_m: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub meta: Option<RunMeta>,
    pub points: usize,
    pub segments: Vec<SegmentSummary>,
    pub foil: FoilSummary,
    /// dry beregnet fra våre egne segmenter (meta.dry er fra kilden)
    pub dry: bool,
    pub splits: Vec<Split>,
    pub callouts: Vec<Callout>,
    pub wind_rose: Option<RoseSnapshot>,
}

pub fn analyze_run(inputs: RunInputs, cfg: &AnalysisConfig, metrics: &Metrics) -> CoreResult<RunReport> {
    // 1️⃣ Segmenter
    let segments = classify_segments(inputs.points, &cfg.segment_config());
    metrics.points_classified.inc_by(inputs.points.len() as u64);
    metrics.segments.inc_by(segments.len() as u64);

    let foil = foil_summary(&segments);
    let dry = is_dry(foil.longest_segment_distance, Some(foil.distance_on_foil), cfg.dry_limit);

    // 2️⃣ Splits (uten rådata i rapporten)
    let splits = compute_splits(inputs.points, cfg.split_meters)
        .into_iter()
        .map(|s| Split { data: Vec::new(), ..s })
        .collect();

    // 3️⃣ Vindrose – stasjon først, så telemetri
    let from_points;
    let wind = if inputs.wind.is_empty() {
        from_points = wind_from_points(inputs.points);
        &from_points[..]
    } else {
        inputs.wind
    };
    let wind_rose = if wind.is_empty() {
        None
    } else {
        let rose_cfg = WindRoseConfig::from_options(&cfg.wind_rose)?;
        let rose = WindRose::new(wind, rose_cfg);
        metrics.wind_dropped.inc_by(rose.bins().dropped as u64);
        Some(rose.snapshot())
    };

    let summaries = segments
        .iter()
        .map(|s| SegmentSummary {
            start: s.start,
            end: s.end,
            on_foil: s.on_foil,
            points: s.data.len(),
            distance_m: segment_distance(s),
        })
        .collect();

    log::info!(
        "analyze_run {:?}: {} punkter, {} segmenter, {:.0} m på foil",
        inputs.meta.and_then(|m| m.id.as_deref()),
        inputs.points.len(),
        segments.len(),
        foil.distance_on_foil
    );

    Ok(RunReport {
        meta: inputs.meta.cloned(),
        points: inputs.points.len(),
        segments: summaries,
        foil,
        dry,
        splits,
        callouts: compute_callouts(inputs.points),
        wind_rose,
    })
}

/// Leser meta (første rad), turdata og valgfri vind fra disk og analyserer.
pub fn analyze_run_files(
    meta_path: &Path,
    run_path: &Path,
    wind_path: Option<&Path>,
    cfg: &AnalysisConfig,
) -> anyhow::Result<RunReport> {
    let metrics = Metrics::new()?;

    let meta_rows = source::read_meta_path(meta_path)
        .with_context(|| format!("leser meta {}", meta_path.display()))?;
    let meta = meta_rows.first().map(|r| normalize_meta(r, cfg.dry_limit));

    let rows = source::read_samples_path(run_path)
        .with_context(|| format!("leser turdata {}", run_path.display()))?;
    let run = normalize_samples(&rows);
    metrics.rows_skipped.inc_by(run.skipped as u64);

    let wind = match wind_path {
        Some(p) => {
            let raw = source::read_wind_path(p).with_context(|| format!("leser vind {}", p.display()))?;
            let readings = normalize_wind(&raw);
            match meta.as_ref().and_then(|m| m.ts.map(|ts| (ts, m.duration_sec))) {
                Some((start, dur)) => window_wind(&readings, start, dur.unwrap_or(0.0)),
                None => readings,
            }
        }
        None => Vec::new(),
    };

    let report = analyze_run(
        RunInputs { meta: meta.as_ref(), points: &run.points, wind: &wind },
        cfg,
        &metrics,
    )
    .with_context(|| format!("analyserer {}", run_path.display()))?;
    Ok(report)
}
