use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::types::TelemetryPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalloutKind {
    TopSpeed,
    MaxDistanceToLand,
    MaxHr,
}

/// Markering av et ekstrempunkt i turen (til kart/graf).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Callout {
    pub kind: CalloutKind,
    pub ts: DateTime<Utc>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub value: f64,
}

fn extreme_by<F>(points: &[TelemetryPoint], kind: CalloutKind, field: F) -> Option<Callout>
where
    F: Fn(&TelemetryPoint) -> Option<f64>,
{
    // første punkt vinner ved likhet
    let (p, value) = points
        .iter()
        .filter_map(|p| field(p).filter(|v| v.is_finite()).map(|v| (p, v)))
        .rev()
        .max_by_key(|(_, v)| OrderedFloat(*v))?;

    Some(Callout { kind, ts: p.ts, lat: p.lat, lon: p.lon, value })
}

/// Toppfart, lengst fra land og makspuls. Mangler feltet helt, utelates
/// markeringen.
pub fn compute_callouts(points: &[TelemetryPoint]) -> Vec<Callout> {
    [
        extreme_by(points, CalloutKind::TopSpeed, |p| p.speed),
        extreme_by(points, CalloutKind::MaxDistanceToLand, |p| p.distance_to_land),
        extreme_by(points, CalloutKind::MaxHr, |p| p.hr),
    ]
    .into_iter()
    .flatten()
    .collect()
}
