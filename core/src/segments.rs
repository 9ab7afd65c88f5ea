use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Segment, TelemetryPoint};

/// Terskler for on/off-foil-klassifisering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentConfig {
    pub speed_threshold: f64,  // kph/kn
    pub min_transition_ms: i64, // ny tilstand må vare minst så lenge
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self { speed_threshold: 11.0, min_transition_ms: 5_000 }
    }
}

/// Kandidat-tilstand som ennå ikke er bekreftet.
#[derive(Debug, Clone, Copy)]
struct Pending {
    on_foil: bool,
    since: DateTime<Utc>,
}

fn speed_on_foil(p: &TelemetryPoint, threshold: f64) -> bool {
    // NaN >= x er false, så ugyldig fart teller som off-foil
    matches!(p.speed, Some(s) if s >= threshold)
}

/// Deler en tidssortert serie i sammenhengende on/off-foil-segmenter.
///
/// Én passering, maks én ventende kandidat. En ny tilstand må holde seg i
/// `min_transition_ms` (målt fra første punkt som foreslo den) før den
/// bekreftes; punktene i mellomtiden hører til det gamle segmentet, og det
/// nye segmentet starter på punktet der bekreftelsen skjer. Segmentene
/// dekker input nøyaktig, i rekkefølge. Serien må være sortert på `ts` av
/// kalleren.
pub fn classify_segments(points: &[TelemetryPoint], cfg: &SegmentConfig) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut pending: Option<Pending> = None;

    for p in points {
        let on_foil = speed_on_foil(p, cfg.speed_threshold);

        let Some(current) = segments.last_mut() else {
            // Første punkt: tilstanden tas direkte, og kandidaten får samme tilstand.
            segments.push(Segment { start: p.ts, end: p.ts, on_foil, data: vec![*p] });
            pending = Some(Pending { on_foil, since: p.ts });
            continue;
        };

        if on_foil == current.on_foil {
            current.end = p.ts;
            current.data.push(*p);
            pending = None;
            continue;
        }

        match pending {
            Some(cand) if cand.on_foil == on_foil => {
                let elapsed = (p.ts - cand.since).num_milliseconds();
                if elapsed >= cfg.min_transition_ms {
                    segments.push(Segment { start: p.ts, end: p.ts, on_foil, data: vec![*p] });
                    pending = None;
                } else {
                    current.end = p.ts;
                    current.data.push(*p);
                }
            }
            _ => {
                current.end = p.ts;
                current.data.push(*p);
                pending = Some(Pending { on_foil, since: p.ts });
            }
        }
    }

    log::debug!(
        "classify_segments: {} punkter => {} segmenter",
        points.len(),
        segments.len()
    );
    segments
}

/// Sammendrag av on-foil-segmentene i en tur.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoilSummary {
    pub segments_on_foil: usize,
    pub distance_on_foil: f64, // meter
    pub duration_on_foil_sec: f64,
    pub longest_segment_distance: Option<f64>,
    pub longest_segment_start: Option<DateTime<Utc>>,
    pub longest_segment_end: Option<DateTime<Utc>>,
}

/// Distanse innen ett segment (siste − første kjente distanse).
pub fn segment_distance(seg: &Segment) -> Option<f64> {
    let first = seg.data.iter().find_map(|p| p.distance.filter(|d| d.is_finite()))?;
    let last = seg.data.iter().rev().find_map(|p| p.distance.filter(|d| d.is_finite()))?;
    Some((last - first).max(0.0))
}

pub fn foil_summary(segments: &[Segment]) -> FoilSummary {
    let mut out = FoilSummary::default();

    for seg in segments.iter().filter(|s| s.on_foil) {
        out.segments_on_foil += 1;
        out.duration_on_foil_sec += (seg.end - seg.start).num_milliseconds() as f64 / 1000.0;

        let Some(d) = segment_distance(seg) else { continue };
        out.distance_on_foil += d;
        if out.longest_segment_distance.map_or(true, |best| d > best) {
            out.longest_segment_distance = Some(d);
            out.longest_segment_start = Some(seg.start);
            out.longest_segment_end = Some(seg.end);
        }
    }
    out
}
