use std::collections::BTreeMap;

use crate::types::{Aggregate, Split, TelemetryPoint};

/// min/snitt/maks over endelige verdier. Tom mengde => Aggregate med None.
pub fn aggregate<I>(values: I) -> Aggregate
where
    I: IntoIterator<Item = f64>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut cnt = 0usize;

    for v in values.into_iter().filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
        sum += v;
        cnt += 1;
    }

    if cnt == 0 {
        return Aggregate::default();
    }
    Aggregate { min: Some(min), avg: Some(sum / cnt as f64), max: Some(max) }
}

/// pace = 60 / fart (min per km når fart er kph). Fart 0 gir ingen pace.
pub fn pace_from_speed(speed: f64) -> Option<f64> {
    let pace = 60.0 / speed;
    if pace.is_finite() && pace > 0.0 { Some(pace) } else { None }
}

/// Bøtte-indeks (1-indeksert) for en distanse. Ugyldig distanse => None.
pub fn split_index(distance: f64, split_meters: f64) -> Option<i64> {
    if !distance.is_finite() || !(split_meters > 0.0) {
        return None;
    }
    let q = (distance / split_meters).floor();
    // utenfor i64 => kan ikke plasseres
    if !(q >= i64::MIN as f64 && q < i64::MAX as f64) {
        return None;
    }
    (q as i64).checked_add(1)
}

/// Grupperer punkter i distanse-bøtter og regner min/snitt/maks for fart,
/// pace og puls. Bøtter uten punkter utelates; resultatet er stigende på
/// `split`. Punkter uten distanse kan ikke plasseres og hoppes over.
pub fn compute_splits(points: &[TelemetryPoint], split_meters: f64) -> Vec<Split> {
    let mut buckets: BTreeMap<i64, Vec<TelemetryPoint>> = BTreeMap::new();
    for p in points {
        if let Some(k) = p.distance.and_then(|d| split_index(d, split_meters)) {
            buckets.entry(k).or_default().push(*p);
        }
    }

    buckets
        .into_iter()
        .map(|(split, data)| {
            let speeds: Vec<f64> = data.iter().filter_map(|p| p.speed).collect();
            Split {
                split,
                speed: aggregate(speeds.iter().copied()),
                pace: aggregate(speeds.iter().filter_map(|s| pace_from_speed(*s))),
                hr: aggregate(data.iter().filter_map(|p| p.hr)),
                data,
            }
        })
        .collect()
}
