use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{
    RawMetaRow, RawSampleRow, RawWindRow, RunMeta, TelemetryPoint, WindReading, WindSummary,
};

const UNKNOWN_FOIL: &str = "unknown foil";

/// Epoch-sekunder (kan ha desimaler) → UTC. NaN/inf => None.
pub fn ts_from_epoch_secs(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis((secs * 1000.0).round() as i64)
}

/// ISO-8601/RFC 3339, eller "YYYY-MM-DD HH:MM:SS" tolket som UTC.
pub fn parse_ts(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

static AREA_SUFFIX: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\s+\d+\.\d+ cm2").ok());

/// Stripper første "<mellomrom><tall>.<tall> cm2" fra utstyrsnavnet,
/// f.eks. "Axis ART 999 999.5 cm2" → "Axis ART 999".
pub fn normalize_foil(label: &str) -> String {
    match AREA_SUFFIX.as_ref() {
        Some(re) => re.replacen(label, 1, "").into_owned(),
        None => label.to_string(),
    }
}

/// Kvotient som følger IEEE: manglende verdi => NaN, x/0 => ±inf.
fn ratio(num: Option<f64>, den: Option<f64>) -> f64 {
    num.unwrap_or(f64::NAN) / den.unwrap_or(f64::NAN)
}

fn finite(x: f64) -> Option<f64> {
    if x.is_finite() { Some(x) } else { None }
}

/// Tur er "dry" når lengste segment dekker nesten hele foil-distansen.
/// Manglende tall gir NaN, og NaN > grense er false.
pub fn is_dry(longest_segment_distance: Option<f64>, distance_on_foil: Option<f64>, dry_limit: f64) -> bool {
    ratio(longest_segment_distance, distance_on_foil) > dry_limit
}

/// Søndagen i uka (UTC) som datoen tilhører.
pub fn week_start(ts: DateTime<Utc>) -> NaiveDate {
    let d = ts.date_naive();
    d - Duration::days(i64::from(d.weekday().num_days_from_sunday()))
}

pub fn month_start(ts: DateTime<Utc>) -> NaiveDate {
    let d = ts.date_naive();
    d.with_day(1).unwrap_or(d)
}

pub fn normalize_meta(raw: &RawMetaRow, dry_limit: f64) -> RunMeta {
    let ts = raw.ts.and_then(ts_from_epoch_secs);
    let foil = normalize_foil(raw.equip_2.as_deref().unwrap_or(UNKNOWN_FOIL));

    RunMeta {
        id: raw.id.clone(),
        ts,
        duration_sec: raw.duration_sec,
        distance_km: raw.distance_km,
        distance_on_foil: raw.distance_on_foil,
        duration_on_foil: raw.duration_on_foil,
        longest_segment_distance: raw.longest_segment_distance,
        longest_segment_start: raw.longest_segment_start.as_deref().and_then(parse_ts),
        longest_segment_end: raw.longest_segment_end.as_deref().and_then(parse_ts),
        region: raw.region.clone(),
        min_foiling_hr: raw.min_foiling_hr,
        foil,
        pct_dist_on_foil: finite(ratio(raw.distance_on_foil, raw.distance_km.map(|km| km * 1000.0))),
        pct_time_on_foil: finite(ratio(raw.duration_on_foil, raw.duration_sec)),
        dry: is_dry(raw.longest_segment_distance, raw.distance_on_foil, dry_limit),
        week: ts.map(week_start),
        month: ts.map(month_start),
        wind: WindSummary {
            avg_avg: raw.avg_wavg,
            avg_max: raw.max_wavg,
            gust_avg: raw.avg_wgust,
            gust_max: raw.max_wgust,
            avg_dir: raw.avg_wdir,
        },
        extra: raw.extra.clone(),
    }
}

/// Resultat av normalisering av én turs rader.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRun {
    pub points: Vec<TelemetryPoint>,
    /// Rader uten brukbart `tsi` (kan ikke plasseres i tid)
    pub skipped: usize,
}

pub fn normalize_samples(rows: &[RawSampleRow]) -> NormalizedRun {
    let mut points = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;

    for r in rows {
        let Some(ts) = r.tsi.and_then(ts_from_epoch_secs) else {
            skipped += 1;
            continue;
        };
        points.push(TelemetryPoint {
            ts,
            lat: r.lat,
            lon: r.lon,
            speed: r.speed,
            hr: r.hr,
            distance: r.distance,
            distance_to_land: r.distance_to_land,
            nearest_land_lat: r.nearest_land_lat,
            nearest_land_lon: r.nearest_land_lon,
            wdir: r.wdir,
            wavg: r.wavg,
            wgust: r.wgust,
        });
    }

    // stabil sortering – like tsi beholder CSV-rekkefølgen
    points.sort_by_key(|p| p.ts);

    if skipped > 0 {
        log::warn!("normalize_samples: hoppet over {skipped} rader uten tsi");
    }
    NormalizedRun { points, skipped }
}

pub fn normalize_wind(rows: &[RawWindRow]) -> Vec<WindReading> {
    rows.iter()
        .map(|r| WindReading {
            ts: r.ts.as_deref().and_then(parse_ts),
            wavg: r.wavg,
            wdir: r.wdir,
            wgust: r.wgust,
            wlull: r.wlull,
        })
        .collect()
}

/// Vindstasjon for en region. Ukjent region => ingen vinddata.
pub fn wind_site(region: Option<&str>) -> Option<&'static str> {
    match region? {
        "Kihei" => Some("kihei"),
        "Maui North Shore" => Some("hookipa"),
        _ => None,
    }
}

/// Klipper vindserien (sortert på ts) til turens vindu: siste måling før
/// start + alle i [start, slutt]. Første målte rad får start-tid, så
/// grafen begynner der turen begynner.
pub fn window_wind(readings: &[WindReading], start: DateTime<Utc>, duration_sec: f64) -> Vec<WindReading> {
    if readings.is_empty() {
        return Vec::new();
    }
    // `as i64` metter; for store varigheter blir slutten ubegrenset
    let dur_ms = if duration_sec.is_finite() { (duration_sec * 1000.0).round() as i64 } else { 0 };
    let end = Duration::try_milliseconds(dur_ms).and_then(|d| start.checked_add_signed(d));
    let before_end = |ts: DateTime<Utc>| match end {
        Some(e) => ts <= e,
        None => dur_ms >= 0,
    };

    let mut last_before: Option<WindReading> = None;
    let mut in_range = Vec::new();

    for r in readings {
        let Some(ts) = r.ts else { continue };
        if ts < start {
            last_before = Some(*r);
        } else if before_end(ts) {
            in_range.push(*r);
        } else {
            break;
        }
    }

    let mut out: Vec<WindReading> = last_before.into_iter().chain(in_range).collect();
    if let Some(first) = out.first_mut() {
        first.ts = Some(start);
    }
    out
}

/// Vindfeltene i telemetrien som målinger – brukes når stasjonsdata mangler.
pub fn wind_from_points(points: &[TelemetryPoint]) -> Vec<WindReading> {
    points
        .iter()
        .filter(|p| p.wdir.is_some())
        .map(|p| WindReading { ts: Some(p.ts), wavg: p.wavg, wdir: p.wdir, wgust: p.wgust, wlull: None })
        .collect()
}

/// Millisekunder siden første punkt.
pub fn relative_ms(points: &[TelemetryPoint]) -> Vec<i64> {
    let Some(t0) = points.first().map(|p| p.ts) else {
        return Vec::new();
    };
    points.iter().map(|p| (p.ts - t0).num_milliseconds()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_suffix_needs_decimal_and_unit() {
        assert_eq!(normalize_foil("Code 1250 cm2"), "Code 1250 cm2");
        assert_eq!(normalize_foil("Code  1250.0 cm2 v2"), "Code v2");
        assert_eq!(normalize_foil("Code 1250.0cm2"), "Code 1250.0cm2");
        assert_eq!(normalize_foil(""), "");
    }

    #[test]
    fn epoch_secs_rejects_nan() {
        assert!(ts_from_epoch_secs(f64::NAN).is_none());
        let t = ts_from_epoch_secs(1.5).unwrap();
        assert_eq!(t.timestamp_millis(), 1500);
    }
}
