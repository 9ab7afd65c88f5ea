use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────────────────────────────────────
// RÅ RADER (slik de kommer fra CSV/JSON). Alle tall er tolerante: ugyldig
// eller tom verdi => None, aldri feil.
// ──────────────────────────────────────────────────────────────────────────────

/// Én rad i meta-CSV (én rad per tur).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMetaRow {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub ts: Option<f64>, // epoch-sekunder
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub distance_on_foil: Option<f64>, // meter
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub distance_km: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub duration_on_foil: Option<f64>, // sek
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub duration_sec: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub equip_2: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub longest_segment_start: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub longest_segment_end: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub longest_segment_distance: Option<f64>, // meter
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub min_foiling_hr: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub avg_wavg: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub max_wavg: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub avg_wgust: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub max_wgust: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub avg_wdir: Option<f64>,

    /// Kolonner vi ikke kjenner – sendes uendret videre til RunMeta.
    #[serde(skip)]
    pub extra: BTreeMap<String, String>,
}

/// Én GPS/sensor-rad i en turs data.csv.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSampleRow {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub tsi: Option<f64>, // epoch-sekunder
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub speed: Option<f64>, // kph
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub hr: Option<f64>, // bpm
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub distance: Option<f64>, // meter fra start
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub distance_to_land: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub nearest_land_lat: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub nearest_land_lon: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub wdir: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub wavg: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub wgust: Option<f64>,
}

/// Én rad fra vindstasjonen (ts er ISO-8601).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawWindRow {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub ts: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub wavg: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub wdir: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub wgust: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub wlull: Option<f64>,
}

// ──────────────────────────────────────────────────────────────────────────────
// TYPEDE POSTER
// ──────────────────────────────────────────────────────────────────────────────

/// Ett GPS/sensor-punkt. Serien er sortert på `ts` innen en tur.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPoint {
    pub ts: DateTime<Utc>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub speed: Option<f64>,            // kph
    pub hr: Option<f64>,               // bpm
    pub distance: Option<f64>,         // meter fra start
    pub distance_to_land: Option<f64>, // meter
    pub nearest_land_lat: Option<f64>,
    pub nearest_land_lon: Option<f64>,
    pub wdir: Option<f64>,
    pub wavg: Option<f64>,
    pub wgust: Option<f64>,
}

impl TelemetryPoint {
    /// Punkt med bare tid og fart – praktisk i tester og syntetiske serier.
    pub fn at(ts: DateTime<Utc>, speed: Option<f64>) -> Self {
        Self {
            ts,
            lat: None,
            lon: None,
            speed,
            hr: None,
            distance: None,
            distance_to_land: None,
            nearest_land_lat: None,
            nearest_land_lon: None,
            wdir: None,
            wavg: None,
            wgust: None,
        }
    }
}

/// Vindsammendrag for en tur (fra meta-raden).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindSummary {
    pub avg_avg: Option<f64>,
    pub avg_max: Option<f64>,
    pub gust_avg: Option<f64>,
    pub gust_max: Option<f64>,
    pub avg_dir: Option<f64>,
}

/// Tur-sammendrag med avledede felt beregnet én gang i normaliseringen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub id: Option<String>,
    pub ts: Option<DateTime<Utc>>,
    pub duration_sec: Option<f64>,
    pub distance_km: Option<f64>,
    pub distance_on_foil: Option<f64>,
    pub duration_on_foil: Option<f64>,
    pub longest_segment_distance: Option<f64>,
    pub longest_segment_start: Option<DateTime<Utc>>,
    pub longest_segment_end: Option<DateTime<Utc>>,
    pub region: Option<String>,
    pub min_foiling_hr: Option<f64>,

    // --- avledet ---
    pub foil: String,
    pub pct_dist_on_foil: Option<f64>,
    pub pct_time_on_foil: Option<f64>,
    pub dry: bool,
    pub week: Option<NaiveDate>,
    pub month: Option<NaiveDate>,
    pub wind: WindSummary,

    pub extra: BTreeMap<String, String>,
}

/// Én vindmåling. `ts` er None hvis tidsstempelet ikke kunne leses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindReading {
    pub ts: Option<DateTime<Utc>>,
    pub wavg: Option<f64>,
    pub wdir: Option<f64>,
    pub wgust: Option<f64>,
    pub wlull: Option<f64>,
}

/// Én tur fra strand til strand (chord-input). Vekt er 1 hvis `value` mangler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripEdge {
    #[serde(alias = "start_beach")]
    pub source: String,
    #[serde(alias = "end_beach")]
    pub target: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub value: Option<f64>,
}

impl TripEdge {
    pub fn new(source: &str, target: &str) -> Self {
        Self { source: source.to_string(), target: target.to_string(), value: None }
    }

    pub fn weight(&self) -> f64 {
        match self.value {
            Some(v) if v.is_finite() => v,
            _ => 1.0,
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// UTDATA
// ──────────────────────────────────────────────────────────────────────────────

/// Maksimal sammenhengende bit av serien med samme bekreftede tilstand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub on_foil: bool,
    pub data: Vec<TelemetryPoint>,
}

/// min/snitt/maks over en verdi i en bøtte. Tom mengde => alle None.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

/// Én distanse-split (1-indeksert).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub split: i64,
    pub speed: Aggregate,
    pub pace: Aggregate, // min/km-ekvivalent
    pub hr: Aggregate,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub data: Vec<TelemetryPoint>,
}
