// core/src/source.rs
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use ureq::Agent;

use crate::error::{CoreError, CoreResult};
use crate::format;
use crate::metrics::Metrics;
use crate::normalize::{normalize_samples, normalize_wind, wind_site, window_wind, NormalizedRun};
use crate::types::{RawMetaRow, RawSampleRow, RawWindRow, RunMeta, TripEdge, WindReading};

const META_COLUMNS: [&str; 17] = [
    "id", "ts", "distance_on_foil", "distance_km", "duration_on_foil", "duration_sec",
    "equip_2", "longest_segment_start", "longest_segment_end", "longest_segment_distance",
    "region", "min_foiling_hr", "avg_wavg", "max_wavg", "avg_wgust", "max_wgust", "avg_wdir",
];

fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr)
}

/// Leser alle rader som `T`. Ukjente kolonner ignoreres.
pub fn read_rows<T: DeserializeOwned, R: Read>(rdr: R) -> CoreResult<Vec<T>> {
    let mut csv = csv_reader(rdr);
    let mut out = Vec::new();
    for row in csv.deserialize() {
        out.push(row?);
    }
    Ok(out)
}

/// Meta-CSV. Kolonner vi ikke kjenner legges i `extra`.
pub fn read_meta<R: Read>(rdr: R) -> CoreResult<Vec<RawMetaRow>> {
    let mut csv = csv_reader(rdr);
    let headers = csv.headers()?.clone();
    let mut out = Vec::new();

    for rec in csv.records() {
        let rec = rec?;
        let mut row: RawMetaRow = rec.deserialize(Some(&headers))?;
        row.extra = headers
            .iter()
            .zip(rec.iter())
            .filter(|(h, _)| !META_COLUMNS.contains(h))
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        out.push(row);
    }
    Ok(out)
}

pub fn read_samples<R: Read>(rdr: R) -> CoreResult<Vec<RawSampleRow>> {
    read_rows(rdr)
}

pub fn read_wind<R: Read>(rdr: R) -> CoreResult<Vec<RawWindRow>> {
    read_rows(rdr)
}

pub fn read_trips<R: Read>(rdr: R) -> CoreResult<Vec<TripEdge>> {
    read_rows(rdr)
}

pub fn read_meta_path(path: impl AsRef<Path>) -> CoreResult<Vec<RawMetaRow>> {
    read_meta(File::open(path)?)
}

pub fn read_samples_path(path: impl AsRef<Path>) -> CoreResult<Vec<RawSampleRow>> {
    read_samples(File::open(path)?)
}

pub fn read_wind_path(path: impl AsRef<Path>) -> CoreResult<Vec<RawWindRow>> {
    read_wind(File::open(path)?)
}

pub fn read_trips_path(path: impl AsRef<Path>) -> CoreResult<Vec<TripEdge>> {
    read_trips(File::open(path)?)
}

// ──────────────────────────────────────────────────────────────────────────────
// HTTP (CloudFront foran S3)
// ──────────────────────────────────────────────────────────────────────────────

/// Henter tur- og vind-CSV over HTTP – enkel blocking-versjon (ureq).
pub struct CsvSource {
    agent: Agent,
    host: String,
}

impl CsvSource {
    pub fn new(host: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();
        Self { agent, host: host.to_string() }
    }

    pub fn run_url(&self, run_id: &str) -> String {
        format!("https://{}/runs/dwid%3D{}/data.csv", self.host, run_id)
    }

    pub fn wind_url(&self, site: &str, day: &str) -> String {
        format!("https://{}/wind/site%3D{}/day%3D{}/data.csv", self.host, site, day)
    }

    fn get(&self, url: &str) -> CoreResult<Box<dyn Read + Send + Sync + 'static>> {
        let resp = self
            .agent
            .get(url)
            .call()
            .map_err(|e| CoreError::Http(format!("{url}: {e}")))?;
        Ok(resp.into_reader())
    }

    /// Turdata sortert på tid. Nettverksfeil => tom tur (logges og telles).
    pub fn fetch_run(&self, run_id: &str, metrics: &Metrics) -> NormalizedRun {
        let url = self.run_url(run_id);
        match self.get(&url).and_then(read_samples) {
            Ok(rows) => {
                let run = normalize_samples(&rows);
                metrics.rows_skipped.inc_by(run.skipped as u64);
                run
            }
            Err(e) => {
                log::warn!("fetch_run {run_id}: {e}");
                metrics.fetch_failures.inc();
                NormalizedRun::default()
            }
        }
    }

    /// Vindmålinger for turens vindu. Ukjent region eller feil => tom liste.
    pub fn fetch_wind(&self, meta: &RunMeta, metrics: &Metrics) -> Vec<WindReading> {
        let (Some(site), Some(start)) = (wind_site(meta.region.as_deref()), meta.ts) else {
            return Vec::new();
        };
        let url = self.wind_url(site, &format::date(start));

        match self.get(&url).and_then(read_wind) {
            Ok(rows) => window_wind(&normalize_wind(&rows), start, meta.duration_sec.unwrap_or(0.0)),
            Err(e) => {
                log::warn!("fetch_wind {site}: {e}");
                metrics.fetch_failures.inc();
                Vec::new()
            }
        }
    }
}

impl Default for CsvSource {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_DATA_HOST)
    }
}
