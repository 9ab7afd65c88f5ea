use once_cell::unsync::OnceCell;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::WindReading;

/// d3 schemeCategory10
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

const COMPASS16: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE",
    "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
];

/// Hvilket fartsfelt i vindmålingen som bines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedField {
    #[default]
    #[serde(alias = "wavg")]
    Avg,
    #[serde(alias = "wgust")]
    Gust,
    #[serde(alias = "wlull")]
    Lull,
}

impl SpeedField {
    pub fn pick(self, r: &WindReading) -> Option<f64> {
        match self {
            SpeedField::Avg => r.wavg,
            SpeedField::Gust => r.wgust,
            SpeedField::Lull => r.wlull,
        }
    }
}

fn default_palette() -> Vec<String> {
    CATEGORY10.iter().map(|c| c.to_string()).collect()
}

fn default_seq_from() -> String {
    "#deebf7".to_string()
}

fn default_seq_to() -> String {
    "#08306b".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColorScheme {
    /// Fast palett, sykles per fartsbånd
    Ordinal {
        #[serde(default = "default_palette")]
        palette: Vec<String>,
    },
    /// Lineær RGB-interpolasjon fra første til siste bånd
    Sequential {
        #[serde(default = "default_seq_from")]
        from: String,
        #[serde(default = "default_seq_to")]
        to: String,
    },
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme::Ordinal { palette: default_palette() }
    }
}

fn parse_hex(c: &str) -> Option<(u8, u8, u8)> {
    let h = c.strip_prefix('#')?;
    if h.len() != 6 {
        return None;
    }
    let ch = |i: usize| u8::from_str_radix(h.get(i..i + 2)?, 16).ok();
    Some((ch(0)?, ch(2)?, ch(4)?))
}

impl ColorScheme {
    pub fn color(&self, band: usize, n_bands: usize) -> String {
        match self {
            ColorScheme::Ordinal { palette } => {
                if palette.is_empty() {
                    return "#000000".to_string();
                }
                palette[band % palette.len()].clone()
            }
            ColorScheme::Sequential { from, to } => {
                let a = parse_hex(from).unwrap_or((0, 0, 0));
                let b = parse_hex(to).unwrap_or((0, 0, 0));
                let t = if n_bands > 1 { band as f64 / (n_bands - 1) as f64 } else { 0.0 };
                let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
                format!("#{:02x}{:02x}{:02x}", mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
            }
        }
    }
}

/// Valgfrie innstillinger slik de kommer fra kalleren. Ukjente nøkler
/// ignoreres, manglende faller tilbake til default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindRoseOptions {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub radius: Option<f64>,
    #[serde(alias = "innerHole")]
    pub inner_hole: Option<f64>,
    #[serde(alias = "nDirections")]
    pub n_directions: Option<usize>,
    #[serde(alias = "speedBreaks")]
    pub speed_breaks: Option<Vec<f64>>,
    #[serde(alias = "speedAccessor")]
    pub speed_field: Option<SpeedField>,
    pub normalize: Option<bool>,
    pub colors: Option<ColorScheme>,
    pub title: Option<String>,
}

/// Ferdig validert konfig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindRoseConfig {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub inner_hole: f64,
    pub n_directions: usize,
    pub speed_breaks: Vec<f64>, // stigende, unike
    pub speed_field: SpeedField,
    pub normalize: bool,
    pub colors: ColorScheme,
    pub title: Option<String>,
}

impl Default for WindRoseConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            radius: 80.0,
            inner_hole: 0.0,
            n_directions: 16,
            speed_breaks: vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0],
            speed_field: SpeedField::Avg,
            normalize: true,
            colors: ColorScheme::default(),
            title: None,
        }
    }
}

/// Endelige, stigende og unike grenser.
fn clean_breaks(breaks: Vec<f64>) -> Vec<f64> {
    let mut out: Vec<f64> = breaks.into_iter().filter(|b| b.is_finite()).collect();
    out.sort_by_key(|b| OrderedFloat(*b));
    out.dedup();
    out
}

impl WindRoseConfig {
    pub fn from_options(opts: &WindRoseOptions) -> CoreResult<Self> {
        let d = WindRoseConfig::default();

        let breaks = clean_breaks(opts.speed_breaks.clone().unwrap_or(d.speed_breaks));

        let cfg = Self {
            x: opts.x.unwrap_or(d.x),
            y: opts.y.unwrap_or(d.y),
            radius: opts.radius.unwrap_or(d.radius),
            inner_hole: opts.inner_hole.unwrap_or(d.inner_hole),
            n_directions: opts.n_directions.unwrap_or(d.n_directions),
            speed_breaks: breaks,
            speed_field: opts.speed_field.unwrap_or(d.speed_field),
            normalize: opts.normalize.unwrap_or(d.normalize),
            colors: opts.colors.clone().unwrap_or(d.colors),
            title: opts.title.clone(),
        };

        if cfg.n_directions == 0 {
            return Err(CoreError::InvalidConfig("n_directions must be > 0".into()));
        }
        if cfg.speed_breaks.is_empty() {
            return Err(CoreError::InvalidConfig("speed_breaks has no finite values".into()));
        }
        if !(cfg.inner_hole >= 0.0 && cfg.inner_hole < cfg.radius && cfg.radius.is_finite()) {
            return Err(CoreError::InvalidConfig(format!(
                "need 0 <= inner_hole < radius, got inner_hole={} radius={}",
                cfg.inner_hole, cfg.radius
            )));
        }
        Ok(cfg)
    }

    pub fn sector_size(&self) -> f64 {
        360.0 / self.n_directions as f64
    }

    pub fn band_labels(&self) -> Vec<String> {
        let b = &self.speed_breaks;
        (0..b.len())
            .map(|i| match b.get(i + 1) {
                Some(next) => format!("{}-{}", b[i], next),
                None => format!("{}+", b[i]),
            })
            .collect()
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// BINNING
// ──────────────────────────────────────────────────────────────────────────────

/// Normaliser vinkel til [0, 360)
pub fn wrap360(d: f64) -> f64 {
    let x = d % 360.0;
    if x < 0.0 { x + 360.0 } else { x }
}

/// Sektor s er sentrert på s·sektorstørrelse, så nord havner i sektor 0
/// både fra 355° og 5°.
pub fn sector_of(wdir: f64, n_directions: usize) -> Option<usize> {
    if !wdir.is_finite() || n_directions == 0 {
        return None;
    }
    let size = 360.0 / n_directions as f64;
    let s = (wrap360(wdir + size / 2.0) / size).floor() as usize;
    Some(s % n_directions)
}

/// Første halvåpne intervall [b_i, b_i+1) som inneholder farten, eller
/// toppbåndet for fart ≥ siste grense. Under første grense => None.
pub fn band_of(speed: f64, breaks: &[f64]) -> Option<usize> {
    if !speed.is_finite() {
        return None;
    }
    breaks.iter().rposition(|b| speed >= *b)
}

/// Én celle (sektor × fartsbånd) i rosen, stablet utover fra r0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoseCell {
    pub sector: usize,
    pub band: usize,
    pub label: String,
    pub count: usize,
    /// andel av totalen (normalize) eller rå telling
    pub value: f64,
    pub r0: f64,
    pub r1: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoseBins {
    pub n_directions: usize,
    pub bands: Vec<String>,
    /// sektor-major, bånd stigende; bare bånd med målinger
    pub cells: Vec<RoseCell>,
    /// sum av `value` per sektor
    pub sector_totals: Vec<f64>,
    pub total: usize,
    pub dropped: usize,
    pub normalized: bool,
}

impl RoseBins {
    pub fn max_sector_total(&self) -> f64 {
        self.sector_totals.iter().copied().fold(0.0, f64::max)
    }
}

pub fn bin_wind(readings: &[WindReading], cfg: &WindRoseConfig) -> RoseBins {
    let n = cfg.n_directions;
    let n_bands = cfg.speed_breaks.len();
    let mut counts = vec![vec![0usize; n_bands]; n];
    let mut total = 0usize;
    let mut dropped = 0usize;

    for r in readings {
        let sector = r.wdir.and_then(|d| sector_of(d, n));
        let band = cfg.speed_field.pick(r).and_then(|s| band_of(s, &cfg.speed_breaks));
        match (sector, band) {
            (Some(s), Some(b)) => {
                counts[s][b] += 1;
                total += 1;
            }
            _ => dropped += 1,
        }
    }

    let labels = cfg.band_labels();
    let mut cells = Vec::new();
    let mut sector_totals = vec![0.0; n];

    for (s, row) in counts.iter().enumerate() {
        let mut acc = 0.0;
        for (b, &count) in row.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let value = if cfg.normalize { count as f64 / total as f64 } else { count as f64 };
            cells.push(RoseCell {
                sector: s,
                band: b,
                label: labels[b].clone(),
                count,
                value,
                r0: acc,
                r1: acc + value,
            });
            acc += value;
        }
        sector_totals[s] = acc;
    }

    log::debug!("bin_wind: {total} målinger i {n} sektorer, {dropped} forkastet");

    RoseBins {
        n_directions: n,
        bands: labels,
        cells,
        sector_totals,
        total,
        dropped,
        normalized: cfg.normalize,
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// GEOMETRI + HANDLE
// ──────────────────────────────────────────────────────────────────────────────

/// Bue for én celle. Vinkler i radianer med klokka fra nord.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcGeometry {
    pub sector: usize,
    pub band: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

/// Radiell skala [0, maks sektortotal] → [inner_hole, radius].
fn project(bins: &RoseBins, cfg: &WindRoseConfig) -> Vec<ArcGeometry> {
    let y_max = bins.max_sector_total();
    let span = cfg.radius - cfg.inner_hole;
    let scale = |v: f64| {
        if y_max > 0.0 { cfg.inner_hole + span * (v / y_max) } else { cfg.inner_hole }
    };
    let size = cfg.sector_size().to_radians();

    bins.cells
        .iter()
        .map(|c| {
            let start = c.sector as f64 * size - size / 2.0;
            ArcGeometry {
                sector: c.sector,
                band: c.band,
                start_angle: start,
                end_angle: start + size,
                inner_radius: scale(c.r0),
                outer_radius: scale(c.r1),
            }
        })
        .collect()
}

/// Delvis oppdatering fra resize/pan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub radius: Option<f64>,
}

/// Alt en tegner trenger for én rose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoseSnapshot {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub inner_hole: f64,
    pub title: Option<String>,
    pub sector_labels: Vec<String>,
    pub band_colors: Vec<String>,
    pub bins: RoseBins,
    pub arcs: Vec<ArcGeometry>,
}

/// Vindrose med egen geometri. Binningen skjer én gang og caches; en
/// radius-endring kaster bare projeksjonen.
#[derive(Debug)]
pub struct WindRose {
    config: WindRoseConfig,
    readings: Vec<WindReading>,
    bins: OnceCell<RoseBins>,
    arcs: OnceCell<Vec<ArcGeometry>>,
}

impl WindRose {
    pub fn new(readings: &[WindReading], mut config: WindRoseConfig) -> Self {
        // konfig bygd fra feltene har ikke gått gjennom from_options
        config.speed_breaks = clean_breaks(std::mem::take(&mut config.speed_breaks));
        Self {
            config,
            readings: readings.to_vec(),
            bins: OnceCell::new(),
            arcs: OnceCell::new(),
        }
    }

    pub fn from_options(readings: &[WindReading], opts: &WindRoseOptions) -> CoreResult<Self> {
        Ok(Self::new(readings, WindRoseConfig::from_options(opts)?))
    }

    pub fn config(&self) -> &WindRoseConfig {
        &self.config
    }

    pub fn center(&self) -> (f64, f64) {
        (self.config.x, self.config.y)
    }

    pub fn bins(&self) -> &RoseBins {
        self.bins.get_or_init(|| bin_wind(&self.readings, &self.config))
    }

    pub fn arcs(&self) -> &[ArcGeometry] {
        self.arcs.get_or_init(|| project(self.bins(), &self.config))
    }

    /// Flytt/skaler. Samme patch to ganger gir samme tilstand.
    pub fn update(&mut self, patch: RosePatch) {
        if let Some(x) = patch.x.filter(|v| v.is_finite()) {
            self.config.x = x;
        }
        if let Some(y) = patch.y.filter(|v| v.is_finite()) {
            self.config.y = y;
        }
        if let Some(r) = patch.radius {
            if !(r.is_finite() && r > self.config.inner_hole) {
                log::warn!("WindRose::update: ignorerer radius={r} (inner_hole={})", self.config.inner_hole);
            } else if r != self.config.radius {
                self.config.radius = r;
                self.arcs.take();
            }
        }
    }

    pub fn sector_label(&self, sector: usize) -> String {
        let n = self.config.n_directions;
        if n > 0 && 16 % n == 0 {
            COMPASS16[(sector * (16 / n)) % 16].to_string()
        } else {
            format!("{}°", (sector as f64 * self.config.sector_size()).round())
        }
    }

    pub fn band_color(&self, band: usize) -> String {
        self.config.colors.color(band, self.config.speed_breaks.len())
    }

    pub fn snapshot(&self) -> RoseSnapshot {
        RoseSnapshot {
            x: self.config.x,
            y: self.config.y,
            radius: self.config.radius,
            inner_hole: self.config.inner_hole,
            title: self.config.title.clone(),
            sector_labels: (0..self.config.n_directions).map(|s| self.sector_label(s)).collect(),
            band_colors: (0..self.config.speed_breaks.len()).map(|b| self.band_color(b)).collect(),
            bins: self.bins().clone(),
            arcs: self.arcs().to_vec(),
        }
    }
}
