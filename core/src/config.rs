use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chord::NodeOrder;
use crate::error::CoreResult;
use crate::segments::SegmentConfig;
use crate::windrose::WindRoseOptions;

pub const DEFAULT_DATA_HOST: &str = "d2qwe1xndvncw9.cloudfront.net";

/// Alle justerbare terskler samlet – sendes eksplisitt inn, ingen globale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// kph/kn – fart ≥ dette regnes som "på foil"
    pub speed_threshold: f64,
    /// Hvor lenge en ny tilstand må holde seg før den bekreftes
    pub min_transition_ms: i64,
    /// dry = longest_segment_distance / distance_on_foil > dry_limit
    pub dry_limit: f64,
    /// Bøttestørrelse for splits (meter)
    pub split_meters: f64,
    pub data_host: String,
    pub chord_order: NodeOrder,
    pub wind_rose: WindRoseOptions,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            speed_threshold: 11.0,
            min_transition_ms: 5_000,
            dry_limit: 0.97,
            split_meters: 1_000.0,
            data_host: DEFAULT_DATA_HOST.to_string(),
            chord_order: NodeOrder::default(),
            wind_rose: WindRoseOptions::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn segment_config(&self) -> SegmentConfig {
        SegmentConfig {
            speed_threshold: self.speed_threshold,
            min_transition_ms: self.min_transition_ms,
        }
    }

    /// Parser JSON med sti i feilmeldingen (f.eks. `wind_rose.n_directions`).
    pub fn from_json(s: &str) -> CoreResult<Self> {
        let de = &mut serde_json::Deserializer::from_str(s);
        Ok(serde_path_to_error::deserialize(de)?)
    }
}

/// Leser inn konfig fra disk (JSON).
/// Hvis filen ikke finnes, returneres default-konfig.
pub fn load_config(path: impl AsRef<Path>) -> CoreResult<AnalysisConfig> {
    let path = path.as_ref();
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let cfg = AnalysisConfig::from_json(&contents)?;
        log::info!(
            "config lastet fra {} (threshold={}, min_transition_ms={})",
            path.display(),
            cfg.speed_threshold,
            cfg.min_transition_ms
        );
        Ok(cfg)
    } else {
        log::warn!("fant ikke config på {}, bruker default", path.display());
        Ok(AnalysisConfig::default())
    }
}

/// Lagrer konfig til disk som JSON (pretty-print).
pub fn save_config(cfg: &AnalysisConfig, path: impl AsRef<Path>) -> CoreResult<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(path, json)?;
    log::info!("config lagret til {}", path.display());
    Ok(())
}
