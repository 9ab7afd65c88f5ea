pub mod analyze_run;
pub mod api;
pub mod callouts;
pub mod chord;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod metrics;
pub mod normalize;
pub mod segments;
pub mod source;
pub mod splits;
pub mod types;
pub mod windrose;

#[cfg(feature = "python")]
mod py;

pub use analyze_run::{analyze_run, analyze_run_files, RunInputs, RunReport, SegmentSummary};
pub use api::{analyze_run_json, chord_json, wind_rose_json};
pub use callouts::{compute_callouts, Callout, CalloutKind};
pub use chord::{build_chord, ChordMatrix, NodeOrder};
pub use config::{load_config, save_config, AnalysisConfig};
pub use error::{CoreError, CoreResult};
pub use metrics::Metrics;
pub use normalize::{normalize_meta, normalize_samples, normalize_wind, window_wind, NormalizedRun};
pub use segments::{classify_segments, foil_summary, FoilSummary, SegmentConfig};
pub use splits::compute_splits;
pub use types::{
    Aggregate, RawMetaRow, RawSampleRow, RawWindRow, RunMeta, Segment, Split, TelemetryPoint,
    TripEdge, WindReading, WindSummary,
};
pub use windrose::{
    bin_wind, ArcGeometry, RoseBins, RoseCell, RosePatch, RoseSnapshot, WindRose, WindRoseConfig,
    WindRoseOptions,
};
