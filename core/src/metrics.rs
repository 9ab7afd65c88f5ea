use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};

use crate::error::CoreResult;

/// Tellere for én analyse-kontekst. Eget register per instans, så flere
/// `Metrics` kan leve side om side (tester, flere sider) uten kollisjon.
#[derive(Debug, Clone)]
pub struct Metrics {
    registry: Registry,
    pub points_classified: IntCounter,
    pub segments: IntCounter,
    pub rows_skipped: IntCounter,
    pub wind_dropped: IntCounter,
    pub fetch_failures: IntCounter,
}

fn counter(registry: &Registry, name: &str, help: &str) -> CoreResult<IntCounter> {
    let c = IntCounter::with_opts(Opts::new(name, help))?;
    registry.register(Box::new(c.clone()))?;
    Ok(c)
}

impl Metrics {
    pub fn new() -> CoreResult<Self> {
        let registry = Registry::new();
        let points_classified = counter(
            &registry,
            "downwind_points_classified_total",
            "Telemetry points fed through the segment classifier",
        )?;
        let segments = counter(&registry, "downwind_segments_total", "Segments emitted")?;
        let rows_skipped = counter(
            &registry,
            "downwind_rows_skipped_total",
            "Sample rows skipped for missing timestamp",
        )?;
        let wind_dropped = counter(
            &registry,
            "downwind_wind_dropped_total",
            "Wind readings without bindable direction or speed",
        )?;
        let fetch_failures = counter(
            &registry,
            "downwind_fetch_failures_total",
            "CSV fetches that failed and degraded to empty data",
        )?;

        Ok(Self {
            registry,
            points_classified,
            segments,
            rows_skipped,
            wind_dropped,
            fetch_failures,
        })
    }

    /// Prometheus tekstformat.
    pub fn render(&self) -> CoreResult<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
