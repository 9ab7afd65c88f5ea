use std::fmt::Write;

use crate::analyze_run::RunReport;
use crate::format;

fn opt(x: Option<f64>, dp: usize) -> String {
    match x {
        Some(v) => format!("{v:.dp$}"),
        None => "-".to_string(),
    }
}

/// Tekstrapport for én tur (terminal/logg).
pub fn render_run_report(report: &RunReport) -> String {
    let mut out = String::new();

    let title = report
        .meta
        .as_ref()
        .map(|m| {
            let day = m.ts.map(format::date).unwrap_or_else(|| "?".into());
            format!("{} {} ({})", day, m.region.as_deref().unwrap_or("?"), m.foil)
        })
        .unwrap_or_else(|| "uten meta".into());

    let _ = writeln!(out, "--- Run Report: {title} ---");
    let _ = writeln!(out, "Punkter: {}", report.points);
    let _ = writeln!(
        out,
        "På foil: {} m i {} segmenter ({}){}",
        format::comma(report.foil.distance_on_foil.round()),
        report.foil.segments_on_foil,
        format::seconds(report.foil.duration_on_foil_sec),
        if report.dry { " – dry" } else { "" }
    );

    let _ = writeln!(out, "Splits:");
    for s in &report.splits {
        let pace = s.speed.avg.map(format::pace).unwrap_or_else(|| "-".into());
        let _ = writeln!(
            out,
            "  {:>3}  snitt {} kph  maks {} kph  pace {}  puls {}",
            s.split,
            opt(s.speed.avg, 1),
            opt(s.speed.max, 1),
            pace,
            opt(s.hr.avg, 0)
        );
    }

    for c in &report.callouts {
        let _ = writeln!(out, "Callout {:?}: {:.1} @ {}", c.kind, c.value, c.ts.format("%H:%M:%S"));
    }

    if let Some(rose) = &report.wind_rose {
        let _ = writeln!(
            out,
            "Vindrose: {} målinger ({} forkastet)",
            rose.bins.total, rose.bins.dropped
        );
    }
    out
}

pub fn print_run_report(report: &RunReport) {
    println!("{}", render_run_report(report));
}
