use chrono::{DateTime, Utc};

/// YYYY-MM-DD (UTC) – samme format som dag-partisjonen i vind-URLene.
pub fn date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Tusenskiller: 1234567.5 → "1,234,567.5"
pub fn comma(x: f64) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    let s = x.abs().to_string();
    let (int, frac) = match s.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (s.clone(), None),
    };

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if x < 0.0 { "-" } else { "" };
    match frac {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Varighet mellom to tidspunkt: "2d 3h", "3h 12m" eller "12m".
pub fn time_diff(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    const MIN: i64 = 60 * 1000;
    const HOUR: i64 = 60 * MIN;
    const DAY: i64 = 24 * HOUR;

    let diff = (end - start).num_milliseconds();
    let days = diff.div_euclid(DAY);
    let hours = diff.rem_euclid(DAY) / HOUR;
    let minutes = diff.rem_euclid(HOUR) / MIN;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Sekunder → "1h 2m 3s", nulldeler utelates.
pub fn seconds(total: f64) -> String {
    if !total.is_finite() {
        return String::new();
    }
    let t = total.round().max(0.0) as u64;
    let (hours, minutes, secs) = (t / 3600, t % 3600 / 60, t % 60);

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if secs > 0 {
        parts.push(format!("{secs}s"));
    }
    parts.join(" ")
}

/// Desimalminutter → "m:ss"
pub fn minutes(x: f64) -> String {
    if !x.is_finite() {
        return "--:--".to_string();
    }
    let m = x.floor();
    let s = (60.0 * (x - m)).floor();
    format!("{m}:{s:02}")
}

/// Fart (kph) → pace "m:ss" per km.
pub fn pace(kph: f64) -> String {
    minutes(60.0 / kph)
}
