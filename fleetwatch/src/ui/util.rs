//! Small UI helpers: compact counts, percentages, truncation, ages.

use ratatui::style::Color;

pub fn human_count(n: u64) -> String {
    const K: f64 = 1000.0;
    let v = n as f64;
    if v < K { return format!("{n}"); }
    let k = v / K;
    if k < K { return format!("{k:.1}K"); }
    let m = k / K;
    if m < K { return format!("{m:.1}M"); }
    let g = m / K;
    if g < K { return format!("{g:.1}G"); }
    format!("{:.2}T", g / K)
}

pub fn truncate_middle(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max { return s.to_string(); }
    if max <= 3 { return "...".into(); }
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = chars[..left].iter().collect();
    let tail: String = chars[chars.len() - right..].iter().collect();
    format!("{head}...{tail}")
}

pub fn usage_color(pct: f64) -> Color {
    match pct {
        x if x < 60.0 => Color::Green,
        x if x < 85.0 => Color::Yellow,
        _ => Color::Red,
    }
}

/// "3h12m", "45s" style durations for uptime / heartbeat columns.
pub fn short_age(secs: u64) -> String {
    match secs {
        s if s < 60 => format!("{s}s"),
        s if s < 3600 => format!("{}m{:02}s", s / 60, s % 60),
        s if s < 86_400 => format!("{}h{:02}m", s / 3600, (s % 3600) / 60),
        s => format!("{}d{:02}h", s / 86_400, (s % 86_400) / 3600),
    }
}

/// Local wall-clock time for a unix-millis timestamp.
pub fn clock(timestamp_ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms as i64)
        .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".into())
}
