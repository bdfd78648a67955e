//! Terminal presenter
//!
//! Renders a [`KiteReport`] as plain text: per-day table, score bar chart,
//! pressure and webcam summary, and a warning for every unavailable source.
//! Values are printed as computed, nothing is recalculated here.

use crate::kiting::{KITEABLE_WINDOW, KiteReport};

/// Width in characters of the longest bar on either side of the axis
const BAR_WIDTH: usize = 40;
const BAR: char = '█';

/// Render the full terminal report
#[must_use]
pub fn render_report(report: &KiteReport) -> String {
    let mut sections = vec![
        format!(
            "🪁 Kite forecast for {}\n   {} | generated {}\n",
            report.spot.name,
            report.spot.format_coordinates(),
            report.generated_at.format("%Y-%m-%d %H:%M UTC")
        ),
        render_table(report),
        render_score_chart(report),
    ];

    if let Some(best) = report.best_day() {
        sections.push(format!(
            "Best day: {} ({} {}, score {})\n",
            best.date.format("%A %d.%m"),
            best.status.emoji(),
            best.status,
            best.score
        ));
    }
    sections.push(render_summary(report));

    if !report.diagnostics.is_empty() {
        let warnings: Vec<String> = report
            .diagnostics
            .iter()
            .map(|d| format!("⚠️  {d}\n"))
            .collect();
        sections.push(warnings.concat());
    }

    sections.push(format!(
        "Kiteable hour: {}\n",
        KITEABLE_WINDOW.describe(&report.wind_speed_unit)
    ));
    sections.join("\n")
}

/// One row per day with every metric
#[must_use]
pub fn render_table(report: &KiteReport) -> String {
    let mut lines = vec![
        format!(
            "{:<10}  {:>10}  {:>9}  {:>7}  {:>9}  {:>7}  {:>5}  {:<8}",
            "Date", "Cloud 6-10", "TempDiff", "Kite h", "PressDiff", "Webcam", "Score", "Status"
        ),
        "-".repeat(86),
    ];

    lines.extend(report.days.iter().map(|day| {
        format!(
            "{:<10}  {:>10}  {:>9}  {:>7}  {:>9}  {:>7}  {:>5}  {} {}",
            day.date.format("%Y-%m-%d"),
            format_optional(day.cloud_morning_avg, "%", 0),
            format_optional(day.temp_diff_mountain_valley, "°C", 1),
            day.kiteable_hour_count,
            format_optional(day.pressure_diff, "", 2),
            format_webcam_short(day.webcam_clear),
            day.score,
            day.status.emoji(),
            day.status,
        )
    }));

    if report.days.is_empty() {
        lines.push("(no forecast days)".to_string());
    }
    terminate(lines)
}

/// Horizontal bar per day; negative scores extend left of the zero axis
#[must_use]
pub fn render_score_chart(report: &KiteReport) -> String {
    let max_abs = report
        .days
        .iter()
        .map(|d| d.score.unsigned_abs())
        .max()
        .unwrap_or(0)
        .max(1);
    let bar_len = |score: i32| {
        (f64::from(score.unsigned_abs()) / f64::from(max_abs) * BAR_WIDTH as f64).round() as usize
    };
    let left_width = report
        .days
        .iter()
        .filter(|d| d.score < 0)
        .map(|d| bar_len(d.score))
        .max()
        .unwrap_or(0);

    let mut lines = vec!["Score per day".to_string()];
    lines.extend(report.days.iter().map(|day| {
        let bar = BAR.to_string().repeat(bar_len(day.score));
        let (left, right) = if day.score < 0 {
            (bar, String::new())
        } else {
            (String::new(), bar)
        };
        format!(
            "{}  {:>left_width$}|{:<BAR_WIDTH$} {:>4}",
            day.date.format("%a %d.%m"),
            left,
            right,
            day.score,
        )
    }));
    terminate(lines)
}

/// Pressure readings, their difference and the webcam verdict
#[must_use]
pub fn render_summary(report: &KiteReport) -> String {
    let south = &report.south_pressure;
    let north = &report.north_pressure;

    terminate(vec![
        format!("Pressure {}: {}", south.station.name, south.format_pressure()),
        format!("Pressure {}: {}", north.station.name, north.format_pressure()),
        pressure_difference_line(report),
        format!("Webcam: {}", webcam_verdict(report.webcam_clear)),
    ])
}

/// Pressure difference sentence, shared with the HTML page
#[must_use]
pub fn pressure_difference_line(report: &KiteReport) -> String {
    match report.pressure_diff {
        Some(diff) => format!(
            "Pressure difference ({} - {}): {:+.2} hPa",
            report.south_pressure.station.name, report.north_pressure.station.name, diff
        ),
        None => "No pressure difference available".to_string(),
    }
}

/// Webcam verdict sentence; absent counts as not clear
#[must_use]
pub fn webcam_verdict(webcam_clear: Option<bool>) -> &'static str {
    if webcam_clear == Some(true) {
        "clear"
    } else {
        "hazy or unavailable"
    }
}

/// Format an optional value, `-` when absent
#[must_use]
pub fn format_optional(value: Option<f64>, unit: &str, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}{unit}"),
        None => "-".to_string(),
    }
}

/// Short webcam column value
#[must_use]
pub fn format_webcam_short(webcam_clear: Option<bool>) -> &'static str {
    match webcam_clear {
        Some(true) => "clear",
        Some(false) => "hazy",
        None => "-",
    }
}

fn terminate(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
