//! Human-readable rendering of parse results.
//!
//! Only presentation lives here; every number comes straight from the
//! [`ParseResult`] record.

use std::fmt::Write as _;

use crate::mission::{MissionResult, MissionStatus, ParseResult, Phase, PhaseKind};

/// Width of the label column in the text report.
const LABEL_WIDTH: usize = 17;

/// Format a duration in seconds.
///
/// Under a minute shows tenths (`42.5s`), under an hour minutes and seconds
/// (`3m 7s`), otherwise hours and minutes (`1h 2m`). Absent values show `-`.
pub fn format_duration(seconds: Option<f64>) -> String {
    let Some(sec) = seconds.filter(|s| s.is_finite()) else {
        return "-".to_string();
    };

    if sec < 60.0 {
        return format!("{:.1}s", sec);
    }

    let whole = sec as u64;
    let minutes = whole / 60;
    let secs = whole % 60;
    if minutes < 60 {
        return format!("{}m {}s", minutes, secs);
    }

    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Format a per-minute rate with two decimals.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) if r.is_finite() => format!("{:.2}", r),
        _ => "-".to_string(),
    }
}

/// Format an optional count.
pub fn format_count(count: Option<u32>) -> String {
    count.map_or_else(|| "-".to_string(), |c| c.to_string())
}

/// Format the phase breakdown, e.g. `wave 1: 3, wave 2: 5`.
pub fn format_phases(phases: &[Phase]) -> String {
    phases
        .iter()
        .map(|phase| {
            let kind = match phase.kind {
                PhaseKind::Wave => "wave",
                PhaseKind::Round => "round",
            };
            format!("{} {}: {}", kind, phase.index, phase.count)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the whole result as a plain-text report.
pub fn render_text(result: &ParseResult) -> String {
    let mut out = String::new();

    if result.missions.is_empty() {
        out.push_str("No valid missions found (all shorter than the minimum, or no Arbitration markers)\n");
    }

    for (i, mission) in result.missions.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_mission(&mut out, mission);
    }

    if !result.warnings.is_empty() {
        out.push('\n');
        for warning in &result.warnings {
            let _ = writeln!(out, "Note: {}", warning);
        }
    }

    out
}

fn render_mission(out: &mut String, mission: &MissionResult) {
    let _ = writeln!(out, "Mission {}", mission.index);

    if let Some(node) = &mission.node_id {
        field(out, "Node:", node);
    }
    if let Some(name) = &mission.mission_name {
        field(out, "Mission:", name);
    }
    field(out, "Total time:", &format_duration(mission.total_sec));
    field(out, "Enemies spawned:", &format_count(mission.spawned_at_end));
    field(out, "Shield drones:", &mission.shield_drone_count.to_string());
    field(out, "Drones/min:", &format_rate(mission.shield_drone_per_min));
    if !mission.phases.is_empty() {
        field(out, "Phases:", &format_phases(&mission.phases));
    }

    let status = match mission.status {
        MissionStatus::Ok => mission.status.as_str().to_string(),
        MissionStatus::Incomplete if mission.is_in_progress() => "in progress".to_string(),
        MissionStatus::Incomplete => mission.status.as_str().to_string(),
    };
    field(out, "Status:", &status);
}

fn field(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {:<width$}{}", label, value, width = LABEL_WIDTH);
}
