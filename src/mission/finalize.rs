//! Turning a closed accumulator into a [`MissionResult`].
//!
//! Durations come from several clocks that disagree in practice. The
//! authoritative `total_sec` is the first positive value, in order, of:
//!
//! 1. settlement duration (`settlement - started`)
//! 2. state duration (`ending - started`, or an in-progress estimate)
//! 3. spawn span (`last_spawn - first_spawn`)
//! 4. raw marker duration (`end - start`)

use super::accumulator::{MissionAccumulator, PhaseLedger};
use super::types::{MissionKind, MissionResult, MissionStatus, Phase, PhaseKind};

/// Waves per reward round in wave-based missions.
const WAVES_PER_ROUND: u32 = 3;

/// Why a segment was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closure {
    /// A new start marker at the given line.
    NewStart { line: usize },
    /// The input ended.
    EndOfInput,
}

/// Finalize a closed segment.
///
/// The returned `index` is 0; the caller numbers results as it collects them.
pub fn finalize(acc: MissionAccumulator, closure: Closure) -> MissionResult {
    let status = if acc.has_end_marker() {
        MissionStatus::Ok
    } else {
        MissionStatus::Incomplete
    };

    let started = acc.started.map(|s| s.time);
    let ending = acc.ending.map(|s| s.time);
    let settlement = acc.settlement.map(|s| s.time);
    let in_progress_end = acc.end_time.or(acc.last_seen_time);

    let duration_sec = diff(acc.end_time, acc.start_time);
    let state_duration_sec = diff(ending.or(in_progress_end), started);
    let settlement_duration_sec = diff(settlement, started);
    let spawn_span_sec = diff(acc.last_spawn_time, acc.first_spawn_time);

    let total_sec = [
        settlement_duration_sec,
        state_duration_sec,
        spawn_span_sec,
        duration_sec,
    ]
    .into_iter()
    .flatten()
    .find(|v| is_positive(*v));

    let latest_client_join_time = acc.latest_client_join();
    let client_session_sec = diff(
        settlement.or(ending).or(in_progress_end),
        latest_client_join_time,
    )
    .filter(|v| is_positive(*v));

    let shield_drone_per_min = total_sec.map(|total| acc.shield_drone_count as f64 / (total / 60.0));

    let (wave_count, round_count, phases) = resolve_phases(acc.mission_kind, &acc.ledger);

    let note = build_note(&acc, status, closure);

    MissionResult {
        index: 0,
        node_id: acc.node_id,
        mission_name: acc.mission_name,
        mission_kind: acc.mission_kind,
        start_kind: acc.start_kind,
        start_line: acc.start_line,
        end_line: acc.end_line,
        start_time: acc.start_time,
        end_time: acc.end_time,
        duration_sec,
        state_started_time: started,
        state_ending_time: ending,
        state_duration_sec,
        settlement_time: settlement,
        settlement_duration_sec,
        latest_client_join_time,
        client_session_sec,
        total_sec,
        spawned_at_end: acc.last_spawned,
        first_spawn_time: acc.first_spawn_time,
        last_spawn_time: acc.last_spawn_time,
        spawn_span_sec,
        shield_drone_count: acc.shield_drone_count,
        shield_drone_per_min,
        wave_count,
        round_count,
        phases,
        status,
        note,
    }
}

/// `a - b` when both are present and the result is finite.
fn diff(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    let value = a? - b?;
    value.is_finite().then_some(value)
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Wave count, round count and phase list for a segment.
pub(crate) fn resolve_phases(
    kind: MissionKind,
    ledger: &PhaseLedger,
) -> (Option<u32>, u32, Vec<Phase>) {
    if kind == MissionKind::WaveBased {
        let wave_count = ledger
            .max_wave()
            .unwrap_or(ledger.counts().len() as u32);
        let round_count =
            wave_count / WAVES_PER_ROUND + u32::from(wave_count % WAVES_PER_ROUND != 0);
        let phases = phase_list(PhaseKind::Wave, ledger.counts(), wave_count);
        return (Some(wave_count), round_count, phases);
    }

    let ledger_len = ledger.counts().len() as u32;
    let round_count = if ledger.completed_rounds() > 0 {
        ledger.completed_rounds()
    } else if ledger_len > 0 {
        ledger_len
    } else if ledger.pending() > 0 {
        1
    } else {
        0
    };

    let phases = if ledger.counts().is_empty() && ledger.pending() > 0 {
        vec![Phase {
            kind: PhaseKind::Round,
            index: 1,
            count: ledger.pending(),
        }]
    } else {
        phase_list(PhaseKind::Round, ledger.counts(), round_count)
    };

    (None, round_count, phases)
}

/// First `len` ledger entries as phases, padding missing entries with zero.
fn phase_list(kind: PhaseKind, counts: &[u32], len: u32) -> Vec<Phase> {
    (1..=len)
        .map(|index| Phase {
            kind,
            index,
            count: counts.get(index as usize - 1).copied().unwrap_or(0),
        })
        .collect()
}

fn build_note(acc: &MissionAccumulator, status: MissionStatus, closure: Closure) -> Option<String> {
    let mut parts = Vec::new();

    if status == MissionStatus::Incomplete {
        parts.push(match closure {
            Closure::NewStart { line } => {
                format!("closed by a new start marker at line {line} without an end marker")
            }
            Closure::EndOfInput => "reached end of log without an end marker".to_string(),
        });
    }

    match (acc.node_id.as_deref(), acc.node_bound_line) {
        (None, _) => parts.push("no node bound; end marker cannot match".to_string()),
        (Some(node), Some(line)) if line > acc.start_line + 1 => parts.push(format!(
            "node {node} bound from line {line}, {} lines after the start marker",
            line - acc.start_line
        )),
        _ => {}
    }

    (!parts.is_empty()).then(|| parts.join("; "))
}
