//! Result types produced by the mission parser.
//!
//! Everything here is plain data: finalized [`MissionResult`] records are
//! created once by the finalize step and never mutated afterwards, except
//! for the display `index` that windowing renumbers.

use serde::Serialize;

// ============================================================================
// Classification
// ============================================================================

/// Which recognized pattern opened a mission segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StartKind {
    /// `Mission name: <name> - 仲裁`
    MissionName,
    /// `Mission vote: <name> - 仲裁 ... <node>_EliteAlert`
    Vote,
}

impl StartKind {
    /// Stable lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            StartKind::MissionName => "missionName",
            StartKind::Vote => "vote",
        }
    }
}

/// How a mission subdivides into phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MissionKind {
    /// No phase marker seen.
    #[default]
    Unclassified,
    /// Waves (e.g. defense); three waves make one reward round.
    WaveBased,
    /// Rounds (e.g. interception).
    RoundBased,
}

impl MissionKind {
    /// Stable lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionKind::Unclassified => "unclassified",
            MissionKind::WaveBased => "waveBased",
            MissionKind::RoundBased => "roundBased",
        }
    }
}

/// Kind of a single phase entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    Wave,
    Round,
}

/// Whether a segment was closed by its explicit end marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MissionStatus {
    /// An end marker for the bound node was matched.
    Ok,
    /// Closed by end of input or by a new start marker.
    Incomplete,
}

impl MissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::Ok => "ok",
            MissionStatus::Incomplete => "incomplete",
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// Shield drone count for one wave or round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub kind: PhaseKind,
    /// 1-based phase number.
    pub index: u32,
    pub count: u32,
}

/// One finalized mission segment.
///
/// Times are seconds on the client log clock; durations are differences of
/// those. Optional fields are absent when their source markers were missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionResult {
    /// 1-based sequence number (renumbered after windowing).
    pub index: usize,
    pub node_id: Option<String>,
    pub mission_name: Option<String>,
    pub mission_kind: MissionKind,
    pub start_kind: StartKind,

    pub start_line: usize,
    /// Line of the last matching end marker.
    pub end_line: Option<usize>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    /// Raw marker-to-marker duration (end - start).
    pub duration_sec: Option<f64>,

    pub state_started_time: Option<f64>,
    pub state_ending_time: Option<f64>,
    /// Ending - started, or an in-progress estimate when ending is missing.
    pub state_duration_sec: Option<f64>,

    pub settlement_time: Option<f64>,
    /// Settlement - started.
    pub settlement_duration_sec: Option<f64>,

    /// Latest first-seen join time across clients.
    pub latest_client_join_time: Option<f64>,
    /// Time the last-joining client spent in the mission.
    pub client_session_sec: Option<f64>,

    /// Authoritative duration (see finalize priority).
    pub total_sec: Option<f64>,

    /// `Spawned N` payload of the last agent creation line.
    pub spawned_at_end: Option<u32>,
    pub first_spawn_time: Option<f64>,
    pub last_spawn_time: Option<f64>,
    pub spawn_span_sec: Option<f64>,

    pub shield_drone_count: u32,
    pub shield_drone_per_min: Option<f64>,

    pub wave_count: Option<u32>,
    pub round_count: u32,
    pub phases: Vec<Phase>,

    pub status: MissionStatus,
    pub note: Option<String>,
}

impl MissionResult {
    /// Whether any spawn signal was observed in the segment.
    pub fn has_spawn_signal(&self) -> bool {
        self.shield_drone_count > 0
            || self.spawned_at_end.is_some()
            || self.first_spawn_time.is_some()
    }

    /// An unterminated segment that reached the started state and shows
    /// spawn activity: the mission the player is (or was last) in.
    pub fn is_in_progress(&self) -> bool {
        self.status == MissionStatus::Incomplete
            && self.state_started_time.is_some()
            && self.has_spawn_signal()
    }
}

/// Output of a parse call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    /// The most recent valid missions, oldest first.
    pub missions: Vec<MissionResult>,
    /// Diagnostics; never errors.
    pub warnings: Vec<String>,
    /// Number of valid missions seen before windowing.
    pub valid_total: usize,
}
