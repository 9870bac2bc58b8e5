//! State of the one open mission segment.
//!
//! The accumulator collects lifecycle markers, spawn counters, the phase
//! ledger and client join times while lines stream past. It never looks
//! ahead; everything that depends on the whole segment is resolved later by
//! the finalize step.
//!
//! # Counting gate
//!
//! Spawn events, phase markers and the settlement marker only count between
//! the `SS_STARTED` transition and the first `SS_ENDING` transition. Lobby
//! and vote chatter before the mission starts can look exactly like
//! in-mission events, so nothing is counted before `started` is set.

use std::collections::HashMap;

use super::line::LogLine;
use super::markers::Marker;
use super::types::{MissionKind, StartKind};

/// Lines after the start marker in which the node binding may appear.
pub const DEFAULT_BIND_WINDOW: usize = 15;

/// Highest wave index accepted from the log. Larger values are treated as
/// a malformed payload.
pub const MAX_WAVE: u32 = 1000;

/// A marker occurrence: line number and timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stamp {
    pub line: usize,
    pub time: f64,
}

// ============================================================================
// Phase ledger
// ============================================================================

/// Per-phase shield drone counts.
///
/// Phases are 1-based. Counts seen before the first phase boundary go to
/// the `pending` bucket, which is folded into phase 1 exactly once when the
/// first boundary (wave or round) is recognized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseLedger {
    pub(crate) counts: Vec<u32>,
    pub(crate) pending: u32,
    /// 1-based phase currently receiving counts.
    pub(crate) active: Option<u32>,
    pub(crate) completed_rounds: u32,
    pub(crate) max_wave: Option<u32>,
    pub(crate) primary_round_seen: bool,
    folded: bool,
}

impl PhaseLedger {
    /// Attribute one counted spawn to the active phase (or pending).
    pub fn record_spawn(&mut self) {
        match self.active {
            Some(phase) => {
                self.ensure_len(phase as usize);
                self.counts[phase as usize - 1] += 1;
            }
            None => self.pending += 1,
        }
    }

    /// Wave `index` started. Returns false when the index is 0 or above
    /// [`MAX_WAVE`]; such markers are ignored.
    pub fn record_wave(&mut self, index: u32) -> bool {
        if index == 0 || index > MAX_WAVE {
            return false;
        }
        self.fold_pending();
        self.max_wave = Some(self.max_wave.map_or(index, |max| max.max(index)));
        self.ensure_len(index as usize);
        self.active = Some(index);
        true
    }

    /// A round ended; the next round becomes active.
    pub fn record_round_boundary(&mut self) {
        self.fold_pending();
        self.completed_rounds += 1;
        let next = self.completed_rounds + 1;
        self.ensure_len(next as usize);
        self.active = Some(next);
    }

    /// A round ended in a wave-based mission; waves keep the active phase.
    pub fn count_round_boundary(&mut self) {
        self.fold_pending();
        self.completed_rounds += 1;
    }

    /// Counts per phase, including speculative trailing entries.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Counts not yet attributed to any phase.
    pub fn pending(&self) -> u32 {
        self.pending
    }

    pub fn completed_rounds(&self) -> u32 {
        self.completed_rounds
    }

    pub fn max_wave(&self) -> Option<u32> {
        self.max_wave
    }

    fn fold_pending(&mut self) {
        if self.folded {
            return;
        }
        self.folded = true;
        self.ensure_len(1);
        self.counts[0] += self.pending;
        self.pending = 0;
    }

    fn ensure_len(&mut self, len: usize) {
        if self.counts.len() < len {
            self.counts.resize(len, 0);
        }
    }
}

// ============================================================================
// Accumulator
// ============================================================================

/// The currently open mission segment.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionAccumulator {
    pub(crate) start_kind: StartKind,
    pub(crate) start_line: usize,
    pub(crate) start_time: Option<f64>,
    pub(crate) mission_name: Option<String>,
    pub(crate) node_id: Option<String>,
    /// Line the node was bound on (`None` when it came with the start marker).
    pub(crate) node_bound_line: Option<usize>,
    pub(crate) bind_window: usize,
    pub(crate) mission_kind: MissionKind,

    pub(crate) started: Option<Stamp>,
    pub(crate) ending: Option<Stamp>,
    pub(crate) end_line: Option<usize>,
    pub(crate) end_time: Option<f64>,
    pub(crate) settlement: Option<Stamp>,
    pub(crate) last_seen_time: Option<f64>,

    pub(crate) shield_drone_count: u32,
    pub(crate) last_spawned: Option<u32>,
    pub(crate) first_spawn_time: Option<f64>,
    pub(crate) last_spawn_time: Option<f64>,

    pub(crate) ledger: PhaseLedger,
    /// Client identity -> first seen join time.
    pub(crate) client_joins: HashMap<String, f64>,
}

impl MissionAccumulator {
    /// Open a segment on a start marker line.
    pub fn open(
        kind: StartKind,
        name: Option<&str>,
        node: Option<&str>,
        line: &LogLine<'_>,
        bind_window: usize,
    ) -> Self {
        let start_time = line.time();
        Self {
            start_kind: kind,
            start_line: line.number,
            start_time,
            mission_name: name.map(str::to_string),
            node_id: node.map(str::to_string),
            node_bound_line: None,
            bind_window,
            mission_kind: MissionKind::Unclassified,
            started: None,
            ending: None,
            end_line: None,
            end_time: None,
            settlement: None,
            last_seen_time: start_time,
            shield_drone_count: 0,
            last_spawned: None,
            first_spawn_time: None,
            last_spawn_time: None,
            ledger: PhaseLedger::default(),
            client_joins: HashMap::new(),
        }
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref()
    }

    pub fn mission_kind(&self) -> MissionKind {
        self.mission_kind
    }

    pub fn ledger(&self) -> &PhaseLedger {
        &self.ledger
    }

    pub fn shield_drone_count(&self) -> u32 {
        self.shield_drone_count
    }

    /// Whether `SS_STARTED` was seen.
    pub fn has_started(&self) -> bool {
        self.started.is_some()
    }

    /// Whether an end marker for the bound node was matched.
    pub fn has_end_marker(&self) -> bool {
        self.end_line.is_some()
    }

    /// A segment that never reached `SS_STARTED`: a vote or lobby candidate
    /// that is dropped instead of finalized.
    pub fn is_false_start(&self) -> bool {
        !self.has_started()
    }

    /// Whether spawn events and phase markers currently count.
    pub fn counting_active(&self) -> bool {
        self.started.is_some() && self.ending.is_none()
    }

    /// Latest first-seen join time across all clients.
    pub fn latest_client_join(&self) -> Option<f64> {
        self.client_joins.values().copied().reduce(f64::max)
    }

    /// Apply one non-start line and the markers recognized on it.
    pub fn observe(&mut self, line: &LogLine<'_>, markers: &[Marker<'_>]) {
        let time = line.time();
        if time.is_some() {
            self.last_seen_time = time;
        }

        for marker in markers {
            self.apply(marker, line.number, time);
        }
    }

    fn apply(&mut self, marker: &Marker<'_>, line: usize, time: Option<f64>) {
        match *marker {
            // Start markers are handled by the state machine
            Marker::Start { .. } => {}
            Marker::NodeBinding { node } => self.bind_node(node, line),
            Marker::End { node } => {
                if self.node_id.as_deref() == Some(node) {
                    self.end_line = Some(line);
                    self.end_time = time;
                }
            }
            Marker::StateStarted => {
                if self.started.is_none() {
                    if let Some(time) = time {
                        self.started = Some(Stamp { line, time });
                    }
                }
            }
            Marker::StateEnding => {
                if let (true, Some(time)) = (self.started.is_some(), time) {
                    self.ending = Some(Stamp { line, time });
                }
            }
            Marker::Settlement => {
                if let (true, Some(time)) = (self.counting_active(), time) {
                    self.settlement = Some(Stamp { line, time });
                }
            }
            Marker::ClientJoin { client, node } => self.record_join(client, node, time),
            Marker::Wave { index } => {
                if self.counting_active() && self.ledger.record_wave(index) {
                    self.mission_kind = MissionKind::WaveBased;
                }
            }
            Marker::RoundBoundary { primary } => {
                if self.counting_active() {
                    self.record_round_boundary(primary);
                }
            }
            Marker::ShieldDrone => {
                if self.counting_active() {
                    self.shield_drone_count += 1;
                    self.ledger.record_spawn();
                }
            }
            Marker::Spawn { spawned } => {
                if self.counting_active() {
                    if let Some(time) = time {
                        self.first_spawn_time.get_or_insert(time);
                        self.last_spawn_time = Some(time);
                    }
                    if spawned.is_some() {
                        self.last_spawned = spawned;
                    }
                }
            }
        }
    }

    fn bind_node(&mut self, node: &str, line: usize) {
        if self.node_id.is_some() {
            return;
        }
        if line.saturating_sub(self.start_line) > self.bind_window {
            return;
        }
        tracing::trace!(node, line, start_line = self.start_line, "Bound mission node");
        self.node_id = Some(node.to_string());
        self.node_bound_line = Some(line);
    }

    fn record_join(&mut self, client: &str, node: Option<&str>, time: Option<f64>) {
        if self.ending.is_some() {
            return;
        }
        let Some(time) = time else {
            return;
        };
        if let Some(node) = node {
            if self.node_id.as_deref() != Some(node) {
                return;
            }
        }
        self.client_joins.entry(client.to_string()).or_insert(time);
    }

    /// The primary marker always counts. The reward-screen fallback is
    /// shared by wave missions, so it is only trusted while no primary round
    /// marker was seen and the mission is not wave-based.
    ///
    /// A wave-based mission stays wave-based: the boundary is counted but
    /// waves keep ownership of the phase ledger.
    fn record_round_boundary(&mut self, primary: bool) {
        let wave_based = self.mission_kind == MissionKind::WaveBased;
        if primary {
            self.ledger.primary_round_seen = true;
        } else if self.ledger.primary_round_seen || wave_based {
            return;
        }

        if wave_based {
            self.ledger.count_round_boundary();
            return;
        }

        self.mission_kind = MissionKind::RoundBased;
        self.ledger.record_round_boundary();
    }
}
