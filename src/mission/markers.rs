//! Marker grammar for the client log.
//!
//! The grammar is a small ordered table of named recognizers. A single
//! [`RegexSet`] pass finds which recognizers fire on a line; only those run
//! their capturing regex to extract payloads. One line may produce several
//! markers (a shield drone spawn is also a generic spawn).
//!
//! # Recognized lines
//!
//! ```text
//! Script [Info]: ThemedSquadOverlay.lua: Mission name: <name> - 仲裁           start (mission name)
//! Script [Info]: ThemedSquadOverlay.lua: Mission vote: <name> - 仲裁 ... <node>_EliteAlert   start (vote)
//! Script [Info]: ThemedSquadOverlay.lua: Host loading {"name":"<node>_EliteAlert"} ...     node binding
//! Script [Info]: Background.lua: EliteAlertMission at <node>                 end
//! GameRulesImpl - changing state from SS_WAITING_FOR_PLAYERS to SS_STARTED   started
//! GameRulesImpl - changing state from SS_STARTED to SS_ENDING                ending
//! Script [Info]: EndOfMatch.lua: Initialize                                  settlement
//! Script [Info]: ExtractionTimer.lua: EOM: All players extracting            settlement
//! Net [Info]: Join in progress: <client> for <node>_EliteAlert               client join
//! Net [Info]: Server sending level <node>_EliteAlert to client <client>      client join
//! Net [Info]: Player connected: <client> (slot <n>)                          client join (n != 0)
//! Script [Info]: WaveDefend.lua: Starting wave <n>                           wave
//! Script [Info]: TerritoryMission.lua: New round transmission                round (primary)
//! Script [Info]: MissionRewardScreen.lua: Reward transition out              round (fallback)
//! AI [Info]: OnAgentCreated /Npc/CorpusEliteShieldDroneAgent<n>              shield drone spawn
//! AI [Info]: OnAgentCreated ... Spawned <n>                                  generic spawn
//! ```

use regex::{Regex, RegexSet};

use super::accumulator::DEFAULT_BIND_WINDOW;
use super::error::ParseError;
use super::types::StartKind;

/// A recognized marker on a single log line.
///
/// Payloads borrow from the line text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker<'a> {
    /// A mission announcement opening a new segment.
    Start {
        kind: StartKind,
        name: Option<&'a str>,
        node: Option<&'a str>,
    },
    /// The host announcing which node it is loading.
    NodeBinding { node: &'a str },
    /// Mission completion at a node.
    End { node: &'a str },
    /// `SS_WAITING_FOR_PLAYERS -> SS_STARTED`
    StateStarted,
    /// `SS_STARTED -> SS_ENDING`
    StateEnding,
    /// Mission-complete or extraction UI appeared.
    Settlement,
    /// A client joined the session. `node` is set for node-bound variants.
    ClientJoin {
        client: &'a str,
        node: Option<&'a str>,
    },
    /// A wave started (wave-based missions).
    Wave { index: u32 },
    /// A round boundary; `primary` is false for the reward-screen fallback.
    RoundBoundary { primary: bool },
    /// A shield drone spawned.
    ShieldDrone,
    /// Any agent spawned; `spawned` is the running spawn counter if printed.
    Spawn { spawned: Option<u32> },
}

/// Identifies a recognizer in the grammar table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecognizerKind {
    StartMissionName,
    StartVote,
    HostLoading,
    End,
    StateStarted,
    StateEnding,
    SettlementEndOfMatch,
    SettlementExtraction,
    JoinInProgress,
    JoinSendLevel,
    JoinPlayerConnect,
    Wave,
    RoundTransmission,
    RewardTransition,
    ShieldDrone,
    Spawn,
}

/// Ordered grammar table: name, kind, pattern.
const GRAMMAR: &[(&str, RecognizerKind, &str)] = &[
    (
        "start.mission_name",
        RecognizerKind::StartMissionName,
        r"Script \[Info\]: ThemedSquadOverlay\.lua: Mission name:\s*(.+?)\s*-\s*(?:仲裁|Arbitration)",
    ),
    (
        "start.vote",
        RecognizerKind::StartVote,
        r"Script \[Info\]: ThemedSquadOverlay\.lua: Mission vote:\s*(.+?)\s*-\s*(?:仲裁|Arbitration)",
    ),
    (
        "node.host_loading",
        RecognizerKind::HostLoading,
        r#"Script \[Info\]: ThemedSquadOverlay\.lua: Host loading .*"name":"([^"]+)_EliteAlert""#,
    ),
    (
        "end.elite_alert",
        RecognizerKind::End,
        r"Script \[Info\]: Background\.lua: EliteAlertMission at ([A-Za-z0-9_]+)\b",
    ),
    (
        "state.started",
        RecognizerKind::StateStarted,
        r"GameRulesImpl - changing state from SS_WAITING_FOR_PLAYERS to SS_STARTED",
    ),
    (
        "state.ending",
        RecognizerKind::StateEnding,
        r"GameRulesImpl - changing state from SS_STARTED to SS_ENDING",
    ),
    (
        "settlement.end_of_match",
        RecognizerKind::SettlementEndOfMatch,
        r"Script \[Info\]: EndOfMatch\.lua: Initialize\b",
    ),
    (
        "settlement.extraction",
        RecognizerKind::SettlementExtraction,
        r"Script \[Info\]: ExtractionTimer\.lua: EOM: All players extracting",
    ),
    (
        "join.in_progress",
        RecognizerKind::JoinInProgress,
        r"Net \[Info\]: Join in progress: (\S+) for ([A-Za-z0-9_]+?)_EliteAlert\b",
    ),
    (
        "join.send_level",
        RecognizerKind::JoinSendLevel,
        r"Net \[Info\]: Server sending level ([A-Za-z0-9_]+?)_EliteAlert to client (\S+)",
    ),
    (
        "join.player_connect",
        RecognizerKind::JoinPlayerConnect,
        r"Net \[Info\]: Player connected: (\S+) \(slot (\d+)\)",
    ),
    (
        "phase.wave",
        RecognizerKind::Wave,
        r"Script \[Info\]: WaveDefend\.lua: Starting wave (\d+)\b",
    ),
    (
        "phase.round_transmission",
        RecognizerKind::RoundTransmission,
        r"Script \[Info\]: TerritoryMission\.lua: New round transmission",
    ),
    (
        "phase.reward_transition",
        RecognizerKind::RewardTransition,
        r"Script \[Info\]: MissionRewardScreen\.lua: Reward transition out",
    ),
    (
        "spawn.shield_drone",
        RecognizerKind::ShieldDrone,
        r"AI \[Info\]: OnAgentCreated /Npc/CorpusEliteShieldDroneAgent\d*\b",
    ),
    (
        "spawn.any",
        RecognizerKind::Spawn,
        r"AI \[Info\]: OnAgentCreated\b",
    ),
];

/// Node reference embedded in vote lines.
const NODE_REF_PATTERN: &str = r"([A-Za-z0-9_]+?)_EliteAlert\b";

/// Running spawn counter printed on agent creation lines.
const SPAWNED_PATTERN: &str = r"\bSpawned\s+(\d+)\b";

struct Recognizer {
    kind: RecognizerKind,
    regex: Regex,
}

/// Compiled marker grammar.
///
/// Built once per parse call and shared read-only by the state machine.
/// Also carries the node binding window: how many lines after a start
/// marker the host loading line may still bind the node.
pub struct MarkerGrammar {
    set: RegexSet,
    recognizers: Vec<Recognizer>,
    node_ref: Regex,
    spawned: Regex,
    bind_window: usize,
}

impl MarkerGrammar {
    /// Compile the grammar table.
    pub fn new() -> Result<Self, ParseError> {
        let set = RegexSet::new(GRAMMAR.iter().map(|(_, _, pattern)| *pattern)).map_err(
            |source| ParseError::Grammar {
                name: "grammar",
                source,
            },
        )?;

        let recognizers = GRAMMAR
            .iter()
            .map(|(name, kind, pattern)| {
                Ok(Recognizer {
                    kind: *kind,
                    regex: compile(name, pattern)?,
                })
            })
            .collect::<Result<Vec<_>, ParseError>>()?;

        Ok(Self {
            set,
            recognizers,
            node_ref: compile("node_ref", NODE_REF_PATTERN)?,
            spawned: compile("spawned", SPAWNED_PATTERN)?,
            bind_window: DEFAULT_BIND_WINDOW,
        })
    }

    /// Set the node binding window. Zero keeps the default.
    pub fn with_bind_window(mut self, lines: usize) -> Self {
        if lines > 0 {
            self.bind_window = lines;
        }
        self
    }

    /// Lines after a start marker in which a node binding is accepted.
    pub fn bind_window(&self) -> usize {
        self.bind_window
    }

    /// Names of all recognizers, in table order.
    pub fn recognizer_names() -> impl Iterator<Item = &'static str> {
        GRAMMAR.iter().map(|(name, _, _)| *name)
    }

    /// Recognize every marker on `line`, in table order.
    pub fn classify<'a>(&self, line: &'a str) -> Vec<Marker<'a>> {
        let matches = self.set.matches(line);
        if !matches.matched_any() {
            return Vec::new();
        }

        matches
            .iter()
            .filter_map(|index| self.build(&self.recognizers[index], line))
            .collect()
    }

    fn build<'a>(&self, recognizer: &Recognizer, line: &'a str) -> Option<Marker<'a>> {
        let caps = recognizer.regex.captures(line)?;
        let group = |i: usize| caps.get(i).map(|m| m.as_str());

        let marker = match recognizer.kind {
            RecognizerKind::StartMissionName => Marker::Start {
                kind: StartKind::MissionName,
                name: group(1).map(str::trim).filter(|s| !s.is_empty()),
                node: None,
            },
            RecognizerKind::StartVote => {
                let rest = &line[caps.get(0)?.end()..];
                Marker::Start {
                    kind: StartKind::Vote,
                    name: group(1).map(str::trim).filter(|s| !s.is_empty()),
                    node: self
                        .node_ref
                        .captures(rest)
                        .and_then(|c| c.get(1))
                        .map(|m| m.as_str()),
                }
            }
            RecognizerKind::HostLoading => Marker::NodeBinding { node: group(1)? },
            RecognizerKind::End => Marker::End { node: group(1)? },
            RecognizerKind::StateStarted => Marker::StateStarted,
            RecognizerKind::StateEnding => Marker::StateEnding,
            RecognizerKind::SettlementEndOfMatch | RecognizerKind::SettlementExtraction => {
                Marker::Settlement
            }
            RecognizerKind::JoinInProgress => Marker::ClientJoin {
                client: group(1)?,
                node: group(2),
            },
            RecognizerKind::JoinSendLevel => Marker::ClientJoin {
                client: group(2)?,
                node: group(1),
            },
            RecognizerKind::JoinPlayerConnect => {
                let slot: u32 = group(2)?.parse().ok()?;
                if slot == 0 {
                    return None;
                }
                Marker::ClientJoin {
                    client: group(1)?,
                    node: None,
                }
            }
            RecognizerKind::Wave => Marker::Wave {
                index: group(1)?.parse().ok()?,
            },
            RecognizerKind::RoundTransmission => Marker::RoundBoundary { primary: true },
            RecognizerKind::RewardTransition => Marker::RoundBoundary { primary: false },
            RecognizerKind::ShieldDrone => Marker::ShieldDrone,
            RecognizerKind::Spawn => Marker::Spawn {
                spawned: self
                    .spawned
                    .captures(line)
                    .and_then(|c| c.get(1))
                    .and_then(|m| m.as_str().parse().ok()),
            },
        };

        Some(marker)
    }
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex, ParseError> {
    Regex::new(pattern).map_err(|source| ParseError::Grammar { name, source })
}
