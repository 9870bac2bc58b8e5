//! Arbitration mission segmentation engine
//!
//! This module turns the append-only, timestamp-prefixed client log into a
//! list of finalized mission records in a single streaming pass.
//!
//! # Structure
//!
//! - `feeder` - Chunked byte reading and incremental UTF-8 line splitting
//! - `line` - Borrowed line view and timestamp prefix parsing
//! - `markers` - Ordered grammar of named marker recognizers
//! - `accumulator` - State of the one open mission and its phase ledger
//! - `machine` - Reducer-style state machine over log lines
//! - `finalize` - Duration resolution and phase-count finalization
//! - `window` - Validity filter and most-recent-K selection
//! - `parser` - Public entry points tying everything together
//!
//! # Example
//!
//! ```
//! use arblog::{parse_str, ParseOptions};
//!
//! let log = "\
//! 10.0 Script [Info]: ThemedSquadOverlay.lua: Mission name: Hydron (Sedna) - Arbitration
//! 10.1 Script [Info]: ThemedSquadOverlay.lua: Host loading {\"name\":\"SolNode64_EliteAlert\"} with MissionInfo:
//! 20.0 Sys [Info]: GameRulesImpl - changing state from SS_WAITING_FOR_PLAYERS to SS_STARTED
//! 200.0 Sys [Info]: GameRulesImpl - changing state from SS_STARTED to SS_ENDING
//! 201.0 Script [Info]: Background.lua: EliteAlertMission at SolNode64
//! ";
//!
//! let result = parse_str(log, &ParseOptions::default())?;
//! assert_eq!(result.missions.len(), 1);
//! assert_eq!(result.missions[0].total_sec, Some(180.0));
//! # Ok::<(), arblog::ParseError>(())
//! ```

pub mod accumulator;
mod error;
pub mod feeder;
mod finalize;
pub mod line;
pub mod machine;
pub mod markers;
mod parser;
mod types;
pub mod window;

pub use accumulator::{MissionAccumulator, PhaseLedger, DEFAULT_BIND_WINDOW, MAX_WAVE};
pub use error::ParseError;
pub use feeder::{feed_reader, LineFeeder, DEFAULT_CHUNK_BYTES};
pub use line::{parse_time, LogLine};
pub use machine::{step, MachineOutput, SegmentMachine, Step};
pub use markers::{Marker, MarkerGrammar};
pub use parser::{
    parse_file, parse_reader, parse_str, ParseOptions, DEFAULT_COUNT, DEFAULT_MIN_DURATION_SEC,
};
pub use types::{
    MissionKind, MissionResult, MissionStatus, ParseResult, Phase, PhaseKind, StartKind,
};
