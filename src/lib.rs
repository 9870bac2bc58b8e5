//! arblog - Arbitration mission statistics from the game client log
//!
//! A Rust library that segments the client's `EE.log` into Arbitration
//! missions and aggregates per-mission metrics (durations, enemy spawns,
//! shield drone counts, wave/round breakdown) in a single streaming pass.

pub mod cli;
pub mod config;
pub mod mission;
pub mod progress;
pub mod report;

pub use config::Config;
pub use mission::{
    parse_file, parse_reader, parse_str, MissionKind, MissionResult, MissionStatus, ParseError,
    ParseOptions, ParseResult, Phase, PhaseKind, StartKind,
};
