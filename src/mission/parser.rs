//! Public parse entry points.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::accumulator::DEFAULT_BIND_WINDOW;
use super::error::ParseError;
use super::feeder::{feed_reader, DEFAULT_CHUNK_BYTES};
use super::machine::SegmentMachine;
use super::types::{MissionStatus, ParseResult};
use super::window::apply_window;

/// Default minimum mission duration in seconds.
pub const DEFAULT_MIN_DURATION_SEC: f64 = 60.0;

/// Default number of most recent missions to keep.
pub const DEFAULT_COUNT: usize = 2;

/// Options for a parse call.
///
/// Zero, negative or non-finite values fall back to the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Bytes read per chunk.
    pub chunk_bytes: usize,
    /// Minimum total duration for a mission to be valid.
    pub min_duration_sec: f64,
    /// Number of most recent valid missions to keep.
    pub count: usize,
    /// Lines after a start marker in which the node may be bound.
    pub bind_window: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            chunk_bytes: DEFAULT_CHUNK_BYTES,
            min_duration_sec: DEFAULT_MIN_DURATION_SEC,
            count: DEFAULT_COUNT,
            bind_window: DEFAULT_BIND_WINDOW,
        }
    }
}

impl ParseOptions {
    /// Copy with every out-of-range value replaced by its default.
    pub fn normalized(&self) -> Self {
        let defaults = Self::default();
        Self {
            chunk_bytes: if self.chunk_bytes > 0 {
                self.chunk_bytes
            } else {
                defaults.chunk_bytes
            },
            min_duration_sec: if self.min_duration_sec.is_finite() && self.min_duration_sec > 0.0 {
                self.min_duration_sec
            } else {
                defaults.min_duration_sec
            },
            count: if self.count > 0 {
                self.count
            } else {
                defaults.count
            },
            bind_window: if self.bind_window > 0 {
                self.bind_window
            } else {
                defaults.bind_window
            },
        }
    }
}

/// Parse a log from any reader.
///
/// `total_size` is only used for progress reporting; pass 0 when unknown.
/// Read errors abort the parse; no partial result is returned.
pub fn parse_reader<R: Read>(
    reader: R,
    total_size: u64,
    options: &ParseOptions,
    progress: Option<&mut dyn FnMut(f64)>,
) -> Result<ParseResult, ParseError> {
    let options = options.normalized();
    let mut machine = SegmentMachine::new(options.bind_window)?;

    let bytes = feed_reader(reader, total_size, options.chunk_bytes, progress, |line| {
        machine.push(line)
    })?;

    let output = machine.finish();
    let window = apply_window(output.results, options.min_duration_sec, options.count);

    let mut warnings = Vec::new();
    if output.starts_seen == 0 {
        warnings.push("No Arbitration mission start marker found in the log".to_string());
    } else if window.valid_total < options.count {
        warnings.push(format!(
            "Only {} valid mission(s) found (minimum duration {}s), fewer than the {} requested",
            window.valid_total, options.min_duration_sec, options.count
        ));
    }

    for mission in &window.missions {
        if mission.status == MissionStatus::Incomplete {
            let reason = mission.note.as_deref().unwrap_or("no end marker");
            warnings.push(format!("Mission {} is incomplete: {}", mission.index, reason));
        }
    }

    tracing::info!(
        bytes,
        starts = output.starts_seen,
        valid = window.valid_total,
        kept = window.missions.len(),
        "Parsed client log"
    );

    Ok(ParseResult {
        missions: window.missions,
        warnings,
        valid_total: window.valid_total,
    })
}

/// Parse a log file, reporting progress against its size on disk.
pub fn parse_file(
    path: impl AsRef<Path>,
    options: &ParseOptions,
    progress: Option<&mut dyn FnMut(f64)>,
) -> Result<ParseResult, ParseError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ParseError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let total_size = file.metadata()?.len();

    tracing::debug!(path = %path.display(), total_size, "Parsing log file");
    parse_reader(file, total_size, options, progress)
}

/// Parse an in-memory log.
pub fn parse_str(text: &str, options: &ParseOptions) -> Result<ParseResult, ParseError> {
    parse_reader(text.as_bytes(), text.len() as u64, options, None)
}
