//! Segment state machine.
//!
//! [`step`] is a pure reducer over one line: it takes the current open
//! segment (if any) and returns the next one plus whatever segment the line
//! closed. [`SegmentMachine`] drives it over a stream and collects results.

use super::accumulator::MissionAccumulator;
use super::error::ParseError;
use super::finalize::{finalize, Closure};
use super::line::LogLine;
use super::markers::{Marker, MarkerGrammar};
use super::types::MissionResult;

/// Outcome of feeding one line.
#[derive(Debug)]
pub struct Step {
    /// Segment open after the line.
    pub state: Option<MissionAccumulator>,
    /// Segment closed by the line. Its `index` is assigned by the caller.
    pub emitted: Option<MissionResult>,
}

/// Advance the state machine by one line.
///
/// A start marker closes the open segment (or discards it when it never
/// reached `SS_STARTED`) and opens a new one. Other lines are applied to
/// the open segment; without one they are ignored.
pub fn step(state: Option<MissionAccumulator>, line: &LogLine<'_>, grammar: &MarkerGrammar) -> Step {
    let markers = grammar.classify(line.text);

    let start = markers.iter().find_map(|marker| match *marker {
        Marker::Start { kind, name, node } => Some((kind, name, node)),
        _ => None,
    });

    if let Some((kind, name, node)) = start {
        let emitted = match state {
            Some(acc) if acc.is_false_start() => {
                tracing::debug!(
                    start_line = acc.start_line(),
                    line = line.number,
                    "Discarded segment that never started"
                );
                None
            }
            Some(acc) => Some(finalize(acc, Closure::NewStart { line: line.number })),
            None => None,
        };

        tracing::debug!(line = line.number, kind = kind.as_str(), ?name, ?node, "Opened mission segment");
        let acc = MissionAccumulator::open(kind, name, node, line, grammar.bind_window());
        return Step {
            state: Some(acc),
            emitted,
        };
    }

    let state = state.map(|mut acc| {
        acc.observe(line, &markers);
        acc
    });

    Step {
        state,
        emitted: None,
    }
}

/// Drives [`step`] over a line stream and finalizes closed segments.
pub struct SegmentMachine {
    grammar: MarkerGrammar,
    state: Option<MissionAccumulator>,
    results: Vec<MissionResult>,
    starts_seen: usize,
}

/// Everything the machine produced for one input.
#[derive(Debug, Default)]
pub struct MachineOutput {
    /// Finalized segments in log order.
    pub results: Vec<MissionResult>,
    /// Number of start markers encountered.
    pub starts_seen: usize,
}

impl SegmentMachine {
    /// Create a machine with the default grammar and the given binding window.
    pub fn new(bind_window: usize) -> Result<Self, ParseError> {
        Ok(Self::with_grammar(
            MarkerGrammar::new()?.with_bind_window(bind_window),
        ))
    }

    /// Create a machine around an already-built grammar.
    pub fn with_grammar(grammar: MarkerGrammar) -> Self {
        Self {
            grammar,
            state: None,
            results: Vec::new(),
            starts_seen: 0,
        }
    }

    /// Feed one line.
    pub fn push(&mut self, line: LogLine<'_>) {
        let Step { state, emitted } = step(self.state.take(), &line, &self.grammar);

        if state
            .as_ref()
            .is_some_and(|acc| acc.start_line() == line.number)
        {
            self.starts_seen += 1;
        }
        self.state = state;

        if let Some(result) = emitted {
            self.record(result);
        }
    }

    /// Close the open segment (if any) and return all results.
    ///
    /// A segment that never started is dropped here as well.
    pub fn finish(mut self) -> MachineOutput {
        match self.state.take() {
            Some(acc) if acc.is_false_start() => {
                tracing::debug!(
                    start_line = acc.start_line(),
                    "Dropped segment at end of input that never started"
                );
            }
            Some(acc) => self.record(finalize(acc, Closure::EndOfInput)),
            None => {}
        }

        MachineOutput {
            results: self.results,
            starts_seen: self.starts_seen,
        }
    }

    fn record(&mut self, mut result: MissionResult) {
        result.index = self.results.len() + 1;
        tracing::debug!(
            index = result.index,
            start_line = result.start_line,
            status = result.status.as_str(),
            total_sec = ?result.total_sec,
            "Recorded mission segment"
        );
        self.results.push(result);
    }
}
