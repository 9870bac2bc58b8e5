//! Validity windowing.
//!
//! A mission is valid when its total duration reaches the minimum, or when
//! it is the in-progress mission. Only the most recent `count` valid
//! missions are kept, renumbered from 1 in their original order.

use super::types::MissionResult;

/// Outcome of windowing a result list.
#[derive(Debug, Default, PartialEq)]
pub struct Window {
    /// Kept missions, oldest first.
    pub missions: Vec<MissionResult>,
    /// Valid missions before the most-recent-K cut.
    pub valid_total: usize,
}

/// Whether a finalized mission passes the duration filter.
pub fn is_valid(result: &MissionResult, min_duration_sec: f64) -> bool {
    result.is_in_progress() || result.total_sec.is_some_and(|total| total >= min_duration_sec)
}

/// Filter `results` by validity and keep the last `count`.
pub fn apply_window(results: Vec<MissionResult>, min_duration_sec: f64, count: usize) -> Window {
    let mut valid: Vec<MissionResult> = results
        .into_iter()
        .filter(|r| is_valid(r, min_duration_sec))
        .collect();

    let valid_total = valid.len();
    let skip = valid_total.saturating_sub(count);
    valid.drain(..skip);

    for (i, mission) in valid.iter_mut().enumerate() {
        mission.index = i + 1;
    }

    Window {
        missions: valid,
        valid_total,
    }
}
