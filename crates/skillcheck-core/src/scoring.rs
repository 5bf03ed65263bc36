//! Step-score to percentage scoring engine.
//!
//! Pure functions shared by the live in-progress display and the final
//! submitted record: both call [`score_steps`] over the same mapping, so
//! the number on screen during an assessment is the number that lands in
//! the record.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Full performance score for a single step.
pub const FULL_SCORE: u8 = 2;

/// The computed result of scoring a step mapping against a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSheet {
    /// Sum of all recorded step scores.
    pub earned: u32,
    /// `total_steps * 2`.
    pub max_possible: u32,
    /// Integer percentage, rounded half-up; 0 when there are no steps.
    pub percentage: u32,
    /// Sorted indices of steps scored exactly 2 (legacy completion list).
    pub completed_indices: Vec<usize>,
    /// Dense scores, one entry per step; unscored steps are 0.
    pub step_scores: Vec<u8>,
}

/// Score a sparse step-index → score mapping against a checklist of
/// `total_steps` steps.
///
/// Each step is worth up to 2 points. Missing indices contribute 0. Every
/// provided score is summed into `earned`, so the caller is expected to
/// keep indices within range; the session layer validates this before the
/// mapping reaches the engine. Scores above 2 are clamped to 2 as a
/// hardening measure, not a contract callers should rely on.
pub fn score_steps(step_scores: &HashMap<usize, u8>, total_steps: usize) -> ScoreSheet {
    let max_possible = (total_steps as u32) * 2;

    let earned: u32 = step_scores
        .values()
        .map(|&s| u32::from(s.min(FULL_SCORE)))
        .sum();

    let mut completed_indices: Vec<usize> = step_scores
        .iter()
        .filter(|(_, &score)| score.min(FULL_SCORE) == FULL_SCORE)
        .map(|(&index, _)| index)
        .collect();
    completed_indices.sort_unstable();

    let step_scores_dense: Vec<u8> = (0..total_steps)
        .map(|i| step_scores.get(&i).map_or(0, |&s| s.min(FULL_SCORE)))
        .collect();

    ScoreSheet {
        earned,
        max_possible,
        percentage: percentage(earned, max_possible),
        completed_indices,
        step_scores: step_scores_dense,
    }
}

/// Round `earned / max_possible` to an integer percentage.
///
/// Round-half-up on the real value; 0 when nothing is attainable.
pub fn percentage(earned: u32, max_possible: u32) -> u32 {
    if max_possible == 0 {
        return 0;
    }
    (f64::from(earned) / f64::from(max_possible) * 100.0).round() as u32
}
