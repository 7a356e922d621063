//! Scoring module - line score, level bookkeeping and turn length
//!
//! Each cleared row or column is scored on its own:
//! `lines * blocks * POINTS_PER_BLOCK * multiplier`. Levels are tracked
//! incrementally against a threshold that advances in `LEVEL_THRESHOLD` steps,
//! never recomputed from the score.

use crate::types::{BASE_TURN_MS, LEVEL_THRESHOLD, MIN_TURN_MS, POINTS_PER_BLOCK, TURN_STEP_MS};

/// Score for clearing `lines` lines of `blocks` cells each at `multiplier`
///
/// # Examples
///
/// ```
/// use tetrecs_core::line_score;
///
/// assert_eq!(line_score(1, 5, 1), 50);
/// assert_eq!(line_score(1, 5, 3), 150);
/// ```
pub fn line_score(lines: u32, blocks: u32, multiplier: u32) -> u32 {
    lines
        .saturating_mul(blocks)
        .saturating_mul(POINTS_PER_BLOCK)
        .saturating_mul(multiplier)
}

/// Turn length at a level: `max(MIN_TURN_MS, BASE_TURN_MS - TURN_STEP_MS * level)`
pub fn turn_delay_ms(level: u32) -> u64 {
    BASE_TURN_MS
        .saturating_sub(TURN_STEP_MS.saturating_mul(level as u64))
        .max(MIN_TURN_MS)
}

/// Incremental level tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelTracker {
    level: u32,
    /// Score at which the current level was reached
    threshold: u32,
}

impl LevelTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Account for the running score; returns how many levels were gained
    ///
    /// A single jump across several thresholds gains one level per threshold.
    pub fn observe(&mut self, score: u32) -> u32 {
        let mut gained = 0;
        while score.saturating_sub(self.threshold) >= LEVEL_THRESHOLD {
            self.level += 1;
            self.threshold += LEVEL_THRESHOLD;
            gained += 1;
        }
        gained
    }
}
