//! Scoring module - points for popped groups and level pacing
//!
//! Each popped group is worth `size * points_per_cell`. Groups are scored
//! independently, including groups popped later in the same chain; there is
//! no chain multiplier.

use crate::types::GameConfig;

/// Points per level step
pub const POINTS_PER_LEVEL: u32 = 1000;

/// Gravity interval at level 1 (ms)
pub const BASE_DROP_INTERVAL_MS: u32 = 500;

/// Interval reduction per level (ms)
pub const DROP_INTERVAL_STEP_MS: u32 = 50;

/// Fastest interval the pacing table returns (ms)
pub const DROP_INTERVAL_MIN_MS: u32 = 100;

/// Points for popping one group of `size` cells
pub fn group_score(size: usize, config: &GameConfig) -> u32 {
    (size as u32).saturating_mul(config.points_per_cell)
}

/// Level reached at `score`, starting at 1
pub fn level_for_score(score: u32) -> u32 {
    1 + score / POINTS_PER_LEVEL
}

/// Suggested gravity interval for a level
///
/// The core never schedules ticks; drivers may use this table to speed up.
pub fn drop_interval_ms(level: u32) -> u32 {
    let step = level.saturating_sub(1).saturating_mul(DROP_INTERVAL_STEP_MS);
    BASE_DROP_INTERVAL_MS
        .saturating_sub(step)
        .max(DROP_INTERVAL_MIN_MS)
}
