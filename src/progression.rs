//! # Progression Rules
//!
//! The business arithmetic behind levels and achievements, free of any
//! store. The SQL statements in [`crate::models`] express the same rules
//! atomically; the in-memory store calls these functions directly.

use chrono::NaiveDateTime;

use crate::constants::XP_PER_LEVEL;

/// Level and experience after an award
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    pub level: i32,
    pub xp: i32,
}

/// Experience at which a user of `level` is promoted
pub fn level_threshold(level: i32) -> i32 {
    level.saturating_mul(XP_PER_LEVEL)
}

/// Apply an xp increment. Promotion is single-step: however large the
/// increment, the level rises by at most one per call. `None` when the new
/// xp total does not fit the column.
pub fn apply_xp(level: i32, xp: i32, increment: i32) -> Option<Progression> {
    let new_xp = xp.checked_add(increment)?;
    let new_level = if new_xp >= level_threshold(level) {
        level.checked_add(1)?
    } else {
        level
    };
    Some(Progression {
        level: new_level,
        xp: new_xp,
    })
}

/// `floor(100 * progress / required_count)`, capped at 100. A catalog entry
/// that requires nothing is always complete.
pub fn progress_percent(progress: i32, required_count: i32) -> i32 {
    if required_count <= 0 {
        return 100;
    }
    let percent = (i64::from(progress.max(0)) * 100) / i64::from(required_count);
    percent.min(100) as i32
}

/// Progress counters of one (user, achievement) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockState {
    pub progress: i32,
    pub unlocked: bool,
    pub unlocked_at: Option<NaiveDateTime>,
}

/// Add `increment` to an existing (or absent) progress row. Once unlocked a
/// row stays unlocked, and `unlocked_at` is set only on the first crossing.
/// `None` when the new total does not fit the column.
pub fn accumulate_progress(
    current: Option<UnlockState>,
    increment: i32,
    required_count: i32,
    now: NaiveDateTime,
) -> Option<UnlockState> {
    match current {
        None => {
            let unlocked = increment >= required_count;
            Some(UnlockState {
                progress: increment,
                unlocked,
                unlocked_at: unlocked.then_some(now),
            })
        }
        Some(existing) => {
            let progress = existing.progress.checked_add(increment)?;
            let reached = progress >= required_count;
            let unlocked_at = match existing.unlocked_at {
                Some(at) => Some(at),
                None if reached => Some(now),
                None => None,
            };
            Some(UnlockState {
                progress,
                unlocked: existing.unlocked || reached,
                unlocked_at,
            })
        }
    }
}
