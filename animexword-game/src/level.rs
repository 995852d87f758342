//! Level policy: how many puzzles each level demands and how big its grid is.

use crate::constants::{
    GRID_LARGE, GRID_MEDIUM, GRID_MEDIUM_MAX_LEVEL, GRID_SMALL, GRID_SMALL_MAX_LEVEL, MAX_LEVEL,
    MIN_LEVEL, PUZZLES_BASE, PUZZLES_EARLY_BAND_END, PUZZLES_EARLY_STEP, PUZZLES_LATE_BASE,
    PUZZLES_LATE_STEP, PUZZLES_MID_BAND_END, PUZZLES_MID_BASE, PUZZLES_MID_STEP, WORDS_BASE,
    WORDS_LEVEL_STEP,
};

/// Number of completed puzzles required to leave `level`.
///
/// The curve rises in three bands: every second level up to 10, every third
/// level up to 25 and every fifth level after that.
#[must_use]
pub const fn puzzles_needed(level: u32) -> u32 {
    if level <= MIN_LEVEL {
        PUZZLES_BASE
    } else if level <= PUZZLES_EARLY_BAND_END {
        PUZZLES_BASE + (level - 1) / PUZZLES_EARLY_STEP
    } else if level <= PUZZLES_MID_BAND_END {
        PUZZLES_MID_BASE + (level - PUZZLES_EARLY_BAND_END) / PUZZLES_MID_STEP
    } else {
        PUZZLES_LATE_BASE + (level - PUZZLES_MID_BAND_END) / PUZZLES_LATE_STEP
    }
}

/// Side length of the square grid used at `level`.
#[must_use]
pub const fn grid_size(level: u32) -> usize {
    if level <= GRID_SMALL_MAX_LEVEL {
        GRID_SMALL
    } else if level <= GRID_MEDIUM_MAX_LEVEL {
        GRID_MEDIUM
    } else {
        GRID_LARGE
    }
}

/// Words a puzzle at `level` asks for before capping by the category's list.
#[must_use]
pub const fn words_for_level(level: u32) -> usize {
    WORDS_BASE + (level / WORDS_LEVEL_STEP) as usize
}

/// Clamp an arbitrary level into the playable range.
#[must_use]
pub const fn clamp_level(level: u32) -> u32 {
    if level < MIN_LEVEL {
        MIN_LEVEL
    } else if level > MAX_LEVEL {
        MAX_LEVEL
    } else {
        level
    }
}
