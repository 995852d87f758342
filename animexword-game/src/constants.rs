//! Centralized balance and tuning constants for AnimeXword game logic.
//!
//! Level thresholds, grid dimensions and layout factors live here so the
//! progression curve can only be adjusted through reviewed code changes.

// Levels -------------------------------------------------------------------
pub const MIN_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 50;

// Puzzles required per level band --------------------------------------------
pub(crate) const PUZZLES_BASE: u32 = 3;
pub(crate) const PUZZLES_EARLY_BAND_END: u32 = 10;
pub(crate) const PUZZLES_EARLY_STEP: u32 = 2;
pub(crate) const PUZZLES_MID_BASE: u32 = 6;
pub(crate) const PUZZLES_MID_BAND_END: u32 = 25;
pub(crate) const PUZZLES_MID_STEP: u32 = 3;
pub(crate) const PUZZLES_LATE_BASE: u32 = 10;
pub(crate) const PUZZLES_LATE_STEP: u32 = 5;

// Grid dimensions ------------------------------------------------------------
pub(crate) const GRID_SMALL: usize = 9;
pub(crate) const GRID_SMALL_MAX_LEVEL: u32 = 20;
pub(crate) const GRID_MEDIUM: usize = 13;
pub(crate) const GRID_MEDIUM_MAX_LEVEL: u32 = 40;
pub(crate) const GRID_LARGE: usize = 17;

// Puzzle layout ----------------------------------------------------------------
pub(crate) const WORDS_BASE: usize = 3;
pub(crate) const WORDS_LEVEL_STEP: u32 = 5;
/// Row offset between consecutive words.
pub(crate) const LAYOUT_ROW_STRIDE: usize = 2;
/// Column offset between consecutive words is `3/2`, floored.
pub(crate) const LAYOUT_COL_STRIDE_NUM: usize = 3;
pub(crate) const LAYOUT_COL_STRIDE_DEN: usize = 2;

// Session ----------------------------------------------------------------------
pub const DEFAULT_STORAGE_KEY: &str = "animeXwordProgress";
pub const DEFAULT_ADVANCE_DELAY_MS: u64 = 1_000;
