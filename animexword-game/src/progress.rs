//! Per-category level tracking and the puzzle-completion state machine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{MAX_LEVEL, MIN_LEVEL};
use crate::level::{clamp_level, puzzles_needed};
use crate::numbers::percent_of;

/// Level and completed-puzzle count for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub puzzles_completed: u32,
}

const fn default_level() -> u32 {
    MIN_LEVEL
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            level: MIN_LEVEL,
            puzzles_completed: 0,
        }
    }
}

/// Result of recording one solved puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompletionOutcome {
    /// The category reached a new level; its counter restarted at zero.
    LevelUp { level: u32 },
    /// Same level, one more puzzle on the counter.
    PuzzleAdvance { level: u32, puzzles_completed: u32 },
}

impl CompletionOutcome {
    #[must_use]
    pub const fn is_level_up(self) -> bool {
        matches!(self, Self::LevelUp { .. })
    }

    #[must_use]
    pub const fn level(self) -> u32 {
        match self {
            Self::LevelUp { level } | Self::PuzzleAdvance { level, .. } => level,
        }
    }
}

impl ProgressRecord {
    /// Puzzles this record's level demands.
    #[must_use]
    pub const fn puzzles_needed(&self) -> u32 {
        puzzles_needed(self.level)
    }

    #[must_use]
    pub const fn is_max_level(&self) -> bool {
        self.level >= MAX_LEVEL
    }

    /// Count a solved puzzle and level up once the threshold is met.
    ///
    /// The top level never levels up; its counter keeps climbing.
    pub fn complete_puzzle(&mut self) -> CompletionOutcome {
        self.puzzles_completed = self.puzzles_completed.saturating_add(1);
        if self.puzzles_completed >= self.puzzles_needed() && !self.is_max_level() {
            self.level += 1;
            self.puzzles_completed = 0;
            CompletionOutcome::LevelUp { level: self.level }
        } else {
            CompletionOutcome::PuzzleAdvance {
                level: self.level,
                puzzles_completed: self.puzzles_completed,
            }
        }
    }

    /// Pull a loaded record back into the playable level range.
    #[must_use]
    pub const fn sanitized(self) -> Self {
        Self {
            level: clamp_level(self.level),
            puzzles_completed: self.puzzles_completed,
        }
    }
}

/// Menu card data for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub name: String,
    pub level: u32,
    pub puzzles_completed: u32,
    pub puzzles_needed: u32,
    pub progress_pct: f64,
    pub remaining: u32,
}

impl CategorySummary {
    #[must_use]
    pub fn new(name: &str, record: ProgressRecord) -> Self {
        let needed = record.puzzles_needed();
        Self {
            name: name.to_string(),
            level: record.level,
            puzzles_completed: record.puzzles_completed,
            puzzles_needed: needed,
            progress_pct: percent_of(record.puzzles_completed, needed),
            remaining: needed.saturating_sub(record.puzzles_completed),
        }
    }
}

/// Progress for every category, keyed by category name.
///
/// Serialized as a flat JSON object so saves stay readable:
/// `{"Naruto": {"level": 2, "puzzlesCompleted": 1}}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressBook {
    records: BTreeMap<String, ProgressRecord>,
}

impl ProgressBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Give every listed category a record, leaving existing ones alone.
    pub fn ensure_categories<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.records.entry(name.to_string()).or_default();
        }
    }

    /// Current record for `category`; a default record if never played.
    #[must_use]
    pub fn get(&self, category: &str) -> ProgressRecord {
        self.records.get(category).copied().unwrap_or_default()
    }

    /// Mutable record for `category`, created on first reference.
    pub fn record_mut(&mut self, category: &str) -> &mut ProgressRecord {
        self.records.entry(category.to_string()).or_default()
    }

    /// Count a solved puzzle for `category`.
    pub fn complete_puzzle(&mut self, category: &str) -> CompletionOutcome {
        self.record_mut(category).complete_puzzle()
    }

    /// Clamp every record into the playable range.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            records: self
                .records
                .into_iter()
                .map(|(name, record)| (name, record.sanitized()))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProgressRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
