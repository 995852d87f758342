//! Puzzle construction from a category's word list.
//!
//! Placement is a fixed staircase: word `i` starts at row `2i`, column
//! `floor(1.5i)`, alternating across and down. Words are never checked for
//! overlaps; when two words share a coordinate the later one wins during
//! grid materialization.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{LAYOUT_COL_STRIDE_DEN, LAYOUT_COL_STRIDE_NUM, LAYOUT_ROW_STRIDE};
use crate::data::{WordEntry, WordTable};
use crate::level::{grid_size, words_for_level};
use crate::numbers::len_to_u32;

/// Orientation of a placed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Across => "across",
            Self::Down => "down",
        }
    }

    /// Direction assigned to the word at `index` in a puzzle.
    #[must_use]
    pub const fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Self::Across
        } else {
            Self::Down
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A grid coordinate as `(row, col)`.
pub type Position = (usize, usize);

/// A word with its position, orientation and clue number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedWord {
    pub word: String,
    pub clue: String,
    pub start_row: usize,
    pub start_col: usize,
    pub direction: Direction,
    pub number: u32,
}

impl PlacedWord {
    /// Place `entry` as the `index`-th word of a puzzle.
    #[must_use]
    pub fn from_entry(entry: &WordEntry, index: usize) -> Self {
        Self {
            word: entry.word.clone(),
            clue: entry.clue.clone(),
            start_row: index * LAYOUT_ROW_STRIDE,
            start_col: index * LAYOUT_COL_STRIDE_NUM / LAYOUT_COL_STRIDE_DEN,
            direction: Direction::for_index(index),
            number: len_to_u32(index + 1),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.word.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    /// Coordinate of the letter at `index`, ignoring grid bounds.
    #[must_use]
    pub const fn position_of(&self, index: usize) -> Position {
        match self.direction {
            Direction::Across => (self.start_row, self.start_col + index),
            Direction::Down => (self.start_row + index, self.start_col),
        }
    }

    /// Whether the word's span covers `(row, col)`.
    #[must_use]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        let len = self.len();
        match self.direction {
            Direction::Across => {
                row == self.start_row && col >= self.start_col && col < self.start_col + len
            }
            Direction::Down => {
                col == self.start_col && row >= self.start_row && row < self.start_row + len
            }
        }
    }

    /// Letters of the word with their in-bounds coordinates on a `size`-wide
    /// grid. Letters falling outside the grid are skipped.
    pub fn cells(&self, size: usize) -> impl Iterator<Item = (usize, Position, char)> + '_ {
        self.word
            .chars()
            .enumerate()
            .map(move |(idx, letter)| (idx, self.position_of(idx), letter))
            .filter(move |(_, (row, col), _)| *row < size && *col < size)
    }
}

/// One crossword instance: the grid size and its placed words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub size: usize,
    pub words: Vec<PlacedWord>,
}

/// A numbered clue as shown in a clue list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueLine {
    pub number: u32,
    pub clue: String,
}

impl Puzzle {
    /// Build the puzzle for `category` at `level`.
    ///
    /// Unknown categories use the table's fallback list. Words are taken in
    /// table order, so the result is fully determined by the table and level.
    #[must_use]
    pub fn build(table: &WordTable, category: &str, level: u32) -> Self {
        let entries = table.words_for(category);
        let count = words_for_level(level).min(entries.len());
        let words = entries
            .iter()
            .take(count)
            .enumerate()
            .map(|(index, entry)| PlacedWord::from_entry(entry, index))
            .collect();
        Self {
            size: grid_size(level),
            words,
        }
    }

    /// First word in puzzle order whose span covers `(row, col)`.
    #[must_use]
    pub fn find_word_at(&self, row: usize, col: usize) -> Option<&PlacedWord> {
        self.words.iter().find(|w| w.contains(row, col))
    }

    /// Clue list for one direction, in puzzle order.
    #[must_use]
    pub fn clues(&self, direction: Direction) -> Vec<ClueLine> {
        self.words
            .iter()
            .filter(|w| w.direction == direction)
            .map(|w| ClueLine {
                number: w.number,
                clue: w.clue.clone(),
            })
            .collect()
    }
}
