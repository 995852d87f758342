//! Selected cell and word tracking with in-word navigation.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::puzzle::{Direction, PlacedWord, Position, Puzzle};

/// The player's cursor: a cell and the word it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub selected_cell: Option<Position>,
    pub selected_word: Option<PlacedWord>,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `(row, col)`. Black and out-of-range cells are ignored.
    ///
    /// Returns whether the selection changed.
    pub fn select_cell(&mut self, grid: &Grid, puzzle: &Puzzle, row: usize, col: usize) -> bool {
        if grid.is_black(row, col) {
            return false;
        }
        self.selected_cell = Some((row, col));
        self.selected_word = puzzle.find_word_at(row, col).cloned();
        true
    }

    /// Move to the next cell of the selected word. No-op at the word's end.
    pub fn advance(&mut self, grid: &Grid, puzzle: &Puzzle) -> bool {
        let Some(((row, col), word)) = self.cursor() else {
            return false;
        };
        let next = match word.direction {
            Direction::Across => (row, col + 1),
            Direction::Down => (row + 1, col),
        };
        if !word.contains(next.0, next.1) {
            return false;
        }
        self.select_cell(grid, puzzle, next.0, next.1)
    }

    /// Move to the previous cell of the selected word. No-op at the word's start.
    pub fn retreat(&mut self, grid: &Grid, puzzle: &Puzzle) -> bool {
        let Some(((row, col), word)) = self.cursor() else {
            return false;
        };
        let prev = match word.direction {
            Direction::Across => col.checked_sub(1).map(|c| (row, c)),
            Direction::Down => row.checked_sub(1).map(|r| (r, col)),
        };
        let Some((row, col)) = prev else {
            return false;
        };
        if !word.contains(row, col) {
            return false;
        }
        self.select_cell(grid, puzzle, row, col)
    }

    /// Drop the selection, e.g. when a new puzzle replaces the grid.
    pub fn clear(&mut self) {
        self.selected_cell = None;
        self.selected_word = None;
    }

    #[must_use]
    pub fn is_selected(&self, row: usize, col: usize) -> bool {
        self.selected_cell == Some((row, col))
    }

    fn cursor(&self) -> Option<(Position, PlacedWord)> {
        Some((self.selected_cell?, self.selected_word.clone()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::WordTable;

    fn setup() -> (Grid, Puzzle) {
        let puzzle = Puzzle::build(&WordTable::load_from_static().unwrap(), "Naruto", 1);
        (Grid::from_puzzle(&puzzle), puzzle)
    }

    #[test]
    fn selecting_black_cell_is_ignored() {
        let (grid, puzzle) = setup();
        let mut sel = SelectionState::new();
        assert!(sel.select_cell(&grid, &puzzle, 0, 0));
        assert!(!sel.select_cell(&grid, &puzzle, 8, 8));
        assert!(!sel.select_cell(&grid, &puzzle, 99, 0));
        assert_eq!(sel.selected_cell, Some((0, 0)));
    }

    #[test]
    fn selection_tracks_containing_word() {
        let (grid, puzzle) = setup();
        let mut sel = SelectionState::new();
        sel.select_cell(&grid, &puzzle, 5, 1);
        assert_eq!(sel.selected_word.as_ref().map(|w| w.word.as_str()), Some("SASUKE"));
        sel.select_cell(&grid, &puzzle, 4, 5);
        assert_eq!(sel.selected_word.as_ref().map(|w| w.number), Some(3));
    }

    #[test]
    fn advance_walks_across_word_and_stops_at_end() {
        let (grid, puzzle) = setup();
        let mut sel = SelectionState::new();
        sel.select_cell(&grid, &puzzle, 0, 0);
        for expected in 1..6 {
            assert!(sel.advance(&grid, &puzzle));
            assert_eq!(sel.selected_cell, Some((0, expected)));
        }
        assert!(!sel.advance(&grid, &puzzle));
        assert_eq!(sel.selected_cell, Some((0, 5)));
    }

    #[test]
    fn advance_walks_down_word() {
        let (grid, puzzle) = setup();
        let mut sel = SelectionState::new();
        sel.select_cell(&grid, &puzzle, 6, 1);
        assert!(sel.advance(&grid, &puzzle));
        assert_eq!(sel.selected_cell, Some((7, 1)));
        assert!(!sel.advance(&grid, &puzzle));
        assert_eq!(sel.selected_cell, Some((7, 1)));
    }

    #[test]
    fn advance_stops_at_grid_edge_for_truncated_word() {
        let puzzle = Puzzle::build(&WordTable::load_from_static().unwrap(), "Demon Slayer", 1);
        let grid = Grid::from_puzzle(&puzzle);
        let mut sel = SelectionState::new();
        // ZENITSU starts at (4,3); its final letter would land in column 9.
        sel.select_cell(&grid, &puzzle, 4, 8);
        assert_eq!(sel.selected_word.as_ref().map(|w| w.word.as_str()), Some("ZENITSU"));
        assert!(!sel.advance(&grid, &puzzle));
        assert_eq!(sel.selected_cell, Some((4, 8)));
    }

    #[test]
    fn retreat_stops_at_word_start() {
        let (grid, puzzle) = setup();
        let mut sel = SelectionState::new();
        sel.select_cell(&grid, &puzzle, 0, 2);
        assert!(sel.retreat(&grid, &puzzle));
        assert!(sel.retreat(&grid, &puzzle));
        assert_eq!(sel.selected_cell, Some((0, 0)));
        assert!(!sel.retreat(&grid, &puzzle));
        assert_eq!(sel.selected_cell, Some((0, 0)));

        sel.select_cell(&grid, &puzzle, 2, 1);
        assert!(!sel.retreat(&grid, &puzzle));
        assert_eq!(sel.selected_cell, Some((2, 1)));
    }

    #[test]
    fn navigation_without_selection_is_noop() {
        let (grid, puzzle) = setup();
        let mut sel = SelectionState::new();
        assert!(!sel.advance(&grid, &puzzle));
        assert!(!sel.retreat(&grid, &puzzle));
        sel.select_cell(&grid, &puzzle, 0, 0);
        sel.clear();
        assert_eq!(sel, SelectionState::default());
    }
}
