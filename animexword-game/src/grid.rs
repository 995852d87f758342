//! Cell matrix materialized from a puzzle, plus answer checking.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::puzzle::{PlacedWord, Puzzle};

/// One square of the crossword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub letter: Option<char>,
    /// Clue number shown in the corner; 0 when unlabeled.
    pub number: u32,
    pub is_black: bool,
    pub user_input: Option<char>,
    pub is_correct: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            letter: None,
            number: 0,
            is_black: true,
            user_input: None,
            is_correct: false,
        }
    }
}

impl Cell {
    /// Whether the player's entry differs from the answer.
    #[must_use]
    pub fn is_wrong(&self) -> bool {
        !self.is_black && self.user_input.is_some() && self.user_input != self.letter
    }
}

/// Words claiming a cell. Rarely more than two.
pub type Claimants<'a> = SmallVec<[&'a PlacedWord; 2]>;

/// A `size`×`size` matrix of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// An all-black grid.
    #[must_use]
    pub fn blank(size: usize) -> Self {
        Self {
            size,
            cells: vec![vec![Cell::default(); size]; size],
        }
    }

    /// Materialize `puzzle`. Words are written in list order, so a later
    /// word overwrites any earlier letter at the same coordinate.
    #[must_use]
    pub fn from_puzzle(puzzle: &Puzzle) -> Self {
        let mut grid = Self::blank(puzzle.size);
        for word in &puzzle.words {
            grid.place_word(word);
        }
        grid
    }

    fn place_word(&mut self, word: &PlacedWord) {
        for (idx, (row, col), letter) in word.cells(self.size) {
            let existing = self.cells[row][col].number;
            self.cells[row][col] = Cell {
                letter: Some(letter),
                number: if idx == 0 { word.number } else { existing },
                is_black: false,
                user_input: None,
                is_correct: false,
            };
        }
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    /// Rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Out-of-range coordinates count as black.
    #[must_use]
    pub fn is_black(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_none_or(|c| c.is_black)
    }

    /// Every word whose span covers `(row, col)`, in puzzle order.
    #[must_use]
    pub fn words_at<'p>(puzzle: &'p Puzzle, row: usize, col: usize) -> Claimants<'p> {
        puzzle
            .words
            .iter()
            .filter(|w| w.contains(row, col))
            .collect()
    }

    /// Store a player's letter. Black or out-of-range cells ignore input.
    pub fn set_user_input(&mut self, row: usize, col: usize, letter: char) {
        if let Some(cell) = self.open_cell_mut(row, col) {
            cell.user_input = Some(letter.to_ascii_uppercase());
            cell.is_correct = false;
        }
    }

    /// Erase a player's letter.
    pub fn clear_user_input(&mut self, row: usize, col: usize) {
        if let Some(cell) = self.open_cell_mut(row, col) {
            cell.user_input = None;
            cell.is_correct = false;
        }
    }

    fn open_cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.cells
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .filter(|c| !c.is_black)
    }

    /// Letters read back from the grid along `word`'s direction. Stops at
    /// the grid edge.
    #[must_use]
    pub fn read_word(&self, word: &PlacedWord) -> String {
        word.cells(self.size)
            .filter_map(|(_, (row, col), _)| self.cell(row, col).and_then(|c| c.letter))
            .collect()
    }

    /// Mark each open cell correct or not and report whether the grid passes.
    ///
    /// Only a filled-in wrong letter fails the check: blank cells are marked
    /// incorrect but do not block completion, so an untouched grid passes.
    pub fn check_completion(&mut self) -> bool {
        let mut all_correct = true;
        for cell in self.cells.iter_mut().flatten().filter(|c| !c.is_black) {
            cell.is_correct = cell.user_input == cell.letter;
            if cell.is_wrong() {
                all_correct = false;
            }
        }
        all_correct
    }

    /// Fill every open cell with its answer.
    pub fn reveal_all(&mut self) {
        for cell in self.cells.iter_mut().flatten().filter(|c| !c.is_black) {
            cell.user_input = cell.letter;
            cell.is_correct = true;
        }
    }

    /// Open cells and how many of them hold input.
    #[must_use]
    pub fn fill_counts(&self) -> (usize, usize) {
        self.cells
            .iter()
            .flatten()
            .filter(|c| !c.is_black)
            .fold((0, 0), |(open, filled), c| {
                (open + 1, filled + usize::from(c.user_input.is_some()))
            })
    }
}
