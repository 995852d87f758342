use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::data::WordTable;
use crate::grid::Grid;
use crate::input::{KeyCommand, normalize_letter, parse_key};
use crate::progress::{CategorySummary, CompletionOutcome, ProgressBook, ProgressRecord};
use crate::puzzle::{ClueLine, Direction, Puzzle};
use crate::selection::SelectionState;
use crate::storage::{ProgressStore, load_progress, save_progress};

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    LevelUp,
}

/// Result of a `check` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// At least one filled-in letter is wrong.
    Incorrect,
    /// The puzzle was accepted and progress recorded.
    Completed { outcome: CompletionOutcome },
    /// This puzzle was already accepted; the next one is still pending.
    AwaitingNextPuzzle,
    /// No puzzle is being played.
    NotPlaying,
}

/// The puzzle being played and its materialized grid.
#[derive(Debug, Clone)]
struct Board {
    puzzle: Puzzle,
    grid: Grid,
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: GamePhase,
    pub category: Option<String>,
    pub progress: Option<ProgressRecord>,
    pub puzzles_needed: Option<u32>,
    pub puzzle: Option<Puzzle>,
    pub grid: Option<Grid>,
    pub selection: SelectionState,
    pub across_clues: Vec<ClueLine>,
    pub down_clues: Vec<ClueLine>,
    pub next_puzzle_at_ms: Option<u64>,
    /// Clue numbers of every word covering the selected cell.
    pub selected_numbers: Vec<u32>,
    pub open_cells: usize,
    pub filled_cells: usize,
}

/// One player's game: word data, progress, the current puzzle and cursor.
///
/// All state lives here and every command runs to completion. Time is passed
/// in by the caller as milliseconds so the session never reads a clock.
#[derive(Debug)]
pub struct GameSession<S: ProgressStore> {
    config: SessionConfig,
    words: WordTable,
    progress: ProgressBook,
    store: S,
    category: Option<String>,
    board: Option<Board>,
    selection: SelectionState,
    phase: GamePhase,
    next_puzzle_at_ms: Option<u64>,
}

impl<S: ProgressStore> GameSession<S> {
    /// Open a session, loading saved progress from `store`.
    #[must_use]
    pub fn new(words: WordTable, store: S, config: SessionConfig) -> Self {
        let mut progress = load_progress(&store, &config.storage_key);
        progress.ensure_categories(words.category_names());
        Self {
            config,
            words,
            progress,
            store,
            category: None,
            board: None,
            selection: SelectionState::default(),
            phase: GamePhase::Menu,
            next_puzzle_at_ms: None,
        }
    }

    /// Menu cards for every category, in catalogue order.
    #[must_use]
    pub fn categories(&self) -> Vec<CategorySummary> {
        self.words
            .category_names()
            .map(|name| CategorySummary::new(name, self.progress.get(name)))
            .collect()
    }

    /// Start playing `category` at its saved level.
    pub fn select_category(&mut self, category: &str) {
        self.category = Some(category.to_string());
        self.progress.record_mut(category);
        self.generate_puzzle();
    }

    /// Leave the current puzzle for the category menu.
    pub fn back_to_menu(&mut self) {
        self.next_puzzle_at_ms = None;
        self.category = None;
        self.board = None;
        self.selection.clear();
        self.phase = GamePhase::Menu;
    }

    /// Build a fresh puzzle for the current category and level, cancelling
    /// any pending scheduled puzzle.
    ///
    /// Returns `false` if no category is selected.
    pub fn next_puzzle(&mut self) -> bool {
        if self.category.is_none() {
            return false;
        }
        self.generate_puzzle();
        true
    }

    fn generate_puzzle(&mut self) {
        let Some(category) = self.category.as_deref() else {
            return;
        };
        let level = self.progress.get(category).level;
        let puzzle = Puzzle::build(&self.words, category, level);
        log::debug!(
            "generated {} puzzle at level {level}: {} words on a {}x{} grid",
            category,
            puzzle.words.len(),
            puzzle.size,
            puzzle.size
        );
        let grid = Grid::from_puzzle(&puzzle);
        self.board = Some(Board { puzzle, grid });
        self.selection.clear();
        self.next_puzzle_at_ms = None;
        self.phase = GamePhase::Playing;
    }

    /// Move the cursor to `(row, col)`. Black or out-of-range cells are ignored.
    pub fn select_cell(&mut self, row: usize, col: usize) -> bool {
        let Some(board) = self.board.as_ref() else {
            return false;
        };
        self.selection
            .select_cell(&board.grid, &board.puzzle, row, col)
    }

    /// Type `ch` into `(row, col)` and move to the next cell of the word.
    ///
    /// Non-letters are rejected and leave the cell unchanged.
    pub fn set_input(&mut self, row: usize, col: usize, ch: char) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let Some(letter) = normalize_letter(ch) else {
            return false;
        };
        let Some(board) = self.board.as_mut() else {
            return false;
        };
        if board.grid.is_black(row, col) {
            return false;
        }
        board.grid.set_user_input(row, col, letter);
        if !self.selection.is_selected(row, col) {
            self.selection
                .select_cell(&board.grid, &board.puzzle, row, col);
        }
        self.selection.advance(&board.grid, &board.puzzle);
        true
    }

    /// Erase the letter at `(row, col)`; on an already empty cell, step back
    /// to the previous cell of the selected word instead.
    pub fn backspace(&mut self, row: usize, col: usize) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let Some(board) = self.board.as_mut() else {
            return false;
        };
        let Some(cell) = board.grid.cell(row, col).filter(|c| !c.is_black) else {
            return false;
        };
        if !self.selection.is_selected(row, col) {
            self.selection
                .select_cell(&board.grid, &board.puzzle, row, col);
        }
        if cell.user_input.is_some() {
            board.grid.clear_user_input(row, col);
            true
        } else {
            self.selection.retreat(&board.grid, &board.puzzle)
        }
    }

    /// Apply a key name to the selected cell.
    pub fn handle_key(&mut self, key: &str) -> bool {
        let Some((row, col)) = self.selection.selected_cell else {
            return false;
        };
        match parse_key(key) {
            Some(KeyCommand::Letter(letter)) => self.set_input(row, col, letter),
            Some(KeyCommand::Backspace) => self.backspace(row, col),
            None => false,
        }
    }

    /// Validate the grid and, if it passes, record the solved puzzle.
    ///
    /// A level-up moves to the level-up screen; otherwise the next puzzle is
    /// scheduled `advance_delay_ms` after `now_ms` and appears on `poll`.
    pub fn check(&mut self, now_ms: u64) -> CheckOutcome {
        if self.phase != GamePhase::Playing {
            return CheckOutcome::NotPlaying;
        }
        if self.next_puzzle_at_ms.is_some() {
            return CheckOutcome::AwaitingNextPuzzle;
        }
        let (Some(board), Some(category)) = (self.board.as_mut(), self.category.as_deref())
        else {
            return CheckOutcome::NotPlaying;
        };
        if !board.grid.check_completion() {
            return CheckOutcome::Incorrect;
        }

        let outcome = self.progress.complete_puzzle(category);
        match outcome {
            CompletionOutcome::LevelUp { level } => {
                log::info!("{category} reached level {level}");
                self.phase = GamePhase::LevelUp;
            }
            CompletionOutcome::PuzzleAdvance { .. } => {
                self.next_puzzle_at_ms = Some(now_ms.saturating_add(self.config.advance_delay_ms));
            }
        }
        self.persist();
        CheckOutcome::Completed { outcome }
    }

    /// Generate the scheduled puzzle once its time has come.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.next_puzzle_at_ms {
            Some(due) if now_ms >= due => {
                self.generate_puzzle();
                true
            }
            _ => false,
        }
    }

    /// Fill the grid with the answers. Progress is untouched.
    pub fn reveal(&mut self) -> bool {
        let Some(board) = self.board.as_mut() else {
            return false;
        };
        board.grid.reveal_all();
        true
    }

    fn persist(&mut self) {
        save_progress(&mut self.store, &self.config.storage_key, &self.progress);
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn puzzle(&self) -> Option<&Puzzle> {
        self.board.as_ref().map(|b| &b.puzzle)
    }

    #[must_use]
    pub fn grid(&self) -> Option<&Grid> {
        self.board.as_ref().map(|b| &b.grid)
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Progress for `category`; defaults if it was never played.
    #[must_use]
    pub fn progress(&self, category: &str) -> ProgressRecord {
        self.progress.get(category)
    }

    #[must_use]
    pub const fn progress_book(&self) -> &ProgressBook {
        &self.progress
    }

    #[must_use]
    pub const fn next_puzzle_at_ms(&self) -> Option<u64> {
        self.next_puzzle_at_ms
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn words(&self) -> &WordTable {
        &self.words
    }

    /// Clone the render-facing state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let progress = self.category.as_deref().map(|c| self.progress.get(c));
        let clues = |direction| {
            self.puzzle()
                .map(|p| p.clues(direction))
                .unwrap_or_default()
        };
        let selected_numbers = match (self.puzzle(), self.selection.selected_cell) {
            (Some(puzzle), Some((row, col))) => Grid::words_at(puzzle, row, col)
                .iter()
                .map(|w| w.number)
                .collect(),
            _ => Vec::new(),
        };
        let (open_cells, filled_cells) = self.grid().map(Grid::fill_counts).unwrap_or_default();
        SessionSnapshot {
            phase: self.phase,
            category: self.category.clone(),
            progress,
            puzzles_needed: progress.map(|p| p.puzzles_needed()),
            puzzle: self.puzzle().cloned(),
            grid: self.grid().cloned(),
            selection: self.selection.clone(),
            across_clues: clues(Direction::Across),
            down_clues: clues(Direction::Down),
            next_puzzle_at_ms: self.next_puzzle_at_ms,
            selected_numbers,
            open_cells,
            filled_cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn session() -> GameSession<MemoryStore> {
        GameSession::new(
            WordTable::load_from_static().unwrap(),
            MemoryStore::new(),
            SessionConfig::default(),
        )
    }

    fn solve(session: &mut GameSession<MemoryStore>, now: u64) -> CheckOutcome {
        session.reveal();
        session.check(now)
    }

    #[test]
    fn new_session_starts_on_menu_with_defaults() {
        let session = session();
        assert_eq!(session.phase(), GamePhase::Menu);
        let cards = session.categories();
        assert_eq!(cards.len(), 9);
        assert!(cards.iter().all(|c| c.level == 1 && c.puzzles_needed == 3));
        assert_eq!(session.progress_book().len(), 9);
    }

    #[test]
    fn selecting_category_builds_puzzle_and_grid() {
        let mut session = session();
        session.select_category("Naruto");
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.puzzle().unwrap().words.len(), 3);
        assert_eq!(session.grid().unwrap().size(), 9);
        assert_eq!(session.selection(), &SelectionState::default());
    }

    #[test]
    fn typing_advances_and_rejects_non_letters() {
        let mut session = session();
        session.select_category("Naruto");
        assert!(session.set_input(0, 0, 'n'));
        assert_eq!(session.selection().selected_cell, Some((0, 1)));
        assert!(!session.set_input(0, 1, '3'));
        assert_eq!(session.grid().unwrap().cell(0, 1).unwrap().user_input, None);
        assert_eq!(session.selection().selected_cell, Some((0, 1)));
        assert!(!session.set_input(8, 8, 'x'));
    }

    #[test]
    fn backspace_clears_then_retreats() {
        let mut session = session();
        session.select_category("Naruto");
        session.set_input(0, 0, 'N');
        session.set_input(0, 1, 'A');
        assert_eq!(session.selection().selected_cell, Some((0, 2)));
        assert!(session.backspace(0, 2));
        assert_eq!(session.selection().selected_cell, Some((0, 1)));
        assert!(session.backspace(0, 1));
        assert_eq!(session.grid().unwrap().cell(0, 1).unwrap().user_input, None);
        assert_eq!(session.selection().selected_cell, Some((0, 1)));
    }

    #[test]
    fn handle_key_targets_selected_cell() {
        let mut session = session();
        session.select_category("Naruto");
        assert!(!session.handle_key("a"));
        session.select_cell(2, 1);
        assert!(session.handle_key("s"));
        assert_eq!(session.grid().unwrap().cell(2, 1).unwrap().user_input, Some('S'));
        assert_eq!(session.selection().selected_cell, Some((3, 1)));
        assert!(!session.handle_key("Tab"));
    }

    #[test]
    fn wrong_letter_blocks_completion() {
        let mut session = session();
        session.select_category("Naruto");
        session.set_input(0, 0, 'Q');
        assert_eq!(session.check(0), CheckOutcome::Incorrect);
        assert_eq!(session.progress("Naruto").puzzles_completed, 0);
    }

    #[test]
    fn blank_grid_counts_as_solved() {
        let mut session = session();
        session.select_category("Naruto");
        assert!(matches!(session.check(0), CheckOutcome::Completed { .. }));
        assert_eq!(session.progress("Naruto").puzzles_completed, 1);
    }

    #[test]
    fn completion_schedules_next_puzzle_and_blocks_double_count() {
        let mut session = session();
        session.select_category("Bleach");
        assert!(matches!(solve(&mut session, 500), CheckOutcome::Completed { .. }));
        assert_eq!(session.next_puzzle_at_ms(), Some(1_500));
        assert_eq!(session.check(600), CheckOutcome::AwaitingNextPuzzle);
        assert_eq!(session.progress("Bleach").puzzles_completed, 1);

        assert!(!session.poll(1_499));
        assert!(session.grid().unwrap().rows().flatten().any(|c| c.is_correct));
        assert!(session.poll(1_500));
        assert_eq!(session.next_puzzle_at_ms(), None);
        assert!(session.grid().unwrap().rows().flatten().all(|c| c.user_input.is_none()));
    }

    #[test]
    fn next_puzzle_cancels_pending_schedule() {
        let mut session = session();
        session.select_category("Bleach");
        solve(&mut session, 0);
        assert!(session.next_puzzle());
        assert_eq!(session.next_puzzle_at_ms(), None);
        assert!(!session.poll(10_000));
    }

    #[test]
    fn third_completion_levels_up_and_persists() {
        let store = MemoryStore::new();
        let mut session = GameSession::new(
            WordTable::load_from_static().unwrap(),
            store.clone(),
            SessionConfig::default(),
        );
        session.select_category("Pokemon");
        for round in 0..2 {
            solve(&mut session, round);
            assert!(session.poll(u64::MAX));
        }
        let outcome = solve(&mut session, 10);
        assert_eq!(
            outcome,
            CheckOutcome::Completed {
                outcome: CompletionOutcome::LevelUp { level: 2 }
            }
        );
        assert_eq!(session.phase(), GamePhase::LevelUp);
        assert_eq!(session.next_puzzle_at_ms(), None);
        assert_eq!(session.check(11), CheckOutcome::NotPlaying);

        let saved = store.raw("animeXwordProgress").unwrap();
        assert!(saved.contains(r#""Pokemon":{"level":2,"puzzlesCompleted":0}"#));

        assert!(session.next_puzzle());
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn progress_survives_new_session() {
        let store = MemoryStore::new();
        let words = WordTable::load_from_static().unwrap();
        let mut first = GameSession::new(words.clone(), store.clone(), SessionConfig::default());
        first.select_category("Demon Slayer");
        solve(&mut first, 0);

        let second = GameSession::new(words, store, SessionConfig::default());
        assert_eq!(second.progress("Demon Slayer").puzzles_completed, 1);
    }

    #[test]
    fn failed_save_keeps_in_memory_progress() {
        let mut session = GameSession::new(
            WordTable::load_from_static().unwrap(),
            MemoryStore::failing(),
            SessionConfig::default(),
        );
        session.select_category("Naruto");
        assert!(matches!(solve(&mut session, 0), CheckOutcome::Completed { .. }));
        assert_eq!(session.progress("Naruto").puzzles_completed, 1);
    }

    #[test]
    fn unknown_category_plays_fallback_words() {
        let mut session = session();
        session.select_category("Cowboy Bebop");
        assert_eq!(session.puzzle().unwrap().words[0].word, "LUFFY");
        assert_eq!(session.progress("Cowboy Bebop"), ProgressRecord::default());
    }

    #[test]
    fn back_to_menu_resets_board_and_schedule() {
        let mut session = session();
        session.select_category("Naruto");
        solve(&mut session, 0);
        session.back_to_menu();
        assert_eq!(session.phase(), GamePhase::Menu);
        assert!(session.puzzle().is_none());
        assert!(!session.poll(u64::MAX));
        assert!(!session.next_puzzle());
        assert!(!session.select_cell(0, 0));
    }

    #[test]
    fn snapshot_exposes_clues_and_progress() {
        let mut session = session();
        session.select_category("Naruto");
        session.select_cell(0, 0);
        let snap = session.snapshot();
        assert_eq!(snap.category.as_deref(), Some("Naruto"));
        assert_eq!(snap.puzzles_needed, Some(3));
        assert_eq!(snap.across_clues.len(), 2);
        assert_eq!(snap.down_clues.len(), 1);
        assert_eq!(snap.selection.selected_cell, Some((0, 0)));
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["phase"], "playing");
    }

    #[test]
    fn snapshot_tracks_crossing_words_and_fill() {
        let mut session = session();
        assert!(session.snapshot().selected_numbers.is_empty());
        assert_eq!(session.snapshot().open_cells, 0);

        session.select_category("Naruto");
        let blank = session.snapshot();
        assert_eq!(blank.open_cells, 18);
        assert_eq!(blank.filled_cells, 0);

        session.select_cell(2, 1);
        session.handle_key("s");
        let snap = session.snapshot();
        assert_eq!(snap.selected_numbers, vec![2]);
        assert_eq!(snap.filled_cells, 1);

        session.reveal();
        let revealed = session.snapshot();
        assert_eq!(revealed.filled_cells, revealed.open_cells);
    }
}
