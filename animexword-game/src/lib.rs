//! AnimeXword Game Engine
//!
//! Platform-agnostic core logic for the AnimeXword crossword game: puzzle
//! layout, grid and cursor handling, answer checking and per-category level
//! progression. Rendering and raw input events belong to the embedding UI.

pub mod config;
pub mod constants;
pub mod data;
pub mod grid;
pub mod input;
pub mod level;
pub mod numbers;
pub mod progress;
pub mod puzzle;
pub mod selection;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigError, SessionConfig};
pub use constants::{MAX_LEVEL, MIN_LEVEL};
pub use data::{CategoryWords, WordEntry, WordTable, WordTableError};
pub use grid::{Cell, Grid};
pub use input::{KeyCommand, normalize_letter, parse_key};
pub use level::{grid_size, puzzles_needed, words_for_level};
pub use progress::{CategorySummary, CompletionOutcome, ProgressBook, ProgressRecord};
pub use puzzle::{ClueLine, Direction, PlacedWord, Position, Puzzle};
pub use selection::SelectionState;
pub use session::{CheckOutcome, GamePhase, GameSession, SessionSnapshot};
pub use storage::{
    FileStore, MemoryStore, ProgressStore, StorageError, load_progress, read_progress,
    save_progress,
};

/// Trait for abstracting word table loading.
/// Platform-specific implementations should provide this
pub trait WordSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the category word table
    ///
    /// # Errors
    ///
    /// Returns an error if the word table cannot be loaded.
    fn load_word_table(&self) -> Result<WordTable, Self::Error>;
}

/// Word source backed by the table compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledWords;

impl WordSource for BundledWords {
    type Error = WordTableError;

    fn load_word_table(&self) -> Result<WordTable, Self::Error> {
        WordTable::load_from_static()
    }
}

/// Main game engine for opening sessions over a word source and a store
pub struct GameEngine<L, S>
where
    L: WordSource,
    S: ProgressStore + Clone,
{
    word_source: L,
    storage: S,
    config: SessionConfig,
}

impl<L, S> GameEngine<L, S>
where
    L: WordSource,
    S: ProgressStore + Clone,
{
    /// Create a new game engine with the provided word source and storage
    pub fn new(word_source: L, storage: S) -> Self {
        Self::with_config(word_source, storage, SessionConfig::default())
    }

    /// Create a game engine with explicit session settings
    pub const fn with_config(word_source: L, storage: S, config: SessionConfig) -> Self {
        Self {
            word_source,
            storage,
            config,
        }
    }

    /// Open a session with saved progress loaded from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the word table cannot be loaded.
    pub fn create_session(&self) -> Result<GameSession<S>, L::Error> {
        let words = self.word_source.load_word_table()?;
        Ok(GameSession::new(
            words,
            self.storage.clone(),
            self.config.clone(),
        ))
    }

    /// Saved progress as currently persisted.
    #[must_use]
    pub fn load_progress(&self) -> ProgressBook {
        storage::load_progress(&self.storage, &self.config.storage_key)
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct FixtureSource;

    impl WordSource for FixtureSource {
        type Error = Infallible;

        fn load_word_table(&self) -> Result<WordTable, Self::Error> {
            Ok(WordTable::new(
                "Tiny",
                vec![CategoryWords {
                    name: "Tiny".to_string(),
                    words: vec![
                        WordEntry::new("GOKU", "Saiyan"),
                        WordEntry::new("GOHAN", "Son"),
                        WordEntry::new("VEGETA", "Prince"),
                    ],
                }],
            )
            .unwrap())
        }
    }

    #[test]
    fn engine_sessions_share_storage() {
        let engine = GameEngine::new(FixtureSource, MemoryStore::new());
        let mut session = engine.create_session().unwrap();
        session.select_category("Tiny");
        session.reveal();
        assert!(matches!(session.check(0), CheckOutcome::Completed { .. }));

        let reopened = engine.create_session().unwrap();
        assert_eq!(reopened.progress("Tiny").puzzles_completed, 1);
        assert_eq!(engine.load_progress().get("Tiny").puzzles_completed, 1);
    }

    #[test]
    fn bundled_words_load() {
        let engine = GameEngine::with_config(
            BundledWords,
            MemoryStore::new(),
            SessionConfig::default().with_advance_delay_ms(0),
        );
        let session = engine.create_session().unwrap();
        assert_eq!(session.categories().len(), 9);
        assert_eq!(engine.config().advance_delay_ms, 0);
    }
}
