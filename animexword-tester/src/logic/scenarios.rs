//! Scripted sessions that drive the engine end to end.
//!
//! Each scenario plays one category through a fresh [`GameSession`] and
//! returns a one-line summary, or an error naming the first broken
//! expectation.

use anyhow::{Context, Result, bail, ensure};
use std::path::PathBuf;

use animexword_game::{
    BundledWords, CheckOutcome, CompletionOutcome, FileStore, GameEngine, GamePhase, GameSession,
    MAX_LEVEL, MIN_LEVEL, MemoryStore, ProgressStore, SessionConfig, grid_size, puzzles_needed,
    read_progress, words_for_level,
};

use crate::util::scratch_dir;

const STEP_MS: u64 = 1_000;

/// Inputs for one scenario iteration.
#[derive(Debug, Clone)]
pub struct ScenarioCtx {
    pub category: String,
    pub iteration: usize,
    pub store_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl ScenarioCtx {
    pub fn new(category: impl Into<String>, iteration: usize) -> Self {
        Self {
            category: category.into(),
            iteration,
            store_dir: None,
            verbose: false,
        }
    }

    /// Level used by scenarios that play somewhere other than level 1, so
    /// repeated iterations sweep the grid bands.
    fn sweep_level(&self) -> u32 {
        let span = usize::try_from(MAX_LEVEL).unwrap_or(1);
        let offset = (self.iteration * 17) % span;
        MIN_LEVEL + u32::try_from(offset).unwrap_or(0)
    }
}

pub type ScenarioCheck = fn(&ScenarioCtx) -> Result<String>;

#[derive(Debug, Clone, Copy)]
pub struct TestScenario {
    pub key: &'static str,
    pub description: &'static str,
    pub check: ScenarioCheck,
}

impl TestScenario {
    /// Run the scenario for one category and iteration.
    ///
    /// # Errors
    ///
    /// Returns the first expectation the session failed.
    pub fn run(&self, ctx: &ScenarioCtx) -> Result<String> {
        (self.check)(ctx).with_context(|| format!("{} [{}]", self.key, ctx.category))
    }
}

pub fn all_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario {
            key: "smoke",
            description: "Open a category, check layout size, solve one puzzle",
            check: smoke,
        },
        TestScenario {
            key: "level-progression",
            description: "Solve a full level and confirm the level-up screen",
            check: level_progression,
        },
        TestScenario {
            key: "typing",
            description: "Type every answer key by key, with a backspace correction",
            check: typing,
        },
        TestScenario {
            key: "wrong-answer",
            description: "A wrong letter blocks completion until corrected",
            check: wrong_answer,
        },
        TestScenario {
            key: "persistence",
            description: "Progress written to disk is visible to a new engine",
            check: persistence,
        },
        TestScenario {
            key: "terminal-level",
            description: "The top level keeps counting without levelling up",
            check: terminal_level,
        },
        TestScenario {
            key: "corrupt-save",
            description: "An unreadable save starts fresh and is overwritten",
            check: corrupt_save,
        },
    ]
}

pub fn find_scenario(key: &str) -> Option<TestScenario> {
    all_scenarios().into_iter().find(|s| s.key == key)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    all_scenarios()
        .into_iter()
        .map(|s| (s.key, s.description))
        .collect()
}

pub fn scenario_keys() -> Vec<String> {
    all_scenarios().iter().map(|s| s.key.to_string()).collect()
}

fn memory_engine(store: MemoryStore) -> GameEngine<BundledWords, MemoryStore> {
    GameEngine::new(BundledWords, store)
}

/// A memory store holding one saved record for `category`.
fn seeded_store(category: &str, level: u32, puzzles_completed: u32) -> Result<MemoryStore> {
    let store = MemoryStore::new();
    let save = serde_json::json!({
        category: { "level": level, "puzzlesCompleted": puzzles_completed }
    });
    store.insert_raw(
        &SessionConfig::default().storage_key,
        &serde_json::to_string(&save)?,
    );
    Ok(store)
}

fn open<S: ProgressStore + Clone>(
    engine: &GameEngine<BundledWords, S>,
    category: &str,
) -> Result<GameSession<S>> {
    let mut session = engine
        .create_session()
        .context("bundled word table failed to load")?;
    session.select_category(category);
    ensure!(
        session.phase() == GamePhase::Playing,
        "selecting a category left the session on {:?}",
        session.phase()
    );
    Ok(session)
}

fn solve_current<S: ProgressStore>(
    session: &mut GameSession<S>,
    now_ms: u64,
) -> Result<CompletionOutcome> {
    session.reveal();
    match session.check(now_ms) {
        CheckOutcome::Completed { outcome } => Ok(outcome),
        other => bail!("revealed grid was not accepted: {other:?}"),
    }
}

fn expected_word_count<S: ProgressStore>(session: &GameSession<S>, level: u32) -> usize {
    let category = session.category().unwrap_or_default();
    words_for_level(level).min(session.words().words_for(category).len())
}

fn assert_layout<S: ProgressStore>(session: &GameSession<S>, level: u32) -> Result<()> {
    let puzzle = session.puzzle().context("no puzzle generated")?;
    ensure!(
        puzzle.size == grid_size(level),
        "level {level} grid is {} wide, expected {}",
        puzzle.size,
        grid_size(level)
    );
    let expected = expected_word_count(session, level);
    ensure!(
        puzzle.words.len() == expected,
        "level {level} placed {} words, expected {expected}",
        puzzle.words.len()
    );
    Ok(())
}

fn smoke(ctx: &ScenarioCtx) -> Result<String> {
    let engine = memory_engine(MemoryStore::new());
    let mut session = open(&engine, &ctx.category)?;
    assert_layout(&session, MIN_LEVEL)?;
    let (words, size) = session
        .puzzle()
        .map(|p| (p.words.len(), p.size))
        .unwrap_or_default();

    let outcome = solve_current(&mut session, 0)?;
    ensure!(
        outcome
            == CompletionOutcome::PuzzleAdvance {
                level: MIN_LEVEL,
                puzzles_completed: 1
            },
        "first solve reported {outcome:?}"
    );
    Ok(format!("{words} words on a {size}x{size} grid"))
}

fn level_progression(ctx: &ScenarioCtx) -> Result<String> {
    let engine = memory_engine(MemoryStore::new());
    let mut session = open(&engine, &ctx.category)?;
    let delay = session.config().advance_delay_ms;
    let needed = puzzles_needed(MIN_LEVEL);

    let mut now = 0;
    for round in 1..=needed {
        let outcome = solve_current(&mut session, now)?;
        if round < needed {
            ensure!(
                outcome
                    == CompletionOutcome::PuzzleAdvance {
                        level: MIN_LEVEL,
                        puzzles_completed: round
                    },
                "round {round} reported {outcome:?}"
            );
            ensure!(
                session.check(now) == CheckOutcome::AwaitingNextPuzzle,
                "a solved puzzle was accepted twice"
            );
            now += delay;
            ensure!(session.poll(now), "scheduled puzzle did not appear");
        } else {
            ensure!(
                outcome == CompletionOutcome::LevelUp { level: MIN_LEVEL + 1 },
                "final round reported {outcome:?}"
            );
        }
    }

    ensure!(session.phase() == GamePhase::LevelUp, "level-up screen not shown");
    ensure!(session.next_puzzle(), "could not continue after level-up");
    assert_layout(&session, MIN_LEVEL + 1)?;

    let saved = engine.load_progress().get(&ctx.category);
    ensure!(
        saved.level == MIN_LEVEL + 1 && saved.puzzles_completed == 0,
        "saved progress is {saved:?}"
    );
    Ok(format!("reached level {} after {needed} puzzles", saved.level))
}

fn typing(ctx: &ScenarioCtx) -> Result<String> {
    let level = ctx.sweep_level();
    let engine = memory_engine(seeded_store(&ctx.category, level, 0)?);
    let mut session = open(&engine, &ctx.category)?;
    assert_layout(&session, level)?;
    let puzzle = session.puzzle().cloned().context("no puzzle generated")?;

    let mut typed = 0;
    for word in &puzzle.words {
        let visible: Vec<((usize, usize), char)> = word
            .cells(puzzle.size)
            .map(|(_, pos, ch)| (pos, ch))
            .collect();
        let Some(&((row, col), _)) = visible.first() else {
            continue;
        };
        ensure!(session.select_cell(row, col), "start of {} is black", word.word);
        for (_, ch) in &visible {
            ensure!(
                session.handle_key(&ch.to_ascii_lowercase().to_string()),
                "key '{ch}' rejected in {}",
                word.word
            );
            typed += 1;
        }

        let Some(&(last, answer)) = visible.last() else {
            continue;
        };
        ensure!(
            session.selection().selected_cell == Some(last),
            "cursor left {} at {:?}",
            word.word,
            session.selection().selected_cell
        );
        ensure!(session.handle_key("Backspace"), "backspace ignored");
        let cleared = session.grid().and_then(|g| g.cell(last.0, last.1)).cloned();
        ensure!(
            cleared.is_some_and(|c| c.user_input.is_none()),
            "backspace did not clear {last:?}"
        );
        ensure!(session.handle_key(&answer.to_string()), "retype rejected");

        let grid = session.grid().context("grid vanished")?;
        let expected: String = visible.iter().map(|(_, ch)| ch).collect();
        ensure!(
            grid.read_word(word) == expected,
            "{} reads back as {}",
            word.word,
            grid.read_word(word)
        );
    }

    let snapshot = session.snapshot();
    ensure!(
        snapshot.filled_cells == snapshot.open_cells,
        "{} of {} open cells filled after typing",
        snapshot.filled_cells,
        snapshot.open_cells
    );

    match session.check(0) {
        CheckOutcome::Completed { outcome } => ensure!(
            outcome.level() >= level,
            "typed solve dropped the level to {}",
            outcome.level()
        ),
        other => bail!("typed grid was not accepted: {other:?}"),
    }
    Ok(format!("typed {typed} letters at level {level}"))
}

fn wrong_answer(ctx: &ScenarioCtx) -> Result<String> {
    let engine = memory_engine(MemoryStore::new());
    let mut session = open(&engine, &ctx.category)?;
    let first = session
        .puzzle()
        .and_then(|p| p.words.first())
        .map(|w| (w.position_of(0), w.word.chars().next()))
        .context("puzzle has no words")?;
    let ((row, col), Some(answer)) = first else {
        bail!("first word is empty");
    };
    let wrong = if answer == 'A' { 'B' } else { 'A' };

    ensure!(session.set_input(row, col, wrong), "wrong letter rejected");
    ensure!(
        session.check(0) == CheckOutcome::Incorrect,
        "wrong letter was accepted"
    );
    let marked = session.grid().and_then(|g| g.cell(row, col)).cloned();
    ensure!(marked.is_some_and(|c| c.is_wrong()), "wrong cell not flagged");
    ensure!(
        session.progress(&ctx.category).puzzles_completed == 0,
        "incorrect check recorded progress"
    );

    ensure!(session.set_input(row, col, answer), "correction rejected");
    ensure!(
        matches!(session.check(STEP_MS), CheckOutcome::Completed { .. }),
        "corrected grid was not accepted"
    );
    Ok(format!("'{wrong}' rejected, '{answer}' accepted"))
}

fn persistence(ctx: &ScenarioCtx) -> Result<String> {
    let (dir, scratch) = match &ctx.store_dir {
        Some(root) => (root.join(format!("iteration-{}", ctx.iteration)), false),
        None => (scratch_dir("persistence"), true),
    };
    if ctx.verbose {
        println!("     ↳ saving under {}", dir.display());
    }
    let key = SessionConfig::default().storage_key;
    let before = read_progress(&FileStore::new(&dir), &key)
        .map(|book| book.get(&ctx.category))
        .unwrap_or_default();

    {
        let engine = GameEngine::new(BundledWords, FileStore::new(&dir));
        let mut session = open(&engine, &ctx.category)?;
        solve_current(&mut session, 0)?;
    }

    let engine = GameEngine::new(BundledWords, FileStore::new(&dir));
    let session = engine
        .create_session()
        .context("bundled word table failed to load")?;
    let after = session.progress(&ctx.category);
    let advanced = after.puzzles_completed == before.puzzles_completed + 1
        || (after.level == before.level + 1 && after.puzzles_completed == 0);
    let summary = format!("{before:?} -> {after:?} in {}", dir.display());

    if scratch {
        let _ = std::fs::remove_dir_all(&dir);
    }
    ensure!(advanced, "reloaded progress did not advance: {summary}");
    Ok(summary)
}

fn terminal_level(ctx: &ScenarioCtx) -> Result<String> {
    let needed = puzzles_needed(MAX_LEVEL);
    let engine = memory_engine(seeded_store(&ctx.category, MAX_LEVEL, needed - 1)?);
    let mut session = open(&engine, &ctx.category)?;
    assert_layout(&session, MAX_LEVEL)?;

    let mut now = 0;
    for extra in 0..2 {
        let outcome = solve_current(&mut session, now)?;
        let expected = CompletionOutcome::PuzzleAdvance {
            level: MAX_LEVEL,
            puzzles_completed: needed + extra,
        };
        ensure!(outcome == expected, "top level reported {outcome:?}");
        now += session.config().advance_delay_ms;
        ensure!(session.poll(now), "scheduled puzzle did not appear");
    }
    let saved = engine.load_progress().get(&ctx.category);
    ensure!(saved.level == MAX_LEVEL, "saved level is {}", saved.level);
    Ok(format!(
        "level {MAX_LEVEL} counter at {}/{needed}",
        saved.puzzles_completed
    ))
}

fn corrupt_save(ctx: &ScenarioCtx) -> Result<String> {
    let store = MemoryStore::new();
    let key = SessionConfig::default().storage_key;
    store.insert_raw(&key, "{\"oops\": ");
    let engine = memory_engine(store.clone());
    let mut session = open(&engine, &ctx.category)?;
    ensure!(
        session
            .categories()
            .iter()
            .all(|c| c.level == MIN_LEVEL && c.puzzles_completed == 0),
        "corrupt save leaked progress"
    );
    solve_current(&mut session, 0)?;

    let book = read_progress(&store, &key).context("save was not rewritten")?;
    ensure!(
        book.get(&ctx.category).puzzles_completed == 1,
        "rewritten save holds {:?}",
        book.get(&ctx.category)
    );
    Ok(format!("save rewritten with {} categories", book.len()))
}
