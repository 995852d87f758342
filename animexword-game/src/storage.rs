//! Key-value persistence for category progress.
//!
//! The engine never surfaces storage failures to the player: unreadable or
//! corrupt saves load as an empty book and failed writes are logged while the
//! in-memory progress stays authoritative.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

use crate::progress::{ProgressBook, ProgressRecord};

/// Errors raised by a progress store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("i/o failure for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("stored progress is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A string key-value store with get/set semantics, such as browser local
/// storage or a directory of files.
pub trait ProgressStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store. Clones share the same backing map, so a test can keep a
/// handle while a session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every write fails, for exercising error paths.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Seed a raw value, bypassing serialization.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl ProgressStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        self.insert_raw(key, value);
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
///
/// ASCII letters, digits and `-` pass through into the file name; every other
/// byte of the key, `_` included, is written as `_XX` hex, so distinct keys
/// never share a file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut file = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                file.push(char::from(byte));
            } else {
                file.push_str(&format!("_{byte:02X}"));
            }
        }
        self.dir.join(format!("{file}.json"))
    }
}

impl ProgressStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        fs::write(self.path_for(key), value).map_err(io_err)
    }
}

/// Parse a stored progress book.
///
/// Records are decoded one category at a time, so a single malformed record
/// is reset to its default without discarding the others.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the entry is not a JSON
/// object.
pub fn read_progress<S: ProgressStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<ProgressBook, StorageError> {
    let Some(text) = store.get(key)? else {
        return Ok(ProgressBook::new());
    };
    let entries: BTreeMap<String, serde_json::Value> = serde_json::from_str(&text)?;
    let mut book = ProgressBook::new();
    for (category, value) in entries {
        let record = serde_json::from_value::<ProgressRecord>(value).unwrap_or_else(|err| {
            log::warn!("Resetting unreadable progress for '{category}' in '{key}': {err}");
            ProgressRecord::default()
        });
        *book.record_mut(&category) = record;
    }
    Ok(book.sanitized())
}

/// Load progress, treating a missing or unreadable entry as empty.
pub fn load_progress<S: ProgressStore + ?Sized>(store: &S, key: &str) -> ProgressBook {
    read_progress(store, key).unwrap_or_else(|err| {
        log::warn!("Error loading progress from '{key}': {err}");
        ProgressBook::new()
    })
}

/// Persist progress. Failures are logged and reported as `false`.
pub fn save_progress<S: ProgressStore + ?Sized>(
    store: &mut S,
    key: &str,
    book: &ProgressBook,
) -> bool {
    let result = serde_json::to_string(book)
        .map_err(StorageError::from)
        .and_then(|json| store.set(key, &json));
    match result {
        Ok(()) => true,
        Err(err) => {
            log::error!("Error saving progress to '{key}': {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "animeXwordProgress";

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "animexword-store-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn missing_entry_loads_empty_book() {
        let store = MemoryStore::new();
        assert!(load_progress(&store, KEY).is_empty());
    }

    #[test]
    fn corrupt_entry_loads_empty_book() {
        let store = MemoryStore::new();
        store.insert_raw(KEY, "{ definitely not json");
        assert!(matches!(
            read_progress(&store, KEY),
            Err(StorageError::Corrupt(_))
        ));
        assert!(load_progress(&store, KEY).is_empty());
    }

    #[test]
    fn saved_book_round_trips_through_memory() {
        let mut store = MemoryStore::new();
        let mut book = ProgressBook::new();
        book.record_mut("Naruto").level = 5;
        assert!(save_progress(&mut store, KEY, &book));
        assert_eq!(load_progress(&store, KEY).get("Naruto").level, 5);
    }

    #[test]
    fn loaded_levels_are_clamped() {
        let store = MemoryStore::new();
        store.insert_raw(KEY, r#"{"Bleach":{"level":120,"puzzlesCompleted":2}}"#);
        let book = load_progress(&store, KEY);
        assert_eq!(book.get("Bleach").level, 50);
        assert_eq!(book.get("Bleach").puzzles_completed, 2);
    }

    #[test]
    fn failed_write_is_reported_not_raised() {
        let mut store = MemoryStore::failing();
        assert!(!save_progress(&mut store, KEY, &ProgressBook::new()));
        assert!(store.raw(KEY).is_none());
    }

    #[test]
    fn file_store_round_trips_and_sanitizes_key() {
        let dir = temp_dir("roundtrip");
        let mut store = FileStore::new(&dir);
        assert_eq!(store.get("a/b").unwrap(), None);
        store.set("a/b", "{}").unwrap();
        assert_eq!(store.get("a/b").unwrap().as_deref(), Some("{}"));
        assert!(dir.join("a_2Fb.json").exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn file_store_keys_never_share_a_file() {
        let dir = temp_dir("collide");
        let mut store = FileStore::new(&dir);
        store.set("a/b", "slash").unwrap();
        store.set("a_b", "underscore").unwrap();
        assert_eq!(store.get("a/b").unwrap().as_deref(), Some("slash"));
        assert_eq!(store.get("a_b").unwrap().as_deref(), Some("underscore"));
        assert!(dir.join("a_5Fb.json").exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn malformed_record_does_not_discard_the_rest() {
        let mut store = MemoryStore::new();
        store.insert_raw(
            KEY,
            r#"{"Naruto":{"level":12,"puzzlesCompleted":2},"Bleach":null,"Pokemon":{"level":"high"}}"#,
        );
        let mut book = load_progress(&store, KEY);
        assert_eq!(book.get("Naruto").level, 12);
        assert_eq!(book.get("Naruto").puzzles_completed, 2);
        assert_eq!(book.get("Bleach"), ProgressRecord::default());
        assert_eq!(book.get("Pokemon"), ProgressRecord::default());

        book.complete_puzzle("Bleach");
        assert!(save_progress(&mut store, KEY, &book));
        let reloaded = load_progress(&store, KEY);
        assert_eq!(reloaded.get("Naruto").level, 12);
        assert_eq!(reloaded.get("Bleach").puzzles_completed, 1);
    }

    #[test]
    fn non_object_save_is_corrupt() {
        let store = MemoryStore::new();
        store.insert_raw(KEY, "[1, 2]");
        assert!(matches!(
            read_progress(&store, KEY),
            Err(StorageError::Corrupt(_))
        ));
    }
}
