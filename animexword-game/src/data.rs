use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_WORD_DATA: &str = include_str!("../assets/words.json");

/// A single answer and its clue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub clue: String,
}

impl WordEntry {
    #[must_use]
    pub fn new(word: impl Into<String>, clue: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            clue: clue.into(),
        }
    }

    /// Number of letters in the answer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.word.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }
}

/// A themed category and its ordered word list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWords {
    pub name: String,
    #[serde(default)]
    pub words: Vec<WordEntry>,
}

/// Errors raised when a word table violates its invariants.
#[derive(Debug, Error)]
pub enum WordTableError {
    #[error("word table JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("word table has no categories")]
    NoCategories,
    #[error("category '{0}' is listed more than once")]
    DuplicateCategory(String),
    #[error("category '{0}' has no words")]
    EmptyCategory(String),
    #[error("category '{category}' contains invalid word '{word}'")]
    InvalidWord { category: String, word: String },
    #[error("fallback category '{0}' is not in the table")]
    MissingFallback(String),
}

/// Container for every category's word list plus the fallback used for
/// unknown category names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordTable {
    pub fallback: String,
    pub categories: Vec<CategoryWords>,
}

impl WordTable {
    /// Build a validated table from pre-parsed categories.
    ///
    /// # Errors
    ///
    /// Returns an error if a category is empty or duplicated, a word is not
    /// purely alphabetic, or the fallback category is absent.
    pub fn new(
        fallback: impl Into<String>,
        categories: Vec<CategoryWords>,
    ) -> Result<Self, WordTableError> {
        Self {
            fallback: fallback.into(),
            categories,
        }
        .normalized()
    }

    /// Load a word table from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, WordTableError> {
        let table: Self = serde_json::from_str(json)?;
        table.normalized()
    }

    /// Load the word table bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled asset fails validation.
    pub fn load_from_static() -> Result<Self, WordTableError> {
        Self::from_json(DEFAULT_WORD_DATA)
    }

    fn normalized(mut self) -> Result<Self, WordTableError> {
        if self.categories.is_empty() {
            return Err(WordTableError::NoCategories);
        }
        for (idx, category) in self.categories.iter().enumerate() {
            if self.categories[..idx]
                .iter()
                .any(|earlier| earlier.name == category.name)
            {
                return Err(WordTableError::DuplicateCategory(category.name.clone()));
            }
        }
        for category in &mut self.categories {
            if category.words.is_empty() {
                return Err(WordTableError::EmptyCategory(category.name.clone()));
            }
            for entry in &mut category.words {
                let word = entry.word.trim().to_ascii_uppercase();
                if word.is_empty() || !word.chars().all(|c| c.is_ascii_uppercase()) {
                    return Err(WordTableError::InvalidWord {
                        category: category.name.clone(),
                        word: entry.word.clone(),
                    });
                }
                entry.word = word;
            }
        }
        if !self.contains(&self.fallback) {
            return Err(WordTableError::MissingFallback(self.fallback.clone()));
        }
        Ok(self)
    }

    /// Whether `category` has its own word list.
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c.name == category)
    }

    /// Category names in catalogue order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Word list for `category`, falling back to the fallback category's list.
    #[must_use]
    pub fn words_for(&self, category: &str) -> &[WordEntry] {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .or_else(|| self.categories.iter().find(|c| c.name == self.fallback))
            .map(|c| c.words.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, words: &[&str]) -> CategoryWords {
        CategoryWords {
            name: name.to_string(),
            words: words
                .iter()
                .map(|w| WordEntry::new(*w, format!("clue for {w}")))
                .collect(),
        }
    }

    #[test]
    fn bundled_table_loads_with_nine_categories() {
        let table = WordTable::load_from_static().unwrap();
        assert_eq!(table.categories.len(), 9);
        assert_eq!(table.fallback, "One Piece");
        assert_eq!(table.category_names().next(), Some("One Piece"));
        for category in &table.categories {
            assert_eq!(category.words.len(), 6, "{}", category.name);
        }
    }

    #[test]
    fn unknown_category_uses_fallback_words() {
        let table = WordTable::load_from_static().unwrap();
        let words = table.words_for("Cowboy Bebop");
        assert_eq!(words[0].word, "LUFFY");
        assert!(!table.contains("Cowboy Bebop"));
    }

    #[test]
    fn words_are_uppercased_and_trimmed() {
        let table = WordTable::new("A", vec![category("A", &[" goku "])]).unwrap();
        assert_eq!(table.words_for("A")[0].word, "GOKU");
        assert_eq!(table.words_for("A")[0].len(), 4);
    }

    #[test]
    fn rejects_non_alphabetic_words() {
        let err = WordTable::new("A", vec![category("A", &["ALL MIGHT"])]).unwrap_err();
        assert!(matches!(err, WordTableError::InvalidWord { .. }));
    }

    #[test]
    fn rejects_missing_fallback_and_empty_tables() {
        let err = WordTable::new("B", vec![category("A", &["GOKU"])]).unwrap_err();
        assert!(matches!(err, WordTableError::MissingFallback(name) if name == "B"));

        let err = WordTable::new("A", Vec::new()).unwrap_err();
        assert!(matches!(err, WordTableError::NoCategories));

        let err = WordTable::new("A", vec![category("A", &[])]).unwrap_err();
        assert!(matches!(err, WordTableError::EmptyCategory(_)));
    }

    #[test]
    fn rejects_duplicate_categories() {
        let err = WordTable::new(
            "A",
            vec![category("A", &["GOKU"]), category("A", &["VEGETA"])],
        )
        .unwrap_err();
        assert!(matches!(err, WordTableError::DuplicateCategory(name) if name == "A"));
    }

    #[test]
    fn from_json_reports_parse_errors() {
        let err = WordTable::from_json("{ not json").unwrap_err();
        assert!(matches!(err, WordTableError::Parse(_)));
    }
}
