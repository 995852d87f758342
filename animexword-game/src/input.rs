//! Filtering of raw player input before it reaches the grid.

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Letter(char),
    Backspace,
}

/// Accept a single ASCII letter, uppercased. Anything else is rejected.
#[must_use]
pub fn normalize_letter(ch: char) -> Option<char> {
    ch.is_ascii_alphabetic().then(|| ch.to_ascii_uppercase())
}

/// Decode a key name as reported by a UI toolkit (`"a"`, `"Backspace"`).
///
/// Multi-character names other than `Backspace` and non-letters are ignored.
#[must_use]
pub fn parse_key(key: &str) -> Option<KeyCommand> {
    if key == "Backspace" {
        return Some(KeyCommand::Backspace);
    }
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => normalize_letter(ch).map(KeyCommand::Letter),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_are_uppercased() {
        assert_eq!(normalize_letter('k'), Some('K'));
        assert_eq!(normalize_letter('Z'), Some('Z'));
    }

    #[test]
    fn non_letters_are_rejected() {
        for ch in ['1', ' ', '-', 'é', 'ß'] {
            assert_eq!(normalize_letter(ch), None, "{ch:?}");
        }
    }

    #[test]
    fn key_names_decode() {
        assert_eq!(parse_key("q"), Some(KeyCommand::Letter('Q')));
        assert_eq!(parse_key("Backspace"), Some(KeyCommand::Backspace));
        assert_eq!(parse_key("Shift"), None);
        assert_eq!(parse_key("7"), None);
        assert_eq!(parse_key(""), None);
    }
}
