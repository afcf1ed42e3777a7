// src/deck/loader.rs
// This file contains the logic for reading the JSON word list.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use super::{Difficulty, WordList, WordRecord};
use crate::error::DeckError;

pub const DEFAULT_DEFINITION: &str = "No definition available.";
pub const DEFAULT_EXAMPLE: &str = "No example available.";
pub const DEFAULT_PART_OF_SPEECH: &str = "unknown";
pub const DEFAULT_FREQUENCY: &str = "unknown";
pub const DEFAULT_ETYMOLOGY: &str = "Etymology not available.";
pub const DEFAULT_MEMORY_AID: &str = "No memory aid yet.";

/// A word exactly as it appears in the source file. Every field may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawWord {
    word: Option<String>,
    definition: Option<String>,
    example: Option<String>,
    examples: Option<Vec<String>>,
    difficulty: Option<String>,
    part_of_speech: Option<String>,
    frequency: Option<serde_json::Value>,
    etymology: Option<String>,
    synonyms: Option<Vec<String>>,
    memory_aid: Option<String>,
}

fn text_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => default.to_string(),
    }
}

impl RawWord {
    /// Resolves every optional field once. Returns `None` when there is no usable key.
    fn into_record(self) -> Option<WordRecord> {
        let word = self.word.map(|w| w.trim().to_string()).filter(|w| !w.is_empty())?;

        // `example` wins over `examples[0]` when both are present.
        let example = self
            .example
            .or_else(|| self.examples.unwrap_or_default().into_iter().next());

        let difficulty = match self.difficulty.as_deref() {
            Some(raw) => Difficulty::parse(raw).unwrap_or_else(|| {
                warn!("Unknown difficulty '{}' for '{}', treating as medium", raw, word);
                Difficulty::default()
            }),
            None => Difficulty::default(),
        };

        let frequency = match self.frequency {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };

        Some(WordRecord {
            word,
            definition: text_or(self.definition, DEFAULT_DEFINITION),
            example: text_or(example, DEFAULT_EXAMPLE),
            difficulty,
            part_of_speech: text_or(self.part_of_speech, DEFAULT_PART_OF_SPEECH),
            frequency: text_or(frequency, DEFAULT_FREQUENCY),
            etymology: text_or(self.etymology, DEFAULT_ETYMOLOGY),
            synonyms: self.synonyms.unwrap_or_default(),
            memory_aid: text_or(self.memory_aid, DEFAULT_MEMORY_AID),
        })
    }
}

/// Parses a JSON array of words, dropping keyless records and duplicate keys.
pub fn parse_words(json: &str) -> Result<Vec<WordRecord>, DeckError> {
    let raw: Vec<RawWord> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    let mut words = Vec::with_capacity(raw.len());

    for (position, entry) in raw.into_iter().enumerate() {
        match entry.into_record() {
            Some(record) => {
                if seen.insert(record.word.clone()) {
                    words.push(record);
                } else {
                    warn!("Duplicate word '{}' at position {}, keeping the first", record.word, position);
                }
            }
            None => warn!("Skipping word record {} with no word text", position),
        }
    }

    if words.is_empty() {
        return Err(DeckError::Empty);
    }
    Ok(words)
}

/// Reads and parses the word list at `path`.
pub fn load_words(path: &Path) -> Result<Vec<WordRecord>, DeckError> {
    let json = fs::read_to_string(path).map_err(|source| DeckError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_words(&json)
}

/// Loads the word list, falling back to the built-in words on any failure.
pub fn load_or_fallback(path: &Path) -> WordList {
    match load_words(path) {
        Ok(words) => {
            info!("Loaded {} words from {:?}", words.len(), path);
            WordList { words, used_fallback: false }
        }
        Err(e) => {
            warn!("Could not load words ({}), using the built-in list", e);
            WordList { words: fallback_words(), used_fallback: true }
        }
    }
}

/// The small static list used when the word source is unavailable.
pub fn fallback_words() -> Vec<WordRecord> {
    vec![
        WordRecord::new("Happy", "Feeling joy or pleasure", "She was happy to see her friend.")
            .with_difficulty(Difficulty::Easy),
        WordRecord::new("Brave", "Showing courage", "The brave firefighter saved the cat.")
            .with_difficulty(Difficulty::Easy),
        WordRecord::new("Curious", "Eager to learn or know", "The curious child asked many questions.")
            .with_difficulty(Difficulty::Medium),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_fields_get_placeholders() {
        let words = parse_words(r#"[{"word": "laconic"}]"#).unwrap();
        let w = &words[0];
        assert_eq!(w.definition, DEFAULT_DEFINITION);
        assert_eq!(w.example, DEFAULT_EXAMPLE);
        assert_eq!(w.part_of_speech, DEFAULT_PART_OF_SPEECH);
        assert_eq!(w.etymology, DEFAULT_ETYMOLOGY);
        assert_eq!(w.memory_aid, DEFAULT_MEMORY_AID);
        assert_eq!(w.difficulty, Difficulty::Medium);
        assert!(w.synonyms.is_empty());
    }

    #[test]
    fn test_null_optional_fields_get_placeholders() {
        let words = parse_words(
            r#"[{"word": "abate", "definition": "lessen"},
                {"word": "zeal", "synonyms": null, "examples": null, "example": null,
                 "difficulty": null, "frequency": null, "memoryAid": null}]"#,
        )
        .unwrap();
        assert_eq!(words.len(), 2);
        let zeal = &words[1];
        assert!(zeal.synonyms.is_empty());
        assert_eq!(zeal.example, DEFAULT_EXAMPLE);
        assert_eq!(zeal.frequency, DEFAULT_FREQUENCY);
        assert_eq!(zeal.memory_aid, DEFAULT_MEMORY_AID);
        assert_eq!(zeal.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_examples_array_becomes_canonical_example() {
        let words = parse_words(
            r#"[{"word": "ephemeral", "definition": "short-lived",
                 "examples": ["Fame is ephemeral.", "A second one."],
                 "difficulty": "hard", "partOfSpeech": "adjective", "frequency": 3,
                 "synonyms": ["fleeting", "transient"], "memoryAid": "E for evaporates"}]"#,
        )
        .unwrap();
        let w = &words[0];
        assert_eq!(w.example, "Fame is ephemeral.");
        assert_eq!(w.difficulty, Difficulty::Hard);
        assert_eq!(w.part_of_speech, "adjective");
        assert_eq!(w.frequency, "3");
        assert_eq!(w.synonyms, vec!["fleeting", "transient"]);
        assert_eq!(w.memory_aid, "E for evaporates");
    }

    #[test]
    fn test_keyless_and_duplicate_records_are_dropped() {
        let words = parse_words(
            r#"[{"word": "abate"}, {"definition": "orphan"}, {"word": "  "}, {"word": "abate", "definition": "second"}]"#,
        )
        .unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].definition, DEFAULT_DEFINITION);
    }

    #[test]
    fn test_empty_list_is_an_error() {
        assert!(matches!(parse_words("[]"), Err(DeckError::Empty)));
        assert!(matches!(parse_words("{not json"), Err(DeckError::Json(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"word": "candid", "definition": "frank"}}]"#).unwrap();
        let list = load_or_fallback(file.path());
        assert!(!list.used_fallback);
        assert_eq!(list.get("candid").unwrap().definition, "frank");
    }

    #[test]
    fn test_missing_file_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let list = load_or_fallback(&dir.path().join("nope.json"));
        assert!(list.used_fallback);
        assert_eq!(list.len(), 3);
        assert!(list.get("Brave").is_some());
    }
}
