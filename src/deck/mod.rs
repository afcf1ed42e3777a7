// src/deck/mod.rs
// This module holds the vocabulary records the schedulers study.

pub mod loader;

use serde::{Deserialize, Serialize};

/// Difficulty tier attached to a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Lenient parse used at ingestion. Unknown tiers yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Which tiers a Waterfall batch draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DifficultyFilter {
    #[default]
    All,
    MediumOrHard,
    HardOnly,
}

impl DifficultyFilter {
    pub fn accepts(self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::MediumOrHard => difficulty != Difficulty::Easy,
            DifficultyFilter::HardOnly => difficulty == Difficulty::Hard,
        }
    }
}

impl std::str::FromStr for DifficultyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(DifficultyFilter::All),
            "medium-or-hard" | "medium" => Ok(DifficultyFilter::MediumOrHard),
            "hard-only" | "hard" => Ok(DifficultyFilter::HardOnly),
            other => Err(format!("unknown difficulty filter '{}'", other)),
        }
    }
}

/// A single vocabulary entry. `word` is the unique key.
///
/// Optional fields from the word source are resolved to placeholder text
/// by the loader, so every field here is always displayable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    pub word: String,
    pub definition: String,
    pub example: String,
    pub difficulty: Difficulty,
    pub part_of_speech: String,
    pub frequency: String,
    pub etymology: String,
    pub synonyms: Vec<String>,
    pub memory_aid: String,
}

impl WordRecord {
    /// Builds a record with placeholder metadata. Mostly useful for built-in lists and tests.
    pub fn new(word: &str, definition: &str, example: &str) -> Self {
        WordRecord {
            word: word.to_string(),
            definition: definition.to_string(),
            example: example.to_string(),
            difficulty: Difficulty::default(),
            part_of_speech: loader::DEFAULT_PART_OF_SPEECH.to_string(),
            frequency: loader::DEFAULT_FREQUENCY.to_string(),
            etymology: loader::DEFAULT_ETYMOLOGY.to_string(),
            synonyms: Vec::new(),
            memory_aid: loader::DEFAULT_MEMORY_AID.to_string(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }
}

/// The words available for study, plus whether they came from the built-in fallback.
#[derive(Debug, Clone)]
pub struct WordList {
    pub words: Vec<WordRecord>,
    pub used_fallback: bool,
}

impl WordList {
    pub fn get(&self, word: &str) -> Option<&WordRecord> {
        self.words.iter().find(|w| w.word == word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_tiers() {
        assert!(DifficultyFilter::All.accepts(Difficulty::Easy));
        assert!(!DifficultyFilter::MediumOrHard.accepts(Difficulty::Easy));
        assert!(DifficultyFilter::MediumOrHard.accepts(Difficulty::Medium));
        assert!(DifficultyFilter::MediumOrHard.accepts(Difficulty::Hard));
        assert!(!DifficultyFilter::HardOnly.accepts(Difficulty::Medium));
        assert!(DifficultyFilter::HardOnly.accepts(Difficulty::Hard));
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("all".parse::<DifficultyFilter>().unwrap(), DifficultyFilter::All);
        assert_eq!("medium-or-hard".parse::<DifficultyFilter>().unwrap(), DifficultyFilter::MediumOrHard);
        assert_eq!("hard-only".parse::<DifficultyFilter>().unwrap(), DifficultyFilter::HardOnly);
        assert!("extreme".parse::<DifficultyFilter>().is_err());
    }

    #[test]
    fn test_difficulty_parse_is_lenient() {
        assert_eq!(Difficulty::parse(" Hard "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("nightmare"), None);
    }
}
