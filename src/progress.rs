// src/progress.rs
// Session counters and the cross-session progress record.

use std::collections::{BTreeSet, VecDeque};

use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Storage key the progress snapshot lives under.
pub const PROGRESS_KEY: &str = "satVocabProgress";

/// Number of sessions kept in the accuracy history.
pub const ACCURACY_HISTORY_CAPACITY: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Waterfall,
    Spaced,
    Drill,
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionType::Waterfall => "waterfall",
            SessionType::Spaced => "spaced",
            SessionType::Drill => "drill",
        };
        f.write_str(name)
    }
}

/// Counters for the session currently running.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub words_studied: u32,
    pub correct: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl SessionStats {
    pub fn start(now: DateTime<Utc>) -> Self {
        SessionStats {
            words_studied: 0,
            correct: 0,
            start_time: now,
            end_time: None,
        }
    }

    pub fn record(&mut self, correct: bool) {
        self.words_studied += 1;
        if correct {
            self.correct += 1;
        }
    }

    pub fn finish(&mut self, now: DateTime<Utc>) {
        self.end_time.get_or_insert(now);
    }
}

/// One completed session in the accuracy log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyEntry {
    pub date: DateTime<Utc>,
    pub correct: u32,
    pub total: u32,
    #[serde(rename = "type")]
    pub session_type: SessionType,
}

/// Progress carried between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProgress {
    pub mastered_words: BTreeSet<String>,
    pub study_streak: u32,
    pub last_study_date: Option<NaiveDate>,
    pub accuracy_history: VecDeque<AccuracyEntry>,
    pub total_words_learned: usize,
}

impl UserProgress {
    /// Adds a word to the mastered set. Returns `true` if it was not there yet.
    pub fn mark_mastered(&mut self, word: &str) -> bool {
        let added = self.mastered_words.insert(word.to_string());
        if added {
            info!("'{}' mastered", word);
        }
        added
    }

    pub fn is_mastered(&self, word: &str) -> bool {
        self.mastered_words.contains(word)
    }

    /// Folds a finished session into the history, streak and totals.
    pub fn record_session(&mut self, stats: &SessionStats, session_type: SessionType, now: DateTime<Utc>) {
        self.accuracy_history.push_back(AccuracyEntry {
            date: now,
            correct: stats.correct,
            total: stats.words_studied,
            session_type,
        });
        while self.accuracy_history.len() > ACCURACY_HISTORY_CAPACITY {
            self.accuracy_history.pop_front();
        }

        let today = now.date_naive();
        let yesterday = today.pred_opt();
        self.study_streak = match self.last_study_date {
            Some(last) if Some(last) == yesterday => self.study_streak + 1,
            // Anything but yesterday, including earlier today, starts over.
            _ => 1,
        };
        self.last_study_date = Some(today);
        self.total_words_learned = self.mastered_words.len();
    }

    /// Sum of correct answers over sum of answers across the history; 0 when empty.
    pub fn accuracy_rate(&self) -> f64 {
        let (correct, total) = self
            .accuracy_history
            .iter()
            .fold((0u64, 0u64), |(c, t), e| (c + e.correct as u64, t + e.total as u64));
        if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        }
    }
}

/// Reads the progress snapshot. Absent or malformed data gives fresh progress.
pub fn load_progress<S: KeyValueStore + ?Sized>(store: &S) -> Result<UserProgress, StorageError> {
    let Some(json) = store.get(PROGRESS_KEY)? else {
        return Ok(UserProgress::default());
    };
    match serde_json::from_str::<UserProgress>(&json) {
        Ok(mut progress) => {
            progress.total_words_learned = progress.mastered_words.len();
            Ok(progress)
        }
        Err(e) => {
            warn!("Stored progress is unreadable ({}), starting fresh", e);
            Ok(UserProgress::default())
        }
    }
}

pub fn save_progress<S: KeyValueStore + ?Sized>(store: &S, progress: &UserProgress) -> Result<(), StorageError> {
    let json = serde_json::to_string(progress)?;
    store.set(PROGRESS_KEY, &json)
}

/// Closes a session: stamps its end time, records it, and persists the snapshot.
pub fn end_session<S: KeyValueStore + ?Sized>(
    store: &S,
    progress: &mut UserProgress,
    stats: &mut SessionStats,
    session_type: SessionType,
    now: DateTime<Utc>,
) -> Result<(), StorageError> {
    stats.finish(now);
    progress.record_session(stats, session_type, now);
    info!(
        "{} session ended: {}/{} correct, streak {}",
        session_type, stats.correct, stats.words_studied, progress.study_streak
    );
    save_progress(store, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DatabaseManager;
    use chrono::{Duration, TimeZone};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 18, 0, 0).unwrap()
    }

    fn stats(correct: u32, total: u32) -> SessionStats {
        SessionStats { words_studied: total, correct, start_time: at(1), end_time: None }
    }

    #[test]
    fn test_history_evicts_oldest_first() {
        let mut progress = UserProgress::default();
        for i in 0..31u32 {
            let now = at(1) + Duration::minutes(i as i64);
            progress.record_session(&stats(i, 31), SessionType::Spaced, now);
        }
        assert_eq!(progress.accuracy_history.len(), ACCURACY_HISTORY_CAPACITY);
        // Entry with correct = 0 was the first one and must be gone.
        assert_eq!(progress.accuracy_history.front().unwrap().correct, 1);
        assert_eq!(progress.accuracy_history.back().unwrap().correct, 30);
    }

    #[test]
    fn test_streak_rules() {
        let mut progress = UserProgress::default();
        progress.record_session(&stats(1, 1), SessionType::Waterfall, at(1));
        assert_eq!(progress.study_streak, 1);

        progress.record_session(&stats(1, 1), SessionType::Waterfall, at(2));
        assert_eq!(progress.study_streak, 2);

        progress.record_session(&stats(1, 1), SessionType::Waterfall, at(3));
        assert_eq!(progress.study_streak, 3);

        // Skipped a day.
        progress.record_session(&stats(1, 1), SessionType::Waterfall, at(5));
        assert_eq!(progress.study_streak, 1);
        assert_eq!(progress.last_study_date, Some(at(5).date_naive()));
    }

    #[test]
    fn test_streak_restarts_on_second_session_same_day() {
        let mut progress = UserProgress::default();
        progress.record_session(&stats(1, 1), SessionType::Waterfall, at(1));
        progress.record_session(&stats(1, 1), SessionType::Waterfall, at(2));
        assert_eq!(progress.study_streak, 2);

        progress.record_session(&stats(1, 1), SessionType::Drill, at(2) + Duration::hours(2));
        assert_eq!(progress.study_streak, 1);

        progress.record_session(&stats(1, 1), SessionType::Waterfall, at(4));
        assert_eq!(progress.study_streak, 1);
        assert_eq!(progress.last_study_date, Some(at(4).date_naive()));
    }

    #[test]
    fn test_accuracy_rate() {
        let mut progress = UserProgress::default();
        assert_eq!(progress.accuracy_rate(), 0.0);

        progress.record_session(&stats(0, 0), SessionType::Spaced, at(1));
        assert_eq!(progress.accuracy_rate(), 0.0);

        progress.record_session(&stats(3, 4), SessionType::Spaced, at(1));
        progress.record_session(&stats(1, 4), SessionType::Spaced, at(1));
        assert!((progress.accuracy_rate() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_total_words_learned_tracks_mastered_set() {
        let mut progress = UserProgress::default();
        assert!(progress.mark_mastered("ardent"));
        assert!(!progress.mark_mastered("ardent"));
        progress.mark_mastered("brusque");
        progress.record_session(&stats(2, 2), SessionType::Waterfall, at(1));
        assert_eq!(progress.total_words_learned, 2);
    }

    #[test]
    fn test_mastered_words_serialise_as_array() {
        let mut progress = UserProgress::default();
        progress.mark_mastered("zeal");
        let json: serde_json::Value = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["masteredWords"], serde_json::json!(["zeal"]));
        assert!(json["accuracyHistory"].is_array());
    }

    #[test]
    fn test_end_session_persists_and_reloads() {
        let store = DatabaseManager::open_in_memory().unwrap();
        let mut progress = UserProgress::default();
        progress.mark_mastered("lucid");
        let mut session = stats(4, 5);

        end_session(&store, &mut progress, &mut session, SessionType::Waterfall, at(9)).unwrap();
        assert_eq!(session.end_time, Some(at(9)));

        let reloaded = load_progress(&store).unwrap();
        assert_eq!(reloaded, progress);
        assert!(reloaded.is_mastered("lucid"));
        assert_eq!(reloaded.accuracy_history[0].session_type, SessionType::Waterfall);
    }

    #[test]
    fn test_malformed_progress_starts_fresh() {
        let store = DatabaseManager::open_in_memory().unwrap();
        store.set(PROGRESS_KEY, "{ this is not json").unwrap();
        assert_eq!(load_progress(&store).unwrap(), UserProgress::default());
    }

    #[test]
    fn test_absent_progress_starts_fresh() {
        let store = DatabaseManager::open_in_memory().unwrap();
        assert_eq!(load_progress(&store).unwrap(), UserProgress::default());
    }
}
