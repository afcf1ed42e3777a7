// src/scheduler/spaced.rs
// SM-2 style spaced repetition over per-word review state.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{shuffled, Scheduler};
use crate::deck::WordRecord;
use crate::progress::{SessionStats, SessionType, UserProgress};

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;
/// Consecutive correct answers needed, together with the interval below, for mastery.
pub const MASTERY_STREAK: u32 = 3;
pub const MASTERY_INTERVAL_DAYS: u32 = 21;
/// Upper bound on a review interval (about a century).
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Recall grade, 0 (blackout) to 5 (perfect). 3 and above counts as recalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u8);

impl Quality {
    /// Grades above 5 are clamped to 5.
    pub fn new(grade: u8) -> Self {
        Quality(grade.min(5))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_correct(self) -> bool {
        self.0 >= 3
    }
}

/// Scheduling state for one word, keyed by the word text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    /// Days until the next review; never below 1.
    pub interval: u32,
    pub repetitions: u32,
    pub ease_factor: f64,
    pub next_review_date: DateTime<Utc>,
    pub last_review_date: Option<DateTime<Utc>>,
    pub consecutive_correct: u32,
}

pub type ReviewStates = HashMap<String, ReviewState>;

impl ReviewState {
    /// State for a word never reviewed: due immediately.
    pub fn new(now: DateTime<Utc>) -> Self {
        ReviewState {
            interval: 1,
            repetitions: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            next_review_date: now,
            last_review_date: None,
            consecutive_correct: 0,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date <= now
    }

    pub fn is_mastered(&self) -> bool {
        self.consecutive_correct >= MASTERY_STREAK && self.interval >= MASTERY_INTERVAL_DAYS
    }
}

/// Applies one graded answer. Pure: the result depends only on the inputs.
pub fn review(state: &ReviewState, quality: Quality, now: DateTime<Utc>) -> ReviewState {
    let mut next = state.clone();

    if quality.is_correct() {
        next.consecutive_correct += 1;
        next.interval = match state.repetitions {
            0 => 1,
            1 => 6,
            _ => (state.interval as f64 * state.ease_factor)
                .round()
                .clamp(1.0, MAX_INTERVAL_DAYS as f64) as u32,
        };
        next.repetitions += 1;
    } else {
        next.consecutive_correct = 0;
        next.repetitions = 0;
        next.interval = 1;
    }

    // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
    let miss = 5.0 - quality.value() as f64;
    next.ease_factor = (state.ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR);

    next.next_review_date = now
        .checked_add_signed(Duration::days(next.interval as i64))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    next.last_review_date = Some(now);
    next
}

/// Every word due at `now`, shuffled. Words without state get a fresh one that is due now.
pub fn due_words<R: Rng + ?Sized>(
    words: &[WordRecord],
    states: &mut ReviewStates,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<WordRecord> {
    let due: Vec<WordRecord> = words
        .iter()
        .filter(|w| {
            states
                .entry(w.word.clone())
                .or_insert_with(|| ReviewState::new(now))
                .is_due(now)
        })
        .cloned()
        .collect();
    shuffled(&due, rng)
}

pub struct SpacedSession {
    queue: Vec<WordRecord>,
    current_index: usize,
    graded: HashSet<String>,
    stats: SessionStats,
}

impl SpacedSession {
    /// Builds a session over the words due at `now`. An empty queue means nothing to review.
    pub fn start<R: Rng + ?Sized>(
        words: &[WordRecord],
        states: &mut ReviewStates,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        SpacedSession::from_queue(due_words(words, states, now, rng), now)
    }

    pub fn from_queue(queue: Vec<WordRecord>, now: DateTime<Utc>) -> Self {
        SpacedSession {
            queue,
            current_index: 0,
            graded: HashSet::new(),
            stats: SessionStats::start(now),
        }
    }

    /// Grades `word` and stores its new state.
    ///
    /// Words outside the queue, or already graded in this session, are ignored.
    pub fn respond(
        &mut self,
        word: &str,
        quality: Quality,
        now: DateTime<Utc>,
        states: &mut ReviewStates,
        progress: &mut UserProgress,
    ) -> Option<ReviewState> {
        if self.graded.contains(word) || !self.queue.iter().any(|w| w.word == word) {
            return None;
        }
        self.graded.insert(word.to_string());
        let state = states
            .entry(word.to_string())
            .or_insert_with(|| ReviewState::new(now));
        *state = review(state, quality, now);
        debug!("'{}' graded {} -> interval {} days", word, quality.value(), state.interval);

        if state.is_mastered() {
            progress.mark_mastered(word);
        }
        self.stats.record(quality.is_correct());
        Some(state.clone())
    }

    pub fn advance(&mut self) {
        self.current_index = (self.current_index + 1).min(self.queue.len());
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Scheduler for SpacedSession {
    fn session_type(&self) -> SessionType {
        SessionType::Spaced
    }

    fn current_card(&self) -> Option<&WordRecord> {
        self.queue.get(self.current_index)
    }

    fn advance(&mut self) {
        SpacedSession::advance(self)
    }

    fn is_complete(&self) -> bool {
        self.current_index >= self.queue.len()
    }

    fn stats(&self) -> &SessionStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut SessionStats {
        &mut self.stats
    }
}
