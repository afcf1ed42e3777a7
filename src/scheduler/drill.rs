// src/scheduler/drill.rs
// Quick drill: a fixed round of cards answered right or wrong, scored at the end.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::{shuffled, Scheduler};
use crate::deck::WordRecord;
use crate::progress::{SessionStats, SessionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillFeedback {
    Outstanding,
    Great,
    Good,
    NiceTry,
}

impl DrillFeedback {
    pub fn for_percentage(percentage: u32) -> Self {
        if percentage >= 90 {
            DrillFeedback::Outstanding
        } else if percentage >= 70 {
            DrillFeedback::Great
        } else if percentage >= 50 {
            DrillFeedback::Good
        } else {
            DrillFeedback::NiceTry
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            DrillFeedback::Outstanding => "Outstanding! You're a vocabulary champion!",
            DrillFeedback::Great => "Great job! You're getting better every day!",
            DrillFeedback::Good => "Good work! Keep practicing to improve!",
            DrillFeedback::NiceTry => "Nice try! Practice makes perfect!",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrillResult {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub feedback: DrillFeedback,
}

pub struct DrillSession {
    pool: Vec<WordRecord>,
    round: Vec<WordRecord>,
    card_count: usize,
    current_index: usize,
    answered: bool,
    stats: SessionStats,
}

impl DrillSession {
    /// Shuffles `words`, keeps `pool_size` of them, and deals `card_count` cards.
    pub fn start<R: Rng + ?Sized>(
        words: &[WordRecord],
        pool_size: usize,
        card_count: usize,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Self {
        let mut pool = shuffled(words, rng);
        pool.truncate(pool_size);
        let round = pool.iter().take(card_count).cloned().collect();
        DrillSession {
            pool,
            round,
            card_count,
            current_index: 0,
            answered: false,
            stats: SessionStats::start(now),
        }
    }

    /// Scores the current card. Only the first mark per card counts.
    pub fn mark(&mut self, correct: bool) -> bool {
        if self.answered || self.current_index >= self.round.len() {
            return false;
        }
        self.answered = true;
        self.stats.record(correct);
        true
    }

    pub fn advance(&mut self) {
        self.current_index = (self.current_index + 1).min(self.round.len());
        self.answered = false;
    }

    pub fn score(&self) -> u32 {
        self.stats.correct
    }

    pub fn total(&self) -> usize {
        self.round.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn result(&self) -> DrillResult {
        let total = self.round.len() as u32;
        let percentage = if total == 0 {
            0
        } else {
            (self.score() as f64 / total as f64 * 100.0).round() as u32
        };
        DrillResult {
            score: self.score(),
            total,
            percentage,
            feedback: DrillFeedback::for_percentage(percentage),
        }
    }

    /// Replays the same cards from the start.
    pub fn try_again(&mut self, now: DateTime<Utc>) {
        self.current_index = 0;
        self.answered = false;
        self.stats = SessionStats::start(now);
    }

    /// Reshuffles the pool and deals a fresh round.
    pub fn new_round<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) {
        self.pool.shuffle(rng);
        self.round = self.pool.iter().take(self.card_count).cloned().collect();
        self.try_again(now);
    }
}

impl Scheduler for DrillSession {
    fn session_type(&self) -> SessionType {
        SessionType::Drill
    }

    fn current_card(&self) -> Option<&WordRecord> {
        self.round.get(self.current_index)
    }

    fn advance(&mut self) {
        DrillSession::advance(self)
    }

    fn is_complete(&self) -> bool {
        self.current_index >= self.round.len()
    }

    fn stats(&self) -> &SessionStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut SessionStats {
        &mut self.stats
    }
}
