// src/scheduler/waterfall.rs
// Waterfall drilling: a batch flows New -> Struggled -> Known -> Mastered over bounded passes.

use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::Rng;

use super::{shuffled, Scheduler};
use crate::deck::{DifficultyFilter, WordRecord};
use crate::progress::{SessionStats, SessionType, UserProgress};

/// Number of struggled-drain cycles before a batch is closed regardless of answers.
pub const MAX_PASSES: u32 = 3;

/// The four stacks, in flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackKind {
    New,
    Struggled,
    Known,
    Mastered,
}

impl StackKind {
    pub const ALL: [StackKind; 4] = [StackKind::New, StackKind::Struggled, StackKind::Known, StackKind::Mastered];

    /// 1-based stack number.
    pub fn number(self) -> u8 {
        self.slot() as u8 + 1
    }

    fn slot(self) -> usize {
        match self {
            StackKind::New => 0,
            StackKind::Struggled => 1,
            StackKind::Known => 2,
            StackKind::Mastered => 3,
        }
    }

    fn next(self) -> Option<StackKind> {
        match self {
            StackKind::New => Some(StackKind::Struggled),
            StackKind::Struggled => Some(StackKind::Known),
            StackKind::Known => Some(StackKind::Mastered),
            StackKind::Mastered => None,
        }
    }
}

/// The user's answer to a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Know,
    Struggled,
    Unknown,
}

pub struct WaterfallSession {
    stacks: [Vec<WordRecord>; 4],
    active: StackKind,
    current_index: usize,
    // Set when the card under the cursor was moved out, so the next card already sits at the cursor.
    cursor_consumed: bool,
    pass: u32,
    finished: bool,
    batch_len: usize,
    stats: SessionStats,
}

impl WaterfallSession {
    /// Samples up to `batch_size` words matching `filter` into the New stack.
    ///
    /// An empty filtered pool yields an empty, already complete session.
    pub fn start_batch<R: Rng + ?Sized>(
        words: &[WordRecord],
        batch_size: usize,
        filter: DifficultyFilter,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Self {
        let pool: Vec<WordRecord> = words.iter().filter(|w| filter.accepts(w.difficulty)).cloned().collect();
        let mut batch = shuffled(&pool, rng);
        batch.truncate(batch_size);
        info!("Waterfall batch of {} words ({} matched {:?})", batch.len(), pool.len(), filter);

        let mut session = WaterfallSession {
            batch_len: batch.len(),
            stacks: [batch, Vec::new(), Vec::new(), Vec::new()],
            active: StackKind::New,
            current_index: 0,
            cursor_consumed: false,
            pass: 1,
            finished: false,
            stats: SessionStats::start(now),
        };
        if session.stacks[0].is_empty() {
            session.settle_stack();
        }
        session
    }

    /// Records an answer for `word`, which must be in the active stack.
    ///
    /// Returns the stack the word now sits in, or `None` when the word is not
    /// in the active stack (stale reference) or the session is over.
    pub fn respond(&mut self, word: &str, outcome: Outcome, progress: &mut UserProgress) -> Option<StackKind> {
        if self.finished {
            return None;
        }
        let slot = self.active.slot();
        let position = self.stacks[slot].iter().position(|w| w.word == word)?;

        let target = match (outcome, self.active) {
            (Outcome::Know, StackKind::Known | StackKind::Mastered) => StackKind::Mastered,
            (Outcome::Know, _) => StackKind::Known,
            (Outcome::Struggled | Outcome::Unknown, _) => StackKind::Struggled,
        };
        if self.active == StackKind::Mastered && target == StackKind::Mastered {
            progress.mark_mastered(word);
        }
        self.stats.record(outcome == Outcome::Know);

        if target != self.active {
            let card = self.stacks[slot].remove(position);
            if position < self.current_index {
                self.current_index -= 1;
            } else if position == self.current_index {
                self.cursor_consumed = true;
            }
            self.stacks[target.slot()].push(card);
        }
        debug!("'{}' answered {:?} in {:?}, now in {:?}", word, outcome, self.active, target);
        Some(target)
    }

    /// Moves to the next card, settling the stack once it is exhausted.
    pub fn advance(&mut self) {
        if self.finished {
            return;
        }
        if self.cursor_consumed {
            self.cursor_consumed = false;
        } else {
            self.current_index += 1;
        }
        if self.current_index >= self.stacks[self.active.slot()].len() {
            self.settle_stack();
        }
    }

    /// Decides what happens once the active stack is exhausted.
    ///
    /// Struggled words go back to the front of Known for another pass; with
    /// nothing struggled the session moves down to the next non-empty stack.
    pub fn settle_stack(&mut self) {
        if self.finished {
            return;
        }
        self.current_index = 0;
        self.cursor_consumed = false;
        loop {
            let struggled_slot = StackKind::Struggled.slot();
            if !self.stacks[struggled_slot].is_empty() {
                let rework: Vec<WordRecord> = self.stacks[struggled_slot].drain(..).collect();
                let count = rework.len();
                let known = &mut self.stacks[StackKind::Known.slot()];
                let untouched = std::mem::replace(known, rework);
                known.extend(untouched);
                self.active = StackKind::Known;
                if self.pass >= MAX_PASSES {
                    info!("Pass limit reached with {} words still struggling", count);
                    self.finish();
                } else {
                    self.pass += 1;
                    info!("Pass {}: {} struggled words back in Known", self.pass, count);
                }
                return;
            }
            match self.active.next() {
                Some(next) => {
                    self.active = next;
                    if !self.stacks[next.slot()].is_empty() {
                        debug!("Moving to {:?} stack", next);
                        return;
                    }
                }
                None => {
                    self.finish();
                    return;
                }
            }
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        info!(
            "Waterfall session over after {} passes: {} mastered in batch",
            self.pass,
            self.stacks[StackKind::Mastered.slot()].len()
        );
    }

    pub fn stack(&self, kind: StackKind) -> &[WordRecord] {
        &self.stacks[kind.slot()]
    }

    pub fn active_stack(&self) -> StackKind {
        self.active
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn pass(&self) -> u32 {
        self.pass
    }

    /// Number of words drawn into this batch.
    pub fn batch_len(&self) -> usize {
        self.batch_len
    }
}

impl Scheduler for WaterfallSession {
    fn session_type(&self) -> SessionType {
        SessionType::Waterfall
    }

    fn current_card(&self) -> Option<&WordRecord> {
        if self.finished {
            return None;
        }
        self.stacks[self.active.slot()].get(self.current_index)
    }

    fn advance(&mut self) {
        WaterfallSession::advance(self)
    }

    fn is_complete(&self) -> bool {
        self.finished
    }

    fn stats(&self) -> &SessionStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut SessionStats {
        &mut self.stats
    }
}
