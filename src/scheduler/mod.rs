// src/scheduler/mod.rs
// Contains the study-session scheduling logic.

pub mod drill;
pub mod spaced;
pub mod waterfall;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::deck::WordRecord;
use crate::progress::{SessionStats, SessionType};

pub use self::drill::{DrillFeedback, DrillResult, DrillSession};
pub use self::spaced::{Quality, ReviewState, ReviewStates, SpacedSession};
pub use self::waterfall::{Outcome, StackKind, WaterfallSession, MAX_PASSES};

/// Behavior shared by every kind of study session.
///
/// Answering differs per session (outcome, quality grade, right/wrong) so it
/// lives on the concrete types; this trait covers what a renderer needs.
pub trait Scheduler {
    fn session_type(&self) -> SessionType;
    /// The word to show, or `None` when the session has nothing left to show.
    fn current_card(&self) -> Option<&WordRecord>;
    /// Moves past the current card.
    fn advance(&mut self);
    fn is_complete(&self) -> bool;
    fn stats(&self) -> &SessionStats;
    fn stats_mut(&mut self) -> &mut SessionStats;
}

/// Clones `words` into a uniformly shuffled vector (Fisher-Yates).
pub(crate) fn shuffled<R: Rng + ?Sized>(words: &[WordRecord], rng: &mut R) -> Vec<WordRecord> {
    let mut out = words.to_vec();
    out.shuffle(rng);
    out
}


#[cfg(test)]
mod tests {
    use super::test_support::words;
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_shuffle_keeps_every_word() {
        let input = words(20);
        let mut rng = StdRng::seed_from_u64(7);
        let mut out: Vec<String> = shuffled(&input, &mut rng).into_iter().map(|w| w.word).collect();
        out.sort();
        let mut expected: Vec<String> = input.into_iter().map(|w| w.word).collect();
        expected.sort();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_shuffle_is_reproducible_with_seed() {
        let input = words(20);
        let a = shuffled(&input, &mut StdRng::seed_from_u64(42));
        let b = shuffled(&input, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
