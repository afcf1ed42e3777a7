// vocabmaster - lib.rs
// Scheduling core for vocabulary flashcards: Waterfall drilling, SM-2 review and quick drills.

pub mod config;
pub mod deck;
pub mod error;
pub mod progress;
pub mod scheduler;
pub mod storage;

pub use config::Config;
pub use deck::{Difficulty, DifficultyFilter, WordList, WordRecord};
pub use error::{ConfigError, DeckError, StorageError};
pub use progress::{end_session, load_progress, save_progress, SessionStats, SessionType, UserProgress};
pub use scheduler::{
    DrillSession, Outcome, Quality, ReviewState, ReviewStates, Scheduler, SpacedSession, StackKind,
    WaterfallSession,
};
pub use storage::{DatabaseManager, KeyValueStore, ReviewLogger};
