// src/storage/db.rs
// Manages the SQLite database holding progress and per-word review state.

use rusqlite::{Connection, OptionalExtension};
use std::fs;
use std::path::Path;

use super::KeyValueStore;
use crate::error::StorageError;
use crate::scheduler::spaced::{ReviewState, ReviewStates};

pub struct DatabaseManager {
    conn: Connection,
}

impl DatabaseManager {
    /// Opens (or creates) the database file, creating its directory if needed.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let manager = DatabaseManager { conn };
        manager.init_schema()?;
        Ok(manager)
    }

    /// A throwaway database, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let manager = DatabaseManager { conn: Connection::open_in_memory()? };
        manager.init_schema()?;
        Ok(manager)
    }

    /// Creates the necessary tables if they don't already exist.
    fn init_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS review_state (
                word                TEXT PRIMARY KEY,
                interval            INTEGER NOT NULL,
                repetitions         INTEGER NOT NULL,
                ease_factor         REAL NOT NULL,
                next_review         TEXT NOT NULL,
                last_review         TEXT,
                consecutive_correct INTEGER NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Upserts the review state of a single word.
    pub fn update_review_state(&self, word: &str, state: &ReviewState) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO review_state
                (word, interval, repetitions, ease_factor, next_review, last_review, consecutive_correct)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                word,
                state.interval,
                state.repetitions,
                state.ease_factor,
                state.next_review_date,
                state.last_review_date,
                state.consecutive_correct,
            ),
        )?;
        Ok(())
    }

    pub fn save_review_states(&mut self, states: &ReviewStates) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO review_state
                    (word, interval, repetitions, ease_factor, next_review, last_review, consecutive_correct)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (word, state) in states {
                stmt.execute((
                    word,
                    state.interval,
                    state.repetitions,
                    state.ease_factor,
                    state.next_review_date,
                    state.last_review_date,
                    state.consecutive_correct,
                ))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn load_review_states(&self) -> Result<ReviewStates, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT word, interval, repetitions, ease_factor, next_review, last_review, consecutive_correct
             FROM review_state",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                ReviewState {
                    interval: row.get(1)?,
                    repetitions: row.get(2)?,
                    ease_factor: row.get(3)?,
                    next_review_date: row.get(4)?,
                    last_review_date: row.get(5)?,
                    consecutive_correct: row.get(6)?,
                },
            ))
        })?;

        let mut states = ReviewStates::new();
        for row in rows {
            let (word, state) = row?;
            states.insert(word, state);
        }
        Ok(states)
    }
}

impl KeyValueStore for DatabaseManager {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value) VALUES (?1, ?2)",
            (key, value),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_kv_roundtrip_and_overwrite() {
        let db = DatabaseManager::open_in_memory().unwrap();
        assert_eq!(db.get("missing").unwrap(), None);
        db.set("k", "one").unwrap();
        db.set("k", "two").unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_review_state_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("progress.db");
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap();

        let mut state = ReviewState::new(now);
        state.interval = 6;
        state.repetitions = 2;
        state.ease_factor = 2.36;
        state.last_review_date = Some(now);
        state.consecutive_correct = 2;

        {
            let db = DatabaseManager::open(&path).unwrap();
            db.update_review_state("obdurate", &state).unwrap();
        }

        let db = DatabaseManager::open(&path).unwrap();
        let states = db.load_review_states().unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states["obdurate"], state);
    }

    #[test]
    fn test_save_review_states_replaces_rows() {
        let mut db = DatabaseManager::open_in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap();
        let mut states = ReviewStates::new();
        states.insert("a".to_string(), ReviewState::new(now));
        states.insert("b".to_string(), ReviewState::new(now));
        db.save_review_states(&states).unwrap();

        states.get_mut("a").unwrap().repetitions = 4;
        db.save_review_states(&states).unwrap();

        let loaded = db.load_review_states().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["a"].repetitions, 4);
    }
}
