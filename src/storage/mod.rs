// src/storage/mod.rs
// This module handles all data persistence, including the database and review log.

pub mod db;
pub mod replay_log;

use crate::error::StorageError;

// Re-export the main structs for easier access.
pub use self::db::DatabaseManager;
pub use self::replay_log::ReviewLogger;

/// String key-value persistence. Progress is stored as a JSON value under a fixed key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
