// src/error.rs
// Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading the word source.
#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Failed to read word list at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Word list is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Word list contains no usable words")]
    Empty,
}

/// Failures in the persistence layer.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
