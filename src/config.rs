// src/config.rs
// Study settings: defaults, optional JSON overrides and the shuffle seed.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::deck::DifficultyFilter;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub words_path: PathBuf,
    pub data_directory: PathBuf,
    pub batch_size: usize,
    pub difficulty_filter: DifficultyFilter,
    pub drill_cards: usize,
    pub drill_pool: usize,
    /// Fixed seed for shuffling; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            words_path: PathBuf::from("words.json"),
            data_directory: PathBuf::from("vocab-data"),
            batch_size: 10,
            difficulty_filter: DifficultyFilter::All,
            drill_cards: 10,
            drill_pool: 50,
            rng_seed: None,
        }
    }

    /// Reads a JSON config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("{}; using default configuration", e);
            Self::new()
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_directory.join("progress.db")
    }

    pub fn rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
