//! High-score persistence
//!
//! The high score is a single durable integer that outlives game sessions.
//! It is stored as a small JSON document keyed by `highScore`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file name used when no path is given on the command line
pub const DEFAULT_HIGH_SCORE_FILE: &str = "high_score.json";

/// Somewhere a high score can be read from and written to
pub trait HighScoreStore {
    /// Read the stored high score; an empty store reads as 0
    fn load(&self) -> Result<u32>;

    /// Replace the stored high score
    fn save(&mut self, score: u32) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct HighScoreRecord {
    #[serde(rename = "highScore")]
    high_score: u32,
}

/// High score kept in a JSON file
#[derive(Debug, Clone)]
pub struct JsonHighScoreStore {
    path: PathBuf,
}

impl JsonHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonHighScoreStore {
    fn load(&self) -> Result<u32> {
        if !self.path.exists() {
            return Ok(0);
        }

        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read high score from {:?}", self.path))?;
        let record: HighScoreRecord = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse high score file {:?}", self.path))?;

        Ok(record.high_score)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score: score })
            .context("Failed to serialize high score")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write high score to {:?}", self.path))?;

        Ok(())
    }
}

/// High score kept only for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    value: u32,
    saves: usize,
}

impl MemoryHighScoreStore {
    pub fn new(value: u32) -> Self {
        Self { value, saves: 0 }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// How many times `save` has been called
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> Result<u32> {
        Ok(self.value)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.value = score;
        self.saves += 1;
        Ok(())
    }
}
