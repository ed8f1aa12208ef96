use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::state::Position;

/// How often the driver advances the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl Speed {
    pub fn tick_interval(&self) -> Duration {
        match self {
            Speed::Slow => Duration::from_millis(300),
            Speed::Medium => Duration::from_millis(200),
            Speed::Fast => Duration::from_millis(100),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Speed::Slow => "slow",
            Speed::Medium => "medium",
            Speed::Fast => "fast",
        }
    }
}

/// Configuration for the snake game
///
/// Distances are in board units; every position is a multiple of `cell_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of one grid cell
    pub cell_size: i32,
    /// Side length of the square board
    pub board_extent: i32,
    /// Where the single-segment snake spawns
    pub origin: Position,
    /// Points awarded per food eaten
    pub food_reward: u32,
    /// Initial tick speed
    pub speed: Speed,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: 20,
            board_extent: 400,
            origin: Position::new(80, 80),
            food_reward: 10,
            speed: Speed::Medium,
        }
    }
}

impl GameConfig {
    /// Load a configuration from a JSON file; missing fields fall back to defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.cell_size > 0, "cell_size must be positive");
        ensure!(
            self.board_extent >= self.cell_size && self.board_extent % self.cell_size == 0,
            "board_extent ({}) must be a positive multiple of cell_size ({})",
            self.board_extent,
            self.cell_size
        );
        ensure!(
            self.is_on_board(self.origin),
            "origin {:?} is not an aligned cell inside the board",
            self.origin
        );
        Ok(())
    }

    /// Number of cells along one side of the board
    pub fn cells_per_side(&self) -> i32 {
        self.board_extent / self.cell_size
    }

    /// True if `pos` is inside the board and aligned to the grid
    pub fn is_on_board(&self, pos: Position) -> bool {
        (0..self.board_extent).contains(&pos.x)
            && (0..self.board_extent).contains(&pos.y)
            && pos.x % self.cell_size == 0
            && pos.y % self.cell_size == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.cell_size, 20);
        assert_eq!(config.board_extent, 400);
        assert_eq!(config.cells_per_side(), 20);
        assert_eq!(config.origin, Position::new(80, 80));
        assert_eq!(config.food_reward, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_speed_intervals() {
        assert_eq!(Speed::Slow.tick_interval(), Duration::from_millis(300));
        assert_eq!(Speed::Medium.tick_interval(), Duration::from_millis(200));
        assert_eq!(Speed::Fast.tick_interval(), Duration::from_millis(100));
        assert_eq!(Speed::default(), Speed::Medium);
    }

    #[test]
    fn test_rejects_misaligned_board() {
        let config = GameConfig {
            board_extent: 410,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            origin: Position::new(85, 80),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"speed": "fast", "food_reward": 1}}"#).unwrap();

        let config = GameConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.speed, Speed::Fast);
        assert_eq!(config.food_reward, 1);
        assert_eq!(config.board_extent, 400);
    }

    #[test]
    fn test_invalid_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(GameConfig::from_json_file(file.path()).is_err());
    }
}
