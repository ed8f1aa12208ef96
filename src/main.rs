use anyhow::Result;
use clap::{Parser, ValueEnum};
use pocket_arcade::game::{GameConfig, GameEngine, Speed};
use pocket_arcade::logging::init_file_logging;
use pocket_arcade::memory::MemoryEngine;
use pocket_arcade::modes::{MemoryMode, SnakeMode};
use pocket_arcade::persistence::{DEFAULT_HIGH_SCORE_FILE, JsonHighScoreStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pocket_arcade")]
#[command(version, about = "Snake and memory-match games for the terminal")]
struct Cli {
    /// Which game to play
    #[arg(long, default_value = "snake")]
    game: Game,

    /// Snake tick speed (overrides the config file)
    #[arg(long)]
    speed: Option<SpeedArg>,

    /// Where the snake high score is kept
    #[arg(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,

    /// JSON file with snake settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for food placement and card shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Game {
    /// Steer a growing snake towards food
    Snake,
    /// Find the matching pairs of cards
    Memory,
}

#[derive(Clone, Copy, ValueEnum)]
enum SpeedArg {
    /// 300 ms per step
    Slow,
    /// 200 ms per step
    Medium,
    /// 100 ms per step
    Fast,
}

impl From<SpeedArg> for Speed {
    fn from(arg: SpeedArg) -> Self {
        match arg {
            SpeedArg::Slow => Speed::Slow,
            SpeedArg::Medium => Speed::Medium,
            SpeedArg::Fast => Speed::Fast,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_file_logging(path)?;
    }

    match cli.game {
        Game::Snake => {
            let mut config = match &cli.config {
                Some(path) => GameConfig::from_json_file(path)?,
                None => GameConfig::default(),
            };
            if let Some(speed) = cli.speed {
                config.speed = speed.into();
            }

            let store = JsonHighScoreStore::new(cli.high_score_file);
            let engine = GameEngine::new(config, store, cli.seed)?;
            let mut snake_mode = SnakeMode::new(engine);
            snake_mode.run().await?;
        }
        Game::Memory => {
            let mut memory_mode = MemoryMode::new(MemoryEngine::new(cli.seed));
            memory_mode.run().await?;
        }
    }

    Ok(())
}
