//! Snake game core
//!
//! Pure state transitions with no I/O or rendering dependencies. A driver
//! owns the tick timer and calls into [`GameEngine`].

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

pub use config::{GameConfig, Speed};
pub use direction::Direction;
pub use engine::{GameEngine, TickOutcome};
pub use state::{CollisionType, GamePhase, GameState, Position, Snake, Snapshot};
