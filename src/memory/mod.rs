//! Memory matching card game
//!
//! A shuffled deck of face-down pairs. The player turns two cards at a time;
//! matching faces stay up and score, mismatches are turned back down once the
//! driver calls [`MemoryEngine::resolve_mismatch`].

pub mod deck;
pub mod engine;

pub use deck::{Card, CardFace, CardState, PAIR_COUNT};
pub use engine::{
    FlipOutcome, MATCH_REWARD, MISMATCH_DELAY, MemoryEngine, MemorySnapshot, WIN_NOTICE_DELAY,
};
