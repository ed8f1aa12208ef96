//! Pocket Arcade - terminal snake and memory-match games
//!
//! This library provides:
//! - Snake game core with no I/O (game module)
//! - Memory matching card game core (memory module)
//! - High-score persistence (persistence module)
//! - TUI rendering and keyboard input (render, input modules)
//! - Terminal drivers for both games (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod memory;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
