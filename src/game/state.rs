use serde::{Deserialize, Serialize};

use super::config::Speed;
use super::direction::Direction;

/// A position on the board, in board units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move one cell of `cell_size` in a direction
    pub fn stepped(&self, direction: Direction, cell_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * cell_size, dy * cell_size)
    }
}

/// The snake's body, head first
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: Vec<Position>,
}

impl Snake {
    /// A single-segment snake
    pub fn new(head: Position) -> Self {
        Self { body: vec![head] }
    }

    /// Build a snake from explicit segments, head first. Returns `None` for an empty body.
    pub fn from_segments(segments: Vec<Position>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { body: segments })
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn segments(&self) -> &[Position] {
        &self.body
    }

    /// Segments after the head
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// True if the head sits on any other segment
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.body_segments().contains(&head)
    }

    pub fn push_head(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    /// Drop the tail, never the last remaining segment
    pub fn pop_tail(&mut self) -> Option<Position> {
        if self.body.len() > 1 {
            self.body.pop()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// A snake always has a head
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the board
    Wall,
    /// Snake ran into itself
    SelfCollision,
}

/// Lifecycle of one snake session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Idle,
    Running,
    Over,
}

/// Mutable state of one snake session
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    /// Direction the snake moved on the last tick
    pub direction: Direction,
    /// Latest accepted request; used on the next tick
    pub pending_direction: Direction,
    pub score: u32,
    pub phase: GamePhase,
}

impl GameState {
    pub fn new(snake: Snake, food: Position, direction: Direction) -> Self {
        Self {
            snake,
            food,
            direction,
            pending_direction: direction,
            score: 0,
            phase: GamePhase::Idle,
        }
    }
}

/// Read-only view of the engine handed to renderers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<'a> {
    pub snake: &'a [Position],
    pub food: Position,
    pub score: u32,
    pub high_score: u32,
    pub phase: GamePhase,
    pub speed: Speed,
}

impl Snapshot<'_> {
    /// First segment, `None` for a hand-built empty view
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}
