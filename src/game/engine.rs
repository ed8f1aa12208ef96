use anyhow::Result;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{
    config::{GameConfig, Speed},
    direction::Direction,
    state::{CollisionType, GamePhase, GameState, Position, Snake, Snapshot},
};
use crate::persistence::HighScoreStore;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Collision that ended the game, if any
    pub collision: Option<CollisionType>,
}

/// The snake game engine
///
/// Owns the state of one session at a time plus the high score that outlives
/// sessions. The engine never schedules itself: a driver calls [`advance`]
/// once per tick and reads a [`Snapshot`] afterwards.
///
/// [`advance`]: GameEngine::advance
pub struct GameEngine<S: HighScoreStore> {
    config: GameConfig,
    state: GameState,
    speed: Speed,
    high_score: u32,
    store: S,
    rng: StdRng,
}

impl<S: HighScoreStore> GameEngine<S> {
    /// Create an idle engine. `seed` makes food placement reproducible.
    ///
    /// Fails if `config` does not describe an aligned, non-empty board.
    pub fn new(config: GameConfig, store: S, seed: Option<u64>) -> Result<Self> {
        config.validate()?;

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let food = random_cell(&config, &mut rng);
        let state = GameState::new(Snake::new(config.origin), food, Direction::Right);
        let high_score = read_high_score(&store).unwrap_or(0);

        Ok(Self {
            speed: config.speed,
            config,
            state,
            high_score,
            store,
            rng,
        })
    }

    /// Begin a fresh session from Idle or Over
    pub fn start(&mut self) {
        let snake = Snake::new(self.config.origin);
        let food = self.place_food();
        self.state = GameState::new(snake, food, Direction::Right);
        self.state.phase = GamePhase::Running;

        if let Some(stored) = read_high_score(&self.store) {
            self.high_score = self.high_score.max(stored);
        }

        info!(
            high_score = self.high_score,
            speed = self.speed.label(),
            "snake session started"
        );
    }

    /// Request a turn for the next tick
    ///
    /// A request opposite to the most recently accepted direction is ignored,
    /// as is any request while the game is not running. Accepted requests
    /// overwrite earlier ones until the next tick, so two quick turns can
    /// still point the head back into the neck.
    pub fn set_direction(&mut self, requested: Direction) {
        if self.state.phase != GamePhase::Running {
            return;
        }
        if self.state.pending_direction.is_opposite(requested) {
            debug!(?requested, current = ?self.state.pending_direction, "ignoring reversal");
            return;
        }
        self.state.pending_direction = requested;
    }

    /// Execute one tick. Returns `None` when the game is not running.
    pub fn advance(&mut self) -> Option<TickOutcome> {
        if self.state.phase != GamePhase::Running {
            return None;
        }

        self.state.direction = self.state.pending_direction;
        let new_head = self
            .state
            .snake
            .head()
            .stepped(self.state.direction, self.config.cell_size);
        self.state.snake.push_head(new_head);

        let ate_food = new_head == self.state.food;
        if ate_food {
            self.state.score += self.config.food_reward;
            self.state.food = self.place_food();
            debug!(score = self.state.score, len = self.state.snake.len(), "food eaten");
        } else {
            self.state.snake.pop_tail();
        }

        let collision = self.check_collision();
        if let Some(kind) = collision {
            self.finish_session(kind);
        }

        Some(TickOutcome {
            ate_food,
            collision,
        })
    }

    /// Check the current head against the walls and the rest of the body
    pub fn check_collision(&self) -> Option<CollisionType> {
        let head = self.state.snake.head();
        let extent = 0..self.config.board_extent;
        let hit_wall = !extent.contains(&head.x) || !extent.contains(&head.y);
        let hit_self = self.state.snake.head_overlaps_body();

        if hit_wall {
            Some(CollisionType::Wall)
        } else if hit_self {
            Some(CollisionType::SelfCollision)
        } else {
            None
        }
    }

    /// Pick a random aligned cell on the board. Cells under the snake are allowed.
    pub fn place_food(&mut self) -> Position {
        random_cell(&self.config, &mut self.rng)
    }

    pub fn set_speed(&mut self, speed: Speed) {
        if speed != self.speed {
            info!(speed = speed.label(), "speed changed");
            self.speed = speed;
        }
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn tick_interval(&self) -> Duration {
        self.speed.tick_interval()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: self.state.snake.segments(),
            food: self.state.food,
            score: self.state.score,
            high_score: self.high_score,
            phase: self.state.phase,
            speed: self.speed,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn finish_session(&mut self, kind: CollisionType) {
        self.state.phase = GamePhase::Over;
        let score = self.state.score;
        info!(score, collision = ?kind, len = self.state.snake.len(), "snake game over");

        if score > self.high_score {
            self.high_score = score;
            match self.store.save(score) {
                Ok(()) => info!(high_score = score, "new high score saved"),
                Err(err) => warn!("failed to persist high score: {err:#}"),
            }
        }
    }
}

fn random_cell(config: &GameConfig, rng: &mut StdRng) -> Position {
    let cells = config.cells_per_side();
    let x = rng.gen_range(0..cells) * config.cell_size;
    let y = rng.gen_range(0..cells) * config.cell_size;
    Position::new(x, y)
}

fn read_high_score<S: HighScoreStore>(store: &S) -> Option<u32> {
    match store.load() {
        Ok(score) => Some(score),
        Err(err) => {
            warn!("failed to read high score: {err:#}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryHighScoreStore;

    const FAR_AWAY: Position = Position { x: 380, y: 380 };

    fn running_engine(stored_high_score: u32) -> GameEngine<MemoryHighScoreStore> {
        let mut engine = GameEngine::new(
            GameConfig::default(),
            MemoryHighScoreStore::new(stored_high_score),
            Some(7),
        )
        .unwrap();
        engine.start();
        engine.state.food = FAR_AWAY;
        engine
    }

    fn place_snake(
        engine: &mut GameEngine<MemoryHighScoreStore>,
        segments: &[(i32, i32)],
        direction: Direction,
    ) {
        let segments = segments.iter().map(|&(x, y)| Position::new(x, y)).collect();
        engine.state.snake = Snake::from_segments(segments).unwrap();
        engine.state.direction = direction;
        engine.state.pending_direction = direction;
    }

    fn end_with_score(engine: &mut GameEngine<MemoryHighScoreStore>, score: u32) {
        engine.state.score = score;
        place_snake(engine, &[(380, 80)], Direction::Right);
        let outcome = engine.advance().unwrap();
        assert_eq!(outcome.collision, Some(CollisionType::Wall));
    }

    #[test]
    fn test_new_engine_is_idle() {
        let mut engine =
            GameEngine::new(GameConfig::default(), MemoryHighScoreStore::new(4), Some(1)).unwrap();
        assert_eq!(engine.phase(), GamePhase::Idle);
        assert_eq!(engine.high_score(), 4);

        assert_eq!(engine.advance(), None);
        engine.set_direction(Direction::Down);
        assert_eq!(engine.state().pending_direction, Direction::Right);
    }

    #[test]
    fn test_start_resets_session() {
        let mut engine = running_engine(0);
        engine.state.score = 30;
        engine.state.phase = GamePhase::Over;

        engine.start();

        let snap = engine.snapshot();
        assert_eq!(snap.phase, GamePhase::Running);
        assert_eq!(snap.snake, &[Position::new(80, 80)]);
        assert_eq!(snap.score, 0);
        assert_eq!(engine.state().direction, Direction::Right);
        assert!(engine.config().is_on_board(snap.food));
    }

    #[test]
    fn test_three_ticks_right() {
        let mut engine = running_engine(0);
        engine.set_direction(Direction::Right);

        for _ in 0..3 {
            let outcome = engine.advance().unwrap();
            assert!(!outcome.ate_food);
            assert_eq!(outcome.collision, None);
        }

        let snap = engine.snapshot();
        assert_eq!(snap.head(), Some(Position::new(140, 80)));
        assert_eq!(snap.snake.len(), 1);
        assert_eq!(snap.phase, GamePhase::Running);
    }

    #[test]
    fn test_length_constant_without_food() {
        let mut engine = running_engine(0);
        place_snake(
            &mut engine,
            &[(100, 100), (80, 100), (60, 100)],
            Direction::Right,
        );

        for dir in [Direction::Right, Direction::Down, Direction::Left, Direction::Down] {
            engine.set_direction(dir);
            let before = engine.state().snake.len();
            engine.advance().unwrap();
            assert_eq!(engine.state().snake.len(), before);
        }
        assert_eq!(engine.phase(), GamePhase::Running);
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut engine = running_engine(0);
        engine.state.food = Position::new(100, 80);

        let outcome = engine.advance().unwrap();

        assert!(outcome.ate_food);
        assert_eq!(engine.state().snake.len(), 2);
        assert_eq!(engine.state().score, 10);
        assert_eq!(engine.state().snake.head(), Position::new(100, 80));
        assert!(engine.config().is_on_board(engine.state().food));
    }

    #[test]
    fn test_reward_follows_config() {
        let config = GameConfig {
            food_reward: 1,
            ..Default::default()
        };
        let mut engine = GameEngine::new(config, MemoryHighScoreStore::default(), Some(3)).unwrap();
        engine.start();
        engine.state.food = Position::new(100, 80);

        engine.advance().unwrap();
        assert_eq!(engine.state().score, 1);
    }

    #[test]
    fn test_reversal_is_ignored() {
        for dir in Direction::ALL {
            let mut engine = running_engine(0);
            place_snake(&mut engine, &[(200, 200)], dir);

            engine.set_direction(dir.opposite());

            assert_eq!(engine.state().pending_direction, dir);
            engine.advance().unwrap();
            assert_eq!(engine.state().direction, dir);
        }
    }

    #[test]
    fn test_last_request_before_tick_wins() {
        let mut engine = running_engine(0);
        engine.set_direction(Direction::Up);
        engine.set_direction(Direction::Right);

        engine.advance().unwrap();

        assert_eq!(engine.state().snake.head(), Position::new(100, 80));
    }

    #[test]
    fn test_reversal_checked_against_latest_request() {
        // Moving right: Up is accepted, so Down is now the reversal.
        let mut engine = running_engine(0);
        engine.set_direction(Direction::Up);
        engine.set_direction(Direction::Down);

        engine.advance().unwrap();

        assert_eq!(engine.state().direction, Direction::Up);
        assert_eq!(engine.state().snake.head(), Position::new(80, 60));
    }

    #[test]
    fn test_quick_double_turn_follows_latest_request() {
        // Moving right: after Up is accepted, Left is no longer a reversal.
        let mut engine = running_engine(0);
        engine.set_direction(Direction::Up);
        engine.set_direction(Direction::Left);

        engine.advance().unwrap();

        assert_eq!(engine.state().direction, Direction::Left);
        assert_eq!(engine.state().snake.head(), Position::new(60, 80));
    }

    #[test]
    fn test_quick_double_turn_can_hit_the_neck() {
        let mut engine = running_engine(0);
        place_snake(
            &mut engine,
            &[(100, 100), (80, 100), (60, 100)],
            Direction::Right,
        );
        engine.set_direction(Direction::Up);
        engine.set_direction(Direction::Left);

        let outcome = engine.advance().unwrap();

        assert_eq!(outcome.collision, Some(CollisionType::SelfCollision));
        assert_eq!(engine.phase(), GamePhase::Over);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            cell_size: 0,
            ..Default::default()
        };
        assert!(GameEngine::new(config, MemoryHighScoreStore::default(), Some(1)).is_err());

        let config = GameConfig {
            board_extent: 0,
            ..Default::default()
        };
        assert!(GameEngine::new(config, MemoryHighScoreStore::default(), Some(1)).is_err());
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = running_engine(0);
        place_snake(&mut engine, &[(0, 0)], Direction::Up);
        engine.set_direction(Direction::Left);

        let outcome = engine.advance().unwrap();

        assert_eq!(outcome.collision, Some(CollisionType::Wall));
        assert_eq!(engine.state().snake.head(), Position::new(-20, 0));
        assert_eq!(engine.phase(), GamePhase::Over);
    }

    #[test]
    fn test_far_wall_collision() {
        let mut engine = running_engine(0);
        place_snake(&mut engine, &[(200, 380)], Direction::Down);

        engine.advance().unwrap();

        assert_eq!(engine.phase(), GamePhase::Over);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = running_engine(0);
        place_snake(
            &mut engine,
            &[(40, 40), (40, 20), (60, 20), (60, 40)],
            Direction::Down,
        );
        // Food on the tail cell keeps the tail in place for this tick.
        engine.state.food = Position::new(60, 40);
        engine.set_direction(Direction::Right);

        let outcome = engine.advance().unwrap();

        assert_eq!(outcome.collision, Some(CollisionType::SelfCollision));
        assert_eq!(engine.phase(), GamePhase::Over);
    }

    #[test]
    fn test_chasing_the_tail_is_safe() {
        let mut engine = running_engine(0);
        place_snake(
            &mut engine,
            &[(40, 40), (40, 20), (60, 20), (60, 40)],
            Direction::Down,
        );
        engine.set_direction(Direction::Right);

        let outcome = engine.advance().unwrap();

        assert_eq!(outcome.collision, None);
        assert_eq!(engine.phase(), GamePhase::Running);
        assert_eq!(engine.state().snake.head(), Position::new(60, 40));
    }

    #[test]
    fn test_single_segment_never_self_collides() {
        let mut engine = running_engine(0);
        for dir in [Direction::Down, Direction::Left, Direction::Up, Direction::Right] {
            engine.set_direction(dir);
            let outcome = engine.advance().unwrap();
            assert_eq!(outcome.collision, None);
        }
        assert_eq!(engine.state().snake.head(), Position::new(80, 80));
    }

    #[test]
    fn test_advance_after_game_over_is_noop() {
        let mut engine = running_engine(0);
        end_with_score(&mut engine, 0);
        let head = engine.state().snake.head();

        assert_eq!(engine.advance(), None);
        assert_eq!(engine.state().snake.head(), head);
    }

    #[test]
    fn test_food_always_on_board() {
        let mut engine =
            GameEngine::new(GameConfig::default(), MemoryHighScoreStore::default(), Some(99))
                .unwrap();
        let config = engine.config().clone();
        for _ in 0..1000 {
            let food = engine.place_food();
            assert!((0..config.board_extent).contains(&food.x));
            assert!((0..config.board_extent).contains(&food.y));
            assert_eq!(food.x % config.cell_size, 0);
            assert_eq!(food.y % config.cell_size, 0);
        }
    }

    #[test]
    fn test_seeded_food_is_reproducible() {
        let mut a =
            GameEngine::new(GameConfig::default(), MemoryHighScoreStore::default(), Some(5))
                .unwrap();
        let mut b =
            GameEngine::new(GameConfig::default(), MemoryHighScoreStore::default(), Some(5))
                .unwrap();
        for _ in 0..20 {
            assert_eq!(a.place_food(), b.place_food());
        }
    }

    #[test]
    fn test_higher_score_is_persisted() {
        let mut engine = running_engine(3);
        end_with_score(&mut engine, 5);

        assert_eq!(engine.store().value(), 5);
        assert_eq!(engine.high_score(), 5);
        assert_eq!(engine.snapshot().high_score, 5);
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let mut engine = running_engine(5);
        end_with_score(&mut engine, 2);

        assert_eq!(engine.store().value(), 5);
        assert_eq!(engine.store().saves(), 0);
        assert_eq!(engine.high_score(), 5);
    }

    #[test]
    fn test_high_score_survives_restart() {
        let mut engine = running_engine(0);
        end_with_score(&mut engine, 40);

        engine.start();

        assert_eq!(engine.snapshot().score, 0);
        assert_eq!(engine.high_score(), 40);
    }

    #[test]
    fn test_speed_change_mid_session() {
        let mut engine = running_engine(0);
        assert_eq!(engine.tick_interval(), Duration::from_millis(200));

        engine.set_speed(Speed::Fast);

        assert_eq!(engine.tick_interval(), Duration::from_millis(100));
        assert_eq!(engine.phase(), GamePhase::Running);
        engine.advance().unwrap();
        assert_eq!(engine.state().snake.head(), Position::new(100, 80));
    }
}
