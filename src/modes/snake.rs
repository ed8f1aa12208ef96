use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::{Instant, Interval, interval, interval_at};
use tracing::{debug, info};

use super::terminal::{RENDER_INTERVAL, Tui, restore_terminal, setup_terminal};
use crate::game::{GameEngine, GamePhase};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::persistence::HighScoreStore;
use crate::render::SnakeRenderer;

/// Terminal driver for the snake game
///
/// Owns the tick timer; the engine only ever sees `advance` calls.
pub struct SnakeMode<S: HighScoreStore> {
    engine: GameEngine<S>,
    metrics: SessionMetrics,
    renderer: SnakeRenderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl<S: HighScoreStore> SnakeMode<S> {
    pub fn new(engine: GameEngine<S>) -> Self {
        Self {
            engine,
            metrics: SessionMetrics::new(),
            renderer: SnakeRenderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        let result = self.run_game_loop(&mut terminal).await;

        restore_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_period = self.engine.tick_interval();
        let mut tick_timer = interval(tick_period);
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = tick_timer.tick() => {
                    self.update_game();
                    self.reschedule(&mut tick_period, &mut tick_timer);
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    let config = self.engine.config();
                    let snapshot = self.engine.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, config, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("leaving snake");
                break;
            }
        }

        Ok(())
    }

    /// Rebuild the tick timer if the speed changed since it was built
    ///
    /// Called right after a tick fires, so the tick already due under the old
    /// period has happened and the new period starts from now.
    fn reschedule(&self, period: &mut Duration, timer: &mut Interval) -> bool {
        let wanted = self.engine.tick_interval();
        if wanted == *period {
            return false;
        }
        *period = wanted;
        *timer = interval_at(Instant::now() + wanted, wanted);
        debug!(tick_period = ?wanted, "tick timer rescheduled");
        true
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Move(direction) => self.engine.set_direction(direction),
            KeyAction::Select | KeyAction::Restart => {
                if self.engine.phase() != GamePhase::Running {
                    self.start_game();
                }
            }
            KeyAction::SetSpeed(speed) => self.engine.set_speed(speed),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn update_game(&mut self) {
        let Some(outcome) = self.engine.advance() else {
            return;
        };
        if outcome.collision.is_some() {
            self.metrics.on_game_over(self.engine.snapshot().score);
        }
    }

    fn start_game(&mut self) {
        self.engine.start();
        self.metrics.on_game_start();
    }

    pub fn engine(&self) -> &GameEngine<S> {
        &self.engine
    }

    pub fn tick_interval(&self) -> Duration {
        self.engine.tick_interval()
    }
}
