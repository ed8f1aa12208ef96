use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::time::{Instant, interval, sleep_until};
use tracing::{debug, info};

use super::terminal::{RENDER_INTERVAL, Tui, restore_terminal, setup_terminal};
use crate::game::Direction;
use crate::input::{InputHandler, KeyAction};
use crate::memory::{FlipOutcome, MISMATCH_DELAY, MemoryEngine, WIN_NOTICE_DELAY};
use crate::metrics::SessionMetrics;
use crate::render::MemoryRenderer;
use crate::render::memory::COLUMNS;

/// Terminal driver for the memory game
pub struct MemoryMode {
    engine: MemoryEngine,
    cursor: usize,
    metrics: SessionMetrics,
    renderer: MemoryRenderer,
    input_handler: InputHandler,
    /// When the face-up mismatched pair should be turned back down
    mismatch_deadline: Option<Instant>,
    /// When the win notice becomes visible
    win_notice_at: Option<Instant>,
    should_quit: bool,
}

impl MemoryMode {
    pub fn new(engine: MemoryEngine) -> Self {
        let mut metrics = SessionMetrics::new();
        metrics.on_game_start();

        Self {
            engine,
            cursor: 0,
            metrics,
            renderer: MemoryRenderer::new(),
            input_handler: InputHandler::new(),
            mismatch_deadline: None,
            win_notice_at: None,
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
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            let deadline = self.mismatch_deadline;

            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.hide_mismatch();
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.engine.snapshot();
                    let show_win = self.show_win(Instant::now());
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, self.cursor, show_win, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("leaving memory");
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Move(direction) => self.move_cursor(direction),
            KeyAction::Select => self.flip_at_cursor(),
            KeyAction::Restart => self.restart(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::SetSpeed(_) | KeyAction::None => {}
        }
    }

    fn move_cursor(&mut self, direction: Direction) {
        let rows = self.engine.card_count().div_ceil(COLUMNS);
        let (mut row, mut col) = (self.cursor / COLUMNS, self.cursor % COLUMNS);

        match direction {
            Direction::Up => row = row.saturating_sub(1),
            Direction::Down => row = (row + 1).min(rows - 1),
            Direction::Left => col = col.saturating_sub(1),
            Direction::Right => col = (col + 1).min(COLUMNS - 1),
        }

        self.cursor = (row * COLUMNS + col).min(self.engine.card_count() - 1);
    }

    fn flip_at_cursor(&mut self) {
        let outcome = self.engine.flip(self.cursor);
        debug!(cursor = self.cursor, ?outcome, "flip");

        match outcome {
            FlipOutcome::Mismatch => {
                self.mismatch_deadline = Some(Instant::now() + MISMATCH_DELAY);
            }
            FlipOutcome::Match { won: true } => {
                self.win_notice_at = Some(Instant::now() + WIN_NOTICE_DELAY);
                self.metrics.on_game_over(self.engine.score());
            }
            FlipOutcome::Match { won: false } | FlipOutcome::FirstCard | FlipOutcome::Rejected => {}
        }
    }

    fn hide_mismatch(&mut self) {
        self.mismatch_deadline = None;
        self.engine.resolve_mismatch();
    }

    fn restart(&mut self) {
        self.engine.reset();
        self.cursor = 0;
        self.mismatch_deadline = None;
        self.win_notice_at = None;
        self.metrics.on_game_start();
    }

    fn show_win(&self, now: Instant) -> bool {
        self.win_notice_at.is_some_and(|at| now >= at)
    }

    pub fn engine(&self) -> &MemoryEngine {
        &self.engine
    }
}
