use std::time::Instant;

use tracing::debug;

use crate::config::GridSize;
use crate::game::{GameOverSummary, Phase, StepOutcome, StepResult};
use crate::game_loop::GameLoop;
use crate::input::GameInput;

/// Host-side state around one [`GameLoop`]: the game-over dialog, the quit
/// flag and whether the grid follows the terminal size.
pub struct App {
    game: GameLoop,
    dialog: Option<GameOverSummary>,
    follow_terminal: bool,
    should_quit: bool,
}

impl App {
    /// Wraps `game`. With `follow_terminal` set, idle sessions are reset to
    /// the new grid whenever the terminal is resized.
    #[must_use]
    pub fn new(game: GameLoop, follow_terminal: bool) -> Self {
        Self {
            game,
            dialog: None,
            follow_terminal,
            should_quit: false,
        }
    }

    /// Applies one input event.
    pub fn handle_input(&mut self, input: GameInput, now: Instant) {
        match input {
            GameInput::Direction(direction) => {
                self.game.set_direction(direction);
            }
            GameInput::Toggle if self.dialog.is_some() => self.restart(now),
            GameInput::Toggle => {
                self.game.toggle(now);
            }
            GameInput::Start => {
                if self.game.state().phase() == Phase::GameOver {
                    self.restart(now);
                } else {
                    self.game.start(now);
                }
            }
            GameInput::Pause => {
                self.game.pause(now);
            }
            GameInput::Reset => {
                self.dialog = None;
                let grid = self.game.state().bounds();
                let initial_length = self.game.state().initial_length();
                self.game.reset(grid, initial_length);
            }
            GameInput::Dismiss => self.dialog = None,
            GameInput::Quit => self.should_quit = true,
        }
    }

    /// Polls the game loop and opens the dialog when a session ends.
    pub fn tick(&mut self, now: Instant) -> Option<StepResult> {
        let result = self.game.poll(now)?;
        if let StepOutcome::Terminated(summary) = result.outcome {
            self.dialog = Some(summary);
        }
        Some(result)
    }

    /// Follows a terminal resize while nothing is in progress.
    pub fn resize(&mut self, grid: GridSize) {
        if !self.follow_terminal || self.game.state().phase() != Phase::Idle {
            return;
        }
        if self.game.state().bounds() == grid {
            return;
        }

        debug!(width = grid.width, height = grid.height, "grid follows terminal");
        let initial_length = self.game.state().initial_length();
        self.game.reset(grid, initial_length);
    }

    fn restart(&mut self, now: Instant) {
        self.dialog = None;
        self.game.restart(now);
    }

    #[must_use]
    pub fn game(&self) -> &GameLoop {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameLoop {
        &mut self.game
    }

    /// Summary shown by the game-over dialog, when it is open.
    #[must_use]
    pub fn dialog(&self) -> Option<&GameOverSummary> {
        self.dialog.as_ref()
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
