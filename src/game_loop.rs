use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::{GameConfig, GridSize};
use crate::game::{GameState, Phase, Snapshot, StepOutcome, StepResult};
use crate::input::Direction;
use crate::score::HighScoreStore;

/// Armed fixed-interval timer. Only one exists per loop at a time.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct TickTimer {
    interval: Duration,
    next_due: Instant,
}

impl TickTimer {
    fn arm(now: Instant, interval: Duration) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    fn is_due(self, now: Instant) -> bool {
        now >= self.next_due
    }

    fn rearm(&mut self, now: Instant) {
        self.next_due = now + self.interval;
    }
}

/// Drives one [`GameState`] on a fixed cadence and owns the high-score store.
///
/// The host calls [`GameLoop::poll`] from its frame loop; at most one step
/// runs per poll. Starting, pausing, resetting and game over all replace or
/// drop the single timer slot, so two timers can never be live at once.
pub struct GameLoop {
    state: GameState,
    store: Box<dyn HighScoreStore>,
    timer: Option<TickTimer>,
    tick_interval: Duration,
}

impl GameLoop {
    /// Builds an idle session, seeding the high score from `store`.
    ///
    /// A store that fails to load counts as a high score of zero.
    #[must_use]
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>) -> Self {
        let config = config.normalized();
        let high_score = store.load().unwrap_or_else(|error| {
            warn!(%error, "failed to load high score, starting from 0");
            0
        });

        Self {
            state: GameState::new(&config, high_score),
            store,
            timer: None,
            tick_interval: config.tick_interval,
        }
    }

    /// Starts or resumes the session and arms the tick timer.
    ///
    /// From game over this begins a fresh session. Returns false when the
    /// session was already running.
    pub fn start(&mut self, now: Instant) -> bool {
        if !self.state.start(now) {
            return false;
        }

        self.stop_timer();
        self.timer = Some(TickTimer::arm(now, self.tick_interval));
        info!(
            elapsed_seconds = self.state.elapsed_seconds(now),
            "session running"
        );
        true
    }

    /// Pauses a running session and cancels the timer.
    pub fn pause(&mut self, now: Instant) -> bool {
        if !self.state.pause(now) {
            return false;
        }

        self.stop_timer();
        info!(
            elapsed_seconds = self.state.elapsed_seconds(now),
            "session paused"
        );
        true
    }

    /// Pauses when running, starts otherwise.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.state.phase() == Phase::Running {
            self.pause(now)
        } else {
            self.start(now)
        }
    }

    /// Replaces the session with a fresh idle one on `grid`.
    pub fn reset(&mut self, grid: GridSize, initial_length: usize) {
        self.stop_timer();
        self.state.reset(grid, initial_length);
        info!(width = grid.width, height = grid.height, "session reset");
    }

    /// Resets with the current grid and length, then starts immediately.
    pub fn restart(&mut self, now: Instant) -> bool {
        let grid = self.state.bounds();
        let initial_length = self.state.initial_length();
        self.reset(grid, initial_length);
        self.start(now)
    }

    pub fn set_direction(&mut self, direction: Direction) -> bool {
        self.state.set_direction(direction)
    }

    pub fn set_direction_delta(&mut self, dx: i32, dy: i32) -> bool {
        self.state.set_direction_delta(dx, dy)
    }

    /// Runs one step when the timer is due.
    ///
    /// On termination the timer is dropped and a raised high score is handed
    /// to the store. A failed save is logged and otherwise ignored.
    pub fn poll(&mut self, now: Instant) -> Option<StepResult> {
        let timer = self.timer.as_mut()?;
        if !timer.is_due(now) {
            return None;
        }
        timer.rearm(now);

        let result = self.state.step(now)?;
        if let StepOutcome::Terminated(summary) = result.outcome {
            self.stop_timer();

            if let Some(high_score) = summary.new_high_score {
                if let Err(error) = self.store.save(high_score) {
                    warn!(%error, high_score, "failed to save high score");
                }
            }
        }

        Some(result)
    }

    /// Returns the read-only view used by renderers.
    #[must_use]
    pub fn snapshot(&self, now: Instant) -> Snapshot {
        self.state.snapshot(now)
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for hosts and tests that stage a position.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub fn store(&self) -> &dyn HighScoreStore {
        self.store.as_ref()
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Returns true while a tick timer is armed.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.timer.is_some()
    }

    /// Instant of the next scheduled step, if any.
    #[must_use]
    pub fn next_tick_at(&self) -> Option<Instant> {
        self.timer.map(|timer| timer.next_due)
    }

    fn stop_timer(&mut self) {
        self.timer = None;
    }
}
