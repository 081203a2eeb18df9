use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::{FoodPlacement, GameConfig, GridSize};
use crate::food;
use crate::input::{direction_change_is_valid, Direction};
use crate::snake::{Position, Snake};

/// Lifecycle phase of one session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    /// Drawn but not advancing; the state right after a reset.
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// Payload of a terminated session, consumed by the game-over dialog.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameOverSummary {
    pub final_score: u32,
    /// High score after this session was taken into account.
    pub high_score: u32,
    /// Set when this session raised the high score.
    pub new_high_score: Option<u32>,
    pub reason: DeathReason,
}

/// Outcome tag of one tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StepOutcome {
    Continued,
    Ate,
    Terminated(GameOverSummary),
}

/// Read-only view of the state, enough to draw a frame.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snapshot {
    pub snake: Vec<Position>,
    pub food: Option<Position>,
    pub score: u32,
    pub high_score: u32,
    pub elapsed_seconds: u64,
    pub phase: Phase,
    pub direction: Direction,
    pub grid: GridSize,
}

/// Result of one tick plus the post-step state.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StepResult {
    pub outcome: StepOutcome,
    pub snapshot: Snapshot,
}

/// Accumulates running time across pauses.
#[derive(Debug, Clone, Copy, Default)]
struct Stopwatch {
    banked: Duration,
    running_since: Option<Instant>,
}

impl Stopwatch {
    fn resume(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    fn pause(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.banked += now.saturating_duration_since(since);
        }
    }

    fn elapsed(&self, now: Instant) -> Duration {
        let live = self
            .running_since
            .map_or(Duration::ZERO, |since| now.saturating_duration_since(since));
        self.banked + live
    }
}

/// Complete mutable game state for one session.
///
/// Every input is explicit: the caller passes the current [`Instant`] to the
/// time-aware operations and the RNG is owned and seedable.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: Option<Position>,
    pub score: u32,
    high_score: u32,
    direction: Direction,
    pending_direction: Direction,
    phase: Phase,
    bounds: GridSize,
    initial_length: usize,
    food_placement: FoodPlacement,
    stopwatch: Stopwatch,
    rng: StdRng,
}

impl GameState {
    /// Creates an idle session from `config`, seeding the cached high score.
    #[must_use]
    pub fn new(config: &GameConfig, high_score: u32) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self::with_rng(config, high_score, rng)
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(bounds: GridSize, initial_length: usize, seed: u64) -> Self {
        let config = GameConfig {
            grid: bounds,
            initial_length,
            seed: Some(seed),
            ..GameConfig::default()
        };

        Self::new(&config, 0)
    }

    fn with_rng(config: &GameConfig, high_score: u32, rng: StdRng) -> Self {
        let mut state = Self {
            snake: Snake::new(Position::new(0, 0)),
            food: None,
            score: 0,
            high_score,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            phase: Phase::Idle,
            bounds: config.grid,
            initial_length: config.initial_length,
            food_placement: config.food_placement,
            stopwatch: Stopwatch::default(),
            rng,
        };
        state.reset(config.grid, config.initial_length);
        state
    }

    /// Starts a fresh session on `grid` and moves to [`Phase::Idle`].
    ///
    /// The snake length is clamped to `1..=width`. When the body would stick
    /// out past the left wall the head is shifted right until it fits.
    pub fn reset(&mut self, grid: GridSize, initial_length: usize) {
        let grid = GridSize::new(grid.width, grid.height);
        let length = initial_length.clamp(1, usize::from(grid.width));
        let centre_x = i32::from(grid.width / 2);
        let min_head_x = i32::try_from(length - 1).unwrap_or(centre_x);
        let head = Position::new(centre_x.max(min_head_x), i32::from(grid.height / 2));

        self.bounds = grid;
        self.initial_length = initial_length;
        self.snake = Snake::straight(head, length);
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.score = 0;
        self.stopwatch = Stopwatch::default();
        self.phase = Phase::Idle;
        self.food = food::place(self.food_placement, &mut self.rng, grid, &self.snake);

        debug!(
            width = grid.width,
            height = grid.height,
            length,
            "session reset"
        );
    }

    /// Moves to [`Phase::Running`]. Returns false when already running.
    ///
    /// From [`Phase::GameOver`] the session is reset first with its current
    /// grid and initial length.
    pub fn start(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Running => return false,
            Phase::GameOver => self.reset(self.bounds, self.initial_length),
            Phase::Idle | Phase::Paused => {}
        }

        self.phase = Phase::Running;
        self.stopwatch.resume(now);
        true
    }

    /// Moves from [`Phase::Running`] to [`Phase::Paused`], banking elapsed
    /// time. Returns false in any other phase.
    pub fn pause(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Running {
            return false;
        }

        self.phase = Phase::Paused;
        self.stopwatch.pause(now);
        true
    }

    /// Requests a heading for the next tick.
    ///
    /// The exact reverse of the heading used on the last tick is dropped, as
    /// is any request after game over. Among accepted requests issued between
    /// two ticks the latest wins.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.phase == Phase::GameOver || !direction_change_is_valid(self.direction, direction) {
            return false;
        }

        self.pending_direction = direction;
        true
    }

    /// Same as [`GameState::set_direction`] for a raw `(dx, dy)` vector.
    /// Vectors that are not one of the four unit directions are ignored.
    pub fn set_direction_delta(&mut self, dx: i32, dy: i32) -> bool {
        Direction::from_delta(dx, dy).is_some_and(|direction| self.set_direction(direction))
    }

    /// Advances simulation by one tick. Returns `None` unless running.
    pub fn step(&mut self, now: Instant) -> Option<StepResult> {
        if self.phase != Phase::Running {
            return None;
        }

        self.direction = self.pending_direction;
        let next_head = self.snake.head().stepped(self.direction);

        let outcome = if !next_head.is_within_bounds(self.bounds) {
            StepOutcome::Terminated(self.terminate(now, DeathReason::WallCollision))
        } else if self.snake.occupies(next_head) {
            // Checked against the body before moving, tail cell included.
            StepOutcome::Terminated(self.terminate(now, DeathReason::SelfCollision))
        } else {
            let ate = self.food == Some(next_head);
            self.snake.advance(next_head, ate);

            if ate {
                self.score += 1;
                self.food =
                    food::place(self.food_placement, &mut self.rng, self.bounds, &self.snake);
                StepOutcome::Ate
            } else {
                StepOutcome::Continued
            }
        };

        Some(StepResult {
            outcome,
            snapshot: self.snapshot(now),
        })
    }

    fn terminate(&mut self, now: Instant, reason: DeathReason) -> GameOverSummary {
        self.phase = Phase::GameOver;
        self.stopwatch.pause(now);

        let new_high_score = (self.score > self.high_score).then(|| {
            self.high_score = self.score;
            self.score
        });

        info!(
            score = self.score,
            high_score = self.high_score,
            ?reason,
            "game over"
        );

        GameOverSummary {
            final_score: self.score,
            high_score: self.high_score,
            new_high_score,
            reason,
        }
    }

    /// Returns the read-only view used by renderers.
    #[must_use]
    pub fn snapshot(&self, now: Instant) -> Snapshot {
        Snapshot {
            snake: self.snake.to_vec(),
            food: self.food,
            score: self.score,
            high_score: self.high_score,
            elapsed_seconds: self.elapsed_seconds(now),
            phase: self.phase,
            direction: self.direction,
            grid: self.bounds,
        }
    }

    /// Whole seconds spent running since the last reset.
    #[must_use]
    pub fn elapsed_seconds(&self, now: Instant) -> u64 {
        self.stopwatch.elapsed(now).as_secs()
    }

    /// Replaces the snake and its heading, dropping any pending turn.
    pub fn replace_snake(&mut self, snake: Snake, direction: Direction) {
        self.snake = snake;
        self.direction = direction;
        self.pending_direction = direction;
    }

    /// Overwrites the cached high score, e.g. after a late store load.
    pub fn set_high_score(&mut self, high_score: u32) {
        self.high_score = high_score;
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Heading committed on the last tick.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    #[must_use]
    pub fn initial_length(&self) -> usize {
        self.initial_length
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::config::GridSize;
    use crate::input::Direction;
    use crate::snake::{Position, Snake};

    use super::{DeathReason, GameState, Phase, StepOutcome};

    fn running_state(bounds: GridSize, seed: u64) -> (GameState, Instant) {
        let mut state = GameState::new_with_seed(bounds, 4, seed);
        let now = Instant::now();
        assert!(state.start(now));
        (state, now)
    }

    #[test]
    fn reset_centres_a_straight_snake() {
        let state = GameState::new_with_seed(GridSize::new(10, 10), 4, 1);

        assert_eq!(
            state.snake.to_vec(),
            vec![
                Position::new(5, 5),
                Position::new(4, 5),
                Position::new(3, 5),
                Position::new(2, 5),
            ]
        );
        assert_eq!(state.direction(), Direction::Right);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.score, 0);
        let food = state.food.expect("sparse board gets food");
        assert!(!state.snake.occupies(food));
    }

    #[test]
    fn reset_clamps_length_to_grid_width_and_stays_on_grid() {
        let state = GameState::new_with_seed(GridSize::new(6, 3), 50, 2);

        assert_eq!(state.snake.len(), 6);
        assert_eq!(state.snake.head(), Position::new(5, 1));
        assert!(state
            .snake
            .segments()
            .all(|segment| segment.is_within_bounds(state.bounds())));
    }

    #[test]
    fn reset_treats_zero_length_as_one() {
        let state = GameState::new_with_seed(GridSize::new(5, 5), 0, 3);

        assert_eq!(state.snake.len(), 1);
    }

    #[test]
    fn step_is_ignored_unless_running() {
        let mut state = GameState::new_with_seed(GridSize::new(10, 10), 4, 4);
        let now = Instant::now();

        assert!(state.step(now).is_none());
        assert_eq!(state.snake.head(), Position::new(5, 5));
    }

    #[test]
    fn snake_moves_one_cell_per_tick() {
        let (mut state, now) = running_state(GridSize::new(10, 10), 5);
        state.food = None;

        let result = state.step(now).expect("running state steps");

        assert_eq!(result.outcome, StepOutcome::Continued);
        assert_eq!(state.snake.head(), Position::new(6, 5));
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn snake_grows_after_eating_food() {
        let (mut state, now) = running_state(GridSize::new(10, 10), 6);
        state.food = Some(Position::new(6, 5));

        let result = state.step(now).expect("running state steps");

        assert_eq!(result.outcome, StepOutcome::Ate);
        assert_eq!(state.snake.len(), 5);
        assert_eq!(state.score, 1);
        assert_eq!(result.snapshot.score, 1);
    }

    #[test]
    fn filling_the_board_keeps_running_without_food() {
        let (mut state, now) = running_state(GridSize::new(2, 1), 20);
        state.replace_snake(Snake::new(Position::new(0, 0)), Direction::Right);
        state.food = Some(Position::new(1, 0));

        let result = state.step(now).expect("running state steps");

        assert_eq!(result.outcome, StepOutcome::Ate);
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.food, None);
        assert_eq!(result.snapshot.food, None);
        assert_eq!(state.phase(), Phase::Running);

        let result = state.step(now).expect("still running without food");

        assert!(matches!(result.outcome, StepOutcome::Terminated(_)));
        assert_eq!(state.phase(), Phase::GameOver);
    }

    #[test]
    fn snake_collision_with_wall_sets_game_over() {
        let (mut state, now) = running_state(GridSize::new(4, 4), 7);
        state.replace_snake(Snake::new(Position::new(3, 3)), Direction::Right);

        let result = state.step(now).expect("running state steps");

        assert!(matches!(
            result.outcome,
            StepOutcome::Terminated(summary) if summary.reason == DeathReason::WallCollision
        ));
        assert_eq!(state.phase(), Phase::GameOver);
    }

    #[test]
    fn snake_collision_with_self_sets_game_over() {
        let (mut state, now) = running_state(GridSize::new(6, 6), 8);
        state.replace_snake(
            Snake::from_segments(vec![
                Position::new(2, 2),
                Position::new(1, 2),
                Position::new(1, 3),
                Position::new(2, 3),
                Position::new(3, 3),
                Position::new(3, 2),
            ]),
            Direction::Right,
        );
        state.set_direction(Direction::Down);

        let result = state.step(now).expect("running state steps");

        assert!(matches!(
            result.outcome,
            StepOutcome::Terminated(summary) if summary.reason == DeathReason::SelfCollision
        ));
    }

    #[test]
    fn moving_into_the_tail_cell_is_a_collision() {
        let (mut state, now) = running_state(GridSize::new(6, 6), 9);
        state.replace_snake(
            Snake::from_segments(vec![
                Position::new(2, 2),
                Position::new(2, 3),
                Position::new(3, 3),
                Position::new(3, 2),
            ]),
            Direction::Up,
        );
        state.set_direction(Direction::Right);

        let result = state.step(now).expect("running state steps");

        assert!(matches!(result.outcome, StepOutcome::Terminated(_)));
    }

    #[test]
    fn reverse_request_is_dropped() {
        let (mut state, now) = running_state(GridSize::new(10, 10), 10);
        state.food = None;

        assert!(!state.set_direction(Direction::Left));
        state.step(now);

        assert_eq!(state.snake.head(), Position::new(6, 5));
    }

    #[test]
    fn reverse_after_pending_turn_is_still_judged_against_last_heading() {
        let (mut state, now) = running_state(GridSize::new(10, 10), 11);
        state.food = None;

        assert!(state.set_direction(Direction::Up));
        assert!(!state.set_direction(Direction::Left));
        state.step(now);

        assert_eq!(state.snake.head(), Position::new(5, 4));
    }

    #[test]
    fn latest_pending_direction_wins() {
        let (mut state, now) = running_state(GridSize::new(10, 10), 12);
        state.food = None;

        state.set_direction(Direction::Up);
        state.set_direction(Direction::Down);
        state.step(now);

        assert_eq!(state.snake.head(), Position::new(5, 6));
        assert_eq!(state.direction(), Direction::Down);
    }

    #[test]
    fn direction_delta_ignores_diagonals() {
        let mut state = GameState::new_with_seed(GridSize::new(10, 10), 4, 13);

        assert!(!state.set_direction_delta(1, 1));
        assert!(state.set_direction_delta(0, -1));
    }

    #[test]
    fn pause_and_resume_freeze_elapsed_time() {
        let mut state = GameState::new_with_seed(GridSize::new(10, 10), 4, 14);
        let origin = Instant::now();

        state.start(origin);
        assert!(state.pause(origin + Duration::from_secs(3)));
        assert_eq!(state.elapsed_seconds(origin + Duration::from_secs(60)), 3);

        assert!(state.start(origin + Duration::from_secs(100)));
        assert_eq!(state.elapsed_seconds(origin + Duration::from_secs(102)), 5);
    }

    #[test]
    fn pause_outside_running_is_rejected() {
        let mut state = GameState::new_with_seed(GridSize::new(10, 10), 4, 15);

        assert!(!state.pause(Instant::now()));
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn elapsed_time_freezes_at_game_over() {
        let (mut state, origin) = running_state(GridSize::new(4, 4), 16);
        state.replace_snake(Snake::new(Position::new(3, 0)), Direction::Right);

        state.step(origin + Duration::from_secs(7));

        assert_eq!(state.elapsed_seconds(origin + Duration::from_secs(70)), 7);
    }

    #[test]
    fn start_from_game_over_resets_first() {
        let (mut state, now) = running_state(GridSize::new(10, 10), 17);
        state.score = 3;
        state.replace_snake(Snake::new(Position::new(9, 0)), Direction::Right);
        state.step(now);
        assert_eq!(state.phase(), Phase::GameOver);
        assert_eq!(state.high_score(), 3);

        assert!(state.start(now));

        assert_eq!(state.phase(), Phase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.high_score(), 3);
    }

    #[test]
    fn lower_score_keeps_existing_high_score() {
        let (mut state, now) = running_state(GridSize::new(4, 4), 18);
        state.set_high_score(10);
        state.score = 2;
        state.replace_snake(Snake::new(Position::new(3, 1)), Direction::Right);

        let result = state.step(now).expect("running state steps");

        let StepOutcome::Terminated(summary) = result.outcome else {
            panic!("expected termination, got {:?}", result.outcome);
        };
        assert_eq!(summary.final_score, 2);
        assert_eq!(summary.high_score, 10);
        assert_eq!(summary.new_high_score, None);
    }

    #[test]
    fn directions_are_ignored_after_game_over() {
        let (mut state, now) = running_state(GridSize::new(4, 4), 19);
        state.replace_snake(Snake::new(Position::new(3, 1)), Direction::Right);
        state.step(now);

        assert!(!state.set_direction(Direction::Up));
        assert!(state.step(now).is_none());
    }
}
