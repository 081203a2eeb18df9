use std::time::Duration;

use ratatui::style::Color;
use ratatui::symbols::border;

/// Logical grid dimensions for one session.
///
/// Both axes are at least one cell; [`GridSize::new`] clamps anything smaller.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Creates a grid, clamping each axis to `max(1, value)`.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT)
    }
}

/// How new food positions are chosen.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum FoodPlacement {
    /// Bounded rejection sampling; may give up on a crowded board.
    #[default]
    Sampled,
    /// Uniform pick among every free cell.
    Exact,
}

/// Session settings handed to the game loop by the host.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameConfig {
    pub grid: GridSize,
    pub initial_length: usize,
    pub tick_interval: Duration,
    pub food_placement: FoodPlacement,
    /// Fixed RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Returns a copy with the tick interval clamped into the supported range.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.grid = GridSize::new(self.grid.width, self.grid.height);
        self.tick_interval = clamp_tick_interval(self.tick_interval);
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            initial_length: DEFAULT_INITIAL_LENGTH,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            food_placement: FoodPlacement::default(),
            seed: None,
        }
    }
}

/// Clamps a tick interval to `[MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS]`.
#[must_use]
pub fn clamp_tick_interval(interval: Duration) -> Duration {
    interval.clamp(
        Duration::from_millis(MIN_TICK_INTERVAL_MS),
        Duration::from_millis(MAX_TICK_INTERVAL_MS),
    )
}

/// Colors applied to the play area and overlays.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub border_bg: Color,
    pub hud_label: Color,
    pub hud_value: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

/// Green snake on dark theme.
pub const THEME_DEFAULT: Theme = Theme {
    snake_head: Color::LightGreen,
    snake_body: Color::Green,
    food: Color::Red,
    play_bg: Color::Black,
    border_fg: Color::White,
    border_bg: Color::DarkGray,
    hud_label: Color::DarkGray,
    hud_value: Color::White,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
};

/// Half-block border set: solid side faces the play area.
pub const BORDER_HALF_BLOCK: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

pub const GLYPH_SNAKE_HEAD: &str = "█";
pub const GLYPH_SNAKE_BODY: &str = "▓";
pub const GLYPH_FOOD: &str = "●";

/// Default grid width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 20;

/// Default grid height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 20;

/// Segments in a freshly reset snake.
pub const DEFAULT_INITIAL_LENGTH: usize = 4;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 120;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 30;

/// Maximum tick interval in milliseconds.
pub const MAX_TICK_INTERVAL_MS: u64 = 2_000;

/// Random draws attempted before food placement gives up.
pub const MAX_FOOD_ATTEMPTS: u32 = 1_000;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{GameConfig, GridSize, MAX_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS};

    #[test]
    fn grid_size_clamps_zero_axes_to_one() {
        let grid = GridSize::new(0, 7);

        assert_eq!(grid, GridSize { width: 1, height: 7 });
        assert_eq!(grid.total_cells(), 7);
    }

    #[test]
    fn normalized_config_clamps_tick_interval() {
        let fast = GameConfig {
            tick_interval: Duration::from_millis(1),
            ..GameConfig::default()
        }
        .normalized();
        let slow = GameConfig {
            tick_interval: Duration::from_secs(60),
            ..GameConfig::default()
        }
        .normalized();

        assert_eq!(fast.tick_interval, Duration::from_millis(MIN_TICK_INTERVAL_MS));
        assert_eq!(slow.tick_interval, Duration::from_millis(MAX_TICK_INTERVAL_MS));
    }
}
