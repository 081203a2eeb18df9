use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::config::{
    GridSize, Theme, BORDER_HALF_BLOCK, GLYPH_FOOD, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD,
    THEME_DEFAULT,
};
use crate::game::{GameOverSummary, Phase, Snapshot};
use crate::snake::Position;
use crate::ui::hud::{render_hud, HUD_HEIGHT};
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Cells taken by the play-area border on each axis.
const BORDER_CELLS: u16 = 2;

/// Renders the full frame from a snapshot plus the open dialog, if any.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot, dialog: Option<&GameOverSummary>) {
    let theme = &THEME_DEFAULT;
    let area = frame.area();
    let below_hud = render_hud(frame, area, snapshot, theme);
    let play_area = fit_play_area(below_hud, snapshot.grid);

    let block = Block::bordered()
        .border_set(BORDER_HALF_BLOCK)
        .border_style(Style::new().fg(theme.border_fg).bg(theme.border_bg))
        .style(Style::new().bg(theme.play_bg));

    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_food(frame, inner, snapshot, theme);
    render_snake(frame, inner, snapshot, theme);

    match snapshot.phase {
        Phase::Idle => render_start_menu(frame, play_area, snapshot.high_score, theme),
        Phase::Paused => render_pause_menu(frame, play_area),
        Phase::GameOver => {
            if let Some(summary) = dialog {
                render_game_over_menu(frame, play_area, summary);
            }
        }
        Phase::Running => {}
    }
}

/// Largest grid that fits a terminal of `width × height` cells.
#[must_use]
pub fn grid_for_terminal(width: u16, height: u16) -> GridSize {
    GridSize::new(
        width.saturating_sub(BORDER_CELLS),
        height.saturating_sub(BORDER_CELLS + HUD_HEIGHT),
    )
}

fn fit_play_area(area: Rect, grid: GridSize) -> Rect {
    Rect {
        x: area.x,
        y: area.y,
        width: area.width.min(grid.width.saturating_add(BORDER_CELLS)),
        height: area.height.min(grid.height.saturating_add(BORDER_CELLS)),
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, theme: &Theme) {
    let Some(food) = snapshot.food else {
        return;
    };
    let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, food) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_FOOD, Style::new().fg(theme.food).bg(theme.play_bg));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, theme: &Theme) {
    let buffer = frame.buffer_mut();

    // Tail first so the head wins if it ever overlaps a segment.
    for (index, segment) in snapshot.snake.iter().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_HEAD,
                Style::new()
                    .fg(theme.snake_head)
                    .add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(theme.snake_body));
        }
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
