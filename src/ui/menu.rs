use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;

use crate::config::Theme;
use crate::game::{DeathReason, GameOverSummary};

/// Idle overlay: "Press Start" plus the best score so far.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, high_score: u32, theme: &Theme) {
    let title = Style::default()
        .fg(theme.menu_title)
        .add_modifier(Modifier::BOLD);
    let mut lines = start_lines(high_score);
    if let Some(first) = lines.first_mut() {
        first.style = title;
    }
    if let Some(last) = lines.last_mut() {
        last.style = Style::default().fg(theme.menu_footer);
    }

    render_popup(frame, area, " start ", lines);
}

pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    render_popup(frame, area, " pause ", pause_lines());
}

/// Game-over dialog with final score, high score and cause of death.
pub fn render_game_over_menu(frame: &mut Frame<'_>, area: Rect, summary: &GameOverSummary) {
    render_popup(frame, area, " game over ", game_over_lines(summary));
}

fn start_lines(high_score: u32) -> Vec<Line<'static>> {
    vec![
        Line::from("SNAKE"),
        Line::from("Press Start"),
        Line::from(format!("High score: {high_score}")),
        Line::from(""),
        Line::from("[Space]/[Enter] Start  [Q] Quit"),
        Line::from("Arrows/WASD to move"),
    ]
}

fn pause_lines() -> Vec<Line<'static>> {
    vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[Space]/[Enter] Resume"),
        Line::from("[R] Reset  [Q] Quit"),
    ]
}

fn game_over_lines(summary: &GameOverSummary) -> Vec<Line<'static>> {
    let cause = match summary.reason {
        DeathReason::WallCollision => "Cause: hit wall",
        DeathReason::SelfCollision => "Cause: hit yourself",
    };

    let mut lines = vec![
        Line::from("GAME OVER"),
        Line::from(""),
        Line::from(format!("Score: {}", summary.final_score)),
        Line::from(format!("High score: {}", summary.high_score)),
        Line::from(cause),
    ];
    if summary.new_high_score.is_some() {
        lines.push(Line::from("New high score!"));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("[Space]/[Enter] Play Again"));
    lines.push(Line::from("[Esc] Close  [Q] Quit"));
    lines
}

/// Clears a bordered box just large enough for `lines` and draws them centred.
fn render_popup(frame: &mut Frame<'_>, area: Rect, title: &str, lines: Vec<Line<'static>>) {
    let text_width = lines.iter().map(Line::width).max().unwrap_or(0);
    let width = u16::try_from(text_width).unwrap_or(u16::MAX).saturating_add(4);
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let popup = centered(area, width, height);

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(title.to_owned())),
        popup,
    );
}

/// A `width` x `height` rectangle centred in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
