use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::config::Theme;
use crate::game::{Phase, Snapshot};

/// Rows taken by the HUD above the play area.
pub const HUD_HEIGHT: u16 = 1;

const SEPARATOR: &str = " │ ";

/// Renders the one-line HUD and returns the remaining play area below it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot, theme: &Theme) -> Rect {
    let [hud_area, play_area] =
        Layout::vertical([Constraint::Length(HUD_HEIGHT), Constraint::Min(0)]).areas(area);

    let compact = hud_width(snapshot) > usize::from(hud_area.width);
    let line = hud_line(snapshot, compact, theme);

    frame.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Left)
            .style(Style::default().fg(theme.hud_label)),
        hud_area,
    );

    play_area
}

/// Formats whole seconds as `mm:ss`; minutes keep counting past 59.
#[must_use]
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "ready",
        Phase::Running => "running",
        Phase::Paused => "paused",
        Phase::GameOver => "game over",
    }
}

fn hud_line(snapshot: &Snapshot, compact: bool, theme: &Theme) -> Line<'static> {
    let (score_label, high_label, time_label) = if compact {
        ("S", "H", "T")
    } else {
        ("Score", "Hi", "Time")
    };
    let value_style = Style::default()
        .fg(theme.hud_value)
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::raw(format!("{score_label}: ")),
        Span::styled(snapshot.score.to_string(), value_style),
        Span::raw(SEPARATOR),
        Span::raw(format!("{high_label}: ")),
        Span::styled(snapshot.high_score.max(snapshot.score).to_string(), value_style),
        Span::raw(SEPARATOR),
        Span::raw(format!("{time_label}: ")),
        Span::styled(format_elapsed(snapshot.elapsed_seconds), value_style),
    ];

    if !compact {
        spans.push(Span::raw(SEPARATOR));
        spans.push(Span::raw(phase_label(snapshot.phase)));
    }

    Line::from(spans)
}

/// Display width of the full HUD line for `snapshot`.
#[must_use]
pub fn hud_width(snapshot: &Snapshot) -> usize {
    let text = format!(
        "Score: {}{SEPARATOR}Hi: {}{SEPARATOR}Time: {}{SEPARATOR}{}",
        snapshot.score,
        snapshot.high_score.max(snapshot.score),
        format_elapsed(snapshot.elapsed_seconds),
        phase_label(snapshot.phase),
    );
    UnicodeWidthStr::width(text.as_str())
}
