//! Layout and chrome shared by the arena screens.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use snake_arena::arena::{MatchOutcome, OutcomeCause};

/// Areas produced by [`create_arena_layout`].
pub struct ArenaLayout {
    /// Play field, top left inside the outer border
    pub content: Rect,
    /// Two-line status bar under the play field
    pub status_bar: Rect,
    /// Right-hand info panel
    pub info_panel: Rect,
}

/// Outer border with play field, status bar, and info panel. The play
/// field keeps at least enough rows for a `grid_size` board drawn two
/// cells per row, plus its own border.
///
/// ```text
/// ┌─ Title ─────────────────────────┬─ Info ──────┐
/// │   [play field]                  │  [info]     │
/// │ [status bar - 2 lines]          │             │
/// └─────────────────────────────────┴─────────────┘
/// ```
pub fn create_arena_layout(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    border_color: Color,
    info_panel_width: u16,
    grid_size: i16,
) -> ArenaLayout {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(field_width(grid_size)),
            Constraint::Length(info_panel_width),
        ])
        .split(inner);

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(field_rows(grid_size)), Constraint::Length(2)])
        .split(h_chunks[0]);

    ArenaLayout {
        content: v_chunks[0],
        status_bar: v_chunks[1],
        info_panel: h_chunks[1],
    }
}

fn field_width(grid_size: i16) -> u16 {
    grid_size.max(0) as u16 + 2
}

fn field_rows(grid_size: i16) -> u16 {
    (grid_size.max(0) as u16).div_ceil(2) + 2
}

/// What the status bar is reporting.
pub enum StatusPhase<'a> {
    /// Match in progress, with the latest event message if any
    Running { message: Option<&'a str>, slowed: bool },
    Paused,
    Over(OutcomeCause),
}

impl StatusPhase<'_> {
    fn text(&self) -> &str {
        match self {
            Self::Running {
                message: Some(message),
                ..
            } => *message,
            Self::Running { slowed: true, .. } => "Slowed down...",
            Self::Running { .. } => "Slither!",
            Self::Paused => "Paused",
            Self::Over(cause) => cause.message(),
        }
    }

    fn color(&self) -> Color {
        match self {
            Self::Running { slowed: true, .. } => Color::Cyan,
            Self::Running { .. } => Color::Green,
            Self::Paused => Color::Yellow,
            Self::Over(cause) => outcome_color(*cause),
        }
    }

    fn controls(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Running { .. } => &[("[Arrows]", "Move"), ("[P]", "Pause"), ("[Q]", "Quit")],
            Self::Paused => &[("[P]", "Resume"), ("[R]", "Restart"), ("[Q]", "Quit")],
            Self::Over(_) => &[("[R]", "Restart"), ("[Q]", "Quit")],
        }
    }
}

/// Phase message on line one, the keys that phase accepts on line two.
pub fn render_status_bar(frame: &mut Frame, area: Rect, phase: &StatusPhase) {
    if area.height == 0 {
        return;
    }

    let mut style = Style::default().fg(phase.color());
    if matches!(phase, StatusPhase::Over(_)) {
        style = style.add_modifier(Modifier::BOLD);
    }
    let status = Paragraph::new(phase.text())
        .style(style)
        .alignment(Alignment::Center);
    frame.render_widget(status, Rect { height: 1, ..area });

    if area.height < 2 {
        return;
    }
    let mut spans = Vec::new();
    for (i, (key, action)) in phase.controls().iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::White)));
        spans.push(Span::styled(
            format!(" {action}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        Rect {
            y: area.y + 1,
            height: 1,
            ..area
        },
    );
}

/// Bordered " Info " panel; returns the inner area.
pub fn render_info_panel_frame(frame: &mut Frame, area: Rect) -> Rect {
    let block = Block::default()
        .title(" Info ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

fn outcome_color(cause: OutcomeCause) -> Color {
    match cause {
        OutcomeCause::AiDied => Color::Green,
        OutcomeCause::PlayerDied => Color::Red,
        OutcomeCause::BothDied => Color::Yellow,
    }
}

fn outcome_title(cause: OutcomeCause) -> &'static str {
    match cause {
        OutcomeCause::AiDied => "OPPONENT DOWN",
        OutcomeCause::PlayerDied => "GAME OVER",
        OutcomeCause::BothDied => "MUTUAL DEFEAT",
    }
}

/// Game-over banner along the bottom of `area`. The board stays visible.
pub fn render_outcome_banner(frame: &mut Frame, area: Rect, outcome: &MatchOutcome) {
    let banner_height: u16 = 5;
    let banner_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(banner_height),
        width: area.width,
        height: banner_height.min(area.height),
    };

    frame.render_widget(Clear, banner_area);

    let color = outcome_color(outcome.cause);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let inner = block.inner(banner_area);
    frame.render_widget(block, banner_area);

    let lines = vec![
        Line::from(vec![
            Span::styled(
                outcome_title(outcome.cause),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::styled(outcome.cause.message(), Style::default().fg(Color::White)),
        ]),
        Line::from(Span::styled(
            format!("Final score: {}", outcome.final_score),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            "[R] Restart  [Q] Quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let text = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(text, inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_fits_board() {
        // 30 cells, two per row, plus top and bottom border
        assert_eq!(field_rows(30), 17);
        assert_eq!(field_rows(9), 7);
        assert_eq!(field_width(30), 32);
    }

    #[test]
    fn test_running_phase_prefers_event_message() {
        let phase = StatusPhase::Running {
            message: Some("Player ate bonus"),
            slowed: true,
        };
        assert_eq!(phase.text(), "Player ate bonus");
        assert_eq!(phase.color(), Color::Cyan);

        let idle = StatusPhase::Running {
            message: None,
            slowed: false,
        };
        assert_eq!(idle.text(), "Slither!");
        assert_eq!(idle.color(), Color::Green);
        assert_eq!(idle.controls()[0], ("[Arrows]", "Move"));
    }

    #[test]
    fn test_over_phase_uses_outcome_color_and_restart_keys() {
        let phase = StatusPhase::Over(OutcomeCause::PlayerDied);
        assert_eq!(phase.text(), OutcomeCause::PlayerDied.message());
        assert_eq!(phase.color(), Color::Red);
        assert_eq!(phase.controls(), &[("[R]", "Restart"), ("[Q]", "Quit")]);

        assert_eq!(StatusPhase::Paused.controls()[0], ("[P]", "Resume"));
    }
}
