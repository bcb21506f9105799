//! Arena rendering.
//!
//! Same half-block technique as the rest of the UI: each grid cell is one
//! pixel, two vertical pixels share a terminal row via `▀` with fg=top and
//! bg=bottom.

use super::game_common::{
    create_arena_layout, render_info_panel_frame, render_outcome_banner, render_status_bar,
    StatusPhase,
};
use super::Hud;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use snake_arena::arena::{Frame as MatchFrame, FoodKind, SnakeView, SpecialKind};

const BORDER_H: char = '\u{2500}'; // ─
const BORDER_V: char = '\u{2502}'; // │
const BORDER_TL: char = '\u{250C}'; // ┌
const BORDER_TR: char = '\u{2510}'; // ┐
const BORDER_BL: char = '\u{2514}'; // └
const BORDER_BR: char = '\u{2518}'; // ┘
const HALF_TOP: char = '\u{2580}'; // ▀
const FULL_BLOCK: char = '\u{2588}'; // █

const EMPTY_BG: Color = Color::Rgb(12, 12, 18);
const BORDER_COLOR: Color = Color::Rgb(80, 80, 80);
const DEAD_COLOR: Color = Color::Rgb(70, 70, 70);

pub fn render_arena_scene(frame: &mut Frame, area: Rect, view: &MatchFrame, hud: &Hud) {
    let title = format!(" Snake Arena [{}] ", hud.mode);
    let layout = create_arena_layout(frame, area, &title, Color::LightGreen, 24, view.grid_size);

    render_play_field(frame, layout.content, view);
    render_status(frame, layout.status_bar, view, hud);
    render_info_panel(frame, layout.info_panel, view);

    if let Some(outcome) = &view.outcome {
        render_outcome_banner(frame, layout.content, outcome);
    }
}

/// Base RGB for a snake's color name. Accepts `#rgb`, `#rrggbb`, or a few names.
fn base_rgb(color: &str) -> (u8, u8, u8) {
    if let Some(hex) = color.strip_prefix('#') {
        let digits: Vec<u8> = hex
            .chars()
            .filter_map(|c| c.to_digit(16).map(|d| d as u8))
            .collect();
        match digits.as_slice() {
            [r, g, b] if hex.len() == 3 => return (r * 17, g * 17, b * 17),
            [r1, r2, g1, g2, b1, b2] if hex.len() == 6 => {
                return (r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2)
            }
            _ => {}
        }
    }
    match color {
        "green" => (50, 220, 50),
        "red" => (230, 60, 60),
        "blue" => (70, 120, 255),
        "yellow" => (230, 210, 60),
        "purple" => (170, 80, 220),
        _ => (80, 200, 220),
    }
}

/// Head full brightness, tail fading to a third.
fn segment_color(snake: &SnakeView, index: usize) -> Color {
    if !snake.alive {
        return DEAD_COLOR;
    }
    let (r, g, b) = base_rgb(&snake.color);
    let t = index as f64 / (snake.body.len().saturating_sub(1)).max(1) as f64;
    let scale = if index == 0 { 1.0 } else { 0.85 - 0.5 * t };
    Color::Rgb(
        (r as f64 * scale) as u8,
        (g as f64 * scale) as u8,
        (b as f64 * scale) as u8,
    )
}

fn food_color(kind: FoodKind, tick: u64) -> Color {
    match kind {
        FoodKind::Normal => {
            let pulse = ((tick % 20) as f64 / 20.0 * std::f64::consts::PI * 2.0).sin();
            Color::Rgb(255, (80.0 + pulse * 30.0) as u8, (40.0 + pulse * 20.0) as u8)
        }
        FoodKind::Special(SpecialKind::Bonus) => Color::Rgb(255, 215, 0),
        FoodKind::Special(SpecialKind::Slow) => Color::Rgb(80, 140, 255),
        FoodKind::Special(SpecialKind::Poison) => Color::Rgb(160, 60, 200),
        FoodKind::Special(SpecialKind::Invisible) => Color::Rgb(220, 220, 230),
    }
}

fn render_play_field(frame: &mut Frame, area: Rect, view: &MatchFrame) {
    if area.height < 3 || area.width < 5 {
        return;
    }

    let grid = view.grid_size.max(1) as usize;
    let mut pixels: Vec<Vec<Option<Color>>> = vec![vec![None; grid]; grid];

    for food in &view.foods {
        let (fx, fy) = (food.position.x, food.position.y);
        if fx >= 0 && fy >= 0 && (fx as usize) < grid && (fy as usize) < grid {
            pixels[fy as usize][fx as usize] = Some(food_color(food.kind, view.tick));
        }
    }

    // Dead snakes first so live ones draw on top
    let mut order: Vec<&SnakeView> = view.snakes.iter().collect();
    order.sort_by_key(|s| s.alive);
    for snake in order {
        // Tail first so the head wins on overlap
        for (i, seg) in snake.body.iter().enumerate().rev() {
            if seg.x >= 0 && seg.y >= 0 && (seg.x as usize) < grid && (seg.y as usize) < grid {
                pixels[seg.y as usize][seg.x as usize] = Some(segment_color(snake, i));
            }
        }
    }

    let content_rows = grid.div_ceil(2);
    let render_w = ((grid + 2) as u16).min(area.width);
    let inner_w = render_w as usize - 2;
    let x_off = area.x + (area.width.saturating_sub(render_w)) / 2;
    let y_off = area.y;

    // Top border with the score
    {
        let label = format!(" Score: {} ", view.score);
        let pad_before = inner_w.saturating_sub(label.len() + 1);
        let pad_after = inner_w.saturating_sub(pad_before + label.len());

        let mut top = String::new();
        top.push(BORDER_TL);
        top.extend(std::iter::repeat_n(BORDER_H, pad_before));
        let mut spans = vec![Span::styled(top, Style::default().fg(BORDER_COLOR))];
        spans.push(Span::styled(label, Style::default().fg(Color::White)));
        let mut rest: String = std::iter::repeat_n(BORDER_H, pad_after).collect();
        rest.push(BORDER_TR);
        spans.push(Span::styled(rest, Style::default().fg(BORDER_COLOR)));

        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(x_off, y_off, render_w, 1),
        );
    }

    let empty_row: Vec<Option<Color>> = vec![None; grid];
    for term_row in 0..content_rows {
        let top_row = pixels.get(term_row * 2).unwrap_or(&empty_row);
        let bot_row = pixels.get(term_row * 2 + 1).unwrap_or(&empty_row);

        let mut spans: Vec<Span> = vec![Span::styled(
            BORDER_V.to_string(),
            Style::default().fg(BORDER_COLOR),
        )];

        // Batch runs of identical colors into one span
        let mut cur_fg = Color::Reset;
        let mut cur_bg = Color::Reset;
        let mut cur_text = String::new();
        for (&top_c, &bot_c) in top_row.iter().zip(bot_row.iter()).take(inner_w) {
            let fg = top_c.unwrap_or(EMPTY_BG);
            let bg = bot_c.unwrap_or(EMPTY_BG);
            if (fg != cur_fg || bg != cur_bg) && !cur_text.is_empty() {
                spans.push(Span::styled(
                    std::mem::take(&mut cur_text),
                    Style::default().fg(cur_fg).bg(cur_bg),
                ));
            }
            cur_fg = fg;
            cur_bg = bg;
            cur_text.push(HALF_TOP);
        }
        if !cur_text.is_empty() {
            spans.push(Span::styled(
                cur_text,
                Style::default().fg(cur_fg).bg(cur_bg),
            ));
        }

        spans.push(Span::styled(
            BORDER_V.to_string(),
            Style::default().fg(BORDER_COLOR),
        ));

        let row_y = y_off + 1 + term_row as u16;
        if row_y < area.y + area.height {
            frame.render_widget(
                Paragraph::new(Line::from(spans)),
                Rect::new(x_off, row_y, render_w, 1),
            );
        }
    }

    let bot_y = y_off + 1 + content_rows as u16;
    if bot_y < area.y + area.height {
        let mut s = String::new();
        s.push(BORDER_BL);
        s.extend(std::iter::repeat_n(BORDER_H, inner_w));
        s.push(BORDER_BR);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(s, Style::default().fg(BORDER_COLOR)))),
            Rect::new(x_off, bot_y, render_w, 1),
        );
    }
}

fn render_status(frame: &mut Frame, area: Rect, view: &MatchFrame, hud: &Hud) {
    let phase = match (&view.outcome, hud.paused) {
        (Some(outcome), _) => StatusPhase::Over(outcome.cause),
        (None, true) => StatusPhase::Paused,
        (None, false) => StatusPhase::Running {
            message: hud.last_event.as_deref(),
            slowed: view.slowed,
        },
    };
    render_status_bar(frame, area, &phase);
}

fn format_clock(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn legend_line(color: Color, label: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {FULL_BLOCK} "), Style::default().fg(color)),
        Span::styled(label.to_string(), Style::default().fg(Color::DarkGray)),
    ])
}

fn render_info_panel(frame: &mut Frame, area: Rect, view: &MatchFrame) {
    let inner = render_info_panel_frame(frame, area);
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);

    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                view.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", view.tick_interval_ms), value),
        ]),
    ];

    if let Some(remaining) = view.time_remaining_ms {
        lines.push(Line::from(vec![
            Span::styled("Time: ", label),
            Span::styled(format_clock(remaining), value),
        ]));
    }

    if view.slowed {
        lines.push(Line::from(Span::styled(
            "Slowed",
            Style::default().fg(Color::LightBlue),
        )));
    }

    lines.push(Line::from(""));
    for snake in &view.snakes {
        let status = if !snake.alive {
            "dead"
        } else if snake.invisible {
            "hidden"
        } else {
            "alive"
        };
        let (r, g, b) = base_rgb(&snake.color);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}{} ", snake.name, if snake.local { "*" } else { "" }),
                Style::default().fg(Color::Rgb(r, g, b)),
            ),
            Span::styled(format!("{} {}", snake.body.len(), status), label),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Legend:",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(legend_line(food_color(FoodKind::Normal, 0), "Food"));
    for kind in SpecialKind::ALL {
        lines.push(legend_line(
            food_color(FoodKind::Special(kind), 0),
            kind.name(),
        ));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
