//! TUI rendering — topic list on the left, scene canvas on the right.
//!
//! ┌──────────────────────────────────────────────────┐
//! │  roboscope   demo-a3f1   60.0s   ▶ playing       │
//! ├──────────────┬───────────────────────────────────┤
//! │  Topics      │  12.0s – 22.0s                    │
//! │ ▸ ● /joint…  │  1.40 ┤  ╭─╮    ╭──╮   ╭─╮        │
//! │   ● /grip…   │  0.20 ┤ ─╯ ╰────╯  ╰───╯ ╰──      │
//! │     /cam…    │ -1.00 ┤                           │
//! │              │       12.0   14.5   17.0   19.5   │
//! ├──────────────┴───────────────────────────────────┤
//! │  window [12.0, 22.0]  buffer 301 pts  ⟳ fetching │
//! ├──────────────────────────────────────────────────┤
//! │  space play  ←/→ pan  [/] width  enter toggle    │
//! └──────────────────────────────────────────────────┘
//!
//! The scene comes out of the core renderer in canvas units; this module
//! only maps it onto ratatui's braille canvas and places the label strings
//! the scene already formatted.

use ratatui::prelude::*;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use roboscope_core::protocol::TopicKind;
use roboscope_core::scene::{PALETTE_LEN, PlotRect, Scene};

use super::app::App;

/// Fixed series palette; the scene assigns indices round-robin.
const PALETTE: [Color; PALETTE_LEN] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Blue,
    Color::Red,
    Color::LightCyan,
    Color::LightGreen,
];

/// Width of the value-label gutter left of the canvas, in cells.
const GUTTER: u16 = 8;

pub fn draw(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(10),   // main
            Constraint::Length(3), // status
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);
    draw_main(f, rows[1], app);
    draw_status(f, rows[2], app);
    draw_keys(f, rows[3]);
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let state = if app.engine().is_playing() {
        Span::styled("▶ playing", Style::default().bold().fg(Color::Green))
    } else {
        Span::styled("⏸ paused", Style::default().fg(Color::DarkGray))
    };
    let spin = if app.engine().is_fetching() { "  ⟳" } else { "" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" roboscope ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled(
                session.session_id.clone(),
                Style::default().bold().fg(Color::Yellow),
            ),
            Span::styled(
                format!(
                    "  {}  {}  ",
                    crate::commands::format_duration(session.duration()),
                    session.robot_type.as_deref().unwrap_or("unknown robot"),
                ),
                Style::default().fg(Color::DarkGray),
            ),
            state,
            Span::styled(spin, Style::default().fg(Color::DarkGray)),
        ]));

    f.render_widget(block, area);
}

fn draw_main(f: &mut Frame, area: Rect, app: &mut App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)])
        .split(area);

    draw_topic_list(f, cols[0], app);
    draw_plot(f, cols[1], app);
}

fn draw_topic_list(f: &mut Frame, area: Rect, app: &mut App) {
    let items: Vec<Row> = app
        .catalog()
        .iter()
        .enumerate()
        .map(|(i, summary)| {
            let is_cursor = i == app.cursor();
            let numeric = summary.kind() == TopicKind::Numeric;
            let on = app.enabled()[i];

            let pointer = if is_cursor { "▸" } else { " " };
            let marker = match (numeric, on) {
                (true, true) => "●",
                (true, false) => "○",
                (false, _) => " ",
            };
            let tag = if numeric {
                summary
                    .avg_frequency
                    .map(|hz| format!("{hz:.0}Hz"))
                    .unwrap_or_default()
            } else {
                "img".into()
            };

            let style = if is_cursor {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else if !numeric {
                Style::default().fg(Color::DarkGray)
            } else if on {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };

            Row::new(vec![
                Cell::from(pointer.to_string()),
                Cell::from(marker.to_string()),
                Cell::from(summary.topic.clone()),
                Cell::from(tag),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        items,
        [
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(20),
            Constraint::Length(4),
        ],
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Topics (enter to toggle) "),
    );

    f.render_stateful_widget(table, area, app.table_state_mut());
}

fn draw_plot(f: &mut Frame, area: Rect, app: &App) {
    let viewport = app.engine().viewport();
    let block = Block::default().borders(Borders::ALL).title(format!(
        " {:.1}s – {:.1}s  (width {:.0}s) ",
        viewport.start,
        viewport.end,
        viewport.width()
    ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width <= GUTTER + 2 || inner.height < 3 {
        return;
    }

    // Gutter for value labels, one bottom row for time labels.
    let canvas_area = Rect {
        x: inner.x + GUTTER,
        y: inner.y,
        width: inner.width - GUTTER,
        height: inner.height - 1,
    };
    let gutter_area = Rect {
        x: inner.x,
        y: inner.y,
        width: GUTTER,
        height: inner.height - 1,
    };
    let axis_area = Rect {
        x: inner.x + GUTTER,
        y: inner.y + inner.height - 1,
        width: inner.width - GUTTER,
        height: 1,
    };

    // Braille resolution: 2 dots per cell horizontally, 4 vertically.
    let rect = PlotRect::new(
        0.0,
        0.0,
        f64::from(canvas_area.width) * 2.0,
        f64::from(canvas_area.height) * 4.0,
    );
    let scene = app.engine().scene(rect);

    draw_value_labels(f, gutter_area, &scene, rect);
    draw_time_labels(f, axis_area, &scene, rect);

    let canvas = Canvas::default()
        .x_bounds([0.0, rect.width])
        .y_bounds([0.0, rect.height])
        .marker(symbols::Marker::Braille)
        .paint(|ctx| {
            // Scene y grows downward; the canvas y axis grows upward.
            let flip = |y: f64| rect.height - y;

            for mark in &scene.time_marks {
                ctx.draw(&CanvasLine {
                    x1: mark.pos,
                    y1: 0.0,
                    x2: mark.pos,
                    y2: rect.height,
                    color: Color::DarkGray,
                });
            }
            for mark in &scene.value_marks {
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: flip(mark.pos),
                    x2: rect.width,
                    y2: flip(mark.pos),
                    color: Color::DarkGray,
                });
            }
            for line in &scene.lines {
                let color = PALETTE[line.color % PALETTE.len()];
                for pair in line.points.windows(2) {
                    ctx.draw(&CanvasLine {
                        x1: pair[0].0,
                        y1: flip(pair[0].1),
                        x2: pair[1].0,
                        y2: flip(pair[1].1),
                        color,
                    });
                }
            }
        });
    f.render_widget(canvas, canvas_area);
}

fn draw_value_labels(f: &mut Frame, area: Rect, scene: &Scene, rect: PlotRect) {
    let mut lines: Vec<Line> = (0..area.height).map(|_| Line::from("")).collect();
    for mark in &scene.value_marks {
        let row = mark_cell(mark.pos, rect.height, area.height);
        lines[row] = Line::from(Span::styled(
            format!("{:>7}", mark.label),
            Style::default().fg(Color::DarkGray),
        ));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_time_labels(f: &mut Frame, area: Rect, scene: &Scene, rect: PlotRect) {
    let width = area.width as usize;
    let mut row: Vec<char> = vec![' '; width];
    for mark in &scene.time_marks {
        let col = mark_cell(mark.pos, rect.width, area.width);
        // Right-align the last label so it stays inside the row.
        let start = col.min(width.saturating_sub(mark.label.len()));
        for (offset, ch) in mark.label.chars().enumerate() {
            if start + offset < width {
                row[start + offset] = ch;
            }
        }
    }
    let text: String = row.into_iter().collect();
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        ))),
        area,
    );
}

/// Map a scene coordinate to a terminal cell index.
fn mark_cell(pos: f64, extent: f64, cells: u16) -> usize {
    if extent <= 0.0 || cells == 0 {
        return 0;
    }
    let frac = (pos / extent).clamp(0.0, 1.0);
    ((frac * f64::from(cells - 1)).round() as usize).min(cells as usize - 1)
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let engine = app.engine();
    let viewport = engine.viewport();
    let buffer = engine.buffer();

    let mut spans = vec![
        Span::raw(format!(
            "window [{:.1}, {:.1}] of {:.1}s · preset {:.0}s   ",
            viewport.start,
            viewport.end,
            engine.duration(),
            app.width_preset()
        )),
        Span::styled(
            format!(
                "buffer [{:.1}, {:.1}] · {} pts · {} topics",
                buffer.start,
                buffer.end,
                buffer.point_count(),
                engine.topics().len()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if engine.is_fetching() {
        spans.push(Span::styled("   ⟳ fetching", Style::default().fg(Color::Cyan)));
    }
    if let Some(err) = engine.last_error() {
        spans.push(Span::styled(
            format!("   fetch failed: {err}"),
            Style::default().fg(Color::Red),
        ));
    }

    let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(p, area);
}

fn draw_keys(f: &mut Frame, area: Rect) {
    let keys = Line::from(Span::styled(
        "  space play/pause   ←/→ pan   PgUp/PgDn page   [/] width   ↑/↓ topics   enter toggle   Home/End jump   q quit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(keys), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_cell_maps_edges_and_center() {
        assert_eq!(mark_cell(0.0, 100.0, 21), 0);
        assert_eq!(mark_cell(100.0, 100.0, 21), 20);
        assert_eq!(mark_cell(50.0, 100.0, 21), 10);
    }

    #[test]
    fn mark_cell_handles_degenerate_extents() {
        assert_eq!(mark_cell(5.0, 0.0, 10), 0);
        assert_eq!(mark_cell(5.0, 10.0, 0), 0);
    }

    #[test]
    fn palette_matches_the_scene_contract() {
        assert_eq!(PALETTE.len(), PALETTE_LEN);
    }
}
