//! Rendering for the play scene: bird, pipes, trail and state overlays.

use crate::engine::physics::{PhysicsBody, WORLD_HEIGHT, WORLD_WIDTH};
use crate::obstacles::{PipeField, PIPE_WIDTH};
use crate::scene::ArcadeSession;
use crate::session::SessionState;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const NIGHT_SKY: Color = Color::Rgb(0, 0, 0x33);
const STAR_COUNT: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    fg: Color,
}

impl Cell {
    const EMPTY: Cell = Cell {
        glyph: ' ',
        fg: Color::Reset,
    };
}

/// Draw the play scene. `shake` shifts the play field horizontally by that
/// many columns.
pub fn draw_play(
    frame: &mut Frame,
    area: Rect,
    session: &ArcadeSession,
    pipes: &PipeField,
    shake: u16,
) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Flap Attack ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(inner);

    let mut field = chunks[0];
    if shake > 0 && field.width > shake {
        field.x += shake;
        field.width -= shake;
    }

    draw_field(frame, field, session, pipes);
    draw_overlay(frame, chunks[0], session);
    draw_status_bar(frame, chunks[1], session);
}

fn to_cell(value: f64, world: f64, cells: u16) -> i32 {
    (value / world * cells as f64).floor() as i32
}

fn draw_field(frame: &mut Frame, area: Rect, session: &ArcadeSession, pipes: &PipeField) {
    let width = area.width as usize;
    let height = area.height as usize;
    if width == 0 || height == 0 {
        return;
    }

    let settings = session.settings();
    let mut grid = vec![vec![Cell::EMPTY; width]; height];

    if settings.night_mode {
        for i in 0..STAR_COUNT {
            let col = (i * 37 + 11) % width;
            let row = (i * 53 + 7) % height;
            grid[row][col] = Cell {
                glyph: '·',
                fg: Color::Gray,
            };
        }
    }

    for pipe in pipes.pipes.iter() {
        let left = to_cell(pipe.x, WORLD_WIDTH, area.width);
        let right = to_cell(pipe.x + PIPE_WIDTH, WORLD_WIDTH, area.width);
        let gap_top = to_cell(pipe.gap_top(), WORLD_HEIGHT, area.height);
        let gap_bottom = to_cell(pipe.gap_bottom(), WORLD_HEIGHT, area.height);
        for col in left.max(0)..right.min(width as i32) {
            for (row, line) in grid.iter_mut().enumerate() {
                let row = row as i32;
                if row < gap_top || row > gap_bottom {
                    line[col as usize] = Cell {
                        glyph: '█',
                        fg: Color::Green,
                    };
                }
            }
        }
    }

    if settings.show_trail {
        for &(x, y) in session.trail().points().skip(1) {
            put(&mut grid, area, x, y, '·', Color::LightGreen);
        }
    }

    let (x, y) = session.physics().position();
    let bird_color = if session.state() == SessionState::GameOver {
        Color::Red
    } else {
        Color::Yellow
    };
    let velocity = session.physics().velocity_y();
    let glyph = if velocity < -100.0 {
        '▲'
    } else if velocity > 300.0 {
        '▼'
    } else {
        '●'
    };
    put(&mut grid, area, x, y, glyph, bird_color);

    let bg = if settings.night_mode {
        NIGHT_SKY
    } else {
        Color::Reset
    };
    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|cell| {
                        let style = Style::default().fg(cell.fg).bg(bg);
                        Span::styled(cell.glyph.to_string(), style)
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn put(grid: &mut [Vec<Cell>], area: Rect, x: f64, y: f64, glyph: char, fg: Color) {
    let col = to_cell(x, WORLD_WIDTH, area.width);
    let row = to_cell(y, WORLD_HEIGHT, area.height);
    if col < 0 || row < 0 {
        return;
    }
    if let Some(cell) = grid
        .get_mut(row as usize)
        .and_then(|line| line.get_mut(col as usize))
    {
        *cell = Cell { glyph, fg };
    }
}

fn draw_overlay(frame: &mut Frame, area: Rect, session: &ArcadeSession) {
    let bold = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let lines = match session.state() {
        SessionState::Start => vec![Line::from(Span::styled("Press SPACE to Start", bold))],
        SessionState::CountingDown => {
            let text = match session.countdown_remaining() {
                0 => "GO!".to_string(),
                n => n.to_string(),
            };
            vec![Line::from(Span::styled(
                text,
                bold.fg(Color::Yellow),
            ))]
        }
        SessionState::GameOver => vec![
            Line::from(Span::styled("Game Over!", bold.fg(Color::Red))),
            Line::from(Span::styled(
                format!("Score: {}", session.final_score().unwrap_or(0)),
                bold,
            )),
            Line::from(Span::styled("Press SPACE to Restart", bold)),
        ],
        SessionState::Playing | SessionState::Paused => return,
    };

    let height = (lines.len() as u16).min(area.height);
    let band = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: area.width,
        height,
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), band);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, session: &ArcadeSession) {
    let hint = match session.state() {
        SessionState::Playing => "[Space] Flap  [Esc] Pause",
        SessionState::Paused => "[↑/↓] Select  [Enter] Confirm  [Esc] Resume",
        SessionState::CountingDown => "Get ready...",
        SessionState::Start | SessionState::GameOver => "[Space] Go  [Q] Menu",
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" Score: {} ", session.score()),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", session.settings().difficulty.name()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!(" {}", hint), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
