//! Terminal UI rendering with ratatui

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::game::{Game, Phase, Snapshot};
use crate::render::{self, DisplayCell, Edges};
use crate::settings::{Settings, VisualSettings};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const EMPTY: &str = "  ";

/// Outline colour for piece borders
const OUTLINE: Color = Color::Rgb(252, 211, 211);

/// Total width needed: board(22) + stats(18) = 40
const GAME_WIDTH: u16 = 40;
/// Board rows plus borders
const GAME_HEIGHT: u16 = BOARD_HEIGHT as u16 + 2;

/// Render the game panel
pub fn render_game(frame: &mut Frame, game: &Game, settings: &Settings) {
    let area = frame.area();
    let snapshot = game.snapshot();

    // Center the game area
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_WIDTH as u16 * 2 + 2), // Board (10*2 + 2 for borders)
            Constraint::Length(18),                         // Stats
        ])
        .split(game_area);

    render_board(frame, main_layout[0], &snapshot, &settings.visual);
    render_stats(frame, main_layout[1], &snapshot, game.last_clear());

    // Overlays
    match snapshot.phase {
        Phase::Idle => render_overlay(frame, main_layout[0], "BLOCKFALL", "Press Space to Start"),
        Phase::Over => {
            let subtitle = format!("Score: {}  (R to restart)", snapshot.score);
            render_overlay(frame, main_layout[0], "GAME OVER", &subtitle);
        }
        Phase::Playing => {}
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the game board
fn render_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot, visual: &VisualSettings) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let grid = render::display_grid(snapshot);
    let lines: Vec<Line> = (0..BOARD_HEIGHT)
        .map(|y| {
            let spans: Vec<Span> = (0..BOARD_WIDTH)
                .map(|x| {
                    let (text, style) = cell_glyph(grid[y][x], render::edges(&grid, x, y), visual);
                    Span::styled(text, style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Two-column glyph and style for one display cell
///
/// With outlines on, a side that borders another piece or the wall is drawn
/// as a half block so neighbouring pieces stay visually apart, and a bottom
/// edge is underlined in the outline colour. The falling piece is dimmed.
fn cell_glyph(cell: DisplayCell, edges: Edges, visual: &VisualSettings) -> (String, Style) {
    let (falling_char, placed_char) = visual.block_chars();
    let base = match cell {
        DisplayCell::Empty => return (EMPTY.to_string(), Style::default()),
        DisplayCell::Falling => Style::default().fg(Color::White).add_modifier(Modifier::DIM),
        DisplayCell::Placed(_) => Style::default().fg(Color::White),
    };

    if !visual.show_outline {
        let text = if cell == DisplayCell::Falling { falling_char } else { placed_char };
        return (text.to_string(), base);
    }

    let left = if edges.left { '▐' } else { '█' };
    let right = if edges.right { '▌' } else { '█' };
    // A top edge is already visible through the blank or underlined cell above
    let style = if edges.bottom {
        base.add_modifier(Modifier::UNDERLINED).underline_color(OUTLINE)
    } else {
        base
    };
    (format!("{left}{right}"), style)
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, snapshot: &Snapshot, last_clear: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", snapshot.score),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled("LEVEL", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", snapshot.level),
            Style::default().fg(Color::Cyan),
        )),
        Line::raw(""),
        Line::from(Span::styled("LINES", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", snapshot.lines),
            Style::default().fg(Color::Green),
        )),
    ];

    if snapshot.phase == Phase::Playing {
        if last_clear > 0 {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                format!("+{} lines", last_clear),
                Style::default().fg(Color::Magenta).bold(),
            ));
        }
        lines.push(Line::raw(""));
        lines.push(Line::styled("Arrows: move", Style::default().fg(Color::DarkGray)));
        lines.push(Line::styled("Up: rotate", Style::default().fg(Color::DarkGray)));
        lines.push(Line::styled("Space: drop", Style::default().fg(Color::DarkGray)));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render an overlay (for start prompt and game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = area.width.saturating_sub(2);
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(OUTLINE))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::White).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
