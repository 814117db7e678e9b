use std::collections::HashSet;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{EndReason, Grid, Position, Snapshot, Status};
use crate::metrics::GameMetrics;

/// What occupies a grid cell on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Head,
    Body,
    Food,
    /// Empty cell; alternate shades give a checkerboard
    Empty { shaded: bool },
}

impl CellKind {
    fn span(self) -> Span<'static> {
        match self {
            CellKind::Head => Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            CellKind::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
            CellKind::Food => Span::styled(
                "O ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            CellKind::Empty { shaded: true } => {
                Span::styled(". ", Style::default().fg(Color::DarkGray))
            }
            CellKind::Empty { shaded: false } => {
                Span::styled("  ", Style::default().fg(Color::DarkGray))
            }
        }
    }
}

/// Presenter: draws one frame from a [`Snapshot`]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &Snapshot,
        grid: Grid,
        paused: bool,
        metrics: &GameMetrics,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot, metrics), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match snapshot.status {
            Status::Running => {
                frame.render_widget(self.render_grid(snapshot, grid, paused), game_area)
            }
            Status::Over(reason) => {
                frame.render_widget(self.render_game_over(snapshot, reason), game_area)
            }
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot, grid: Grid, paused: bool) -> Paragraph<'static> {
        let title = if paused { " Snake (paused) " } else { " Snake " };

        Paragraph::new(grid_lines(snapshot, grid))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(if paused {
                        Color::Yellow
                    } else {
                        Color::White
                    }))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'static> {
        Paragraph::new(stats_line(snapshot, metrics)).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &Snapshot, reason: EndReason) -> Paragraph<'static> {
        let (headline, color) = match reason {
            EndReason::BoardFull => ("BOARD FULL - YOU WIN", Color::Green),
            EndReason::Wall | EndReason::SelfCollision => ("GAME OVER", Color::Red),
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                end_reason_text(reason),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        Paragraph::new(controls_line()).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn stats_line(snapshot: &Snapshot, metrics: &GameMetrics) -> Line<'static> {
    let label = Style::default().fg(Color::Yellow);
    let value = Style::default().fg(Color::White);

    Line::from(vec![
        Span::styled("Score: ", label),
        Span::styled(snapshot.score.to_string(), value.add_modifier(Modifier::BOLD)),
        Span::raw("    "),
        Span::styled("Steps: ", label),
        Span::styled(snapshot.steps.to_string(), value),
        Span::raw("    "),
        Span::styled("Time: ", label),
        Span::styled(metrics.format_time(), value),
        Span::raw("    "),
        Span::styled("Best: ", label),
        Span::styled(metrics.best_score.to_string(), value),
        Span::raw("    "),
        Span::styled("Wins: ", label),
        Span::styled(format!("{}/{}", metrics.wins, metrics.games_played), value),
    ])
}

fn controls_line() -> Line<'static> {
    Line::from(vec![
        Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
        Span::raw(" or "),
        Span::styled("WASD", Style::default().fg(Color::Cyan)),
        Span::raw(" to move | "),
        Span::styled("P", Style::default().fg(Color::Yellow)),
        Span::raw(" or "),
        Span::styled("Space", Style::default().fg(Color::Yellow)),
        Span::raw(" to pause | "),
        Span::styled("R", Style::default().fg(Color::Green)),
        Span::raw(" to restart | "),
        Span::styled("Q", Style::default().fg(Color::Red)),
        Span::raw(" to quit"),
    ])
}

fn end_reason_text(reason: EndReason) -> &'static str {
    match reason {
        EndReason::Wall => "The snake hit a wall",
        EndReason::SelfCollision => "The snake ran into itself",
        EndReason::BoardFull => "No free cell left for food",
    }
}

fn classify(pos: Position, snapshot: &Snapshot, body: &HashSet<Position>) -> CellKind {
    if snapshot.body_cells.first() == Some(&pos) {
        CellKind::Head
    } else if body.contains(&pos) {
        CellKind::Body
    } else if snapshot.food_cell == Some(pos) {
        CellKind::Food
    } else {
        CellKind::Empty {
            shaded: (pos.x + pos.y) % 2 == 0,
        }
    }
}

fn grid_lines(snapshot: &Snapshot, grid: Grid) -> Vec<Line<'static>> {
    let body: HashSet<Position> = snapshot.body_cells.iter().copied().collect();
    let size = grid.side();

    (0..size)
        .map(|y| {
            Line::from(
                (0..size)
                    .map(|x| classify(Position::new(x, y), snapshot, &body).span())
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}
