use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::memory::{Card, CardFace, CardState, MemorySnapshot};
use crate::metrics::SessionMetrics;

/// Cards per row on the table
pub const COLUMNS: usize = 4;

const FACES: [(&str, Color); 8] = [
    ("♠", Color::Cyan),
    ("♥", Color::Red),
    ("♦", Color::LightRed),
    ("♣", Color::Green),
    ("★", Color::Yellow),
    ("☀", Color::LightYellow),
    ("☂", Color::Blue),
    ("♪", Color::Magenta),
];

pub struct MemoryRenderer;

impl MemoryRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &MemorySnapshot,
        cursor: usize,
        show_win: bool,
        metrics: &SessionMetrics,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot, metrics), chunks[0]);
        frame.render_widget(self.render_table(snapshot, cursor, show_win), chunks[1]);
        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_table(
        &self,
        snapshot: &MemorySnapshot,
        cursor: usize,
        show_win: bool,
    ) -> Paragraph<'static> {
        let mut lines = vec![Line::from("")];

        for (row_index, row) in snapshot.cards.chunks(COLUMNS).enumerate() {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .map(|(col, card)| card_span(card, row_index * COLUMNS + col == cursor))
                .collect();
            lines.push(Line::from(spans));
            lines.push(Line::from(""));
        }

        if show_win {
            lines.push(Line::from(Span::styled(
                "You win!",
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                "Press R to play again",
                Style::default().fg(Color::Gray),
            )));
        } else if snapshot.mismatch_pending {
            lines.push(Line::from(Span::styled(
                "No match",
                Style::default().fg(Color::Red),
            )));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(" Memory "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        snapshot: &MemorySnapshot,
        metrics: &SessionMetrics,
    ) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                snapshot.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Pairs: ", label),
            Span::styled(
                format!("{}/{}", snapshot.matched_pairs, snapshot.total_pairs),
                value,
            ),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled("Won: ", label),
            Span::styled(metrics.games_played.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(" to flip | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to reshuffle | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for MemoryRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn face_glyph(face: CardFace) -> (&'static str, Color) {
    FACES[face.0 as usize % FACES.len()]
}

fn card_span(card: &Card, selected: bool) -> Span<'static> {
    let (text, mut style) = match card.state {
        CardState::Hidden => ("[ ? ]".to_string(), Style::default().fg(Color::DarkGray)),
        CardState::FaceUp => {
            let (glyph, color) = face_glyph(card.face);
            (
                format!("[ {} ]", glyph),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        }
        CardState::Matched => {
            let (glyph, color) = face_glyph(card.face);
            (
                format!("( {} )", glyph),
                Style::default().fg(color).add_modifier(Modifier::DIM),
            )
        }
    };
    if selected {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Span::styled(format!(" {} ", text), style)
}
