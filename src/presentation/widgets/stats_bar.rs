//! Row of summary figures above a list.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Labelled figures rendered as equal-width cards.
pub struct StatsBar<'a> {
    figures: &'a [(String, String)],
}

impl<'a> StatsBar<'a> {
    /// Creates a bar over pre-formatted `(label, value)` pairs.
    #[must_use]
    pub const fn new(figures: &'a [(String, String)]) -> Self {
        Self { figures }
    }
}

impl Widget for StatsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.figures.is_empty() || area.height == 0 {
            return;
        }

        let cards = Layout::horizontal(self.figures.iter().map(|_| Constraint::Fill(1)))
            .spacing(1)
            .split(area);

        for ((label, value), card) in self.figures.iter().zip(cards.iter()) {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(
                    format!(" {label} "),
                    Style::default().fg(Color::Gray),
                ));
            let inner = block.inner(*card);
            block.render(*card, buf);
            Paragraph::new(Line::from(Span::styled(
                value.as_str(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )))
            .centered()
            .render(inner, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_each_value() {
        let figures = vec![
            ("Buses".to_string(), "3".to_string()),
            ("Seats".to_string(), "120".to_string()),
        ];
        let area = Rect::new(0, 0, 41, 3);
        let mut buf = Buffer::empty(area);
        StatsBar::new(&figures).render(area, &mut buf);

        let middle: String = (0..area.width).map(|x| buf[(x, 1)].symbol()).collect();
        assert!(middle.contains('3'));
        assert!(middle.contains("120"));
    }
}
