use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::presentation::ui::utils::popup_rect;

/// Yes/no confirmation for a destructive action.
pub struct ConfirmDialog<'a> {
    title: &'a str,
    message: String,
    alert: Option<&'a str>,
}

impl<'a> ConfirmDialog<'a> {
    /// Creates a dialog.
    #[must_use]
    pub fn new(title: &'a str, message: impl Into<String>) -> Self {
        Self {
            title,
            message: message.into(),
            alert: None,
        }
    }

    /// Error shown under the message.
    #[must_use]
    pub const fn alert(mut self, alert: Option<&'a str>) -> Self {
        self.alert = alert;
        self
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = popup_rect(56, 9, area);
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        let [message_area, alert_area, keys_area] = Layout::vertical([
            Constraint::Min(2),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new(self.message)
            .wrap(Wrap { trim: true })
            .centered()
            .render(message_area, buf);

        if let Some(alert) = self.alert {
            Paragraph::new(alert)
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .render(alert_area, buf);
        }

        Paragraph::new(Line::from(vec![
            Span::styled(" y ", Style::default().bg(Color::Red).fg(Color::White)),
            Span::raw(" delete   "),
            Span::styled(" n ", Style::default().bg(Color::DarkGray).fg(Color::White)),
            Span::raw(" keep"),
        ]))
        .centered()
        .render(keys_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_message_and_keys() {
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        ConfirmDialog::new("Delete bus", "Delete bus 12?").render(area, &mut buf);

        let rows: Vec<String> = (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect();
        assert!(rows.iter().any(|r| r.contains("Delete bus 12?")));
        assert!(rows.iter().any(|r| r.contains(" y  delete")));
    }
}
