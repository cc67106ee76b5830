//! Create/edit modal over a [`FormBuffer`].

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::domain::forms::{FieldKind, FormBuffer};
use crate::presentation::ui::utils::popup_rect;

const MODAL_WIDTH: u16 = 64;
const LABEL_WIDTH: u16 = 18;

/// Modal listing one line per field; the focused field is highlighted.
pub struct FormModal<'a> {
    title: String,
    form: &'a FormBuffer,
    alert: Option<&'a str>,
    busy: bool,
}

impl<'a> FormModal<'a> {
    /// Creates a modal over a form buffer.
    #[must_use]
    pub fn new(title: impl Into<String>, form: &'a FormBuffer) -> Self {
        Self {
            title: title.into(),
            form,
            alert: None,
            busy: false,
        }
    }

    /// Error shown under the fields.
    #[must_use]
    pub const fn alert(mut self, alert: Option<&'a str>) -> Self {
        self.alert = alert;
        self
    }

    /// Marks a submission as in flight.
    #[must_use]
    pub const fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    fn field_line(&self, index: usize) -> Line<'static> {
        let field = &self.form.fields()[index];
        let value = self.form.values().get(index).cloned().unwrap_or_default();
        let focused = index == self.form.focus();

        let marker = if field.required { "*" } else { "" };
        let label = format!("{}{marker}", field.label);
        let label_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let shown = match field.kind {
            FieldKind::Secret => "•".repeat(value.chars().count()),
            FieldKind::Choice(_) if focused => format!("◀ {value} ▶"),
            _ if focused => format!("{value}▏"),
            _ => value,
        };
        let value_style = if focused {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };

        Line::from(vec![
            Span::styled(
                format!("{label:<width$}", width = usize::from(LABEL_WIDTH)),
                label_style,
            ),
            Span::styled(shown, value_style),
        ])
    }

    fn footer(&self) -> Line<'static> {
        if self.busy {
            return Line::from(Span::styled(
                "Saving...",
                Style::default().fg(Color::Yellow),
            ));
        }
        Line::from(Span::styled(
            "Enter: save  Tab/↑↓: field  ←→: choice  Esc: cancel",
            Style::default().fg(Color::DarkGray),
        ))
    }
}

impl Widget for FormModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let count = self.form.fields().len();
        let height = u16::try_from(count).unwrap_or(u16::MAX).saturating_add(6);
        let area = popup_rect(MODAL_WIDTH, height, area);

        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", self.title));
        let inner = block.inner(area);
        block.render(area, buf);

        let [fields_area, alert_area, footer_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .areas(inner);

        let lines: Vec<Line<'_>> = (0..count).map(|i| self.field_line(i)).collect();
        Paragraph::new(lines).render(fields_area, buf);

        if let Some(alert) = self.alert {
            Paragraph::new(alert)
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .render(alert_area, buf);
        }

        Paragraph::new(self.footer()).render(footer_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forms::FormField;

    static FIELDS: [FormField; 3] = [
        FormField::required("numero", "Number", FieldKind::Text),
        FormField::optional("password", "Password", FieldKind::Secret),
        FormField::required("type", "Type", FieldKind::Choice(&["Standard", "VIP"])),
    ];

    #[test]
    fn test_secret_is_masked() {
        let form = FormBuffer::with_values(
            &FIELDS,
            vec!["12".into(), "hunter2".into(), "VIP".into()],
        );
        let modal = FormModal::new("Edit bus", &form);
        let line = modal.field_line(1).to_string();

        assert!(line.contains("•••••••"));
        assert!(!line.contains("hunter2"));
    }

    #[test]
    fn test_focused_choice_shows_arrows() {
        let mut form = FormBuffer::new(&FIELDS);
        form.focus_prev();
        let modal = FormModal::new("New bus", &form);

        assert!(modal.field_line(2).to_string().contains("◀ Standard ▶"));
        assert!(modal.field_line(0).to_string().starts_with("Number*"));
    }

    #[test]
    fn test_alert_is_rendered() {
        let form = FormBuffer::new(&FIELDS);
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        FormModal::new("New bus", &form)
            .alert(Some("Number is required"))
            .render(area, &mut buf);

        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf[(x, y)].symbol().to_string())
            .collect();
        assert!(text.contains("Number is required"));
    }
}
