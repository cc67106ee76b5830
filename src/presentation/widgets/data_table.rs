//! Bordered record table with a selected row.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};

/// Table over pre-rendered cells. When there are no rows, `placeholder` is
/// shown instead.
pub struct DataTable<'a> {
    title: String,
    columns: &'a [&'a str],
    rows: Vec<Vec<String>>,
    placeholder: &'a str,
    placeholder_style: Style,
}

impl<'a> DataTable<'a> {
    /// Creates a table over rendered rows.
    #[must_use]
    pub fn new(title: impl Into<String>, columns: &'a [&'a str], rows: Vec<Vec<String>>) -> Self {
        Self {
            title: title.into(),
            columns,
            rows,
            placeholder: "No records",
            placeholder_style: Style::default().fg(Color::DarkGray),
        }
    }

    /// Text shown when the table has no rows.
    #[must_use]
    pub const fn placeholder(mut self, text: &'a str) -> Self {
        self.placeholder = text;
        self
    }

    /// Shows the placeholder as an error.
    #[must_use]
    pub fn failed(mut self) -> Self {
        self.placeholder_style = Style::default().fg(Color::Red);
        self
    }
}

impl StatefulWidget for DataTable<'_> {
    type State = TableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().add_modifier(Modifier::BOLD),
            ));

        if self.rows.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new(self.placeholder)
                .style(self.placeholder_style)
                .centered()
                .render(inner, buf);
            return;
        }

        let last = self.rows.len() - 1;
        state.select(Some(state.selected().map_or(0, |i| i.min(last))));

        let header = Row::new(self.columns.iter().map(|c| Cell::from(*c))).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        let rows = self.rows.into_iter().map(Row::new);
        let widths = self.columns.iter().map(|_| Constraint::Fill(1));

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▶ ");

        StatefulWidget::render(table, area, buf, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(table: DataTable<'_>, state: &mut TableState) -> Vec<String> {
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        StatefulWidget::render(table, area, &mut buf, state);
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn test_placeholder_when_empty() {
        let lines = render(
            DataTable::new("Buses", &["Number"], Vec::new()).placeholder("Nothing here"),
            &mut TableState::default(),
        );
        assert!(lines.iter().any(|l| l.contains("Nothing here")));
    }

    #[test]
    fn test_selection_is_clamped_to_rows() {
        let mut state = TableState::default().with_selected(Some(7));
        let rows = vec![vec!["1".to_string()], vec!["2".to_string()]];
        let lines = render(DataTable::new("Buses", &["Number"], rows), &mut state);

        assert_eq!(state.selected(), Some(1));
        assert!(lines.iter().any(|l| l.contains("Number")));
    }
}
