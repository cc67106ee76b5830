//! One-line summary of the active search, facets and date range.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::domain::filter::ListFilter;
use crate::domain::resource::Facet;

/// Filter summary. While a prompt is open its label and draft replace the
/// summary.
pub struct FilterBar<'a> {
    filter: &'a ListFilter,
    facets: &'a [Facet],
    prompt: Option<(&'a str, &'a str)>,
    shown: usize,
    total: usize,
}

impl<'a> FilterBar<'a> {
    /// Creates a bar for a filter.
    #[must_use]
    pub const fn new(filter: &'a ListFilter, facets: &'a [Facet]) -> Self {
        Self {
            filter,
            facets,
            prompt: None,
            shown: 0,
            total: 0,
        }
    }

    /// Open prompt as `(label, draft)`.
    #[must_use]
    pub const fn prompt(mut self, prompt: Option<(&'a str, &'a str)>) -> Self {
        self.prompt = prompt;
        self
    }

    /// Visible and loaded record counts.
    #[must_use]
    pub const fn counts(mut self, shown: usize, total: usize) -> Self {
        self.shown = shown;
        self.total = total;
        self
    }

    fn line(&self) -> Line<'static> {
        let key = Style::default().fg(Color::DarkGray);
        let value = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        if let Some((label, draft)) = self.prompt {
            return Line::from(vec![
                Span::styled(format!("{label}: "), value),
                Span::styled(format!("{draft}▏"), Style::default().fg(Color::White)),
            ]);
        }

        let mut spans = vec![Span::styled("Search ", key)];
        let search = self.filter.search().trim();
        spans.push(if search.is_empty() {
            Span::styled("-", key)
        } else {
            Span::styled(format!("\"{search}\""), value)
        });

        for facet in self.facets {
            spans.push(Span::styled(format!("  {} ", facet.label), key));
            spans.push(match self.filter.facet(facet.key) {
                Some(selected) => Span::styled(selected.to_string(), value),
                None => Span::styled("all", key),
            });
        }

        spans.push(Span::styled("  Dates ", key));
        spans.push(match self.filter.dates() {
            Some(range) => Span::styled(range.to_string(), value),
            None => Span::styled("any", key),
        });

        spans.push(Span::styled(
            format!("  ({}/{})", self.shown, self.total),
            key,
        ));
        Line::from(spans)
    }
}

impl Widget for FilterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.line()).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::DateRange;

    const FACETS: &[Facet] = &[Facet {
        key: "type",
        label: "Type",
        options: &["Standard", "VIP"],
    }];

    #[test]
    fn test_summary_lists_criteria() {
        let mut filter = ListFilter::new();
        filter.set_search("vip");
        filter.set_facet("type", Some("VIP".into()));
        filter.set_dates(DateRange::parse("2024-01-01..").ok());

        let line = FilterBar::new(&filter, FACETS).counts(1, 3).line().to_string();
        assert_eq!(
            line,
            "Search \"vip\"  Type VIP  Dates 2024-01-01..  (1/3)"
        );
    }

    #[test]
    fn test_empty_filter() {
        let filter = ListFilter::new();
        let line = FilterBar::new(&filter, FACETS).line().to_string();
        assert_eq!(line, "Search -  Type all  Dates any  (0/0)");
    }

    #[test]
    fn test_prompt_replaces_summary() {
        let filter = ListFilter::new();
        let line = FilterBar::new(&filter, FACETS)
            .prompt(Some(("Search", "bu")))
            .line()
            .to_string();
        assert_eq!(line, "Search: bu▏");
    }
}
