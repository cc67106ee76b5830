//! Top bar of the console: product badge, console badge and tab strip.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::domain::Namespace;

/// Colors of the header bar.
pub struct HeaderBarStyle {
    pub background: Style,
    pub app_name: Style,
    pub version: Style,
    pub namespace: Style,
    pub tab: Style,
    pub active_tab: Style,
}

impl Default for HeaderBarStyle {
    fn default() -> Self {
        Self {
            background: Style::default(),
            app_name: Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            version: Style::default().bg(Color::DarkGray).fg(Color::White),
            namespace: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            tab: Style::default().fg(Color::Gray),
            active_tab: Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// Header with numbered tabs; the active one is highlighted.
pub struct HeaderBar<'a> {
    app_name: &'a str,
    version: &'a str,
    namespace: Namespace,
    tabs: &'a [&'a str],
    active: usize,
    style: HeaderBarStyle,
}

impl<'a> HeaderBar<'a> {
    /// Creates a header.
    #[must_use]
    pub fn new(app_name: &'a str, version: &'a str, namespace: Namespace) -> Self {
        Self {
            app_name,
            version,
            namespace,
            tabs: &[],
            active: 0,
            style: HeaderBarStyle::default(),
        }
    }

    /// Sets the tab titles and the active tab.
    #[must_use]
    pub const fn tabs(mut self, tabs: &'a [&'a str], active: usize) -> Self {
        self.tabs = tabs;
        self.active = active;
        self
    }

    fn badge_spans(&self) -> Vec<Span<'static>> {
        vec![
            Span::styled(
                format!(" {} ", self.app_name.to_uppercase()),
                self.style.app_name,
            ),
            Span::styled(format!(" v{} ", self.version), self.style.version),
            Span::raw(" "),
            Span::styled(self.namespace.title().to_string(), self.style.namespace),
            Span::raw("  "),
        ]
    }

    fn tab_spans(&self) -> Vec<Span<'static>> {
        self.tabs
            .iter()
            .enumerate()
            .flat_map(|(i, title)| {
                let style = if i == self.active {
                    self.style.active_tab
                } else {
                    self.style.tab
                };
                [
                    Span::styled(format!(" {} {title} ", i + 1), style),
                    Span::raw(" "),
                ]
            })
            .collect()
    }
}

impl Widget for HeaderBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        for x in area.left()..area.right() {
            buf[(x, area.y)]
                .set_char(' ')
                .set_style(self.style.background);
        }

        let mut spans = self.badge_spans();
        spans.extend(self.tab_spans());
        let line = Line::from(spans);
        Paragraph::new(line).render(Rect::new(area.x, area.y, area.width, 1), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_tab_is_highlighted() {
        let tabs = ["Dashboard", "Buses"];
        let header = HeaderBar::new("busdesk", "0.1.0", Namespace::Company).tabs(&tabs, 1);
        let spans = header.tab_spans();

        assert_eq!(spans[0].content, " 1 Dashboard ");
        assert_eq!(spans[2].content, " 2 Buses ");
        assert_eq!(spans[2].style, HeaderBarStyle::default().active_tab);
        assert_eq!(spans[0].style, HeaderBarStyle::default().tab);
    }

    #[test]
    fn test_renders_namespace_title() {
        let header = HeaderBar::new("busdesk", "0.1.0", Namespace::Platform);
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        header.render(area, &mut buf);

        let text: String = (0..area.width).map(|x| buf[(x, 0)].symbol()).collect();
        assert!(text.starts_with(" BUSDESK "));
        assert!(text.contains("Super admin"));
    }
}
