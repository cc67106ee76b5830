use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// A key and what it does, shown in the footer.
pub type KeyHint = (&'static str, &'static str);

/// Footer colors.
pub struct FooterBarStyle {
    pub background: Style,
    pub label_style: Style,
    pub key_style: Style,
    pub info: Style,
}

impl Default for FooterBarStyle {
    fn default() -> Self {
        Self {
            background: Style::default(),
            label_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            key_style: Style::default().fg(Color::White).bg(Color::DarkGray),
            info: Style::default().fg(Color::DarkGray),
        }
    }
}

/// Footer listing the key bindings of the focused view.
pub struct FooterBar<'a> {
    hints: &'a [KeyHint],
    right_info: Option<&'a str>,
    style: FooterBarStyle,
}

impl<'a> FooterBar<'a> {
    /// Creates a footer with key hints.
    #[must_use]
    pub fn new(hints: &'a [KeyHint]) -> Self {
        Self {
            hints,
            right_info: None,
            style: FooterBarStyle::default(),
        }
    }

    /// Text aligned right.
    #[must_use]
    pub const fn right_info(mut self, info: Option<&'a str>) -> Self {
        self.right_info = info;
        self
    }

    fn hint_spans(&self) -> Vec<Span<'a>> {
        let mut spans = Vec::new();
        for (i, (key, label)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(format!(" {label} "), self.style.label_style));
            spans.push(Span::styled(format!(" {key} "), self.style.key_style));
        }
        spans
    }
}

impl Widget for FooterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        for x in area.left()..area.right() {
            buf[(x, area.y)]
                .set_char(' ')
                .set_style(self.style.background);
        }

        let right_width = self
            .right_info
            .map_or(0, |s| u16::try_from(s.width()).unwrap_or(u16::MAX));
        let left_width = area.width.saturating_sub(right_width.saturating_add(1));
        Paragraph::new(Line::from(self.hint_spans()))
            .render(Rect::new(area.x, area.y, left_width, 1), buf);

        if let Some(info) = self.right_info
            && right_width < area.width
        {
            let right_x = area.right().saturating_sub(right_width);
            Paragraph::new(Span::styled(info, self.style.info))
                .render(Rect::new(right_x, area.y, right_width, 1), buf);
        }
    }
}
