//! One-line footer with left, centered and right-aligned segments.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Severity of the footer message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusLevel {
    /// Informational.
    #[default]
    Info,
    /// Success.
    Success,
    /// Warning.
    Warning,
    /// Error.
    Error,
}

impl StatusLevel {
    /// Returns color for level.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Footer widget.
#[derive(Debug, Clone, Default)]
pub struct StatusBar {
    left: String,
    center: String,
    right: String,
    level: StatusLevel,
}

impl StatusBar {
    /// Creates an empty footer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the left segment.
    #[must_use]
    pub fn left(mut self, content: impl Into<String>) -> Self {
        self.left = content.into();
        self
    }

    /// Sets the centered segment, colored by level.
    #[must_use]
    pub fn center(mut self, content: impl Into<String>) -> Self {
        self.center = content.into();
        self
    }

    /// Sets the right segment.
    #[must_use]
    pub fn right(mut self, content: impl Into<String>) -> Self {
        self.right = content.into();
        self
    }

    /// Sets the message level.
    #[must_use]
    pub const fn level(mut self, level: StatusLevel) -> Self {
        self.level = level;
        self
    }

    /// Footer showing `message` as an error.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new().center(message).level(StatusLevel::Error)
    }
}

impl Widget for &StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let side = Style::default().fg(Color::DarkGray);
        let message = Style::default()
            .fg(self.level.color())
            .add_modifier(Modifier::BOLD);

        let width = area.width as usize;
        let left_len = self.left.width();
        let center_len = self.center.width();
        let right_len = self.right.width();

        let center_start = width.saturating_sub(center_len) / 2;
        let right_start = width.saturating_sub(right_len);

        let mut spans = vec![Span::styled(self.left.as_str(), side)];

        let left_padding = center_start.saturating_sub(left_len);
        spans.push(Span::raw(" ".repeat(left_padding)));
        if !self.center.is_empty() {
            spans.push(Span::styled(self.center.as_str(), message));
        }

        let used = left_len + left_padding + center_len;
        let right_padding = right_start.saturating_sub(used);
        spans.push(Span::raw(" ".repeat(right_padding)));
        if !self.right.is_empty() {
            spans.push(Span::styled(self.right.as_str(), side));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_are_placed() {
        let bar = StatusBar::new().left("L").center("MID").right("R");
        let area = Rect::new(0, 0, 11, 1);
        let mut buf = Buffer::empty(area);
        (&bar).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "L");
        assert_eq!(buf[(4, 0)].symbol(), "M");
        assert_eq!(buf[(10, 0)].symbol(), "R");
    }

    #[test]
    fn test_error_level() {
        let bar = StatusBar::error("boom");
        assert_eq!(bar.level, StatusLevel::Error);
        assert_eq!(bar.center, "boom");
    }
}
