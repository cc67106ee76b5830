//! Single-line text input used by the login form and the filter prompts.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Text input field. The cursor counts characters, not bytes.
#[derive(Debug, Clone)]
pub struct TextInput {
    value: String,
    cursor: usize,
    focused: bool,
    masked: bool,
    placeholder: String,
    label: String,
}

impl TextInput {
    /// Creates an empty input with a border title.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            focused: false,
            masked: false,
            placeholder: String::new(),
            label: label.into(),
        }
    }

    /// Masks the value with bullets.
    #[must_use]
    pub fn password(mut self) -> Self {
        self.masked = true;
        self
    }

    /// Sets the hint shown while empty.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    /// Sets focus state.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Returns focus state.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Border title.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the value and moves the cursor to its end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.char_count();
    }

    /// Clears the value.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Takes the value out, leaving the input empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Inserts a character at the cursor.
    pub fn input_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Deletes the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    /// Deletes the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    /// Moves the cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Moves the cursor to the start.
    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    /// Moves the cursor to the end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    fn display_text(&self) -> String {
        if self.value.is_empty() {
            self.placeholder.clone()
        } else if self.masked {
            "•".repeat(self.char_count())
        } else {
            self.value.clone()
        }
    }

    fn cursor_column(&self) -> usize {
        if self.masked {
            self.cursor
        } else {
            let before: String = self.value.chars().take(self.cursor).collect();
            before.width()
        }
    }
}

impl Widget for &TextInput {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let text_style = if self.value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(self.label.as_str());

        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new(self.display_text())
            .style(text_style)
            .render(inner, buf);

        if self.focused && inner.width > 0 && inner.height > 0 {
            let column = u16::try_from(self.cursor_column()).unwrap_or(u16::MAX);
            let cursor_x = inner.x.saturating_add(column);
            if cursor_x < inner.x + inner.width {
                buf[(cursor_x, inner.y)]
                    .set_style(Style::default().bg(Color::White).fg(Color::Black));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_basic() {
        let mut input = TextInput::new("Email");
        assert!(input.value().is_empty());

        input.input_char('a');
        input.input_char('b');
        assert_eq!(input.value(), "ab");

        input.backspace();
        assert_eq!(input.value(), "a");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::new("Nom");
        input.set_value("Gaël");
        input.move_left();
        input.backspace();
        assert_eq!(input.value(), "Gal");
        input.move_start();
        input.delete();
        assert_eq!(input.value(), "al");
        input.move_end();
        input.input_char('é');
        assert_eq!(input.value(), "alé");
    }

    #[test]
    fn test_masked_display() {
        let mut input = TextInput::new("Password").password();
        input.set_value("sécret");

        assert_eq!(input.display_text(), "••••••");
    }

    #[test]
    fn test_take_empties_input() {
        let mut input = TextInput::new("Search");
        input.set_value("abc");
        assert_eq!(input.take(), "abc");
        assert!(input.value().is_empty());
        input.input_char('x');
        assert_eq!(input.value(), "x");
    }
}
