//! Key classification shared by the screens.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Result of routing a key to a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult {
    /// Not handled; the caller may try a global binding.
    Continue,
    /// Exit application.
    Exit,
    /// Event was consumed.
    Consumed,
}

/// Stateless key predicates.
pub struct EventHandler;

impl EventHandler {
    /// Key releases and repeats reported by some terminals are ignored.
    #[must_use]
    pub fn is_press(key: &KeyEvent) -> bool {
        key.kind == KeyEventKind::Press
    }

    /// `Ctrl+C` exits from anywhere.
    #[must_use]
    pub fn is_force_quit(key: &KeyEvent) -> bool {
        key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
    }

    /// `q` or `Ctrl+C`.
    #[must_use]
    pub fn is_quit_event(key: &KeyEvent) -> bool {
        Self::is_force_quit(key)
            || matches!(
                key,
                KeyEvent {
                    code: KeyCode::Char('q'),
                    modifiers: KeyModifiers::NONE,
                    ..
                }
            )
    }

    /// Digit `1`-`9` selecting a tab, as a zero-based index.
    #[must_use]
    pub fn tab_index(key: &KeyEvent) -> Option<usize> {
        match key.code {
            KeyCode::Char(c @ '1'..='9') if key.modifiers == KeyModifiers::NONE => {
                c.to_digit(10).map(|d| d as usize - 1)
            }
            _ => None,
        }
    }
}
