use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use tracing::warn;

use super::console_tab::{ConsoleTab, KeyOutcome, TabEffect, TabEvent, erase};
use crate::application::services::{DashboardController, DashboardEvent, LoadState};
use crate::presentation::widgets::{KeyHint, StatsBar};

const HINTS: &[KeyHint] = &[("r", "Reload")];

/// Company dashboard tab.
pub struct DashboardScreen {
    controller: DashboardController,
}

impl DashboardScreen {
    /// Creates the tab.
    #[must_use]
    pub const fn new(controller: DashboardController) -> Self {
        Self { controller }
    }
}

impl ConsoleTab for DashboardScreen {
    fn title(&self) -> &'static str {
        "Dashboard"
    }

    fn start(&mut self) -> Option<TabEffect> {
        Some(erase(self.controller.load()))
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Char('r') => KeyOutcome::Spawn(erase(self.controller.load())),
            _ => KeyOutcome::Ignored,
        }
    }

    fn apply(&mut self, event: TabEvent) -> Option<TabEffect> {
        match event.downcast::<DashboardEvent>() {
            Ok(event) => self.controller.apply(*event),
            Err(_) => warn!("Dropped event for another tab"),
        }
        None
    }

    fn captures_input(&self) -> bool {
        false
    }

    fn key_hints(&self) -> &'static [KeyHint] {
        HINTS
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(
                " Dashboard ",
                Style::default().add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        let message = match self.controller.state() {
            LoadState::Idle | LoadState::Loading => Some(Line::from(Span::styled(
                "Loading...",
                Style::default().fg(Color::DarkGray),
            ))),
            LoadState::Failed(message) => Some(Line::from(Span::styled(
                format!("Failed to load: {message}  (r to retry)"),
                Style::default().fg(Color::Red),
            ))),
            LoadState::Loaded => None,
        };
        if let Some(message) = message {
            Paragraph::new(message).centered().render(inner, buf);
            return;
        }

        let figures = self.controller.figures();
        let [cards, _] =
            Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(inner);
        StatsBar::new(&figures).render(cards, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::entities::CompanyDashboard;
    use crate::domain::ports::mocks::MockDashboardPort;

    #[tokio::test]
    async fn test_start_then_apply_loads_figures() {
        let port = Arc::new(MockDashboardPort {
            dashboard: CompanyDashboard {
                trips: Some(12.0),
                ..CompanyDashboard::default()
            },
        });
        let mut screen = DashboardScreen::new(DashboardController::new(port, "c1"));

        let effect = screen.start().unwrap();
        assert!(screen.apply(effect.await).is_none());
        assert_eq!(screen.controller.state(), &LoadState::Loaded);

        let area = Rect::new(0, 0, 80, 8);
        let mut buf = Buffer::empty(area);
        screen.render(area, &mut buf);
        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf[(x, y)].symbol().to_string())
            .collect();
        assert!(text.contains("12"));
    }

    #[test]
    fn test_foreign_event_is_ignored() {
        let port = Arc::new(MockDashboardPort {
            dashboard: CompanyDashboard::default(),
        });
        let mut screen = DashboardScreen::new(DashboardController::new(port, "c1"));
        assert!(screen.apply(Box::new(42_u8)).is_none());
        assert_eq!(screen.controller.state(), &LoadState::Idle);
    }
}
