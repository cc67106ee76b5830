//! Object-safe interface the console uses to drive its tabs.

use std::any::Any;

use crossterm::event::KeyEvent;
use futures_util::{FutureExt, future::BoxFuture};
use ratatui::{buffer::Buffer, layout::Rect};

use crate::presentation::widgets::KeyHint;

/// Completion of a tab effect, recovered by the tab that issued it.
pub type TabEvent = Box<dyn Any + Send>;

/// Work a tab wants run off the event loop.
pub type TabEffect = BoxFuture<'static, TabEvent>;

/// Erases the output type of a controller effect.
pub fn erase<E: Send + 'static>(effect: BoxFuture<'static, E>) -> TabEffect {
    effect.map(|event| Box::new(event) as TabEvent).boxed()
}

/// Outcome of routing a key to a tab.
pub enum KeyOutcome {
    /// Not a tab binding; global bindings may apply.
    Ignored,
    /// Handled without further work.
    Consumed,
    /// Handled; run this effect and feed the result back through
    /// [`ConsoleTab::apply`].
    Spawn(TabEffect),
}

/// One tab of a console.
pub trait ConsoleTab {
    /// Header title.
    fn title(&self) -> &'static str;

    /// Initial fetch, issued when the console is entered.
    fn start(&mut self) -> Option<TabEffect>;

    /// Handles a key while the tab is active.
    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome;

    /// Folds a finished effect into the tab; may return a follow-up.
    fn apply(&mut self, event: TabEvent) -> Option<TabEffect>;

    /// Returns whether a prompt or modal owns the keyboard.
    fn captures_input(&self) -> bool;

    /// Bindings for the footer.
    fn key_hints(&self) -> &'static [KeyHint];

    /// Draws the tab body.
    fn render(&mut self, area: Rect, buf: &mut Buffer);
}
