use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Centers a `width` x `height` box inside `r`, shrinking it to fit.
#[must_use]
pub fn popup_rect(width: u16, height: u16, r: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(r.height))])
        .flex(Flex::Center)
        .areas(r);
    let [area] = Layout::horizontal([Constraint::Length(width.min(r.width))])
        .flex(Flex::Center)
        .areas(row);
    area
}

/// Number of terminal rows needed for `count` bordered single-line inputs.
#[must_use]
pub fn stacked_height(count: usize) -> u16 {
    u16::try_from(count * 3).unwrap_or(u16::MAX)
}
