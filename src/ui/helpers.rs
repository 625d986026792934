//! UI layout helpers

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// A popup of `percent_x` width and a fixed `height` in rows, centered in `r`
///
/// The height is capped to the available area.
pub(crate) fn centered_popup(percent_x: u16, height: u16, r: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(r.height))])
        .flex(Flex::Center)
        .areas(r);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

/// Slot for the `index`-th toast stacked down from the top-right corner
///
/// Returns None when the slot would not fit inside `r`.
pub(crate) fn toast_slot(width: u16, height: u16, index: u16, r: Rect) -> Option<Rect> {
    let width = width.min(r.width);
    let y = r.y.checked_add(1 + index * height)?;
    if y + height > r.bottom() {
        return None;
    }
    Some(Rect {
        x: r.right().saturating_sub(width + 1),
        y,
        width,
        height,
    })
}
