pub mod theme;
pub mod typing_area;

use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};

/// Centre a box of `width` columns inside `area`, clamped to the area.
pub fn centered_columns(width: u16, area: Rect) -> Rect {
    let [middle] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(area);
    middle
}
