pub mod submit;
pub mod ticker;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    Frame,
};

/// A bordered panel on the main screen.
pub trait ScreenWidget {
    fn title(&self) -> &str;

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool);
}

pub(crate) fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    }
}
