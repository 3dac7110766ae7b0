use crate::state::{HeadlineView, SubmitResult, MAX_INPUT_CHARS};
use crate::ui::widgets::{border_style, ScreenWidget};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const PLACEHOLDER: &str = "Type...";

/// Headline input, submit button and the last submission's message.
pub struct SubmitForm<'a> {
    view: &'a HeadlineView,
}

impl<'a> SubmitForm<'a> {
    pub fn new(view: &'a HeadlineView) -> Self {
        Self { view }
    }

    fn button_label(&self) -> &'static str {
        if self.view.is_submitting() {
            "Submitting..."
        } else {
            "Submit"
        }
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let counter = format!(" {}/{} ", self.view.input.char_count(), MAX_INPUT_CHARS);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(focused))
            .title(format!(" {} ", self.title()))
            .title_bottom(Line::from(counter).alignment(Alignment::Right));

        let inner = block.inner(area);

        let text = if self.view.input.as_str().is_empty() {
            Line::from(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)))
        } else {
            Line::from(self.view.input.as_str())
        };

        // keep the cursor end of the text visible
        let text_width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        let typed_width = if self.view.input.as_str().is_empty() {
            0
        } else {
            text_width
        };
        let overflow = typed_width.saturating_sub(inner.width.saturating_sub(1));

        frame.render_widget(Paragraph::new(text).scroll((0, overflow)).block(block), area);

        if focused && inner.width > 0 && inner.height > 0 {
            frame.set_cursor_position((inner.x + typed_width - overflow, inner.y));
        }
    }

    fn render_button(&self, frame: &mut Frame, area: Rect) {
        let enabled = self.view.can_submit();
        let style = if enabled {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let button = Paragraph::new(Line::from(Span::styled(self.button_label(), style)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(style));
        frame.render_widget(button, area);
    }
}

pub fn result_line(result: &SubmitResult) -> Line<'_> {
    let color = if result.is_error {
        Color::Red
    } else {
        Color::Green
    };
    Line::from(Span::styled(
        result.message.as_str(),
        Style::default().fg(color),
    ))
}

impl ScreenWidget for SubmitForm<'_> {
    fn title(&self) -> &str {
        "Your headline"
    }

    /// Expects at least four rows: three for the input row, one for the
    /// message.
    fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(17)])
            .split(rows[0]);

        self.render_input(frame, columns[0], focused);
        self.render_button(frame, columns[1]);

        if let Some(result) = &self.view.last_result {
            frame.render_widget(Paragraph::new(result_line(result)), rows[1]);
        }
    }
}
