pub mod widgets;

use crate::state::HeadlineView;
use chrono::Datelike;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use widgets::submit::SubmitForm;
use widgets::ticker::TickerWidget;
use widgets::ScreenWidget;

pub const APP_TITLE: &str = "Multiplayer Headlines";
const SUBTITLE: &str = "Submit a headline to join the real-time ticker.";
const KEY_HINTS: &str = "Enter: submit | Backspace: delete | Esc: quit";

/// Screen regions, recomputed from the terminal size on every use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub ticker: Rect,
    pub form: Rect,
    pub hints: Rect,
    pub footer: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            header: chunks[0],
            ticker: chunks[1],
            form: chunks[3],
            hints: chunks[5],
            footer: chunks[6],
        }
    }

    /// Columns available to the headline strip inside its border.
    pub fn ticker_container_width(&self) -> u16 {
        self.ticker.width.saturating_sub(2)
    }
}

pub fn draw(frame: &mut Frame, view: &HeadlineView) {
    let layout = ScreenLayout::new(frame.area());

    render_header(frame, layout.header);
    TickerWidget::new(&view.ticker, view.scroll.value()).render(frame, layout.ticker, false);
    SubmitForm::new(view).render(frame, layout.form, true);

    let hints = Paragraph::new(Line::from(Span::styled(
        KEY_HINTS,
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(hints, layout.hints);

    render_footer(frame, layout.footer);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            APP_TITLE,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(SUBTITLE),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let year = chrono::Local::now().year();
    let footer = Paragraph::new(Line::from(Span::styled(
        format!("© {} {}", year, APP_TITLE),
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_full_screen_render() {
        let mut view = HeadlineView::default();
        view.receive_headline("Local man finds keys");
        view.receive_headline("Rain expected");

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| draw(f, &view)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains(APP_TITLE));
        assert!(text.contains(SUBTITLE));
        assert!(text.contains("Latest Headline"));
        assert!(text.contains("Local man finds keys  •  Rain expected"));
        assert!(text.contains(KEY_HINTS));
        assert!(text.contains(&format!("© {}", chrono::Local::now().year())));
    }

    #[test]
    fn test_container_width_tracks_terminal_size() {
        let narrow = ScreenLayout::new(Rect::new(0, 0, 40, 20));
        let wide = ScreenLayout::new(Rect::new(0, 0, 120, 20));
        assert_eq!(narrow.ticker_container_width(), 36);
        assert_eq!(wide.ticker_container_width(), 116);
    }
}
