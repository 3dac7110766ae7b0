use crate::state::Ticker;
use crate::ui::widgets::{border_style, ScreenWidget};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const SEPARATOR: &str = "•";

/// The scrolling "Latest Headline" strip.
pub struct TickerWidget<'a> {
    ticker: &'a Ticker,
    offset: i32,
}

impl<'a> TickerWidget<'a> {
    pub fn new(ticker: &'a Ticker, offset: i32) -> Self {
        Self { ticker, offset }
    }
}

/// Headlines joined by the separator glyph, with none after the last.
pub fn strip_line(ticker: &Ticker) -> Line<'_> {
    let mut spans = Vec::with_capacity(ticker.len() * 2);
    for (i, headline) in ticker.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                format!("  {}  ", SEPARATOR),
                Style::default().fg(Color::DarkGray),
            ));
        }
        spans.push(Span::styled(
            headline,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

/// Width the scroll tick treats as the strip's extent.
///
/// Like a block element's scroll width, a non-empty strip is never narrower
/// than its container; an empty one measures zero.
pub fn content_width(ticker: &Ticker, container_width: u16) -> u16 {
    if ticker.is_empty() {
        return 0;
    }
    let text_width = u16::try_from(strip_line(ticker).width()).unwrap_or(u16::MAX);
    text_width.max(container_width)
}

impl ScreenWidget for TickerWidget<'_> {
    fn title(&self) -> &str {
        "Latest Headline"
    }

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(focused))
            .title(format!(" {} ", self.title()));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.ticker.is_empty() {
            let waiting = Paragraph::new(Line::from(Span::styled(
                "Waiting for headlines...",
                Style::default().fg(Color::DarkGray),
            )));
            frame.render_widget(waiting, inner);
            return;
        }

        let line = strip_line(self.ticker);
        if self.offset >= 0 {
            let shift = u16::try_from(self.offset)
                .unwrap_or(u16::MAX)
                .min(inner.width);
            let shifted = Rect {
                x: inner.x + shift,
                width: inner.width - shift,
                ..inner
            };
            frame.render_widget(Paragraph::new(line), shifted);
        } else {
            let skip = u16::try_from(self.offset.unsigned_abs()).unwrap_or(u16::MAX);
            frame.render_widget(Paragraph::new(line).scroll((0, skip)), inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn ticker_of(items: &[&str]) -> Ticker {
        let mut ticker = Ticker::default();
        for item in items {
            ticker.push(item.to_string());
        }
        ticker
    }

    fn render_row(ticker: &Ticker, offset: i32, width: u16) -> String {
        let backend = TestBackend::new(width, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| TickerWidget::new(ticker, offset).render(f, f.area(), false))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..width)
            .map(|x| buffer[(x, 1)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_separator_only_between_items() {
        let ticker = ticker_of(&["one", "two", "three"]);
        let text: String = strip_line(&ticker)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(text, "one  •  two  •  three");
        assert_eq!(text.matches(SEPARATOR).count(), 2);
    }

    #[test]
    fn test_content_width_rules() {
        assert_eq!(content_width(&Ticker::default(), 40), 0);
        let short = ticker_of(&["hi"]);
        assert_eq!(content_width(&short, 40), 40);
        let long = ticker_of(&["a fairly long headline", "and another long one"]);
        assert_eq!(content_width(&long, 10), 47);
    }

    #[test]
    fn test_positive_offset_leaves_gap() {
        let ticker = ticker_of(&["news"]);
        let row = render_row(&ticker, 3, 12);
        assert_eq!(row, "│   news   │");
    }

    #[test]
    fn test_negative_offset_clips_left() {
        let ticker = ticker_of(&["headline"]);
        let row = render_row(&ticker, -4, 12);
        assert_eq!(row, "│line      │");
    }
}
