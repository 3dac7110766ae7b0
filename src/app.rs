//! Terminal event loop.
//!
//! The [`App`] owns the view state. Two [`PeriodicTask`]s (headline poll,
//! scroll tick), spawned submissions and the terminal's event stream all
//! report back through one channel, and only the loop mutates state.

use crate::api::{ApiClient, ApiResponse};
use crate::config::Config;
use crate::feeds::headline::HeadlineFetcher;
use crate::feeds::{FeedData, FeedFetcher, FeedMessage};
use crate::state::HeadlineView;
use crate::tasks::PeriodicTask;
use crate::ui::{self, widgets::ticker, ScreenLayout};
use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug)]
pub enum AppEvent {
    Terminal(Event),
    Feed(FeedMessage),
    ScrollTick,
    Submitted {
        headline: String,
        response: ApiResponse,
    },
}

pub struct App {
    config: Config,
    client: Arc<ApiClient>,
    view: HeadlineView,
    tx: mpsc::Sender<AppEvent>,
    rx: mpsc::Receiver<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let client = Arc::new(ApiClient::with_timeout(
            config.api.base_url.clone(),
            config.api.request_timeout(),
        ));
        let view = HeadlineView::new(config.ticker.max_headlines, config.ticker.scroll_step);
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        Self {
            config,
            client,
            view,
            tx,
            rx,
            should_quit: false,
        }
    }

    pub fn view(&self) -> &HeadlineView {
        &self.view
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Waits for the next event posted by a background task.
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Starts the headline poll; the first fetch goes out immediately.
    ///
    /// Each fetch runs in its own task so a slow backend never delays the
    /// next scheduled poll.
    pub fn start_polling(&self) -> PeriodicTask {
        let fetcher: Arc<dyn FeedFetcher> = Arc::new(HeadlineFetcher::new(self.client.clone()));
        let tx = self.tx.clone();

        PeriodicTask::spawn(
            "headline-poll",
            self.config.ticker.refresh_interval(),
            move || {
                let fetcher = fetcher.clone();
                let tx = tx.clone();
                async move {
                    if tx.is_closed() {
                        return false;
                    }
                    tokio::spawn(async move {
                        let data = match fetcher.fetch().await {
                            Ok(data) => data,
                            Err(e) => FeedData::Error(e.to_string()),
                        };
                        let message = FeedMessage {
                            feed_id: fetcher.id().to_string(),
                            data,
                        };
                        if tx.send(AppEvent::Feed(message)).await.is_err() {
                            tracing::debug!("view closed before headline fetch finished");
                        }
                    });
                    true
                }
            },
        )
    }

    /// Starts the scroll animation. Ticks are dropped while the loop is
    /// behind rather than queued.
    pub fn start_scrolling(&self) -> PeriodicTask {
        let tx = self.tx.clone();

        PeriodicTask::spawn("scroll", self.config.ticker.scroll_interval(), move || {
            let tx = tx.clone();
            async move {
                !matches!(
                    tx.try_send(AppEvent::ScrollTick),
                    Err(mpsc::error::TrySendError::Closed(_))
                )
            }
        })
    }

    pub async fn run(mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<()> {
        tracing::info!(base_url = %self.client.base_url(), "headlines started");

        let mut poll = self.start_polling();
        let mut scroll = self.start_scrolling();
        let mut events = EventStream::new();
        let mut needs_redraw = true;

        let result = loop {
            if needs_redraw {
                if let Err(e) = terminal.draw(|f| ui::draw(f, &self.view)) {
                    break Err(e.into());
                }
            }

            if self.should_quit {
                break Ok(());
            }

            let event = tokio::select! {
                Some(event) = self.rx.recv() => event,
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => AppEvent::Terminal(event),
                    Some(Err(e)) => break Err(e.into()),
                    None => break Ok(()),
                },
            };

            // measured after the wait so a resize during it is seen by this tick
            let size = match terminal.size() {
                Ok(size) => size,
                Err(e) => break Err(e.into()),
            };
            let screen = Rect::new(0, 0, size.width, size.height);
            needs_redraw = self.handle_event(event, screen);
        };

        poll.stop();
        scroll.stop();
        tracing::info!("headlines stopped");
        result
    }

    /// Applies one event to the view. Returns whether a redraw is needed.
    ///
    /// `screen` is the current terminal area, used to measure the ticker on
    /// scroll ticks.
    pub fn handle_event(&mut self, event: AppEvent, screen: Rect) -> bool {
        match event {
            AppEvent::Terminal(Event::Key(key)) => self.handle_key(key),
            AppEvent::Terminal(Event::Resize(_, _)) => true,
            AppEvent::Terminal(_) => false,
            AppEvent::Feed(message) => self.handle_feed(message),
            AppEvent::ScrollTick => {
                let container_width = ScreenLayout::new(screen).ticker_container_width();
                let content_width = ticker::content_width(&self.view.ticker, container_width);
                let before = self.view.scroll.value();
                self.view.scroll.advance(content_width, container_width) != before
            }
            AppEvent::Submitted { headline, response } => {
                if response.status {
                    tracing::info!(%headline, "headline submitted");
                } else {
                    tracing::error!(
                        reason = response.message.as_deref().unwrap_or_default(),
                        "Failed to submit headline!"
                    );
                }
                self.view.finish_submit(headline, &response);
                true
            }
        }
    }

    fn handle_feed(&mut self, message: FeedMessage) -> bool {
        match message.data {
            FeedData::Headline(headline) => {
                tracing::debug!(feed = %message.feed_id, %headline, "headline received");
                self.view.receive_headline(&headline)
            }
            FeedData::Error(e) => {
                tracing::warn!(
                    feed = %message.feed_id,
                    error = %e,
                    "Failed to fetch latest headline!"
                );
                false
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => self.view.input.backspace(),
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                return false
            }
            KeyCode::Char(c) => {
                self.view.input.insert(c);
            }
            _ => return false,
        }
        true
    }

    fn submit(&mut self) {
        let Some(headline) = self.view.begin_submit() else {
            return;
        };

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let response = client.submit_headline(&headline).await;
            if tx
                .send(AppEvent::Submitted { headline, response })
                .await
                .is_err()
            {
                tracing::debug!("view closed before submission finished");
            }
        });
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut config = Config::default();
        config.api.base_url = "http://127.0.0.1:1".to_string();
        App::new(config)
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 44,
        height: 20,
    };

    #[test]
    fn test_typing_edits_input() {
        let mut app = app();
        for c in "hey!".chars() {
            assert!(app.handle_event(key(KeyCode::Char(c)), SCREEN));
        }
        app.handle_event(key(KeyCode::Backspace), SCREEN);
        assert_eq!(app.view().input.as_str(), "hey");
    }

    #[test]
    fn test_escape_and_ctrl_c_quit() {
        let mut app = app();
        app.handle_event(key(KeyCode::Esc), SCREEN);
        assert!(app.should_quit());

        let mut app = self::app();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        app.handle_event(AppEvent::Terminal(Event::Key(ctrl_c)), SCREEN);
        assert!(app.should_quit());
        assert_eq!(app.view().input.as_str(), "");
    }

    #[test]
    fn test_modified_chars_are_not_typed() {
        let mut app = app();
        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        let alt_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT);
        assert!(!app.handle_event(AppEvent::Terminal(Event::Key(ctrl_u)), SCREEN));
        assert!(!app.handle_event(AppEvent::Terminal(Event::Key(alt_x)), SCREEN));
        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert!(app.handle_event(AppEvent::Terminal(Event::Key(shifted)), SCREEN));
        assert_eq!(app.view().input.as_str(), "A");
        assert!(!app.should_quit());
    }

    #[test]
    fn test_blank_enter_does_nothing() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char(' ')), SCREEN);
        app.handle_event(key(KeyCode::Enter), SCREEN);
        assert!(!app.view().is_submitting());
        assert!(app.view().last_result.is_none());
        assert!(app.rx.try_recv().is_err());
    }

    #[test]
    fn test_feed_messages_update_ticker() {
        let mut app = app();
        let headline = FeedMessage {
            feed_id: "headline".into(),
            data: FeedData::Headline("Hello world".into()),
        };
        assert!(app.handle_event(AppEvent::Feed(headline), SCREEN));

        let failure = FeedMessage {
            feed_id: "headline".into(),
            data: FeedData::Error("connection refused".into()),
        };
        assert!(!app.handle_event(AppEvent::Feed(failure), SCREEN));

        let items: Vec<&str> = app.view().ticker.iter().collect();
        assert_eq!(items, vec!["Hello world"]);
        assert!(app.view().last_result.is_none());
    }

    #[test]
    fn test_scroll_tick_measures_current_screen() {
        let mut app = app();
        // empty ticker parks at the container's width: 44 - 2 margin - 2 border
        app.handle_event(AppEvent::ScrollTick, SCREEN);
        assert_eq!(app.view().scroll.value(), 40);

        app.view.receive_headline("short");
        app.handle_event(AppEvent::ScrollTick, SCREEN);
        assert_eq!(app.view().scroll.value(), 38);

        let wider = Rect { width: 64, ..SCREEN };
        app.handle_event(AppEvent::ScrollTick, wider);
        assert_eq!(app.view().scroll.value(), 36);
    }
}
