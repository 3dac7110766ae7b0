//! View state for the ticker screen.
//!
//! Everything the screen shows lives in [`HeadlineView`]. Timers, network
//! responses and key presses are all funnelled through the update methods
//! here, so the behaviour can be tested without a terminal.

use crate::api::ApiResponse;
use std::collections::VecDeque;

pub const DEFAULT_MAX_HEADLINES: usize = 5;
pub const DEFAULT_SCROLL_STEP: i32 = 2;
pub const MAX_INPUT_CHARS: usize = 50;

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Headline submitted successfully!";
pub const SUBMIT_FAILURE_MESSAGE: &str = "Failed to submit headline!";

/// Bounded FIFO of the most recent headlines, oldest first.
#[derive(Debug, Clone)]
pub struct Ticker {
    headlines: VecDeque<String>,
    capacity: usize,
}

impl Ticker {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            headlines: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, headline: String) {
        self.headlines.push_back(headline);
        while self.headlines.len() > self.capacity {
            self.headlines.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.headlines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.headlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headlines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEADLINES)
    }
}

/// Horizontal marquee position, in terminal columns.
///
/// Negative values mean the strip has moved left past the container's left
/// edge; positive values leave a gap on the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOffset {
    value: i32,
    step: i32,
}

impl ScrollOffset {
    pub fn new(step: i32) -> Self {
        Self { value: 0, step }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Moves one step left, wrapping back to `container_width` once the
    /// strip has fully left the box.
    ///
    /// A `content_width` of zero means there is nothing to draw; the offset
    /// parks at `container_width` so the next headline enters from the right.
    pub fn advance(&mut self, content_width: u16, container_width: u16) -> i32 {
        self.value = if content_width == 0 {
            i32::from(container_width)
        } else {
            next_offset(self.value, self.step, content_width, container_width)
        };
        self.value
    }
}

impl Default for ScrollOffset {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_STEP)
    }
}

/// One scroll tick: `previous - step`, or `container_width` once the
/// magnitude passes `content_width`.
pub fn next_offset(previous: i32, step: i32, content_width: u16, container_width: u16) -> i32 {
    let next = previous.saturating_sub(step);
    if next.unsigned_abs() > u32::from(content_width) {
        i32::from(container_width)
    } else {
        next
    }
}

/// Single-line text field capped at [`MAX_INPUT_CHARS`] characters.
#[derive(Debug, Clone, Default)]
pub struct HeadlineInput {
    text: String,
}

impl HeadlineInput {
    /// Returns false when the field is already full.
    pub fn insert(&mut self, c: char) -> bool {
        if c.is_control() || self.char_count() >= MAX_INPUT_CHARS {
            return false;
        }
        self.text.push(c);
        true
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }
}

/// Outcome of the last submission attempt, shown under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResult {
    pub is_error: bool,
    pub message: String,
}

impl SubmitResult {
    pub fn from_response(response: &ApiResponse) -> Self {
        let message = response
            .message
            .as_deref()
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        if response.status {
            Self {
                is_error: false,
                message: message.unwrap_or_else(|| SUBMIT_SUCCESS_MESSAGE.to_string()),
            }
        } else {
            Self {
                is_error: true,
                message: message.unwrap_or_else(|| SUBMIT_FAILURE_MESSAGE.to_string()),
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeadlineView {
    pub ticker: Ticker,
    pub scroll: ScrollOffset,
    pub input: HeadlineInput,
    pub last_result: Option<SubmitResult>,
    submitting: bool,
}

impl HeadlineView {
    pub fn new(max_headlines: usize, scroll_step: i32) -> Self {
        Self {
            ticker: Ticker::new(max_headlines),
            scroll: ScrollOffset::new(scroll_step),
            input: HeadlineInput::default(),
            last_result: None,
            submitting: false,
        }
    }

    /// Applies a polled headline. Blank bodies are ignored; returns whether
    /// the ticker changed.
    pub fn receive_headline(&mut self, raw: &str) -> bool {
        let headline = raw.trim();
        if headline.is_empty() {
            return false;
        }
        self.ticker.push(headline.to_string());
        true
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.input.is_blank()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Starts a submission, returning the trimmed text to send. `None`
    /// means nothing should go over the wire.
    pub fn begin_submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        self.submitting = true;
        Some(self.input.trimmed().to_string())
    }

    /// Folds the API response for `headline` back into the view.
    pub fn finish_submit(&mut self, headline: String, response: &ApiResponse) {
        self.submitting = false;
        let result = SubmitResult::from_response(response);
        if !result.is_error {
            self.ticker.push(headline);
            self.input.clear();
        }
        self.last_result = Some(result);
    }
}

impl Default for HeadlineView {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEADLINES, DEFAULT_SCROLL_STEP)
    }
}
