//! Character-by-character reveal timeline for a single text.
//!
//! A [`TextReveal`] is pure: it describes when each character becomes
//! visible relative to the moment the owning element was presented. The
//! timer-driven [`Typewriter`](crate::Typewriter) replays the same timeline
//! against the tokio clock.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RevealError {
    #[error("reveal rate must be a positive, finite number of characters per second (got {0})")]
    InvalidRate(f64),
}

/// How much of a text is visible at some instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevealProgress {
    /// Characters shown so far. Never exceeds the text length.
    pub shown: usize,
    pub started: bool,
    pub complete: bool,
}

/// One visible-prefix update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealFrame<'a> {
    /// Time since the element was presented.
    pub elapsed: Duration,
    pub visible: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextReveal {
    text: String,
    len: usize,
    start: Duration,
    /// `None` shows the whole text at `start` in one step.
    tick: Option<Duration>,
}

impl TextReveal {
    /// Reveal `text` one character every `1 / rate` seconds, beginning at `start`.
    pub fn new(text: impl Into<String>, start: Duration, rate: f64) -> Result<Self, RevealError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(RevealError::InvalidRate(rate));
        }
        let tick =
            Duration::try_from_secs_f64(1.0 / rate).map_err(|_| RevealError::InvalidRate(rate))?;
        let text = text.into();
        Ok(Self {
            len: text.chars().count(),
            text,
            start,
            // Rates above 1e9 chars/s would round the tick down to zero.
            tick: Some(tick.max(Duration::from_nanos(1))),
        })
    }

    /// Show all of `text` immediately.
    pub fn instant(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            len: text.chars().count(),
            text,
            start: Duration::ZERO,
            tick: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn start(&self) -> Duration {
        self.start
    }

    pub fn is_instant(&self) -> bool {
        self.tick.is_none()
    }

    /// When the last character appears.
    pub fn ends_at(&self) -> Duration {
        match self.tick {
            Some(tick) => self.start.saturating_add(tick.saturating_mul(count_u32(self.len))),
            None => self.start,
        }
    }

    /// The first `shown` characters of the text.
    pub fn prefix(&self, shown: usize) -> &str {
        if shown >= self.len {
            return &self.text;
        }
        let end = self
            .text
            .char_indices()
            .nth(shown)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len());
        &self.text[..end]
    }

    /// Progress at `elapsed` since presentation.
    pub fn progress_at(&self, elapsed: Duration) -> RevealProgress {
        if self.len == 0 {
            return RevealProgress {
                shown: 0,
                started: true,
                complete: true,
            };
        }
        if elapsed < self.start {
            return RevealProgress::default();
        }
        let shown = match self.tick {
            None => self.len,
            Some(tick) => {
                let ticks = (elapsed - self.start).as_nanos() / tick.as_nanos();
                usize::try_from(ticks).unwrap_or(usize::MAX).min(self.len)
            }
        };
        RevealProgress {
            shown,
            started: true,
            complete: shown == self.len,
        }
    }

    /// The finite sequence of visible-prefix updates.
    ///
    /// Yields exactly one frame per character (one frame in total for an
    /// instant reveal, none for empty text), each strictly longer than the
    /// previous and the last equal to the full text.
    pub fn frames(&self) -> RevealFrames<'_> {
        RevealFrames {
            reveal: self,
            shown: 0,
            byte_end: 0,
        }
    }
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Iterator returned by [`TextReveal::frames`].
#[derive(Debug, Clone)]
pub struct RevealFrames<'a> {
    reveal: &'a TextReveal,
    shown: usize,
    byte_end: usize,
}

impl<'a> Iterator for RevealFrames<'a> {
    type Item = RevealFrame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let reveal = self.reveal;
        if self.shown >= reveal.len {
            return None;
        }
        match reveal.tick {
            None => {
                self.shown = reveal.len;
                self.byte_end = reveal.text.len();
                Some(RevealFrame {
                    elapsed: reveal.start,
                    visible: &reveal.text,
                })
            }
            Some(tick) => {
                let ch = reveal.text[self.byte_end..].chars().next()?;
                self.byte_end += ch.len_utf8();
                self.shown += 1;
                Some(RevealFrame {
                    elapsed: reveal
                        .start
                        .saturating_add(tick.saturating_mul(count_u32(self.shown))),
                    visible: &reveal.text[..self.byte_end],
                })
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.reveal.tick {
            None if self.shown < self.reveal.len => 1,
            None => 0,
            Some(_) => self.reveal.len - self.shown,
        };
        (remaining, Some(remaining))
    }
}
