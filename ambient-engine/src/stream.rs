// stream.rs - Typing / token streaming text
//
// Reveals a fixed string chunk by chunk. The engine never sleeps itself:
// every step hands the host a `Ticket` and a delay, and the host fires the
// ticket back when its timer elapses. Unmounting invalidates all tickets.

use crate::config::{ConfigError, StreamConfig};
use crate::reveal::{Intersection, Latch, Observer};
use crate::rng::{Rng, XorShift};

/// Split `text` into chunks of `size` chars (the last may be shorter)
pub fn chunks(text: &str, size: usize) -> Vec<&str> {
    chunk_ends(text, size)
        .into_iter()
        .scan(0, |start, end| {
            let chunk = &text[*start..end];
            *start = end;
            Some(chunk)
        })
        .collect()
}

/// Byte offsets where each chunk ends
fn chunk_ends(text: &str, size: usize) -> Vec<usize> {
    let size = size.max(1);
    let mut ends: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .skip(size)
        .step_by(size)
        .collect();
    if !text.is_empty() {
        ends.push(text.len());
    }
    ends
}

/// Handle for one scheduled continuation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u32);

impl Ticket {
    pub fn id(self) -> u32 { self.0 }
    pub fn from_id(id: u32) -> Self { Ticket(id) }
}

/// What the host must do next
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// Fire `ticket` after `delay_ms`
    Sleep { ticket: Ticket, delay_ms: f32 },
    /// Stream complete; nothing further to schedule
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for visibility
    Idle,
    /// Triggered, waiting out the startup delay
    Starting,
    Streaming,
    Finished,
    Unmounted,
}

pub struct TextStream<R: Rng = XorShift> {
    text: String,
    ends: Vec<usize>,
    emitted: usize,

    latch: Latch,
    observer: Observer,
    phase: Phase,

    pending: Option<u32>,
    next_seq: u32,

    config: StreamConfig,
    rng: R,
}

impl<R: Rng> TextStream<R> {
    pub fn new(text: impl Into<String>, config: StreamConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let text = text.into();
        let ends = chunk_ends(&text, config.chunk_size);
        Ok(Self {
            text,
            ends,
            emitted: 0,
            latch: Latch::Pending,
            observer: Observer::new(config.threshold, 0.0),
            phase: Phase::Idle,
            pending: None,
            next_seq: 0,
            config,
            rng,
        })
    }

    /// Feed a visibility observation; starts the stream on the first passing one
    pub fn observe(&mut self, entry: Intersection) -> Option<Step> {
        if !self.observer.passes(entry) {
            return None;
        }
        self.trigger()
    }

    /// Start the stream. Later calls are ignored.
    pub fn trigger(&mut self) -> Option<Step> {
        if self.phase != Phase::Idle || !self.latch.fire() {
            return None;
        }
        log::debug!(
            "stream: start, {} chunks of {} chars",
            self.ends.len(),
            self.config.chunk_size
        );

        self.phase = Phase::Starting;
        if self.config.delay > 0.0 {
            Some(self.sleep(self.config.delay))
        } else {
            Some(self.advance())
        }
    }

    /// Timer callback. Stale, duplicate and post-unmount tickets are no-ops.
    pub fn fire(&mut self, ticket: Ticket) -> Option<Step> {
        if self.pending != Some(ticket.0) {
            log::trace!("stream: ignoring stale ticket {}", ticket.0);
            return None;
        }
        self.pending = None;
        Some(self.advance())
    }

    /// Tear down. Outstanding tickets will never advance the stream.
    pub fn unmount(&mut self) {
        if self.pending.take().is_some() {
            log::debug!("stream: unmounted mid-stream at chunk {}", self.emitted);
        }
        self.phase = Phase::Unmounted;
    }

    fn advance(&mut self) -> Step {
        if self.emitted < self.ends.len() {
            self.emitted += 1;
            self.phase = Phase::Streaming;
            let delay = self.rng.range(self.config.speed.min, self.config.speed.max);
            self.sleep(delay)
        } else {
            self.phase = Phase::Finished;
            log::debug!("stream: finished");
            Step::Finished
        }
    }

    fn sleep(&mut self, delay_ms: f32) -> Step {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.pending = Some(seq);
        Step::Sleep { ticket: Ticket(seq), delay_ms }
    }

    /// Emitted prefix
    pub fn text(&self) -> &str {
        match self.emitted {
            0 => "",
            n => &self.text[..self.ends[n - 1]],
        }
    }

    pub fn source(&self) -> &str { &self.text }
    pub fn phase(&self) -> Phase { self.phase }
    pub fn has_started(&self) -> bool { self.latch.is_triggered() }
    pub fn chunk_count(&self) -> usize { self.ends.len() }
    pub fn emitted_chunks(&self) -> usize { self.emitted }
    pub fn config(&self) -> &StreamConfig { &self.config }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Starting | Phase::Streaming)
    }

    /// Blinking cursor: only while typing a non-empty, incomplete prefix
    pub fn show_cursor(&self) -> bool {
        self.is_active() && self.emitted > 0 && self.emitted < self.ends.len()
    }
}

// ============================================================================
// Section header
// ============================================================================

/// Terminal-style prefix plus a char-by-char typed title
pub struct TypingHeader<R: Rng = XorShift> {
    prefix: String,
    stream: TextStream<R>,
}

impl<R: Rng> TypingHeader<R> {
    pub fn new(prefix: impl Into<String>, title: &str, suffix: Option<&str>, rng: R) -> Result<Self, ConfigError> {
        Self::with_config(prefix, title, suffix, StreamConfig::header(), rng)
    }

    pub fn with_config(
        prefix: impl Into<String>,
        title: &str,
        suffix: Option<&str>,
        config: StreamConfig,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let full = match suffix {
            Some(s) if !s.is_empty() => format!("{title} {s}"),
            _ => title.to_string(),
        };
        Ok(Self { prefix: prefix.into(), stream: TextStream::new(full, config, rng)? })
    }

    pub fn prefix(&self) -> &str { &self.prefix }

    /// The prefix fades in as soon as typing is triggered
    pub fn prefix_visible(&self) -> bool { self.stream.has_started() }

    pub fn stream(&self) -> &TextStream<R> { &self.stream }
    pub fn stream_mut(&mut self) -> &mut TextStream<R> { &mut self.stream }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeedRange;
    use crate::rng::FixedRng;

    fn visible() -> Intersection { Intersection::new(true, 1.0) }

    fn sleep_ticket(step: Option<Step>) -> (Ticket, f32) {
        match step {
            Some(Step::Sleep { ticket, delay_ms }) => (ticket, delay_ms),
            other => panic!("expected sleep, got {other:?}"),
        }
    }

    #[test]
    fn chunking_reconstructs_source() {
        let samples = ["", "a", "hello world", "naïve café ✓", "abcdefghij"];
        for s in samples {
            for size in 1..=7 {
                let parts = chunks(s, size);
                assert_eq!(parts.concat(), s);
                let chars = s.chars().count();
                assert_eq!(parts.len(), chars.div_ceil(size));
                for p in &parts[..parts.len().saturating_sub(1)] {
                    assert_eq!(p.chars().count(), size);
                }
            }
        }
    }

    #[test]
    fn does_not_start_before_visible() {
        let mut s = TextStream::new("abc", StreamConfig::text(), FixedRng::constant(0.5)).unwrap();
        assert_eq!(s.observe(Intersection::new(true, 0.05)), None);
        assert_eq!(s.observe(Intersection::new(false, 0.0)), None);
        assert!(!s.has_started());
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.text(), "");
    }

    #[test]
    fn starts_at_most_once() {
        let mut s = TextStream::new("abcdef", StreamConfig::text(), FixedRng::constant(0.5)).unwrap();
        let (t, _) = sleep_ticket(s.observe(visible()));
        assert_eq!(s.text(), "abc");

        assert_eq!(s.observe(visible()), None);
        assert_eq!(s.trigger(), None);
        assert_eq!(s.text(), "abc");

        sleep_ticket(s.fire(t));
        assert_eq!(s.text(), "abcdef");
    }

    #[test]
    fn startup_delay_defers_first_chunk() {
        let cfg = StreamConfig { delay: 250.0, ..StreamConfig::text() };
        let mut s = TextStream::new("abcdef", cfg, FixedRng::constant(0.0)).unwrap();
        let (t, delay) = sleep_ticket(s.trigger());
        assert_eq!(delay, 250.0);
        assert_eq!(s.text(), "");
        assert!(s.is_active());
        assert!(!s.show_cursor());

        sleep_ticket(s.fire(t));
        assert_eq!(s.text(), "abc");
        assert!(s.show_cursor());
    }

    #[test]
    fn stale_and_duplicate_tickets_are_ignored() {
        let mut s = TextStream::new("abcdefghi", StreamConfig::text(), FixedRng::constant(0.5)).unwrap();
        let (t0, _) = sleep_ticket(s.trigger());
        let (t1, _) = sleep_ticket(s.fire(t0));
        assert_eq!(s.fire(t0), None);
        assert_eq!(s.text(), "abcdef");
        sleep_ticket(s.fire(t1));
        assert_eq!(s.fire(t1), None);
        assert_eq!(s.text(), "abcdefghi");
    }

    #[test]
    fn unmount_cancels_pending() {
        let mut s = TextStream::new("abcdefghi", StreamConfig::text(), FixedRng::constant(0.5)).unwrap();
        let (t, _) = sleep_ticket(s.trigger());
        s.unmount();
        assert_eq!(s.fire(t), None);
        assert_eq!(s.text(), "abc");
        assert_eq!(s.phase(), Phase::Unmounted);
        assert!(!s.is_active());
        assert_eq!(s.trigger(), None);
    }

    #[test]
    fn unmount_before_visible_never_starts() {
        let mut s = TextStream::new("abc", StreamConfig::text(), FixedRng::constant(0.5)).unwrap();
        s.unmount();
        assert_eq!(s.observe(visible()), None);
        assert_eq!(s.text(), "");
    }

    #[test]
    fn delays_drawn_per_chunk_within_range() {
        let cfg = StreamConfig { chunk_size: 1, speed: SpeedRange::new(30.0, 80.0), ..StreamConfig::text() };
        let mut s = TextStream::new("abcd", cfg, FixedRng::new(vec![0.0, 0.25, 0.5, 0.75])).unwrap();
        let mut delays = Vec::new();
        let mut step = s.trigger();
        while let Some(Step::Sleep { ticket, delay_ms }) = step {
            delays.push(delay_ms);
            step = s.fire(ticket);
        }
        assert_eq!(step, Some(Step::Finished));
        assert_eq!(delays, vec![30.0, 42.5, 55.0, 67.5]);
    }

    #[test]
    fn empty_text_finishes_immediately() {
        let mut s = TextStream::new("", StreamConfig::text(), FixedRng::constant(0.5)).unwrap();
        assert_eq!(s.trigger(), Some(Step::Finished));
        assert!(!s.is_active());
        assert!(!s.show_cursor());
    }

    #[test]
    fn header_joins_suffix_and_reveals_prefix() {
        let mut h = TypingHeader::new("CAREER_JOURNEY", "Skills", Some("& Stack"), FixedRng::constant(0.0)).unwrap();
        assert_eq!(h.stream().source(), "Skills & Stack");
        assert!(!h.prefix_visible());

        let (_, delay) = sleep_ticket(h.stream_mut().observe(Intersection::new(true, 0.3)));
        assert_eq!(delay, 300.0);
        assert!(h.prefix_visible());
        assert_eq!(h.stream().text(), "");
    }

    #[test]
    fn header_needs_thirty_percent() {
        let mut h = TypingHeader::new("P", "Title", None, FixedRng::constant(0.0)).unwrap();
        assert_eq!(h.stream_mut().observe(Intersection::new(true, 0.2)), None);
        assert!(!h.prefix_visible());
        assert_eq!(h.stream().source(), "Title");
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = StreamConfig { chunk_size: 0, ..StreamConfig::text() };
        assert!(TextStream::new("x", cfg, FixedRng::constant(0.0)).is_err());
    }
}
