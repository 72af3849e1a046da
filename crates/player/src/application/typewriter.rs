//! Typewriter text reveal
//!
//! Reveals a line one character per tick. The engine is a plain state value
//! driven by explicit timestamps: it records when its next tick is due and the
//! owner calls [`Typewriter::tick`] once that time has come. Dropping the value
//! cancels the reveal.

/// Retunes closer than this to the running interval are ignored to avoid
/// visible jitter.
pub const RETUNE_HYSTERESIS_MS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterStep {
    /// Nothing was due.
    Idle,
    /// One more character is visible; carries the revealed length.
    Revealed(usize),
    /// The full text is visible and the schedule stopped.
    Completed,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    char_count: usize,
    revealed: usize,
    interval_ms: u64,
    next_tick_at: Option<u64>,
    complete: bool,
    retuned: bool,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, interval_ms: u64) -> Self {
        let text = text.into();
        let char_count = text.chars().count();
        Self {
            text,
            char_count,
            revealed: 0,
            interval_ms: interval_ms.max(1),
            next_tick_at: None,
            complete: false,
            retuned: false,
        }
    }

    /// Reset to an empty reveal and schedule the first tick.
    ///
    /// Empty text completes immediately without scheduling anything.
    pub fn start(&mut self, now_ms: u64) -> TypewriterStep {
        self.revealed = 0;
        self.retuned = false;
        if self.char_count == 0 {
            self.complete = true;
            self.next_tick_at = None;
            return TypewriterStep::Completed;
        }
        self.complete = false;
        self.next_tick_at = Some(now_ms + self.interval_ms);
        TypewriterStep::Idle
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.next_tick_at
    }

    /// Run the tick due at or before `at_ms`.
    ///
    /// Ticks stay on their original grid (`due + interval`) so a late caller
    /// catches up by calling again rather than drifting.
    pub fn tick(&mut self, at_ms: u64) -> TypewriterStep {
        let due = match self.next_tick_at {
            Some(due) if due <= at_ms => due,
            _ => return TypewriterStep::Idle,
        };

        if self.revealed < self.char_count {
            self.revealed += 1;
            self.next_tick_at = Some(due + self.interval_ms);
            return TypewriterStep::Revealed(self.revealed);
        }

        self.next_tick_at = None;
        self.complete = true;
        TypewriterStep::Completed
    }

    /// Cancel the schedule and show the whole text.
    ///
    /// Returns `false` when the line was already complete.
    pub fn force_complete(&mut self) -> bool {
        if self.complete {
            return false;
        }
        self.revealed = self.char_count;
        self.next_tick_at = None;
        self.complete = true;
        true
    }

    /// Continue the remaining reveal at `new_interval_ms`.
    ///
    /// Applies at most once per run, only while ticking, and only when the new
    /// interval differs from the running one by more than
    /// [`RETUNE_HYSTERESIS_MS`].
    pub fn retune(&mut self, new_interval_ms: u64, now_ms: u64) -> bool {
        if self.complete || self.retuned || self.next_tick_at.is_none() {
            return false;
        }
        let new_interval_ms = new_interval_ms.max(1);
        if self.interval_ms.abs_diff(new_interval_ms) <= RETUNE_HYSTERESIS_MS {
            return false;
        }
        self.interval_ms = new_interval_ms;
        self.retuned = true;
        self.next_tick_at = Some(now_ms + new_interval_ms);
        true
    }

    /// Currently visible prefix, always on a char boundary.
    pub fn visible_text(&self) -> &str {
        self.text
            .char_indices()
            .nth(self.revealed)
            .map(|(i, _)| &self.text[..i])
            .unwrap_or(&self.text)
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn remaining_chars(&self) -> usize {
        self.char_count - self.revealed
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}
