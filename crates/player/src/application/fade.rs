//! Fade-out before navigation
//!
//! A fade shows the transition overlay and holds an action that runs once the
//! overlay is opaque. Cancelling hides the overlay and drops the action, so an
//! error raised mid-fade stays on screen instead of being navigated away.

#[derive(Debug)]
pub struct FadeController<A> {
    delay_ms: u64,
    pending: Option<(u64, A)>,
}

impl<A> FadeController<A> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Start fading; a fade already in progress is replaced.
    pub fn begin(&mut self, action: A, now_ms: u64) {
        self.pending = Some((now_ms + self.delay_ms, action));
    }

    /// Abort the fade. Returns the action that will no longer run.
    pub fn cancel(&mut self) -> Option<A> {
        self.pending.take().map(|(_, action)| action)
    }

    pub fn is_fading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Hand out the action once its deadline has passed.
    pub fn fire(&mut self, at_ms: u64) -> Option<A> {
        match self.pending {
            Some((due, _)) if due <= at_ms => self.pending.take().map(|(_, action)| action),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_runs_after_the_delay() {
        let mut fade = FadeController::new(2000);
        fade.begin("navigate", 100);

        assert!(fade.is_fading());
        assert_eq!(fade.next_deadline(), Some(2100));
        assert_eq!(fade.fire(2099), None);
        assert_eq!(fade.fire(2100), Some("navigate"));
        assert!(!fade.is_fading());
        assert_eq!(fade.fire(5000), None);
    }

    #[test]
    fn cancelled_fade_never_fires() {
        let mut fade = FadeController::new(2000);
        fade.begin("navigate", 0);

        assert_eq!(fade.cancel(), Some("navigate"));
        assert!(!fade.is_fading());
        assert_eq!(fade.next_deadline(), None);
        assert_eq!(fade.fire(10_000), None);
    }

    #[test]
    fn cancel_without_fade_is_a_no_op() {
        let mut fade: FadeController<()> = FadeController::new(2000);
        assert_eq!(fade.cancel(), None);
    }
}
