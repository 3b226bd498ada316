//! Keystroke debouncing with stale-response detection.

use std::time::{Duration, Instant};

/// Tracks input edits and decides when an analysis request should fire.
///
/// Every edit restarts the delay and bumps a generation counter. A request is
/// tagged with the generation it was fired for, and its response is only applied
/// while that generation is still the latest one.
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    /// When the input was last changed
    changed_at: Option<Instant>,
    /// Whether an edit is waiting to be sent
    pending: bool,
    /// Sequence number of the latest edit
    generation: u64,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an edit and returns its generation.
    pub fn mark_changed(&mut self) -> u64 {
        self.mark_changed_at(Instant::now())
    }

    /// Records an edit made at `now`.
    pub fn mark_changed_at(&mut self, now: Instant) -> u64 {
        self.changed_at = Some(now);
        self.pending = true;
        self.generation += 1;
        self.generation
    }

    /// Returns whether an edit is pending and `delay` has passed since it.
    pub fn is_ready(&self, delay: Duration) -> bool {
        self.is_ready_at(Instant::now(), delay)
    }

    pub fn is_ready_at(&self, now: Instant, delay: Duration) -> bool {
        if !self.pending {
            return false;
        }
        match self.changed_at {
            Some(changed_at) => now.saturating_duration_since(changed_at) >= delay,
            None => false,
        }
    }

    /// Consumes the pending edit if it is ready, returning the generation to send.
    pub fn take_ready(&mut self, delay: Duration) -> Option<u64> {
        self.take_ready_at(Instant::now(), delay)
    }

    pub fn take_ready_at(&mut self, now: Instant, delay: Duration) -> Option<u64> {
        if self.is_ready_at(now, delay) {
            self.pending = false;
            Some(self.generation)
        } else {
            None
        }
    }

    /// Drops the pending edit without firing. In-flight responses become stale.
    pub fn cancel(&mut self) {
        self.pending = false;
        self.generation += 1;
    }

    /// Returns whether a response for `generation` is still wanted.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// True while the user is still typing, i.e. pending but not yet ready.
    pub fn is_typing(&self, delay: Duration) -> bool {
        self.pending && !self.is_ready(delay)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[test]
    fn nothing_is_ready_before_any_edit() {
        let debouncer = Debouncer::new();
        assert!(!debouncer.is_ready(Duration::ZERO));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.generation(), 0);
    }

    #[test]
    fn edit_becomes_ready_after_delay() {
        let mut debouncer = Debouncer::new();
        let start = Instant::now();
        debouncer.mark_changed_at(start);

        assert!(!debouncer.is_ready_at(start + Duration::from_millis(499), DELAY));
        assert!(debouncer.is_ready_at(start + DELAY, DELAY));
    }

    #[test]
    fn each_edit_restarts_the_delay() {
        let mut debouncer = Debouncer::new();
        let start = Instant::now();
        debouncer.mark_changed_at(start);
        debouncer.mark_changed_at(start + Duration::from_millis(400));

        assert!(!debouncer.is_ready_at(start + Duration::from_millis(600), DELAY));
        assert!(debouncer.is_ready_at(start + Duration::from_millis(900), DELAY));
    }

    #[test]
    fn take_ready_fires_once_with_latest_generation() {
        let mut debouncer = Debouncer::new();
        let start = Instant::now();
        debouncer.mark_changed_at(start);
        let latest = debouncer.mark_changed_at(start);

        let later = start + DELAY;
        assert_eq!(debouncer.take_ready_at(later, DELAY), Some(latest));
        assert_eq!(debouncer.take_ready_at(later, DELAY), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn take_ready_waits_for_delay() {
        let mut debouncer = Debouncer::new();
        let start = Instant::now();
        debouncer.mark_changed_at(start);

        assert_eq!(debouncer.take_ready_at(start, DELAY), None);
        assert!(debouncer.is_pending());
    }

    #[test]
    fn responses_for_older_generations_are_stale() {
        let mut debouncer = Debouncer::new();
        let first = debouncer.mark_changed();
        let second = debouncer.mark_changed();

        assert!(!debouncer.is_current(first));
        assert!(debouncer.is_current(second));
    }

    #[test]
    fn cancel_clears_pending_and_invalidates_in_flight() {
        let mut debouncer = Debouncer::new();
        let generation = debouncer.mark_changed();
        debouncer.cancel();

        assert!(!debouncer.is_pending());
        assert!(!debouncer.is_ready(Duration::ZERO));
        assert!(!debouncer.is_current(generation));
    }

    #[test]
    fn typing_flag_tracks_pending_delay() {
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.is_typing(DELAY));

        debouncer.mark_changed();
        assert!(debouncer.is_typing(Duration::from_secs(60)));
        assert!(!debouncer.is_typing(Duration::ZERO));
    }
}
