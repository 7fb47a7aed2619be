//! Debounce as an explicit stream transform.
//!
//! [`Debouncer`] turns a stream of timestamped input events into a stream of
//! settled values: a value is released only after `delay_ms` have passed
//! without another event. It owns no timer; the caller feeds it events and
//! polls it when a timer fires, which keeps it independent of the rendering
//! layer and deterministic under test.

/// Coalesces rapid updates into one value after a quiet period.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<(T, u64)>,
    last_emitted: Option<T>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
            last_emitted: None,
        }
    }

    /// Start from an already-applied value so re-entering it emits nothing.
    pub fn with_initial(delay_ms: u64, initial: T) -> Self {
        Self {
            last_emitted: Some(initial),
            ..Self::new(delay_ms)
        }
    }

    /// Record an input event at `now_ms`, restarting the quiet period.
    ///
    /// Returns the deadline at which [`poll`](Self::poll) may release it.
    pub fn push(&mut self, value: T, now_ms: u64) -> u64 {
        let deadline = now_ms.saturating_add(self.delay_ms);
        self.pending = Some((value, deadline));
        deadline
    }

    /// Release the pending value if its quiet period has elapsed.
    ///
    /// A settled value equal to the last released one is swallowed, so typing
    /// and then deleting a character issues nothing.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now_ms >= *deadline => {}
            _ => return None,
        }
        let (value, _) = self.pending.take()?;
        if self.last_emitted.as_ref() == Some(&value) {
            return None;
        }
        self.last_emitted = Some(value.clone());
        Some(value)
    }

    /// Release the pending value immediately (e.g. on Enter).
    pub fn flush(&mut self) -> Option<T> {
        let (value, _) = self.pending.take()?;
        if self.last_emitted.as_ref() == Some(&value) {
            return None;
        }
        self.last_emitted = Some(value.clone());
        Some(value)
    }

    /// Drop any pending value and forget the last release.
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_emitted = None;
    }

    pub fn deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
