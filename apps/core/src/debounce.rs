use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingRun {
    value: String,
    due_at: Instant,
}

/// Trailing-edge debounce with a single slot: scheduling always replaces the
/// pending run, so at most one is outstanding.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<PendingRun>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, value: String, now: Instant) {
        self.pending = Some(PendingRun {
            value,
            due_at: now + self.delay,
        });
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due_at)
    }

    /// Hands out the pending value once its quiet period has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| now >= pending.due_at);
        if !due {
            return None;
        }
        self.pending.take().map(|pending| pending.value)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
