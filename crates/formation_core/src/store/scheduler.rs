use std::time::{Duration, Instant};

/// Trailing-edge debounce for formation writes.
///
/// Each change pushes the deadline out by the debounce window, so a burst of
/// moves produces one save once the user pauses.
#[derive(Debug, Clone)]
pub struct SaveScheduler {
    debounce: Duration,
    deadline: Option<Instant>,
}

impl SaveScheduler {
    pub fn new(debounce: Duration) -> Self {
        Self { debounce, deadline: None }
    }

    pub fn note_change(&mut self, now: Instant) {
        self.deadline = Some(now + self.debounce);
    }

    /// Make the next `take_due` fire regardless of the window
    pub fn force(&mut self, now: Instant) {
        self.deadline = Some(now);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True once per elapsed deadline
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
