//! Monotonic wait deadlines.
//!
//! Remaining time is computed as signed 64-bit milliseconds so an overrun
//! shows up as a non-positive budget rather than wrapping.

use std::time::{Duration, Instant};

/// What is left of a wait budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// No timeout was requested.
    Infinite,
    /// The timeout has elapsed; the caller must not block.
    Elapsed,
    /// Time left before the deadline.
    Remaining(Duration),
}

/// Deadline for a single `get_key` call.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    timeout_ms: Option<i64>,
}

impl Deadline {
    /// Start a deadline now. `None` waits forever.
    #[must_use]
    pub fn new(timeout: Option<Duration>) -> Self {
        Self::starting_at(Instant::now(), timeout)
    }

    /// Start a deadline at a given instant.
    #[must_use]
    pub fn starting_at(start: Instant, timeout: Option<Duration>) -> Self {
        Self {
            start,
            timeout_ms: timeout.map(|t| i64::try_from(t.as_millis()).unwrap_or(i64::MAX)),
        }
    }

    /// Signed milliseconds left at `now`, `None` when waiting forever.
    #[must_use]
    pub fn remaining_ms_at(&self, now: Instant) -> Option<i64> {
        let timeout = self.timeout_ms?;
        let elapsed = i64::try_from(now.saturating_duration_since(self.start).as_millis())
            .unwrap_or(i64::MAX);
        Some(timeout.saturating_sub(elapsed))
    }

    /// Budget left at `now`.
    #[must_use]
    pub fn budget_at(&self, now: Instant) -> Budget {
        match self.remaining_ms_at(now) {
            None => Budget::Infinite,
            Some(ms) if ms <= 0 => Budget::Elapsed,
            Some(ms) => Budget::Remaining(Duration::from_millis(ms as u64)),
        }
    }

    /// Budget left right now.
    #[must_use]
    pub fn budget(&self) -> Budget {
        self.budget_at(Instant::now())
    }
}
