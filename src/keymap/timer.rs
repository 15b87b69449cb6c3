//! Deadlines that reset sequence progress
//!
//! Nothing runs in the background: the host event loop asks for
//! [`SequenceTimers::next_deadline`], sleeps until then, and calls
//! [`SequenceTimers::take_due`].

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// The sequence reset timer plus pending post-completion resets
#[derive(Debug)]
pub struct SequenceTimers {
    timeout: Duration,
    settle: Duration,
    /// Single abandon-sequence deadline; rearming replaces it
    reset_at: Option<Instant>,
    /// Short follow-ups scheduled when a sequence completes
    settle_at: VecDeque<Instant>,
}

impl SequenceTimers {
    pub fn new(timeout: Duration, settle: Duration) -> Self {
        Self {
            timeout,
            settle,
            reset_at: None,
            settle_at: VecDeque::new(),
        }
    }

    /// (Re)start the reset countdown, cancelling the previous one
    pub fn arm(&mut self, now: Instant) {
        self.reset_at = Some(now + self.timeout);
    }

    /// Schedule the follow-up reset after a completed sequence
    pub fn schedule_settle(&mut self, now: Instant) {
        self.settle_at.push_back(now + self.settle);
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        let settle = self.settle_at.iter().min().copied();
        match (self.reset_at, settle) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Consume every deadline that has passed, returning how many fired
    pub fn take_due(&mut self, now: Instant) -> usize {
        let mut fired = 0;

        if self.reset_at.is_some_and(|at| at <= now) {
            self.reset_at = None;
            fired += 1;
        }

        let before = self.settle_at.len();
        self.settle_at.retain(|&at| at > now);
        fired + (before - self.settle_at.len())
    }
}
