//! Periodic refresh — the 10-second cadence of the original dashboard.
//!
//! The scheduler is a deadline poller: the run loop asks `fire_due` on each
//! pass and calls `ChartEngine::refresh` when it answers true. Mutations
//! trigger their own immediate refresh and do NOT reset the deadline, so the
//! tick keeps firing for whichever session is active when it lands.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct RefreshScheduler {
    interval: Duration,
    next_fire: Instant,
}

impl RefreshScheduler {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_fire: now + interval,
        }
    }

    /// True when the deadline has passed; arms the next one.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        if now >= self.next_fire {
            self.next_fire = now + self.interval;
            true
        } else {
            false
        }
    }

    /// How long the run loop may sleep before the next deadline.
    pub fn time_until_fire(&self, now: Instant) -> Duration {
        self.next_fire.saturating_duration_since(now)
    }
}
