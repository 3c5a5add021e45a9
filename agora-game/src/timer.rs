//! Cooperative fixed-interval tick sources.
//!
//! There is no background execution anywhere in this crate: the host advances
//! a logical clock and each timer reports how many whole intervals elapsed.
//! A cancelled timer never fires, so a late `advance` cannot mutate state
//! after its owning simulation has logically ended.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed-interval timer driven by explicit [`PeriodicTimer::advance`] calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicTimer {
    interval: Duration,
    carry: Duration,
    running: bool,
}

impl PeriodicTimer {
    /// Create a disarmed timer with the given interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            carry: Duration::ZERO,
            running: false,
        }
    }

    /// Interval between ticks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the timer is currently armed.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Arm the timer, dropping any partial interval from a previous run.
    pub fn start(&mut self) {
        self.running = true;
        self.carry = Duration::ZERO;
    }

    /// Disarm the timer. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        self.running = false;
        self.carry = Duration::ZERO;
    }

    /// Advance the timer's clock, returning the number of whole ticks fired.
    ///
    /// Fractional intervals accumulate across calls; a disarmed timer always
    /// returns zero and accumulates nothing.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running || self.interval.is_zero() {
            return 0;
        }
        self.carry += elapsed;
        let interval = self.interval.as_nanos();
        let total = self.carry.as_nanos();
        let fired = total / interval;
        let remainder = total % interval;
        self.carry = Duration::from_nanos(u64::try_from(remainder).unwrap_or(0));
        u32::try_from(fired).unwrap_or(u32::MAX)
    }
}
