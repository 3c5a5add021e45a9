//! Rotating reflection prompts.
//!
//! Several simulations surface a slowly cycling strip of reflection
//! questions. The cadence and wrap-around behavior are identical everywhere,
//! so one utility carries them all, parameterized by prompt list.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::timer::PeriodicTimer;

/// Cadence shared by every prompt strip.
pub const ROTATION_INTERVAL: Duration = Duration::from_secs(5);

/// Cyclic rotation over a fixed list of prompt strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRotation {
    prompts: Vec<String>,
    index: usize,
    timer: PeriodicTimer,
}

impl PromptRotation {
    /// Build a rotation over the given prompts, already armed.
    #[must_use]
    pub fn new(prompts: &[&str], interval: Duration) -> Self {
        let mut timer = PeriodicTimer::new(interval);
        timer.start();
        Self {
            prompts: prompts.iter().map(ToString::to_string).collect(),
            index: 0,
            timer,
        }
    }

    /// Build a rotation with the shared default cadence.
    #[must_use]
    pub fn with_default_interval(prompts: &[&str]) -> Self {
        Self::new(prompts, ROTATION_INTERVAL)
    }

    /// The prompt currently on display, if any prompts exist.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.prompts.get(self.index).map(String::as_str)
    }

    /// Number of prompts in the rotation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Whether the rotation has no prompts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Advance the rotation clock, wrapping past the last prompt.
    pub fn advance(&mut self, elapsed: Duration) {
        let fired = self.timer.advance(elapsed) as usize;
        if fired > 0 && !self.prompts.is_empty() {
            self.index = (self.index + fired) % self.prompts.len();
        }
    }

    /// Stop rotating. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.timer.cancel();
    }

    /// Resume rotating from the current prompt.
    pub fn resume(&mut self) {
        self.timer.start();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROMPTS: &[&str] = &["first", "second", "third"];

    #[test]
    fn rotates_and_wraps() {
        let mut rotation = PromptRotation::new(PROMPTS, Duration::from_secs(5));
        assert_eq!(rotation.current(), Some("first"));
        rotation.advance(Duration::from_secs(5));
        assert_eq!(rotation.current(), Some("second"));
        rotation.advance(Duration::from_secs(10));
        assert_eq!(rotation.current(), Some("first"));
    }

    #[test]
    fn stopped_rotation_holds_position() {
        let mut rotation = PromptRotation::new(PROMPTS, Duration::from_secs(5));
        rotation.stop();
        rotation.advance(Duration::from_secs(60));
        assert_eq!(rotation.current(), Some("first"));
    }

    #[test]
    fn empty_rotation_has_no_current() {
        let mut rotation = PromptRotation::new(&[], Duration::from_secs(5));
        rotation.advance(Duration::from_secs(5));
        assert_eq!(rotation.current(), None);
    }
}
