//! Labeling treadmill: piecework annotation against a fixed earnings goal.
//!
//! Models the crowd-work loop of tagging tasks for pennies. Earnings are
//! integer pence so the books always balance. Submitting with too few labels
//! is the one user-visible validation in the whole system: the action is
//! blocked and an inline message persists until the selection is fixed.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::runner::SimPhase;
use crate::timer::PeriodicTimer;

/// Payment per accepted submission, in pence.
pub const PENCE_PER_TASK: u32 = 2;
/// Session goal, in pence.
pub const GOAL_PENCE: u32 = 100;
/// Minimum labels per submission.
pub const MIN_LABELS_REQUIRED: usize = 2;
const CLOCK_INTERVAL: Duration = Duration::from_secs(1);
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Task descriptions cycled through during a session.
pub const TASKS: &[&str] = &[
    "A person walking their dog in the park",
    "A coffee cup on a wooden table",
    "A red car parked on the street",
    "A cat sleeping on a windowsill",
    "A laptop computer on a desk",
];

/// Labels that can be applied to a task.
pub const LABELS: &[&str] = &[
    "Person",
    "Animal",
    "Object",
    "Vehicle",
    "Indoor",
    "Outdoor",
    "Food/Drink",
];

/// Errors blocking a submission.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please select at least {required} labels")]
    TooFewLabels { required: usize },
    #[error("no labeling session is active")]
    NotActive,
}

/// Result of an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub earnings_pence: u32,
    pub goal_reached: bool,
}

/// Read-only session view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelingSnapshot {
    pub earnings_pence: u32,
    pub labeled: u32,
    pub elapsed_secs: u64,
    pub tasks_needed: u32,
    pub hourly_rate_pence: f64,
    pub phase: SimPhase,
}

/// The labeling state machine.
#[derive(Debug, Clone)]
pub struct LabelingSim {
    earnings_pence: u32,
    labeled: u32,
    elapsed_secs: u64,
    task_index: usize,
    selected: Vec<String>,
    validation: Option<SubmitError>,
    phase: SimPhase,
    clock: PeriodicTimer,
}

impl Default for LabelingSim {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelingSim {
    /// Create an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            earnings_pence: 0,
            labeled: 0,
            elapsed_secs: 0,
            task_index: 0,
            selected: Vec::new(),
            validation: None,
            phase: SimPhase::Idle,
            clock: PeriodicTimer::new(CLOCK_INTERVAL),
        }
    }

    /// Begin (or restart) a session, zeroing all counters.
    pub fn start(&mut self) {
        self.earnings_pence = 0;
        self.labeled = 0;
        self.elapsed_secs = 0;
        self.task_index = 0;
        self.selected.clear();
        self.validation = None;
        self.phase = SimPhase::Running;
        self.clock.start();
    }

    /// Stop the clock without clearing session statistics. Idempotent.
    pub fn stop(&mut self) {
        self.clock.cancel();
        if self.phase == SimPhase::Running {
            self.phase = SimPhase::Idle;
        }
    }

    /// Advance the session clock.
    pub fn advance(&mut self, elapsed: Duration) {
        let ticks = self.clock.advance(elapsed);
        if self.phase == SimPhase::Running {
            self.elapsed_secs += u64::from(ticks);
        }
    }

    /// Toggle a label in the current selection; unknown labels are ignored.
    ///
    /// Returns whether the label is selected afterwards. Any pending
    /// validation message is cleared.
    pub fn toggle_label(&mut self, label: &str) -> bool {
        if !LABELS.contains(&label) {
            return false;
        }
        self.validation = None;
        if let Some(position) = self.selected.iter().position(|selected| selected == label) {
            self.selected.remove(position);
            false
        } else {
            self.selected.push(label.to_string());
            true
        }
    }

    /// Submit the current selection.
    ///
    /// # Errors
    ///
    /// Rejects when no session is active or fewer than
    /// [`MIN_LABELS_REQUIRED`] labels are selected; the selection and all
    /// counters are left untouched and the message is retained for display.
    pub fn submit(&mut self) -> Result<SubmitOutcome, SubmitError> {
        if self.phase != SimPhase::Running {
            return Err(SubmitError::NotActive);
        }
        if self.selected.len() < MIN_LABELS_REQUIRED {
            let error = SubmitError::TooFewLabels {
                required: MIN_LABELS_REQUIRED,
            };
            self.validation = Some(error.clone());
            return Err(error);
        }

        self.validation = None;
        self.earnings_pence += PENCE_PER_TASK;
        self.labeled += 1;
        self.task_index = (self.task_index + 1) % TASKS.len();
        self.selected.clear();

        let goal_reached = self.earnings_pence >= GOAL_PENCE;
        if goal_reached {
            self.phase = SimPhase::Ended;
            self.clock.cancel();
        }
        Ok(SubmitOutcome {
            earnings_pence: self.earnings_pence,
            goal_reached,
        })
    }

    /// Description of the task currently on display.
    #[must_use]
    pub fn current_task(&self) -> &'static str {
        TASKS[self.task_index % TASKS.len()]
    }

    /// Labels currently selected, in selection order.
    #[must_use]
    pub fn selected_labels(&self) -> &[String] {
        &self.selected
    }

    /// Pending validation message, if the last submit was blocked.
    #[must_use]
    pub const fn validation(&self) -> Option<&SubmitError> {
        self.validation.as_ref()
    }

    /// Earnings per hour at the current pace, in pence.
    #[must_use]
    pub fn hourly_rate_pence(&self) -> f64 {
        if self.elapsed_secs == 0 {
            return 0.0;
        }
        let hours = self.elapsed_secs as f64 / SECONDS_PER_HOUR;
        f64::from(self.earnings_pence) / hours
    }

    /// Snapshot session state plus derived statistics.
    #[must_use]
    pub fn snapshot(&self) -> LabelingSnapshot {
        LabelingSnapshot {
            earnings_pence: self.earnings_pence,
            labeled: self.labeled,
            elapsed_secs: self.elapsed_secs,
            tasks_needed: GOAL_PENCE.div_ceil(PENCE_PER_TASK),
            hourly_rate_pence: self.hourly_rate_pence(),
            phase: self.phase,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> SimPhase {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select_two(sim: &mut LabelingSim) {
        sim.toggle_label("Person");
        sim.toggle_label("Outdoor");
    }

    #[test]
    fn submit_requires_minimum_labels() {
        let mut sim = LabelingSim::new();
        sim.start();
        sim.toggle_label("Person");
        let rejected = sim.submit();
        assert_eq!(
            rejected,
            Err(SubmitError::TooFewLabels {
                required: MIN_LABELS_REQUIRED
            })
        );
        // Counters untouched, message retained for display
        assert_eq!(sim.snapshot().earnings_pence, 0);
        assert_eq!(sim.snapshot().labeled, 0);
        assert!(sim.validation().is_some());

        sim.toggle_label("Outdoor");
        assert!(sim.validation().is_none());
        assert!(sim.submit().is_ok());
    }

    #[test]
    fn accepted_submission_pays_and_cycles_tasks() {
        let mut sim = LabelingSim::new();
        sim.start();
        let first_task = sim.current_task();
        select_two(&mut sim);
        let outcome = sim.submit().unwrap();
        assert_eq!(outcome.earnings_pence, PENCE_PER_TASK);
        assert!(!outcome.goal_reached);
        assert_ne!(sim.current_task(), first_task);
        assert!(sim.selected_labels().is_empty());
    }

    #[test]
    fn fifty_submissions_reach_the_goal() {
        let mut sim = LabelingSim::new();
        sim.start();
        for n in 1..=50 {
            select_two(&mut sim);
            let outcome = sim.submit().unwrap();
            assert_eq!(outcome.goal_reached, n == 50);
        }
        assert_eq!(sim.phase(), SimPhase::Ended);
        assert_eq!(sim.snapshot().earnings_pence, GOAL_PENCE);
        // The session is over: no further paid work
        select_two(&mut sim);
        assert_eq!(sim.submit(), Err(SubmitError::NotActive));
    }

    #[test]
    fn clock_only_runs_while_active() {
        let mut sim = LabelingSim::new();
        sim.advance(Duration::from_secs(5));
        assert_eq!(sim.snapshot().elapsed_secs, 0);
        sim.start();
        sim.advance(Duration::from_secs(5));
        assert_eq!(sim.snapshot().elapsed_secs, 5);
        sim.stop();
        sim.advance(Duration::from_secs(5));
        assert_eq!(sim.snapshot().elapsed_secs, 5);
    }

    #[test]
    fn hourly_rate_projects_from_elapsed_time() {
        let mut sim = LabelingSim::new();
        sim.start();
        assert!((sim.hourly_rate_pence() - 0.0).abs() < f64::EPSILON);
        select_two(&mut sim);
        sim.submit().unwrap();
        sim.advance(Duration::from_secs(60));
        // 2 pence per minute projects to 120 pence per hour
        assert!((sim.hourly_rate_pence() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_labels_are_ignored() {
        let mut sim = LabelingSim::new();
        sim.start();
        assert!(!sim.toggle_label("Blimp"));
        assert!(sim.selected_labels().is_empty());
    }
}
