//! Commons extraction simulation: a depletion race over a shared data pool.
//!
//! The player and an ever-more-efficient automated extractor draw from the
//! same public pool. Passive regeneration trickles value back each cycle;
//! protective measures slow the trickle but keep it sustainable. The run
//! ends when the pool falls to its depletion floor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::journal::ActionLog;
use crate::numbers::{floor_f64_to_i64, i64_to_f64, percentage};
use crate::rotation::PromptRotation;
use crate::runner::SimPhase;
use crate::timer::PeriodicTimer;

const POOL_START: i64 = 1000;
const DEPLETION_FLOOR: i64 = 200;
const EXTRACTION_MIN: i64 = 50;
const EXTRACTION_MAX: i64 = 200;
const USER_YIELD_FACTOR: f64 = 1.2;
const AI_ADVANTAGE_SCALE: f64 = 1000.0;
const AI_YIELD_BASE: f64 = 1.5;
const AI_YIELD_SCALE: f64 = 2000.0;
const REGEN_INTERVAL: Duration = Duration::from_secs(2);
const REGEN_PROTECTED: i64 = 20;
const REGEN_OPEN: i64 = 50;

const LOG_PROTECTION_ON: &str = "Protective measures enabled: slower but sustainable growth";
const LOG_PROTECTION_OFF: &str = "Protective measures disabled: rapid extraction resumed";
const LOG_DEPLETED: &str = "Commons depleted - economic concentration complete";

const PROMPTS: &[&str] = &[
    "How does the extractor's behavior affect society?",
    "What are the risks of rapid data extraction?",
    "When should protective measures be enabled?",
    "How does economic concentration impact innovation?",
    "What makes a digital commons sustainable?",
    "How do you balance growth vs protection?",
    "What patterns do you notice in the extractor's behavior?",
    "How does your strategy affect long-term outcomes?",
];

/// How concentrated accumulated value has become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcentrationLevel {
    /// Nothing has been extracted yet.
    None,
    /// Automated share below 40%.
    Low,
    /// Automated share between 40% and 60%.
    Moderate,
    /// Automated share between 60% and 80%.
    High,
    /// Automated share above 80%.
    Extreme,
}

impl ConcentrationLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Extreme => "extreme",
        }
    }
}

impl fmt::Display for ConcentrationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single successful extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub user_taken: i64,
    pub user_gained: i64,
    pub ai_advantage: i64,
    pub ai_taken: i64,
    pub ai_gained: i64,
    pub pool_after: i64,
    pub depleted: bool,
}

/// Read-only view of the commons state plus derived statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonsSnapshot {
    pub pool: i64,
    pub ai_value: i64,
    pub user_value: i64,
    pub round: u32,
    pub protection: bool,
    pub extraction_amount: i64,
    pub last_ai_gain: i64,
    pub phase: SimPhase,
    pub concentration: ConcentrationLevel,
    pub concentration_pct: f64,
}

/// The commons extraction state machine.
#[derive(Debug, Clone)]
pub struct CommonsSim {
    pool: i64,
    ai_value: i64,
    user_value: i64,
    round: u32,
    protection: bool,
    extraction_amount: i64,
    last_ai_gain: i64,
    phase: SimPhase,
    regen: PeriodicTimer,
    prompts: PromptRotation,
    log: ActionLog,
}

impl Default for CommonsSim {
    fn default() -> Self {
        Self::new()
    }
}

impl CommonsSim {
    /// Create an idle simulation with the standard starting pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pool: POOL_START,
            ai_value: 0,
            user_value: 0,
            round: 1,
            protection: false,
            extraction_amount: EXTRACTION_MIN,
            last_ai_gain: 0,
            phase: SimPhase::Idle,
            regen: PeriodicTimer::new(REGEN_INTERVAL),
            prompts: PromptRotation::with_default_interval(PROMPTS),
            log: ActionLog::default(),
        }
    }

    /// Begin the run, arming the regeneration timer.
    pub fn start(&mut self) {
        if self.phase == SimPhase::Idle {
            self.phase = SimPhase::Running;
            self.regen.start();
        }
    }

    /// Pause the run, disarming the regeneration timer. Idempotent.
    pub fn stop(&mut self) {
        self.regen.cancel();
        if self.phase == SimPhase::Running {
            self.phase = SimPhase::Idle;
        }
    }

    /// Extract value for both sides, or `None` when the action is a no-op.
    ///
    /// The automated side draws after the player, with an advantage that
    /// compounds on everything it has accumulated so far. A resulting pool at
    /// or below the depletion floor ends the run permanently.
    pub fn extract(&mut self) -> Option<ExtractionOutcome> {
        if self.phase != SimPhase::Running || self.pool <= 0 {
            return None;
        }

        let user_taken = self.pool.min(self.extraction_amount);
        let user_gained = floor_f64_to_i64(i64_to_f64(user_taken) * USER_YIELD_FACTOR);
        let ai_advantage = self.ai_advantage();
        let ai_taken = (self.pool - user_taken).min(ai_advantage);
        let ai_yield = AI_YIELD_BASE + i64_to_f64(self.ai_value) / AI_YIELD_SCALE;
        let ai_gained = floor_f64_to_i64(i64_to_f64(ai_taken) * ai_yield);

        self.pool -= user_taken + ai_taken;
        self.user_value += user_gained;
        self.ai_value += ai_gained;
        self.last_ai_gain = ai_gained;
        self.log
            .push(format!("You: {user_taken} -> {user_gained} | AI: {ai_taken} -> {ai_gained}"));

        let depleted = self.pool <= DEPLETION_FLOOR;
        if depleted {
            self.phase = SimPhase::Ended;
            self.regen.cancel();
            self.log.push(LOG_DEPLETED);
        }

        Some(ExtractionOutcome {
            user_taken,
            user_gained,
            ai_advantage,
            ai_taken,
            ai_gained,
            pool_after: self.pool,
            depleted,
        })
    }

    /// Flip protective measures; a no-op once the run has ended.
    pub fn toggle_protection(&mut self) {
        if self.phase == SimPhase::Ended {
            return;
        }
        self.protection = !self.protection;
        self.log.push(if self.protection {
            LOG_PROTECTION_ON
        } else {
            LOG_PROTECTION_OFF
        });
    }

    /// Set the per-extraction draw, clamped to the legal range.
    pub fn set_extraction_amount(&mut self, amount: i64) {
        self.extraction_amount = amount.clamp(EXTRACTION_MIN, EXTRACTION_MAX);
    }

    /// Advance the logical clock: regeneration ticks and prompt rotation.
    pub fn advance(&mut self, elapsed: Duration) {
        self.prompts.advance(elapsed);
        let ticks = self.regen.advance(elapsed);
        if self.phase != SimPhase::Running {
            return;
        }
        let regen = if self.protection {
            REGEN_PROTECTED
        } else {
            REGEN_OPEN
        };
        for _ in 0..ticks {
            self.pool += regen;
            self.round += 1;
        }
    }

    /// Expected automated draw for the current accumulation.
    #[must_use]
    pub fn ai_advantage(&self) -> i64 {
        let factor = 1.0 + i64_to_f64(self.ai_value) / AI_ADVANTAGE_SCALE;
        floor_f64_to_i64(i64_to_f64(self.extraction_amount) * factor)
    }

    /// Bucket the automated share of accumulated value.
    #[must_use]
    pub fn concentration(&self) -> ConcentrationLevel {
        let total = self.ai_value + self.user_value;
        if total == 0 {
            return ConcentrationLevel::None;
        }
        let pct = percentage(self.ai_value, total);
        if pct > 80.0 {
            ConcentrationLevel::Extreme
        } else if pct > 60.0 {
            ConcentrationLevel::High
        } else if pct > 40.0 {
            ConcentrationLevel::Moderate
        } else {
            ConcentrationLevel::Low
        }
    }

    /// Snapshot state plus derived statistics for rendering.
    #[must_use]
    pub fn snapshot(&self) -> CommonsSnapshot {
        CommonsSnapshot {
            pool: self.pool,
            ai_value: self.ai_value,
            user_value: self.user_value,
            round: self.round,
            protection: self.protection,
            extraction_amount: self.extraction_amount,
            last_ai_gain: self.last_ai_gain,
            phase: self.phase,
            concentration: self.concentration(),
            concentration_pct: percentage(self.ai_value, self.ai_value + self.user_value),
        }
    }

    #[must_use]
    pub const fn phase(&self) -> SimPhase {
        self.phase
    }

    #[must_use]
    pub const fn log(&self) -> &ActionLog {
        &self.log
    }

    #[must_use]
    pub const fn prompts(&self) -> &PromptRotation {
        &self.prompts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_sim() -> CommonsSim {
        let mut sim = CommonsSim::new();
        sim.start();
        sim
    }

    #[test]
    fn first_extraction_matches_formula() {
        let mut sim = running_sim();
        let outcome = sim.extract().expect("running sim extracts");
        assert_eq!(outcome.user_taken, 50);
        assert_eq!(outcome.user_gained, 60);
        assert_eq!(outcome.ai_advantage, 50);
        assert_eq!(outcome.ai_taken, 50);
        assert_eq!(outcome.ai_gained, 75);
        assert_eq!(outcome.pool_after, 900);
        assert!(!outcome.depleted);
    }

    #[test]
    fn depletion_ends_the_run_and_freezes_state() {
        let mut sim = running_sim();
        sim.set_extraction_amount(200);
        while sim.phase() == SimPhase::Running {
            assert!(sim.extract().is_some());
        }
        assert_eq!(sim.phase(), SimPhase::Ended);
        let before = sim.snapshot();
        assert!(before.pool <= 200);
        assert!(sim.extract().is_none());
        // Regeneration must not resurrect a finished run
        sim.advance(Duration::from_secs(10));
        let after = sim.snapshot();
        assert_eq!(after.pool, before.pool);
        assert_eq!(after.round, before.round);
    }

    #[test]
    fn regeneration_amplitude_follows_protection() {
        let mut sim = running_sim();
        sim.advance(Duration::from_secs(2));
        assert_eq!(sim.snapshot().pool, 1050);
        assert_eq!(sim.snapshot().round, 2);
        sim.toggle_protection();
        sim.advance(Duration::from_secs(4));
        assert_eq!(sim.snapshot().pool, 1090);
        assert_eq!(sim.snapshot().round, 4);
    }

    #[test]
    fn toggle_protection_logs_and_respects_end() {
        let mut sim = running_sim();
        sim.toggle_protection();
        assert_eq!(sim.log().latest(), Some(LOG_PROTECTION_ON));
        sim.toggle_protection();
        assert_eq!(sim.log().latest(), Some(LOG_PROTECTION_OFF));

        sim.set_extraction_amount(200);
        while sim.extract().is_some() {}
        let before = sim.snapshot().protection;
        sim.toggle_protection();
        assert_eq!(sim.snapshot().protection, before);
    }

    #[test]
    fn extraction_amount_clamps_to_range() {
        let mut sim = CommonsSim::new();
        sim.set_extraction_amount(10);
        assert_eq!(sim.snapshot().extraction_amount, 50);
        sim.set_extraction_amount(900);
        assert_eq!(sim.snapshot().extraction_amount, 200);
    }

    #[test]
    fn concentration_buckets_track_ratio() {
        let mut sim = running_sim();
        assert_eq!(sim.concentration(), ConcentrationLevel::None);
        let _ = sim.extract();
        // 75 ai vs 60 user: 55.6% -> moderate
        assert_eq!(sim.concentration(), ConcentrationLevel::Moderate);
        let snapshot = sim.snapshot();
        assert!(snapshot.concentration_pct > 40.0 && snapshot.concentration_pct < 60.0);
    }

    #[test]
    fn snapshot_is_pure() {
        let mut sim = running_sim();
        let _ = sim.extract();
        assert_eq!(sim.snapshot(), sim.snapshot());
    }
}
