//! Branching narrative engine: a state machine over a scenario graph.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scenario::{
    Choice, EndingScene, Next, OutcomeKind, Scene, SceneId, ScenarioData, ScenarioError,
    StatEffects,
};

const STAT_MIN: i32 = 0;
const STAT_MAX: i32 = 100;
const TIER_LEADING: i32 = 300;
const TIER_POSITIVE: i32 = 200;
const TIER_LEARNING: i32 = 100;

/// Cumulative playthrough stats.
///
/// The four percentage stats clamp to [0,100]; `members` only floors at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub privacy: i32,
    pub trust: i32,
    pub influence: i32,
    pub understanding: i32,
    pub members: i64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            privacy: 50,
            trust: 50,
            influence: 50,
            understanding: 0,
            members: 1000,
        }
    }
}

impl Stats {
    fn apply(&mut self, effects: StatEffects) {
        self.privacy = (self.privacy + effects.privacy).clamp(STAT_MIN, STAT_MAX);
        self.trust = (self.trust + effects.trust).clamp(STAT_MIN, STAT_MAX);
        self.influence = (self.influence + effects.influence).clamp(STAT_MIN, STAT_MAX);
        self.understanding = (self.understanding + effects.understanding).clamp(STAT_MIN, STAT_MAX);
        self.members = (self.members + effects.members).max(0);
    }

    /// Sum of the four percentage stats, used for ending classification.
    #[must_use]
    pub const fn engagement_total(&self) -> i32 {
        self.privacy + self.trust + self.influence + self.understanding
    }
}

/// Ending classification over the summed percentage stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndingTier {
    /// Total above 300.
    Leading,
    /// Total above 200.
    Positive,
    /// Total above 100.
    Learning,
    /// Everything else.
    Beginning,
}

impl EndingTier {
    /// Classify a summed stat total.
    #[must_use]
    pub const fn from_total(total: i32) -> Self {
        if total > TIER_LEADING {
            Self::Leading
        } else if total > TIER_POSITIVE {
            Self::Positive
        } else if total > TIER_LEARNING {
            Self::Learning
        } else {
            Self::Beginning
        }
    }

    #[must_use]
    pub const fn blurb(self) -> &'static str {
        match self {
            Self::Leading => "You've become a leading voice in the data coalition movement!",
            Self::Positive => "You're making a positive impact on digital rights!",
            Self::Learning => "You're learning to navigate the digital world more consciously.",
            Self::Beginning => {
                "There's still much to learn about digital rights and data governance."
            }
        }
    }
}

impl fmt::Display for EndingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.blurb())
    }
}

/// Result of applying a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved to another interactive scene.
    Progressed(SceneId),
    /// Reached a terminal outcome; the machine is now in Summary.
    Ended(OutcomeKind),
}

/// The narrative state machine.
#[derive(Debug, Clone)]
pub struct NarrativeSim {
    data: ScenarioData,
    current: SceneId,
    stats: Stats,
    outcome: Option<OutcomeKind>,
}

impl Default for NarrativeSim {
    fn default() -> Self {
        Self::new(ScenarioData::builtin()).expect("builtin scenario graph is valid")
    }
}

impl NarrativeSim {
    /// Build a machine over a scenario graph, validating it first.
    ///
    /// # Errors
    ///
    /// Returns the graph's first violated invariant; an invalid graph is a
    /// data defect and the machine is never constructed from one.
    pub fn new(data: ScenarioData) -> Result<Self, ScenarioError> {
        data.validate()?;
        let start = data.start;
        Ok(Self {
            data,
            current: start,
            stats: Stats::default(),
            outcome: None,
        })
    }

    /// The scene currently on display, or `None` once in Summary.
    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        if self.outcome.is_some() {
            return None;
        }
        self.data.scene(self.current)
    }

    /// Whether the machine has reached the terminal Summary state.
    #[must_use]
    pub const fn is_summary(&self) -> bool {
        self.outcome.is_some()
    }

    /// The reached outcome and its ending record, once in Summary.
    #[must_use]
    pub fn ending(&self) -> Option<(&EndingScene, EndingTier)> {
        let outcome = self.outcome?;
        let record = self.data.ending(outcome)?;
        Some((record, EndingTier::from_total(self.stats.engagement_total())))
    }

    /// Apply the indexed choice of the current scene.
    ///
    /// No-op (`None`) when already in Summary or the index is out of range:
    /// the host surface only offers valid indices.
    pub fn choose(&mut self, index: usize) -> Option<Transition> {
        if self.outcome.is_some() {
            return None;
        }
        let choice: &Choice = self.data.scene(self.current)?.choices.get(index)?;
        let effects = choice.effects;
        let next = choice.next;
        self.stats.apply(effects);
        match next {
            Next::Continue(id) => {
                self.current = id;
                Some(Transition::Progressed(id))
            }
            Next::End(outcome) => {
                self.outcome = Some(outcome);
                Some(Transition::Ended(outcome))
            }
        }
    }

    /// Restore the start scene and initial stats.
    pub fn reset(&mut self) {
        self.current = self.data.start;
        self.stats = Stats::default();
        self.outcome = None;
    }

    #[must_use]
    pub const fn stats(&self) -> &Stats {
        &self.stats
    }

    #[must_use]
    pub const fn data(&self) -> &ScenarioData {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_applies_deltas_with_clamps() {
        let mut sim = NarrativeSim::default();
        // First choice of the start scene: privacy +10, trust +5, understanding +5
        sim.choose(0).expect("start scene has choices");
        assert_eq!(sim.stats().privacy, 60);
        assert_eq!(sim.stats().trust, 55);
        assert_eq!(sim.stats().understanding, 5);
        assert_eq!(sim.stats().members, 1000);
    }

    #[test]
    fn percentage_stats_clamp_at_bounds() {
        let mut stats = Stats {
            privacy: 95,
            ..Stats::default()
        };
        stats.apply(StatEffects {
            privacy: 10,
            trust: -60,
            ..StatEffects::default()
        });
        assert_eq!(stats.privacy, 100);
        assert_eq!(stats.trust, 0);

        stats.apply(StatEffects {
            members: -5000,
            ..StatEffects::default()
        });
        assert_eq!(stats.members, 0);
    }

    #[test]
    fn terminal_choice_enters_summary() {
        let mut sim = NarrativeSim::default();
        // 0 -> 1 -> 3 -> 5 -> 6 -> good_end
        sim.choose(0);
        sim.choose(1);
        sim.choose(0);
        sim.choose(0);
        let transition = sim.choose(0);
        assert_eq!(transition, Some(Transition::Ended(OutcomeKind::GoodEnd)));
        assert!(sim.is_summary());
        assert!(sim.scene().is_none());
        assert!(sim.choose(0).is_none());

        let (record, tier) = sim.ending().expect("summary exposes the ending");
        assert_eq!(record.outcome, OutcomeKind::GoodEnd);
        assert_eq!(tier, EndingTier::from_total(sim.stats().engagement_total()));
    }

    #[test]
    fn bad_end_path_reaches_resignation() {
        let mut sim = NarrativeSim::default();
        // 0 -> 1 -> 2 -> 4 -> bad_end
        sim.choose(0);
        sim.choose(0);
        sim.choose(1);
        let transition = sim.choose(1);
        assert_eq!(transition, Some(Transition::Ended(OutcomeKind::BadEnd)));
        let (record, _) = sim.ending().unwrap();
        assert_eq!(record.title, "Digital Resignation");
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut sim = NarrativeSim::default();
        sim.choose(0);
        sim.choose(1);
        sim.reset();
        assert_eq!(sim.stats(), &Stats::default());
        assert!(!sim.is_summary());
        assert_eq!(sim.scene().map(|scene| scene.id), Some(0));
    }

    #[test]
    fn ending_tiers_use_fixed_thresholds() {
        assert_eq!(EndingTier::from_total(301), EndingTier::Leading);
        assert_eq!(EndingTier::from_total(300), EndingTier::Positive);
        assert_eq!(EndingTier::from_total(201), EndingTier::Positive);
        assert_eq!(EndingTier::from_total(101), EndingTier::Learning);
        assert_eq!(EndingTier::from_total(100), EndingTier::Beginning);
    }

    #[test]
    fn out_of_range_choice_is_a_no_op() {
        let mut sim = NarrativeSim::default();
        let before = *sim.stats();
        assert!(sim.choose(9).is_none());
        assert_eq!(sim.stats(), &before);
    }
}
