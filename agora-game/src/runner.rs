//! Generic host runner owning exactly one simulation at a time.
//!
//! The navigation shell is an external caller: it constructs a runner for
//! the simulation it wants on screen, forwards user actions to the concrete
//! machine, and feeds elapsed wall time into [`SimulationRunner::advance`].
//! Dropping the runner tears everything down; there are no background tasks
//! to leak.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::commons::CommonsSim;
use crate::gatekeeping::GatekeepingSim;
use crate::labeling::LabelingSim;
use crate::lexicon::LexiconSim;
use crate::narrative::NarrativeSim;
use crate::spread::SpreadSim;

/// Lifecycle phase shared by the timed simulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SimPhase {
    #[default]
    Idle,
    Running,
    Ended,
}

impl SimPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for SimPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which simulation a runner hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationKind {
    Commons,
    Gatekeeping,
    Lexicon,
    Narrative,
    Spread,
    Labeling,
}

/// All hostable simulations, in presentation order.
pub const ALL_SIMULATIONS: [SimulationKind; 6] = [
    SimulationKind::Commons,
    SimulationKind::Gatekeeping,
    SimulationKind::Lexicon,
    SimulationKind::Narrative,
    SimulationKind::Spread,
    SimulationKind::Labeling,
];

impl SimulationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Commons => "commons",
            Self::Gatekeeping => "gatekeeping",
            Self::Lexicon => "lexicon",
            Self::Narrative => "narrative",
            Self::Spread => "spread",
            Self::Labeling => "labeling",
        }
    }

    /// Short human description for catalogs and reports.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Commons => "extraction race over a shared data pool",
            Self::Gatekeeping => "probabilistic content filtering and diversity",
            Self::Lexicon => "weighted lexical bias scoring",
            Self::Narrative => "branching data-coalition narrative",
            Self::Spread => "staged misinformation spread graph",
            Self::Labeling => "piecework labeling treadmill",
        }
    }
}

impl fmt::Display for SimulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimulationKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commons" => Ok(Self::Commons),
            "gatekeeping" => Ok(Self::Gatekeeping),
            "lexicon" => Ok(Self::Lexicon),
            "narrative" => Ok(Self::Narrative),
            "spread" => Ok(Self::Spread),
            "labeling" => Ok(Self::Labeling),
            _ => Err(()),
        }
    }
}

/// The one simulation a runner currently hosts.
#[derive(Debug, Clone)]
pub enum HostedSimulation {
    Commons(CommonsSim),
    Gatekeeping(GatekeepingSim),
    Lexicon(LexiconSim),
    Narrative(NarrativeSim),
    Spread(SpreadSim),
    Labeling(LabelingSim),
}

/// Host wrapper binding a simulation to a logical clock.
#[derive(Debug, Clone)]
pub struct SimulationRunner {
    kind: SimulationKind,
    seed: u64,
    sim: HostedSimulation,
}

impl SimulationRunner {
    /// Host a simulation built from its built-in dataset.
    #[must_use]
    pub fn with_builtin(kind: SimulationKind, seed: u64) -> Self {
        let sim = match kind {
            SimulationKind::Commons => HostedSimulation::Commons(CommonsSim::new()),
            SimulationKind::Gatekeeping => {
                HostedSimulation::Gatekeeping(GatekeepingSim::new(seed))
            }
            SimulationKind::Lexicon => HostedSimulation::Lexicon(LexiconSim::new()),
            SimulationKind::Narrative => HostedSimulation::Narrative(NarrativeSim::default()),
            SimulationKind::Spread => HostedSimulation::Spread(SpreadSim::with_builtin(seed)),
            SimulationKind::Labeling => HostedSimulation::Labeling(LabelingSim::new()),
        };
        Self { kind, seed, sim }
    }

    /// Host an already-constructed simulation.
    #[must_use]
    pub const fn from_simulation(kind: SimulationKind, seed: u64, sim: HostedSimulation) -> Self {
        Self { kind, seed, sim }
    }

    /// Begin the hosted simulation's run, where it distinguishes one.
    pub fn start(&mut self) {
        match &mut self.sim {
            HostedSimulation::Commons(sim) => sim.start(),
            HostedSimulation::Gatekeeping(sim) => sim.start(),
            HostedSimulation::Labeling(sim) => sim.start(),
            HostedSimulation::Lexicon(_)
            | HostedSimulation::Narrative(_)
            | HostedSimulation::Spread(_) => {}
        }
    }

    /// Stop timers ahead of teardown or navigation away. Idempotent.
    pub fn stop(&mut self) {
        match &mut self.sim {
            HostedSimulation::Commons(sim) => sim.stop(),
            HostedSimulation::Gatekeeping(sim) => sim.stop(),
            HostedSimulation::Labeling(sim) => sim.stop(),
            HostedSimulation::Lexicon(_)
            | HostedSimulation::Narrative(_)
            | HostedSimulation::Spread(_) => {}
        }
    }

    /// Feed elapsed wall time to every timer the simulation owns.
    pub fn advance(&mut self, elapsed: Duration) {
        match &mut self.sim {
            HostedSimulation::Commons(sim) => sim.advance(elapsed),
            HostedSimulation::Gatekeeping(sim) => sim.advance(elapsed),
            HostedSimulation::Lexicon(sim) => sim.advance(elapsed),
            HostedSimulation::Spread(sim) => sim.advance(elapsed),
            HostedSimulation::Labeling(sim) => sim.advance(elapsed),
            HostedSimulation::Narrative(_) => {}
        }
    }

    #[must_use]
    pub const fn kind(&self) -> SimulationKind {
        self.kind
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn simulation(&self) -> &HostedSimulation {
        &self.sim
    }

    #[must_use]
    pub const fn simulation_mut(&mut self) -> &mut HostedSimulation {
        &mut self.sim
    }

    #[must_use]
    pub const fn commons(&self) -> Option<&CommonsSim> {
        match &self.sim {
            HostedSimulation::Commons(sim) => Some(sim),
            _ => None,
        }
    }

    pub const fn commons_mut(&mut self) -> Option<&mut CommonsSim> {
        match &mut self.sim {
            HostedSimulation::Commons(sim) => Some(sim),
            _ => None,
        }
    }

    #[must_use]
    pub const fn gatekeeping(&self) -> Option<&GatekeepingSim> {
        match &self.sim {
            HostedSimulation::Gatekeeping(sim) => Some(sim),
            _ => None,
        }
    }

    pub const fn gatekeeping_mut(&mut self) -> Option<&mut GatekeepingSim> {
        match &mut self.sim {
            HostedSimulation::Gatekeeping(sim) => Some(sim),
            _ => None,
        }
    }

    #[must_use]
    pub const fn lexicon(&self) -> Option<&LexiconSim> {
        match &self.sim {
            HostedSimulation::Lexicon(sim) => Some(sim),
            _ => None,
        }
    }

    pub const fn lexicon_mut(&mut self) -> Option<&mut LexiconSim> {
        match &mut self.sim {
            HostedSimulation::Lexicon(sim) => Some(sim),
            _ => None,
        }
    }

    #[must_use]
    pub const fn narrative(&self) -> Option<&NarrativeSim> {
        match &self.sim {
            HostedSimulation::Narrative(sim) => Some(sim),
            _ => None,
        }
    }

    pub const fn narrative_mut(&mut self) -> Option<&mut NarrativeSim> {
        match &mut self.sim {
            HostedSimulation::Narrative(sim) => Some(sim),
            _ => None,
        }
    }

    #[must_use]
    pub const fn spread(&self) -> Option<&SpreadSim> {
        match &self.sim {
            HostedSimulation::Spread(sim) => Some(sim),
            _ => None,
        }
    }

    pub const fn spread_mut(&mut self) -> Option<&mut SpreadSim> {
        match &mut self.sim {
            HostedSimulation::Spread(sim) => Some(sim),
            _ => None,
        }
    }

    #[must_use]
    pub const fn labeling(&self) -> Option<&LabelingSim> {
        match &self.sim {
            HostedSimulation::Labeling(sim) => Some(sim),
            _ => None,
        }
    }

    pub const fn labeling_mut(&mut self) -> Option<&mut LabelingSim> {
        match &mut self.sim {
            HostedSimulation::Labeling(sim) => Some(sim),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_strings() {
        for kind in ALL_SIMULATIONS {
            assert_eq!(kind.as_str().parse::<SimulationKind>(), Ok(kind));
        }
        assert!("unknown".parse::<SimulationKind>().is_err());
    }

    #[test]
    fn runner_hosts_and_drives_a_commons_run() {
        let mut runner = SimulationRunner::with_builtin(SimulationKind::Commons, 1);
        runner.start();
        runner.advance(Duration::from_secs(2));
        let sim = runner.commons().expect("hosting commons");
        assert_eq!(sim.snapshot().round, 2);
        assert!(runner.gatekeeping().is_none());
    }

    #[test]
    fn stop_is_idempotent_and_freezes_timers() {
        let mut runner = SimulationRunner::with_builtin(SimulationKind::Gatekeeping, 5);
        runner.start();
        runner.stop();
        runner.stop();
        let before: Vec<u64> = runner
            .gatekeeping()
            .unwrap()
            .items()
            .map(|item| item.id)
            .collect();
        runner.advance(Duration::from_secs(60));
        let after: Vec<u64> = runner
            .gatekeeping()
            .unwrap()
            .items()
            .map(|item| item.id)
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn same_seed_same_kind_reproduces_behavior() {
        let mut a = SimulationRunner::with_builtin(SimulationKind::Spread, 42);
        let mut b = SimulationRunner::with_builtin(SimulationKind::Spread, 42);
        a.spread_mut().unwrap().click_node("source");
        b.spread_mut().unwrap().click_node("source");
        assert_eq!(
            a.spread().unwrap().metrics(),
            b.spread().unwrap().metrics()
        );
    }
}
