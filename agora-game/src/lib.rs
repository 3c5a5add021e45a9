//! Agora Simulation Engine
//!
//! Platform-agnostic core logic for the Agora interactive ethics
//! simulations. This crate provides every simulation state machine without
//! UI or platform-specific dependencies: a host shell renders snapshots and
//! forwards user actions plus elapsed wall time.

pub mod commons;
pub mod gatekeeping;
pub mod journal;
pub mod labeling;
pub mod lexicon;
pub mod narrative;
pub mod numbers;
pub mod rng;
pub mod rotation;
pub mod runner;
pub mod scenario;
pub mod spread;
pub mod timer;

// Re-export commonly used types
pub use commons::{CommonsSim, CommonsSnapshot, ConcentrationLevel, ExtractionOutcome};
pub use gatekeeping::{
    Category, CategoryShare, ContentItem, GatekeepingSim, GatekeepingStats, RING_CAPACITY,
};
pub use journal::ActionLog;
pub use labeling::{LabelingSim, LabelingSnapshot, SubmitError, SubmitOutcome};
pub use lexicon::{Leaning, LexicalReport, LexiconSim, Marker, TokenScore, WeightTable};
pub use narrative::{EndingTier, NarrativeSim, Stats, Transition};
pub use rng::{CountingRng, RngBundle};
pub use rotation::PromptRotation;
pub use runner::{
    ALL_SIMULATIONS, HostedSimulation, SimPhase, SimulationKind, SimulationRunner,
};
pub use scenario::{
    Choice, EndingScene, Next, OutcomeKind, Scene, SceneId, ScenarioData, ScenarioError,
    StatEffects,
};
pub use spread::{
    ClickOutcome, NetworkError, SpreadMetrics, SpreadNetwork, SpreadNode, SpreadSim, StageInfo,
};
pub use timer::PeriodicTimer;

/// Trait for abstracting dataset loading operations
/// Platform-specific implementations should provide this
pub trait DatasetSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the scenario graph for the narrative engine
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario data cannot be loaded.
    fn load_scenario(&self) -> Result<ScenarioData, Self::Error>;

    /// Load the network for the spread simulation
    ///
    /// # Errors
    ///
    /// Returns an error if the network cannot be loaded.
    fn load_network(&self) -> Result<SpreadNetwork, Self::Error>;
}

/// Dataset source serving the built-in tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinDatasets;

impl DatasetSource for BuiltinDatasets {
    type Error = std::convert::Infallible;

    fn load_scenario(&self) -> Result<ScenarioData, Self::Error> {
        Ok(ScenarioData::builtin())
    }

    fn load_network(&self) -> Result<SpreadNetwork, Self::Error> {
        Ok(SpreadNetwork::builtin())
    }
}

/// Engine constructing hosted simulations from a dataset source.
pub struct SimulationEngine<D>
where
    D: DatasetSource,
{
    datasets: D,
}

impl<D> SimulationEngine<D>
where
    D: DatasetSource,
{
    /// Create an engine over the provided dataset source.
    pub const fn new(datasets: D) -> Self {
        Self { datasets }
    }

    /// Construct a runner for one simulation with the given seed.
    ///
    /// Dataset-backed simulations load and validate their data here; an
    /// invalid graph or network is a fatal configuration error.
    ///
    /// # Errors
    ///
    /// Returns an error if a dataset cannot be loaded or fails validation.
    pub fn create(&self, kind: SimulationKind, seed: u64) -> Result<SimulationRunner, anyhow::Error>
    where
        D::Error: Into<anyhow::Error>,
    {
        let sim = match kind {
            SimulationKind::Narrative => {
                let data = self.datasets.load_scenario().map_err(Into::into)?;
                HostedSimulation::Narrative(NarrativeSim::new(data)?)
            }
            SimulationKind::Spread => {
                let network = self.datasets.load_network().map_err(Into::into)?;
                HostedSimulation::Spread(SpreadSim::new(network, seed)?)
            }
            SimulationKind::Commons => HostedSimulation::Commons(CommonsSim::new()),
            SimulationKind::Gatekeeping => {
                HostedSimulation::Gatekeeping(GatekeepingSim::new(seed))
            }
            SimulationKind::Lexicon => HostedSimulation::Lexicon(LexiconSim::new()),
            SimulationKind::Labeling => HostedSimulation::Labeling(LabelingSim::new()),
        };
        Ok(SimulationRunner::from_simulation(kind, seed, sim))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, Default)]
    struct BrokenScenarioSource;

    impl DatasetSource for BrokenScenarioSource {
        type Error = std::convert::Infallible;

        fn load_scenario(&self) -> Result<ScenarioData, Self::Error> {
            let mut data = ScenarioData::builtin();
            data.scenes[0].choices[0].next = Next::Continue(404);
            Ok(data)
        }

        fn load_network(&self) -> Result<SpreadNetwork, Self::Error> {
            Ok(SpreadNetwork::builtin())
        }
    }

    #[test]
    fn engine_builds_every_simulation_kind() {
        let engine = SimulationEngine::new(BuiltinDatasets);
        for kind in ALL_SIMULATIONS {
            let runner = engine.create(kind, 1337).expect("builtin data is valid");
            assert_eq!(runner.kind(), kind);
            assert_eq!(runner.seed(), 1337);
        }
    }

    #[test]
    fn engine_rejects_invalid_scenario_data() {
        let engine = SimulationEngine::new(BrokenScenarioSource);
        let error = engine
            .create(SimulationKind::Narrative, 1)
            .expect_err("dangling reference must fail construction");
        assert!(error.to_string().contains("unknown scene"));
        // Other simulations are unaffected by the broken scenario
        assert!(engine.create(SimulationKind::Spread, 1).is_ok());
    }
}
