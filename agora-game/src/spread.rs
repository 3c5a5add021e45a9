//! Influence-spread graph: staged unlock propagation over a fixed network.
//!
//! Nodes and edges are static data; a run only ever layers monotonic
//! "unlocked" and "active" overlays on top. Clicking an unlocked node
//! advances metrics and opens every outgoing edge that is still closed.

use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::rng::RngBundle;
use crate::rotation::PromptRotation;

const MAX_STAGE: u8 = 4;
const REACH_PER_SIZE: i64 = 1000;
const ENGAGEMENT_MIN: i64 = 10;
const ENGAGEMENT_MAX: i64 = 29;
const CREDIBILITY_INSTITUTIONAL: i32 = 20;
const CREDIBILITY_DECAY: i32 = -5;

const PROMPTS: &[&str] = &[
    "How do echo chambers amplify misinformation?",
    "What role do influencers play in lending credibility?",
    "How does cross-platform spread create perceived legitimacy?",
    "Why might traditional media cover viral misinformation?",
    "What makes some narratives more 'sticky' than others?",
    "How do emotional responses accelerate spread?",
    "What responsibility do platforms have in prevention?",
    "How can individual users help stop misinformation?",
];

/// A station in the spread network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadNode {
    pub id: String,
    pub label: String,
    pub stage: u8,
    pub size: u32,
    pub info: String,
}

/// A directed connection between stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadEdge {
    pub from: String,
    pub to: String,
    pub stage: u8,
}

/// Narrative framing for one spread stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageInfo {
    pub title: String,
    pub description: String,
    pub tip: String,
}

/// Errors raised when a network definition violates its invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("root node {0:?} does not exist")]
    MissingRoot(String),
    #[error("node {0:?} is defined more than once")]
    DuplicateNode(String),
    #[error("edge {index} references unknown node {id:?}")]
    UnknownEndpoint { index: usize, id: String },
    #[error("node {id:?} carries stage {stage}, beyond the last stage")]
    StageOutOfRange { id: String, stage: u8 },
}

/// Container for a complete spread network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadNetwork {
    pub root: String,
    pub nodes: Vec<SpreadNode>,
    pub edges: Vec<SpreadEdge>,
    pub stages: Vec<StageInfo>,
}

impl SpreadNetwork {
    /// Load a network from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a network.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&SpreadNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Check referential integrity of the network.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: duplicate node ids, a missing
    /// root, an edge endpoint that resolves to no node, or a stage beyond
    /// the final one.
    pub fn validate(&self) -> Result<(), NetworkError> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(NetworkError::DuplicateNode(node.id.clone()));
            }
            if node.stage > MAX_STAGE {
                return Err(NetworkError::StageOutOfRange {
                    id: node.id.clone(),
                    stage: node.stage,
                });
            }
        }
        if !seen.contains(self.root.as_str()) {
            return Err(NetworkError::MissingRoot(self.root.clone()));
        }
        for (index, edge) in self.edges.iter().enumerate() {
            for endpoint in [&edge.from, &edge.to] {
                if !seen.contains(endpoint.as_str()) {
                    return Err(NetworkError::UnknownEndpoint {
                        index,
                        id: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// The built-in misinformation-spread network.
    #[must_use]
    pub fn builtin() -> Self {
        let node = |id: &str, label: &str, stage: u8, info: &str| SpreadNode {
            id: id.to_string(),
            label: label.to_string(),
            stage,
            size: 24,
            info: info.to_string(),
        };
        let edge = |from: &str, to: &str, stage: u8| SpreadEdge {
            from: from.to_string(),
            to: to.to_string(),
            stage,
        };
        let stage = |title: &str, description: &str, tip: &str| StageInfo {
            title: title.to_string(),
            description: description.to_string(),
            tip: tip.to_string(),
        };

        Self {
            root: "source".to_string(),
            nodes: vec![
                node(
                    "source",
                    "Original Source",
                    0,
                    "A misleading story is crafted, often mixing truth with falsehood for credibility",
                ),
                node(
                    "forum",
                    "Fringe Forums",
                    1,
                    "Initial spread through niche communities that are receptive to the narrative",
                ),
                node(
                    "telegram",
                    "Private Groups",
                    1,
                    "Closed messaging groups where content can spread without fact-checking",
                ),
                node(
                    "influencer1",
                    "Key Influencer",
                    2,
                    "Influential figures amplify the content, adding perceived legitimacy",
                ),
                node(
                    "influencer2",
                    "Content Creator",
                    2,
                    "Creates engaging content around the story, increasing its reach",
                ),
                node(
                    "twitter",
                    "Social Platform A",
                    3,
                    "Rapid viral spread across major social media platforms",
                ),
                node(
                    "facebook",
                    "Social Platform B",
                    3,
                    "Cross-platform amplification creates an illusion of widespread belief",
                ),
                node(
                    "media",
                    "News Media",
                    4,
                    "Traditional media coverage, often in the context of 'people are saying'",
                ),
                node(
                    "politics",
                    "Political Groups",
                    4,
                    "Integration into political narratives and policy discussions",
                ),
            ],
            edges: vec![
                edge("source", "forum", 1),
                edge("source", "telegram", 1),
                edge("forum", "influencer1", 2),
                edge("telegram", "influencer2", 2),
                edge("influencer1", "twitter", 3),
                edge("influencer2", "facebook", 3),
                edge("twitter", "media", 4),
                edge("facebook", "politics", 4),
            ],
            stages: vec![
                stage(
                    "Creation & Seeding",
                    "Click on the source node to see how misinformation begins its journey",
                    "Misinformation often starts with a kernel of truth, twisted to serve a specific agenda",
                ),
                stage(
                    "Initial Distribution",
                    "Explore how content spreads through early communities",
                    "Early spreading often happens in echo chambers where the content isn't challenged",
                ),
                stage(
                    "Influencer Amplification",
                    "Watch how influential figures boost the signal",
                    "Key amplifiers often add their own spin, making the content more engaging",
                ),
                stage(
                    "Platform Virality",
                    "See how major platforms accelerate the spread",
                    "Cross-platform posting creates an illusion of independent verification",
                ),
                stage(
                    "Institutional Impact",
                    "Observe how the story achieves mainstream acceptance",
                    "By this stage, the original context is often lost or distorted",
                ),
            ],
        }
    }
}

/// Cumulative spread metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SpreadMetrics {
    pub reach: i64,
    pub engagement: i64,
    pub credibility: i32,
}

/// Result of a successful node click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    /// Node ids newly unlocked by this click.
    pub unlocked: Vec<String>,
    /// Displayed stage after the click.
    pub stage: u8,
}

/// The spread-graph state machine.
#[derive(Debug, Clone)]
pub struct SpreadSim {
    network: SpreadNetwork,
    unlocked: HashSet<String>,
    active_edges: HashSet<usize>,
    selected: Option<String>,
    stage: u8,
    metrics: SpreadMetrics,
    prompts: PromptRotation,
    rng: RngBundle,
}

impl SpreadSim {
    /// Build a run over a network, validating it first.
    ///
    /// # Errors
    ///
    /// Returns the network's first violated invariant.
    pub fn new(network: SpreadNetwork, seed: u64) -> Result<Self, NetworkError> {
        network.validate()?;
        let mut unlocked = HashSet::new();
        unlocked.insert(network.root.clone());
        Ok(Self {
            network,
            unlocked,
            active_edges: HashSet::new(),
            selected: None,
            stage: 0,
            metrics: SpreadMetrics::default(),
            prompts: PromptRotation::with_default_interval(PROMPTS),
            rng: RngBundle::from_user_seed(seed),
        })
    }

    /// Build a run over the built-in network.
    #[must_use]
    pub fn with_builtin(seed: u64) -> Self {
        Self::new(SpreadNetwork::builtin(), seed).expect("builtin network is valid")
    }

    /// Click a node: a no-op (`None`) for locked or unknown ids.
    pub fn click_node(&mut self, id: &str) -> Option<ClickOutcome> {
        if !self.unlocked.contains(id) {
            return None;
        }
        let (node_stage, node_size) = {
            let node = self.network.node(id)?;
            (node.stage, node.size)
        };

        self.selected = Some(id.to_string());
        self.metrics.reach += i64::from(node_size) * REACH_PER_SIZE;
        self.metrics.engagement += self
            .rng
            .engagement()
            .gen_range(ENGAGEMENT_MIN..=ENGAGEMENT_MAX);
        let swing = if node_stage == MAX_STAGE {
            CREDIBILITY_INSTITUTIONAL
        } else {
            CREDIBILITY_DECAY
        };
        self.metrics.credibility = (self.metrics.credibility + swing).clamp(0, 100);

        let fresh: SmallVec<[usize; 4]> = self
            .network
            .edges
            .iter()
            .enumerate()
            .filter(|(index, edge)| edge.from == id && !self.active_edges.contains(index))
            .map(|(index, _)| index)
            .collect();

        let mut unlocked = Vec::with_capacity(fresh.len());
        for index in fresh {
            self.active_edges.insert(index);
            let destination = self.network.edges[index].to.clone();
            if self.unlocked.insert(destination.clone()) {
                unlocked.push(destination);
            }
        }
        if !unlocked.is_empty() {
            self.stage = (node_stage + 1).min(MAX_STAGE);
        }

        Some(ClickOutcome {
            unlocked,
            stage: self.stage,
        })
    }

    /// Whether a node is currently unlocked.
    #[must_use]
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Whether an edge (by definition order) is active.
    #[must_use]
    pub fn is_edge_active(&self, index: usize) -> bool {
        self.active_edges.contains(&index)
    }

    /// Info text for the current selection, or the stage description.
    #[must_use]
    pub fn focus_text(&self) -> &str {
        if let Some(id) = &self.selected
            && let Some(node) = self.network.node(id)
        {
            return &node.info;
        }
        self.network
            .stages
            .get(usize::from(self.stage))
            .map_or("", |stage| stage.description.as_str())
    }

    /// Advance the prompt rotation.
    pub fn advance(&mut self, elapsed: Duration) {
        self.prompts.advance(elapsed);
    }

    #[must_use]
    pub const fn metrics(&self) -> SpreadMetrics {
        self.metrics
    }

    #[must_use]
    pub const fn stage(&self) -> u8 {
        self.stage
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub const fn network(&self) -> &SpreadNetwork {
        &self.network
    }

    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    #[must_use]
    pub const fn prompts(&self) -> &PromptRotation {
        &self.prompts
    }
}

impl fmt::Display for SpreadMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reach {} / engagement {}% / credibility {}%",
            self.reach, self.engagement, self.credibility
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_network_validates() {
        let network = SpreadNetwork::builtin();
        assert!(network.validate().is_ok());
        assert_eq!(network.nodes.len(), 9);
        assert_eq!(network.edges.len(), 8);
        assert_eq!(network.stages.len(), 5);
    }

    #[test]
    fn root_is_clickable_before_any_unlocks() {
        let mut sim = SpreadSim::with_builtin(1);
        let outcome = sim.click_node("source").expect("root is pre-unlocked");
        assert_eq!(outcome.stage, 1);
        assert_eq!(outcome.unlocked.len(), 2);
        assert!(sim.is_unlocked("forum"));
        assert!(sim.is_unlocked("telegram"));
        assert_eq!(sim.metrics().reach, 24_000);
        assert!(sim.metrics().engagement >= 10);
    }

    #[test]
    fn locked_node_click_changes_nothing() {
        let mut sim = SpreadSim::with_builtin(1);
        let before = sim.metrics();
        assert!(sim.click_node("media").is_none());
        assert!(sim.click_node("no-such-node").is_none());
        assert_eq!(sim.metrics(), before);
        assert_eq!(sim.stage(), 0);
        assert_eq!(sim.unlocked_count(), 1);
    }

    #[test]
    fn unlocks_are_monotonic_and_stage_advances_on_fresh_edges() {
        let mut sim = SpreadSim::with_builtin(7);
        sim.click_node("source");
        // Re-clicking the exhausted root keeps the stage indicator still
        let again = sim.click_node("source").unwrap();
        assert!(again.unlocked.is_empty());
        assert_eq!(again.stage, 1);

        sim.click_node("forum");
        assert!(sim.is_unlocked("influencer1"));
        assert_eq!(sim.stage(), 2);
        assert!(sim.is_edge_active(2));
        assert!(!sim.is_edge_active(3));
    }

    #[test]
    fn credibility_swings_by_stage_and_clamps() {
        let mut sim = SpreadSim::with_builtin(3);
        sim.click_node("source");
        // Early-stage clicks decay credibility but never below zero
        assert_eq!(sim.metrics().credibility, 0);
        for id in ["forum", "influencer1", "twitter"] {
            sim.click_node(id);
            assert_eq!(sim.metrics().credibility, 0);
        }
        sim.click_node("media");
        assert_eq!(sim.metrics().credibility, 20);
    }

    #[test]
    fn focus_text_tracks_selection() {
        let mut sim = SpreadSim::with_builtin(11);
        assert_eq!(
            sim.focus_text(),
            "Click on the source node to see how misinformation begins its journey"
        );
        sim.click_node("source");
        assert!(sim.focus_text().starts_with("A misleading story"));
    }

    #[test]
    fn identical_seeds_reproduce_engagement() {
        let mut a = SpreadSim::with_builtin(99);
        let mut b = SpreadSim::with_builtin(99);
        a.click_node("source");
        b.click_node("source");
        assert_eq!(a.metrics(), b.metrics());
    }
}
