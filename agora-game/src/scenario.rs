//! Scenario graph data for the branching narrative engine.
//!
//! Scenes, choices, and endings are plain data: hosts may inject replacement
//! graphs via JSON. Dangling references are construction-time defects, so
//! `validate` runs during initialization and failures are fatal, never
//! per-action conditions.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Identifier of an interactive scene.
pub type SceneId = u32;

/// Terminal outcome of a playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    GoodEnd,
    BadEnd,
}

impl OutcomeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoodEnd => "good_end",
            Self::BadEnd => "bad_end",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a choice leads: another scene, or a terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Next {
    Continue(SceneId),
    End(OutcomeKind),
}

/// Stat deltas applied when a choice is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatEffects {
    #[serde(default)]
    pub privacy: i32,
    #[serde(default)]
    pub trust: i32,
    #[serde(default)]
    pub influence: i32,
    #[serde(default)]
    pub understanding: i32,
    #[serde(default)]
    pub members: i64,
}

/// A choice offered by a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    #[serde(default)]
    pub effects: StatEffects,
    pub next: Next,
}

/// An interactive scene in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// A terminal scene shown once an outcome is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingScene {
    pub outcome: OutcomeKind,
    pub title: String,
    pub description: String,
}

/// Errors raised when a scenario graph violates its invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("start scene {0} does not exist")]
    MissingStart(SceneId),
    #[error("scene {0} is defined more than once")]
    DuplicateScene(SceneId),
    #[error("scene {scene} choice {choice} continues to unknown scene {target}")]
    DanglingNext {
        scene: SceneId,
        choice: usize,
        target: SceneId,
    },
    #[error("no ending is defined for outcome {0}")]
    MissingEnding(OutcomeKind),
    #[error("scene {0} offers no choices but is not an ending")]
    DeadEnd(SceneId),
}

/// Container for a complete scenario graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioData {
    pub start: SceneId,
    pub scenes: Vec<Scene>,
    pub endings: Vec<EndingScene>,
}

impl ScenarioData {
    /// Load a scenario graph from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into scenario data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Look up an interactive scene by id.
    #[must_use]
    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.id == id)
    }

    /// Look up the ending record for an outcome.
    #[must_use]
    pub fn ending(&self, outcome: OutcomeKind) -> Option<&EndingScene> {
        self.endings.iter().find(|ending| ending.outcome == outcome)
    }

    /// Check referential integrity of the whole graph.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: duplicate ids, a missing start
    /// scene, a dangling `Continue` target, a missing ending record, or an
    /// interactive scene with no way out.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let mut seen = HashSet::new();
        for scene in &self.scenes {
            if !seen.insert(scene.id) {
                return Err(ScenarioError::DuplicateScene(scene.id));
            }
        }
        if !seen.contains(&self.start) {
            return Err(ScenarioError::MissingStart(self.start));
        }
        for scene in &self.scenes {
            if scene.choices.is_empty() {
                return Err(ScenarioError::DeadEnd(scene.id));
            }
            for (index, choice) in scene.choices.iter().enumerate() {
                match choice.next {
                    Next::Continue(target) => {
                        if !seen.contains(&target) {
                            return Err(ScenarioError::DanglingNext {
                                scene: scene.id,
                                choice: index,
                                target,
                            });
                        }
                    }
                    Next::End(outcome) => {
                        if self.ending(outcome).is_none() {
                            return Err(ScenarioError::MissingEnding(outcome));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// The built-in data-coalition scenario.
    #[must_use]
    pub fn builtin() -> Self {
        let scene = |id: SceneId, title: &str, description: &str, choices: Vec<Choice>| Scene {
            id,
            title: title.to_string(),
            description: description.to_string(),
            choices,
        };
        let choice = |text: &str, effects: StatEffects, next: Next| Choice {
            text: text.to_string(),
            effects,
            next,
        };

        Self {
            start: 0,
            scenes: vec![
                scene(
                    0,
                    "The Digital Awakening",
                    "You're scrolling through your social media feed when you notice an eerily \
                     accurate advertisement. It seems to know exactly what you were discussing \
                     with your friends yesterday. As you dig deeper, you realize this isn't just \
                     about ads - your data is being used to predict your behavior, influence your \
                     decisions, and train algorithms.",
                    vec![
                        choice(
                            "This is concerning. I want to learn more about how my data is being used",
                            StatEffects {
                                privacy: 10,
                                trust: 5,
                                understanding: 5,
                                ..StatEffects::default()
                            },
                            Next::Continue(1),
                        ),
                        choice(
                            "This is convenient! I like personalized recommendations",
                            StatEffects {
                                privacy: -5,
                                trust: -5,
                                understanding: 5,
                                ..StatEffects::default()
                            },
                            Next::Continue(1),
                        ),
                    ],
                ),
                scene(
                    1,
                    "The Data Revelation",
                    "You discover that your 'data exhaust' - information generated as you move \
                     through the world - is being collected by companies in an almost completely \
                     unrestricted manner. This includes your location, browsing habits, shopping \
                     patterns, and even foot traffic past stores.",
                    vec![
                        choice(
                            "Research ways to protect my data individually",
                            StatEffects {
                                privacy: 5,
                                understanding: 10,
                                influence: -5,
                                ..StatEffects::default()
                            },
                            Next::Continue(2),
                        ),
                        choice(
                            "Look into collective solutions",
                            StatEffects {
                                privacy: 10,
                                understanding: 15,
                                influence: 10,
                                ..StatEffects::default()
                            },
                            Next::Continue(3),
                        ),
                    ],
                ),
                scene(
                    2,
                    "The Individual Approach",
                    "You learn that individual data protection is like 'owning different threads \
                     in the same blanket.' Your address is your father's son's address, your genes \
                     are your cousins' genes, and your interests are shaped by your friends. \
                     Individual control isn't enough.",
                    vec![
                        choice(
                            "Accept this limitation and explore alternatives",
                            StatEffects {
                                understanding: 15,
                                influence: 5,
                                ..StatEffects::default()
                            },
                            Next::Continue(3),
                        ),
                        choice(
                            "Try harder to protect my individual data",
                            StatEffects {
                                privacy: 5,
                                influence: -10,
                                understanding: 5,
                                ..StatEffects::default()
                            },
                            Next::Continue(4),
                        ),
                    ],
                ),
                scene(
                    3,
                    "The Coalition Discovery",
                    "You learn about 'data coalitions' - democratic organizations where people \
                     collectively manage their data. These coalitions act as bargaining agents, \
                     negotiating with companies about how member data can be used. Some focus on \
                     privacy, others on research, and some on preventing harmful uses of social \
                     media.",
                    vec![
                        choice(
                            "Join a privacy-focused coalition",
                            StatEffects {
                                privacy: 15,
                                trust: 10,
                                members: 500,
                                understanding: 10,
                                ..StatEffects::default()
                            },
                            Next::Continue(5),
                        ),
                        choice(
                            "Join a research-oriented coalition",
                            StatEffects {
                                influence: 15,
                                members: 1000,
                                understanding: 10,
                                ..StatEffects::default()
                            },
                            Next::Continue(5),
                        ),
                        choice(
                            "Join a democracy-focused coalition",
                            StatEffects {
                                influence: 20,
                                trust: 15,
                                members: 750,
                                understanding: 10,
                                ..StatEffects::default()
                            },
                            Next::Continue(5),
                        ),
                    ],
                ),
                scene(
                    4,
                    "The Race to the Bottom",
                    "You find yourself caught in a 'race to the bottom.' A new app offers \
                     significant advantages, forcing others to adopt it too. Soon, everyone's \
                     privacy is compromised because individual resistance becomes futile - like \
                     trying to keep your email private when everyone uses Gmail.",
                    vec![
                        choice(
                            "Recognize the need for collective action",
                            StatEffects {
                                understanding: 20,
                                influence: 10,
                                ..StatEffects::default()
                            },
                            Next::Continue(3),
                        ),
                        choice(
                            "Give up on privacy entirely",
                            StatEffects {
                                privacy: -20,
                                trust: -15,
                                understanding: 5,
                                ..StatEffects::default()
                            },
                            Next::End(OutcomeKind::BadEnd),
                        ),
                    ],
                ),
                scene(
                    5,
                    "The Coalition Experience",
                    "As a coalition member, you participate in democratic decisions about data \
                     use. When a new service wants to use member data, the coalition negotiates \
                     terms. Companies must meet the coalition's standards for privacy, ethics, \
                     and user benefits.",
                    vec![
                        choice(
                            "Actively participate in coalition decisions",
                            StatEffects {
                                influence: 20,
                                understanding: 15,
                                trust: 10,
                                ..StatEffects::default()
                            },
                            Next::Continue(6),
                        ),
                        choice(
                            "Take a passive role",
                            StatEffects {
                                influence: 5,
                                understanding: 5,
                                trust: 5,
                                ..StatEffects::default()
                            },
                            Next::Continue(6),
                        ),
                    ],
                ),
                scene(
                    6,
                    "The Power Shift",
                    "You witness how data coalitions are changing the digital landscape. Big Tech \
                     companies must now negotiate with coalitions, leading to better privacy \
                     policies and terms of service. New competitors emerge, focusing on \
                     interoperability rather than lock-in.",
                    vec![
                        choice(
                            "Help recruit more members to strengthen the coalition",
                            StatEffects {
                                influence: 25,
                                members: 1000,
                                understanding: 10,
                                ..StatEffects::default()
                            },
                            Next::End(OutcomeKind::GoodEnd),
                        ),
                        choice(
                            "Focus on improving coalition policies",
                            StatEffects {
                                influence: 20,
                                trust: 20,
                                understanding: 15,
                                ..StatEffects::default()
                            },
                            Next::End(OutcomeKind::GoodEnd),
                        ),
                    ],
                ),
            ],
            endings: vec![
                EndingScene {
                    outcome: OutcomeKind::GoodEnd,
                    title: "A New Digital Dawn".to_string(),
                    description: "Through data coalitions, you and millions of others have \
                                  regained control over the digital world. Companies now compete \
                                  by serving user interests rather than exploiting data. The \
                                  internet is becoming more diverse, ethical, and user-focused."
                        .to_string(),
                },
                EndingScene {
                    outcome: OutcomeKind::BadEnd,
                    title: "Digital Resignation".to_string(),
                    description: "Without collective action, individual privacy becomes \
                                  impossible. Big Tech companies continue to concentrate power, \
                                  using data to predict and influence behavior with little \
                                  oversight or restraint."
                        .to_string(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_graph_validates() {
        let data = ScenarioData::builtin();
        assert!(data.validate().is_ok());
        assert_eq!(data.scenes.len(), 7);
        assert_eq!(data.endings.len(), 2);
    }

    #[test]
    fn dangling_next_is_rejected() {
        let mut data = ScenarioData::builtin();
        data.scenes[0].choices[0].next = Next::Continue(99);
        assert_eq!(
            data.validate(),
            Err(ScenarioError::DanglingNext {
                scene: 0,
                choice: 0,
                target: 99,
            })
        );
    }

    #[test]
    fn missing_start_is_rejected() {
        let mut data = ScenarioData::builtin();
        data.start = 42;
        assert_eq!(data.validate(), Err(ScenarioError::MissingStart(42)));
    }

    #[test]
    fn missing_ending_is_rejected() {
        let mut data = ScenarioData::builtin();
        data.endings.retain(|ending| ending.outcome != OutcomeKind::BadEnd);
        assert_eq!(
            data.validate(),
            Err(ScenarioError::MissingEnding(OutcomeKind::BadEnd))
        );
    }

    #[test]
    fn next_serializes_as_id_or_marker() {
        let json = r#"{
            "start": 0,
            "scenes": [
                {
                    "id": 0,
                    "title": "Fork",
                    "description": "Choose.",
                    "choices": [
                        { "text": "on", "next": 0 },
                        { "text": "out", "effects": { "privacy": -5 }, "next": "bad_end" }
                    ]
                }
            ],
            "endings": [
                { "outcome": "bad_end", "title": "Done", "description": "Over." }
            ]
        }"#;
        let data = ScenarioData::from_json(json).unwrap();
        assert!(data.validate().is_ok());
        assert_eq!(data.scenes[0].choices[0].next, Next::Continue(0));
        assert_eq!(data.scenes[0].choices[1].next, Next::End(OutcomeKind::BadEnd));
        assert_eq!(data.scenes[0].choices[1].effects.privacy, -5);
    }
}
