//! Lexical bias scorer: static weighted lookup over free text.
//!
//! Pure and timer-free. Tokens are lowercased whitespace runs; each token
//! contributes its table weight (absent tokens contribute nothing) and the
//! sum is bucketed into a leaning band. Identical input always yields an
//! identical report.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::rotation::PromptRotation;

/// Legal weight alphabet for table entries.
pub const WEIGHT_ALPHABET: [f32; 5] = [-1.0, -0.5, 0.0, 0.5, 1.0];

const STRONG_BAND: f32 = 2.0;
const MODERATE_BAND: f32 = 0.5;

const PROMPTS: &[&str] = &[
    "Describe yourself",
    "Describe your mother",
    "Describe your father",
    "Describe your best friend",
    "Describe your ideal job",
    "Describe your perfect day",
    "Describe your role model",
    "Describe your greatest achievement",
];

/// Errors raised when a weight table violates its alphabet.
#[derive(Debug, Error, PartialEq)]
pub enum LexiconError {
    #[error("weight {weight} for token {token:?} is outside the weight alphabet")]
    InvalidWeight { token: String, weight: f32 },
}

/// Overall leaning band for a scored text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leaning {
    StronglyMasculine,
    ModeratelyMasculine,
    Neutral,
    ModeratelyFeminine,
    StronglyFeminine,
}

impl Leaning {
    /// Band a summed score.
    #[must_use]
    pub fn from_score(score: f32) -> Self {
        if score > STRONG_BAND {
            Self::StronglyMasculine
        } else if score > MODERATE_BAND {
            Self::ModeratelyMasculine
        } else if score < -STRONG_BAND {
            Self::StronglyFeminine
        } else if score < -MODERATE_BAND {
            Self::ModeratelyFeminine
        } else {
            Self::Neutral
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StronglyMasculine => "strongly masculine-leaning",
            Self::ModeratelyMasculine => "moderately masculine-leaning",
            Self::Neutral => "relatively neutral",
            Self::ModeratelyFeminine => "moderately feminine-leaning",
            Self::StronglyFeminine => "strongly feminine-leaning",
        }
    }
}

impl fmt::Display for Leaning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display marker attached to a weighted token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    StrongMasculine,
    ModerateMasculine,
    StrongFeminine,
    ModerateFeminine,
}

impl Marker {
    /// Marker for a token weight; zero-weight tokens carry none.
    #[must_use]
    pub fn from_weight(weight: f32) -> Option<Self> {
        if weight > 0.0 {
            Some(if weight >= 1.0 {
                Self::StrongMasculine
            } else {
                Self::ModerateMasculine
            })
        } else if weight < 0.0 {
            Some(if weight <= -1.0 {
                Self::StrongFeminine
            } else {
                Self::ModerateFeminine
            })
        } else {
            None
        }
    }
}

/// One scored token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenScore {
    pub word: String,
    pub weight: f32,
    pub found: bool,
    pub marker: Option<Marker>,
}

/// Full report for one analyzed text.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct LexicalReport {
    pub tokens: Vec<TokenScore>,
    pub overall: f32,
    pub leaning: Option<Leaning>,
}

/// Immutable token-to-weight mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    weights: HashMap<String, f32>,
}

impl WeightTable {
    /// The built-in table shipped with the simulation.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static TABLE: Lazy<WeightTable> = Lazy::new(|| WeightTable {
            weights: BUILTIN_WEIGHTS
                .iter()
                .map(|(token, weight)| ((*token).to_string(), *weight))
                .collect(),
        });
        &TABLE
    }

    /// Load a replacement table from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a token map.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let weights: HashMap<String, f32> = serde_json::from_str(json)?;
        Ok(Self { weights })
    }

    /// Check every weight against the legal alphabet.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-alphabet entry found.
    pub fn validate(&self) -> Result<(), LexiconError> {
        for (token, weight) in &self.weights {
            let legal = WEIGHT_ALPHABET
                .iter()
                .any(|allowed| (allowed - weight).abs() < f32::EPSILON);
            if !legal {
                return Err(LexiconError::InvalidWeight {
                    token: token.clone(),
                    weight: *weight,
                });
            }
        }
        Ok(())
    }

    /// Weight for a lowercase token, if present.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<f32> {
        self.weights.get(token).copied()
    }

    /// Number of entries in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Score a text: lowercase, split on whitespace runs, sum weights.
    #[must_use]
    pub fn analyze(&self, text: &str) -> LexicalReport {
        let lowered = text.to_lowercase();
        let tokens: Vec<TokenScore> = lowered
            .split_whitespace()
            .map(|word| {
                let found = self.lookup(word);
                let weight = found.unwrap_or(0.0);
                TokenScore {
                    word: word.to_string(),
                    weight,
                    found: found.is_some(),
                    marker: Marker::from_weight(weight),
                }
            })
            .collect();
        let overall: f32 = tokens.iter().map(|token| token.weight).sum();
        let leaning = if tokens.is_empty() {
            None
        } else {
            Some(Leaning::from_score(overall))
        };
        LexicalReport {
            tokens,
            overall,
            leaning,
        }
    }
}

/// Interactive wrapper re-scoring on every text change.
#[derive(Debug, Clone)]
pub struct LexiconSim {
    input: String,
    report: LexicalReport,
    prompts: PromptRotation,
}

impl Default for LexiconSim {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconSim {
    /// Create an empty analyzer over the built-in table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            input: String::new(),
            report: LexicalReport::default(),
            prompts: PromptRotation::with_default_interval(PROMPTS),
        }
    }

    /// Replace the input text and re-score it.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.report = WeightTable::builtin().analyze(text);
    }

    /// Advance the prompt rotation.
    pub fn advance(&mut self, elapsed: Duration) {
        self.prompts.advance(elapsed);
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub const fn report(&self) -> &LexicalReport {
        &self.report
    }

    #[must_use]
    pub const fn prompts(&self) -> &PromptRotation {
        &self.prompts
    }
}

/// Built-in token weights: masculine-leaning positive, feminine-leaning
/// negative, explicitly neutral zero.
#[rustfmt::skip]
const BUILTIN_WEIGHTS: &[(&str, f32)] = &[
    // Masculine: pronouns and basic terms
    ("he", 1.0), ("his", 1.0), ("him", 1.0), ("himself", 1.0), ("hes", 1.0),
    ("man", 1.0), ("boy", 1.0), ("male", 1.0), ("masculine", 1.0), ("manly", 1.0),
    ("gentleman", 1.0), ("fellow", 1.0), ("chap", 1.0), ("guy", 1.0), ("dude", 1.0),
    ("lad", 1.0), ("bloke", 1.0), ("gent", 1.0), ("boys", 1.0), ("men", 1.0),
    // Masculine: family and relationship roles
    ("father", 1.0), ("brother", 1.0), ("son", 1.0), ("grandfather", 1.0),
    ("uncle", 1.0), ("nephew", 1.0), ("husband", 1.0), ("bachelor", 1.0),
    ("groom", 1.0), ("widower", 1.0), ("stepfather", 1.0), ("godfather", 1.0),
    ("patriarch", 1.0), ("grandpa", 1.0), ("dad", 1.0), ("daddy", 1.0),
    ("papa", 1.0), ("pop", 1.0), ("pops", 1.0), ("stepdad", 1.0),
    ("stepson", 1.0), ("stepbrother", 1.0), ("father_in_law", 1.0),
    ("brother_in_law", 1.0), ("son_in_law", 1.0), ("grandson", 1.0),
    ("great_grandfather", 1.0), ("great_uncle", 1.0),
    // Masculine: titles and honorifics
    ("mr", 1.0), ("sir", 1.0), ("gentlemans", 1.0), ("king", 1.0),
    ("prince", 1.0), ("lord", 1.0), ("duke", 1.0), ("emperor", 1.0),
    ("baron", 1.0), ("count", 1.0), ("knight", 1.0), ("esquire", 1.0),
    ("master", 1.0), ("his_majesty", 1.0), ("his_highness", 1.0),
    ("his_excellency", 1.0), ("his_honor", 1.0), ("sultan", 1.0),
    ("raja", 1.0), ("kaiser", 1.0), ("tsar", 1.0), ("viceroy", 1.0),
    ("marquis", 1.0), ("earl", 1.0), ("viscount", 1.0), ("archduke", 1.0),
    // Masculine: traditionally gendered professions
    ("businessman", 1.0), ("chairman", 1.0), ("salesman", 1.0), ("craftsman", 1.0),
    ("foreman", 1.0), ("councilman", 1.0), ("policeman", 1.0), ("fireman", 1.0),
    ("mailman", 1.0), ("workman", 1.0), ("tradesman", 1.0), ("serviceman", 1.0),
    ("alderman", 1.0), ("assemblyman", 1.0), ("committeeman", 1.0),
    ("congressman", 1.0), ("doorman", 1.0), ("fisherman", 1.0),
    ("handyman", 1.0), ("huntsman", 1.0), ("journeyman", 1.0),
    ("lineman", 1.0), ("shipman", 1.0), ("spokesman", 1.0),
    ("weatherman", 1.0), ("woodsman", 1.0), ("yeoman", 1.0),
    // Leadership and authority
    ("manager", 0.5), ("boss", 0.5), ("leader", 0.5), ("executive", 0.5),
    ("ceo", 0.5), ("director", 0.5), ("president", 0.5), ("chief", 0.5),
    ("supervisor", 0.5), ("administrator", 0.5), ("commander", 0.5),
    ("chairmans", 1.0), ("overlord", 0.5), ("taskmaster", 0.5),
    ("overseer", 0.5), ("superintendent", 0.5), ("principal", 0.5),
    ("dean", 0.5), ("provost", 0.5), ("chancellor", 0.5),
    ("magistrate", 0.5), ("commissioner", 0.5), ("governor", 0.5),
    // STEM and technical
    ("engineer", 0.5), ("scientist", 0.5), ("researcher", 0.5),
    ("programmer", 0.5), ("developer", 0.5), ("architect", 0.5),
    ("analyst", 0.5), ("technician", 0.5), ("mathematician", 0.5),
    ("physicist", 0.5), ("chemist", 0.5), ("biologist", 0.5),
    ("astronomer", 0.5), ("geologist", 0.5), ("statistician", 0.5),
    // Trades and manual labor
    ("carpenter", 1.0), ("plumber", 1.0), ("electrician", 1.0), ("blacksmith", 1.0),
    ("mason", 1.0), ("welder", 1.0), ("machinist", 1.0), ("mechanic", 1.0),
    ("roofer", 1.0), ("bricklayer", 1.0), ("plasterer", 1.0), ("glazier", 1.0),
    ("pipefitter", 1.0), ("steelworker", 1.0), ("miner", 1.0), ("logger", 1.0),
    ("builder", 1.0), ("construction_worker", 1.0), ("landscaper", 0.5),
    ("painter", 0.5), ("gardener", 0.5), ("janitor", 0.5),
    // Military and security
    ("soldier", 1.0), ("warrior", 1.0), ("guard", 0.5), ("captain", 0.5),
    ("general", 0.5), ("admiral", 0.5), ("colonel", 0.5), ("sergeant", 0.5),
    ("lieutenant", 0.5), ("major", 0.5), ("commanders", 0.5),
    ("trooper", 0.5), ("cadet", 0.5), ("recruit", 0.5),
    ("infantryman", 1.0), ("airman", 1.0), ("seaman", 1.0), ("marine", 0.5),
    ("paratrooper", 0.5), ("ranger", 0.5), ("sniper", 0.5),
    // Sports and athletics
    ("sportsman", 1.0), ("athlete", 0.5), ("player", 0.5), ("coach", 0.5),
    ("quarterback", 0.5), ("pitcher", 0.5), ("defender", 0.5),
    ("striker", 0.5), ("forward", 0.5), ("linebacker", 0.5),
    ("wrestler", 0.5), ("boxer", 0.5), ("fighter", 0.5),
    ("champion", 0.5), ("competitor", 0.5), ("olympian", 0.5),
    // Masculine-coded character traits
    ("strong", 0.5), ("brave", 0.5), ("tough", 0.5), ("aggressive", 0.5),
    ("ambitious", 0.5), ("competitive", 0.5), ("confident", 0.5),
    ("rational", 0.5), ("logical", 0.5), ("stoic", 0.5), ("stern", 0.5),
    ("assertive", 0.5), ("dominant", 0.5), ("powerful", 0.5),
    ("bold", 0.5), ("courageous", 0.5), ("daring", 0.5),
    ("determined", 0.5), ("disciplined", 0.5), ("fearless", 0.5),
    ("fierce", 0.5), ("focused", 0.5), ("forceful", 0.5),
    ("hardheaded", 0.5), ("heroic", 0.5), ("independent", 0.5),
    ("intense", 0.5), ("macho", 1.0), ("mighty", 0.5),
    ("rebellious", 0.5), ("resolute", 0.5), ("self_reliant", 0.5),
    ("stubborn", 0.5), ("tenacious", 0.5), ("unemotional", 0.5),
    // Feminine: pronouns and basic terms
    ("she", -1.0), ("her", -1.0), ("hers", -1.0), ("herself", -1.0),
    ("woman", -1.0), ("girl", -1.0), ("female", -1.0), ("feminine", -1.0),
    ("lady", -1.0), ("gal", -1.0), ("lass", -1.0), ("maiden", -1.0),
    ("women", -1.0), ("girls", -1.0), ("ladies", -1.0), ("females", -1.0),
    // Feminine: family and relationship roles
    ("mother", -1.0), ("sister", -1.0), ("daughter", -1.0), ("grandmother", -1.0),
    ("aunt", -1.0), ("niece", -1.0), ("wife", -1.0), ("bride", -1.0),
    ("widow", -1.0), ("stepmother", -1.0), ("godmother", -1.0),
    ("matriarch", -1.0), ("grandma", -1.0), ("mom", -1.0), ("mommy", -1.0),
    ("mama", -1.0), ("stepmom", -1.0), ("stepdaughter", -1.0),
    ("stepsister", -1.0), ("mother_in_law", -1.0), ("sister_in_law", -1.0),
    ("daughter_in_law", -1.0), ("granddaughter", -1.0),
    ("great_grandmother", -1.0), ("great_aunt", -1.0),
    // Feminine: titles and honorifics
    ("mrs", -1.0), ("miss", -1.0), ("ms", -1.0), ("ladys", -1.0), ("madam", -1.0),
    ("queen", -1.0), ("princess", -1.0), ("duchess", -1.0), ("empress", -1.0),
    ("baroness", -1.0), ("countess", -1.0), ("dame", -1.0),
    ("her_majesty", -1.0), ("her_highness", -1.0), ("her_excellency", -1.0),
    ("her_honor", -1.0), ("sultana", -1.0), ("rani", -1.0),
    ("tsarina", -1.0), ("marchioness", -1.0), ("viscountess", -1.0),
    ("archduchess", -1.0), ("dowager", -1.0),
    // Feminine: traditionally gendered professions
    ("businesswoman", -1.0), ("chairwoman", -1.0), ("saleswoman", -1.0),
    ("waitress", -1.0), ("actress", -1.0), ("stewardess", -1.0),
    ("seamstress", -1.0), ("hostess", -1.0), ("governess", -1.0),
    ("authoress", -1.0), ("poetess", -1.0), ("comedienne", -1.0),
    ("ballerina", -1.0), ("majorette", -1.0), ("usherette", -1.0),
    // Care and service roles
    ("nurse", -1.0), ("teacher", -0.5), ("caregiver", -1.0), ("nanny", -1.0),
    ("babysitter", -0.5), ("assistant", -0.5), ("secretary", -1.0),
    ("receptionist", -0.5), ("counselor", -0.5), ("therapist", -0.5),
    ("midwife", -1.0), ("doula", -1.0), ("dietitian", -0.5),
    ("social_worker", -0.5), ("librarian", -0.5),
    ("kindergarten_teacher", -1.0), ("daycare_worker", -1.0),
    // Domestic and household
    ("homemaker", -1.0), ("housekeeper", -1.0), ("maid", -1.0), ("cook", -0.5),
    ("cleaner", -0.5), ("servant", -0.5), ("decorator", -0.5),
    ("housewife", -1.0), ("domestic", -1.0), ("laundress", -1.0),
    ("charwoman", -1.0), ("scullery_maid", -1.0), ("parlor_maid", -1.0),
    ("kitchen_maid", -1.0), ("chambermaid", -1.0),
    // Beauty, fashion, appearance work
    ("beautician", -1.0), ("hairdresser", -0.5), ("stylist", -0.5),
    ("cosmetologist", -1.0), ("manicurist", -1.0), ("model", -0.5),
    ("fashionista", -1.0), ("designer", -0.5), ("makeup_artist", -0.5),
    ("esthetician", -1.0), ("fashion_consultant", -0.5),
    ("personal_shopper", -0.5), ("beauty_advisor", -1.0),
    ("image_consultant", -0.5), ("wedding_planner", -0.5),
    // Arts and creative
    ("dancer", -0.5), ("singer", -0.5), ("artist", -0.5), ("writer", -0.5),
    ("poet", -0.5), ("musician", -0.5), ("performer", -0.5),
    ("actresss", -1.0), ("choreographer", -0.5), ("curator", -0.5),
    ("illustrator", -0.5), ("jewelry_maker", -0.5),
    ("seamstresss", -1.0), ("quilter", -1.0), ("weaver", -0.5),
    ("pottery_maker", -0.5), ("florist", -0.5),
    // Feminine-coded character traits
    ("caring", -0.5), ("nurturing", -1.0), ("loving", -0.5), ("gentle", -0.5),
    ("emotional", -0.5), ("sensitive", -0.5), ("empathetic", -0.5),
    ("graceful", -0.5), ("delicate", -0.5), ("sweet", -0.5),
    ("compassionate", -0.5), ("supportive", -0.5), ("soft", -0.5),
    ("affectionate", -0.5), ("cheerful", -0.5), ("dainty", -1.0),
    ("demure", -1.0), ("diplomatic", -0.5), ("feminines", -1.0),
    ("flirtatious", -0.5), ("gentles", -0.5), ("gracious", -0.5),
    ("helpful", -0.5), ("intuitive", -0.5), ("kind", -0.5),
    ("maternal", -1.0), ("modest", -0.5), ("passive", -0.5),
    ("patient", -0.5), ("peaceful", -0.5), ("romantic", -0.5),
    ("sentimental", -0.5), ("shy", -0.5), ("sympathetic", -0.5),
    ("tender", -0.5), ("understanding", -0.5), ("warm", -0.5),
    // Activities and interests
    ("shopping", -0.5), ("cooking", -0.5), ("cleaning", -0.5),
    ("sewing", -1.0), ("knitting", -1.0), ("crafting", -0.5),
    ("gardening", -0.5), ("decorating", -0.5), ("baking", -0.5),
    ("embroidery", -1.0), ("crochet", -1.0), ("scrapbooking", -0.5),
    ("flower_arranging", -0.5), ("interior_design", -0.5),
    ("pottery", -0.5), ("quilting", -1.0), ("needlework", -1.0),
    // Appearance adjectives
    ("beautiful", -0.5), ("pretty", -1.0), ("lovely", -0.5),
    ("elegant", -0.5), ("attractive", -0.5), ("charming", -0.5),
    ("gorgeous", -0.5), ("fashionable", -0.5), ("gracefuls", -0.5),
    ("cute", -0.5), ("daintys", -1.0), ("delicates", -0.5),
    ("femininess", -1.0), ("glamorous", -0.5), ("petite", -1.0),
    ("radiant", -0.5), ("slender", -0.5), ("stylish", -0.5),
    // Neutral: basic terms
    ("they", 0.0), ("their", 0.0), ("them", 0.0), ("themselves", 0.0),
    ("person", 0.0), ("individual", 0.0), ("human", 0.0), ("people", 0.0),
    // Neutral: occupational
    ("professional", 0.0), ("employee", 0.0), ("worker", 0.0), ("staff", 0.0),
    ("specialist", 0.0), ("consultant", 0.0), ("analysts", 0.0),
    ("representative", 0.0), ("coordinator", 0.0), ("associate", 0.0),
    ("expert", 0.0), ("assistants", 0.0), ("clerk", 0.0), ("officer", 0.0),
    ("administrators", 0.0), ("managers", 0.0), ("supervisors", 0.0),
    ("executives", 0.0), ("directors", 0.0), ("presidents", 0.0),
    // Neutral: academic
    ("student", 0.0), ("scholar", 0.0), ("researchers", 0.0), ("academic", 0.0),
    ("professor", 0.0), ("instructor", 0.0), ("educator", 0.0),
    ("teachers", 0.0), ("learner", 0.0), ("pupil", 0.0), ("graduate", 0.0),
    // Neutral: social and community
    ("citizen", 0.0), ("resident", 0.0), ("neighbor", 0.0), ("member", 0.0),
    ("volunteer", 0.0), ("participant", 0.0), ("guest", 0.0),
    ("visitor", 0.0), ("customer", 0.0), ("client", 0.0), ("patron", 0.0),
    // Neutral: relationship and family
    ("spouse", 0.0), ("partner", 0.0), ("parent", 0.0), ("child", 0.0),
    ("sibling", 0.0), ("relative", 0.0), ("friend", 0.0), ("colleague", 0.0),
    ("companion", 0.0), ("associates", 0.0), ("peer", 0.0), ("ally", 0.0),
    // Neutral: character
    ("intelligent", 0.0), ("creative", 0.0), ("skilled", 0.0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nurse_example_is_neutral() {
        let report = WeightTable::builtin().analyze("he is a nurse");
        let words: Vec<(&str, f32, bool)> = report
            .tokens
            .iter()
            .map(|token| (token.word.as_str(), token.weight, token.found))
            .collect();
        assert_eq!(
            words,
            vec![
                ("he", 1.0, true),
                ("is", 0.0, false),
                ("a", 0.0, false),
                ("nurse", -1.0, true),
            ]
        );
        assert!((report.overall - 0.0).abs() < f32::EPSILON);
        assert_eq!(report.leaning, Some(Leaning::Neutral));
    }

    #[test]
    fn leaning_bands_use_fixed_thresholds() {
        assert_eq!(Leaning::from_score(2.5), Leaning::StronglyMasculine);
        assert_eq!(Leaning::from_score(1.0), Leaning::ModeratelyMasculine);
        assert_eq!(Leaning::from_score(0.5), Leaning::Neutral);
        assert_eq!(Leaning::from_score(-0.5), Leaning::Neutral);
        assert_eq!(Leaning::from_score(-1.0), Leaning::ModeratelyFeminine);
        assert_eq!(Leaning::from_score(-2.5), Leaning::StronglyFeminine);
    }

    #[test]
    fn markers_follow_weight_magnitude() {
        assert_eq!(Marker::from_weight(1.0), Some(Marker::StrongMasculine));
        assert_eq!(Marker::from_weight(0.5), Some(Marker::ModerateMasculine));
        assert_eq!(Marker::from_weight(-1.0), Some(Marker::StrongFeminine));
        assert_eq!(Marker::from_weight(-0.5), Some(Marker::ModerateFeminine));
        assert_eq!(Marker::from_weight(0.0), None);
    }

    #[test]
    fn tokenizing_lowercases_and_splits_runs() {
        let report = WeightTable::builtin().analyze("  He\t\tIS   A  Nurse  ");
        assert_eq!(report.tokens.len(), 4);
        assert_eq!(report.tokens[0].word, "he");
        assert_eq!(report.leaning, Some(Leaning::Neutral));
    }

    #[test]
    fn analysis_is_idempotent() {
        let table = WeightTable::builtin();
        let text = "the strong father and his caring mother";
        assert_eq!(table.analyze(text), table.analyze(text));
    }

    #[test]
    fn builtin_table_passes_validation() {
        let table = WeightTable::builtin();
        assert!(table.validate().is_ok());
        assert!(table.len() > 300);
    }

    #[test]
    fn validation_rejects_out_of_alphabet_weights() {
        let table = WeightTable::from_json(r#"{"odd": 0.7}"#).unwrap();
        assert!(matches!(
            table.validate(),
            Err(LexiconError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn sim_rescores_on_input_change() {
        let mut sim = LexiconSim::new();
        assert!(sim.report().tokens.is_empty());
        sim.set_input("she is brave");
        assert_eq!(sim.report().tokens.len(), 3);
        assert!((sim.report().overall - (-0.5)).abs() < f32::EPSILON);
        sim.set_input("");
        assert!(sim.report().tokens.is_empty());
        assert_eq!(sim.report().leaning, None);
    }
}
