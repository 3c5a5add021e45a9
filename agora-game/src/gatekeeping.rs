//! Content gatekeeping simulation: probabilistic filtering over a stream.
//!
//! A biased generator emits content items into a bounded ring; a quality
//! filter decides which items are visible. Both knobs move at any time, and
//! the filter re-derives visibility for everything still retained.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use crate::rng::RngBundle;
use crate::rotation::PromptRotation;
use crate::runner::SimPhase;
use crate::timer::PeriodicTimer;

/// Most recent items retained by the ring buffer.
pub const RING_CAPACITY: usize = 40;
const GENERATION_INTERVAL: Duration = Duration::from_millis(500);
const BIAS_PIVOT: f64 = 50.0;
const BIAS_MULTIPLIER_FLOOR: f64 = 0.1;

const PROMPTS: &[&str] = &[
    "How does filter strength affect content diversity?",
    "What happens to niche content as bias increases?",
    "Is there a balance between filtering and diversity?",
    "How might this impact emerging voices?",
    "What patterns do you see in suppressed content?",
    "How does bias affect mainstream vs edge content?",
    "What are the long-term effects of high filtering?",
    "How might this shape public discourse?",
];

/// Fixed content categories, ordered by base frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Mainstream,
    Alternative,
    Niche,
    Edge,
}

/// Category order used for sampling and distribution reporting.
pub const CATEGORY_ORDER: [Category; 4] = [
    Category::Mainstream,
    Category::Alternative,
    Category::Niche,
    Category::Edge,
];

impl Category {
    /// Baseline share of generated items before bias is applied.
    #[must_use]
    pub const fn base_frequency(self) -> f64 {
        match self {
            Self::Mainstream => 0.4,
            Self::Alternative => 0.3,
            Self::Niche => 0.2,
            Self::Edge => 0.1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mainstream => "mainstream",
            Self::Alternative => "alternative",
            Self::Niche => "niche",
            Self::Edge => "edge",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Mainstream => 0,
            Self::Alternative => 1,
            Self::Niche => 2,
            Self::Edge => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: u64,
    pub category: Category,
    pub quality: f64,
    pub visible: bool,
}

/// Visible-share of one category for distribution reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub visible_count: usize,
    pub share_pct: f64,
}

/// Derived statistics over the retained ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatekeepingStats {
    pub visible_count: usize,
    pub suppressed_count: usize,
    pub diversity: f64,
    pub distribution: [CategoryShare; 4],
}

/// The gatekeeping state machine.
#[derive(Debug, Clone)]
pub struct GatekeepingSim {
    filter_strength: u8,
    bias_level: u8,
    phase: SimPhase,
    items: VecDeque<ContentItem>,
    next_id: u64,
    generator: PeriodicTimer,
    prompts: PromptRotation,
    rng: RngBundle,
}

impl GatekeepingSim {
    /// Create an idle simulation with both knobs centered.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            filter_strength: 50,
            bias_level: 50,
            phase: SimPhase::Idle,
            items: VecDeque::with_capacity(RING_CAPACITY),
            next_id: 0,
            generator: PeriodicTimer::new(GENERATION_INTERVAL),
            prompts: PromptRotation::with_default_interval(PROMPTS),
            rng: RngBundle::from_user_seed(seed),
        }
    }

    /// Begin (or restart) the stream, pre-filling a full ring.
    pub fn start(&mut self) {
        self.phase = SimPhase::Running;
        self.items.clear();
        for _ in 0..RING_CAPACITY {
            self.push_item();
        }
        self.generator.start();
    }

    /// Stop the stream, retaining items. Idempotent.
    pub fn stop(&mut self) {
        self.generator.cancel();
        self.phase = SimPhase::Idle;
    }

    /// Advance the logical clock: one item per generation tick while running.
    pub fn advance(&mut self, elapsed: Duration) {
        self.prompts.advance(elapsed);
        let ticks = self.generator.advance(elapsed);
        if self.phase != SimPhase::Running {
            return;
        }
        for _ in 0..ticks {
            self.push_item();
        }
    }

    /// Set filter strength, re-deriving visibility for all retained items.
    pub fn set_filter_strength(&mut self, strength: u8) {
        self.filter_strength = strength.min(100);
        let threshold = f64::from(self.filter_strength);
        for item in &mut self.items {
            item.visible = item.quality > threshold;
        }
    }

    /// Set bias level; affects only future draws.
    pub fn set_bias_level(&mut self, bias: u8) {
        self.bias_level = bias.min(100);
    }

    fn push_item(&mut self) {
        let item = self.generate_item();
        if self.items.len() == RING_CAPACITY {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    fn generate_item(&mut self) -> ContentItem {
        let weights = self.category_weights();
        let mut rng = self.rng.content();

        let mut roll = rng.gen_range(0.0..1.0);
        let mut category = Category::Mainstream;
        for (slot, weight) in CATEGORY_ORDER.iter().zip(weights) {
            roll -= weight;
            if roll <= 0.0 {
                category = *slot;
                break;
            }
        }

        let quality = rng.gen_range(0.0..100.0);
        let item = ContentItem {
            id: self.next_id,
            category,
            quality,
            visible: quality > f64::from(self.filter_strength),
        };
        drop(rng);
        self.next_id += 1;
        item
    }

    /// Normalized category distribution after bias skews the baseline.
    fn category_weights(&self) -> [f64; 4] {
        let multiplier = (f64::from(self.bias_level) / BIAS_PIVOT).max(BIAS_MULTIPLIER_FLOOR);
        let mut weights = [0.0; 4];
        for category in CATEGORY_ORDER {
            let base = category.base_frequency();
            weights[category.index()] = if category == Category::Mainstream {
                base * multiplier
            } else {
                base / multiplier
            };
        }
        let total: f64 = weights.iter().sum();
        for weight in &mut weights {
            *weight /= total;
        }
        weights
    }

    /// Derived statistics over the retained ring.
    #[must_use]
    pub fn stats(&self) -> GatekeepingStats {
        let mut visible_by_category = [0usize; 4];
        let mut visible_count = 0usize;
        for item in &self.items {
            if item.visible {
                visible_by_category[item.category.index()] += 1;
                visible_count += 1;
            }
        }

        let diversity = if visible_count == 0 {
            0.0
        } else {
            let target = visible_count as f64 / CATEGORY_ORDER.len() as f64;
            let min_nonzero = visible_by_category
                .iter()
                .copied()
                .filter(|count| *count > 0)
                .min()
                .unwrap_or(0);
            (min_nonzero as f64 / target * 100.0).clamp(0.0, 100.0)
        };

        let distribution = CATEGORY_ORDER.map(|category| {
            let count = visible_by_category[category.index()];
            CategoryShare {
                category,
                visible_count: count,
                share_pct: if visible_count == 0 {
                    0.0
                } else {
                    count as f64 / visible_count as f64 * 100.0
                },
            }
        });

        GatekeepingStats {
            visible_count,
            suppressed_count: self.items.len() - visible_count,
            diversity,
            distribution,
        }
    }

    /// Items from oldest to newest.
    pub fn items(&self) -> impl Iterator<Item = &ContentItem> {
        self.items.iter()
    }

    #[must_use]
    pub const fn filter_strength(&self) -> u8 {
        self.filter_strength
    }

    #[must_use]
    pub const fn bias_level(&self) -> u8 {
        self.bias_level
    }

    #[must_use]
    pub const fn phase(&self) -> SimPhase {
        self.phase
    }

    #[must_use]
    pub const fn prompts(&self) -> &PromptRotation {
        &self.prompts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_prefills_a_full_ring() {
        let mut sim = GatekeepingSim::new(1337);
        sim.start();
        assert_eq!(sim.items().count(), RING_CAPACITY);
        let stats = sim.stats();
        assert_eq!(stats.visible_count + stats.suppressed_count, RING_CAPACITY);
    }

    #[test]
    fn ticks_append_and_evict_beyond_capacity() {
        let mut sim = GatekeepingSim::new(1337);
        sim.start();
        let first_id = sim.items().next().map(|item| item.id);
        sim.advance(Duration::from_millis(1500));
        assert_eq!(sim.items().count(), RING_CAPACITY);
        assert_ne!(sim.items().next().map(|item| item.id), first_id);
    }

    #[test]
    fn zero_filter_makes_everything_visible() {
        let mut sim = GatekeepingSim::new(42);
        sim.set_filter_strength(0);
        sim.start();
        assert!(sim.items().all(|item| item.visible));
        assert_eq!(sim.stats().suppressed_count, 0);
    }

    #[test]
    fn filter_change_rederives_visibility_in_place() {
        let mut sim = GatekeepingSim::new(42);
        sim.start();
        let ids: Vec<u64> = sim.items().map(|item| item.id).collect();
        sim.set_filter_strength(100);
        assert_eq!(sim.stats().visible_count, 0);
        sim.set_filter_strength(0);
        assert_eq!(sim.stats().suppressed_count, 0);
        // Same items, no regeneration
        let after: Vec<u64> = sim.items().map(|item| item.id).collect();
        assert_eq!(ids, after);
    }

    #[test]
    fn stopped_stream_ignores_ticks() {
        let mut sim = GatekeepingSim::new(9);
        sim.start();
        sim.stop();
        let ids: Vec<u64> = sim.items().map(|item| item.id).collect();
        sim.advance(Duration::from_secs(30));
        let after: Vec<u64> = sim.items().map(|item| item.id).collect();
        assert_eq!(ids, after);
    }

    #[test]
    fn identical_seeds_generate_identical_streams() {
        let mut a = GatekeepingSim::new(777);
        let mut b = GatekeepingSim::new(777);
        a.start();
        b.start();
        let left: Vec<(Category, i64)> = a
            .items()
            .map(|item| (item.category, item.quality as i64))
            .collect();
        let right: Vec<(Category, i64)> = b
            .items()
            .map(|item| (item.category, item.quality as i64))
            .collect();
        assert_eq!(left, right);
    }

    #[test]
    fn max_bias_crowds_out_non_mainstream() {
        let mut sim = GatekeepingSim::new(31);
        sim.set_bias_level(100);
        sim.set_filter_strength(0);
        sim.start();
        sim.advance(Duration::from_secs(20));
        let stats = sim.stats();
        let mainstream = stats.distribution[0].visible_count;
        assert!(
            mainstream > RING_CAPACITY / 2,
            "expected mainstream to dominate, got {mainstream}/{RING_CAPACITY}"
        );
    }

    #[test]
    fn diversity_is_full_only_for_equal_nonzero_counts() {
        let mut sim = GatekeepingSim::new(5);
        sim.start();
        // Hand-build a balanced ring: 2 visible of each category
        sim.items.clear();
        for (n, category) in CATEGORY_ORDER.iter().cycle().take(8).enumerate() {
            sim.items.push_back(ContentItem {
                id: n as u64,
                category: *category,
                quality: 90.0,
                visible: true,
            });
        }
        let stats = sim.stats();
        assert!((stats.diversity - 100.0).abs() < f64::EPSILON);

        // Skew one category down: diversity drops below full
        sim.items[0].visible = false;
        let stats = sim.stats();
        assert!(stats.diversity < 100.0);
    }

    #[test]
    fn stats_are_pure() {
        let mut sim = GatekeepingSim::new(12);
        sim.start();
        assert_eq!(sim.stats(), sim.stats());
    }
}
