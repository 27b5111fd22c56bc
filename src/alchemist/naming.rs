//! Preset naming.
//!
//! Names are adjective plus noun, the adjective pool picked from mood
//! words in the vibe text and the noun pool from the chain's dominant
//! category. A small ring of recent names biases repeated calls toward
//! variety without guaranteeing uniqueness.

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::Rng;

use crate::catalog::EngineCategory;

const RECENT_CAPACITY: usize = 8;
const REROLL_ATTEMPTS: usize = 10;

struct MoodPool {
    cues: &'static [&'static str],
    adjectives: &'static [&'static str],
}

static MOOD_POOLS: &[MoodPool] = &[
    MoodPool {
        cues: &["warm", "vintage", "tape", "tube", "cozy", "nostalgic"],
        adjectives: &["Warm", "Golden", "Amber", "Dusty", "Honeyed"],
    },
    MoodPool {
        cues: &["dark", "murky", "deep", "shadow", "night", "hollow"],
        adjectives: &["Midnight", "Obsidian", "Shadowed", "Dusky", "Charcoal"],
    },
    MoodPool {
        cues: &["bright", "crisp", "sparkle", "glass", "shimmer", "crystal"],
        adjectives: &["Crystal", "Gleaming", "Silver", "Prismatic", "Radiant"],
    },
    MoodPool {
        cues: &["aggressive", "heavy", "brutal", "fierce", "molten", "searing", "hot"],
        adjectives: &["Scorched", "Feral", "Molten", "Jagged", "Iron"],
    },
    MoodPool {
        cues: &["dream", "float", "ethereal", "soft", "ambient", "weightless", "luminous"],
        adjectives: &["Velvet", "Drifting", "Hazy", "Floating", "Pale"],
    },
];

static FALLBACK_ADJECTIVES: &[&str] = &["Electric", "Vivid", "Hidden", "Wandering", "Curious"];

fn nouns_for(category: EngineCategory) -> &'static [&'static str] {
    match category {
        EngineCategory::Dynamics => &["Grip", "Pulse", "Pressure", "Hold"],
        EngineCategory::Eq => &["Contour", "Spectrum", "Balance", "Curve"],
        EngineCategory::Filter => &["Sweep", "Current", "Undertow", "Resonance"],
        EngineCategory::Distortion => &["Furnace", "Ember", "Growl", "Circuit"],
        EngineCategory::Modulation => &["Orbit", "Swirl", "Tide", "Carousel"],
        EngineCategory::Pitch => &["Harmony", "Interval", "Mirror", "Choir"],
        EngineCategory::Delay => &["Echo", "Canyon", "Repeater", "Horizon"],
        EngineCategory::Reverb => &["Cathedral", "Chamber", "Bloom", "Atmosphere"],
        EngineCategory::Spatial => &["Panorama", "Expanse", "Field", "Diorama"],
        EngineCategory::Special => &["Specter", "Flux", "Anomaly", "Prism"],
        EngineCategory::Utility => &["Foundation", "Anchor", "Keel", "Baseline"],
    }
}

fn adjectives_for(vibe: &str) -> &'static [&'static str] {
    let normalized = vibe.to_lowercase();
    for pool in MOOD_POOLS {
        if pool.cues.iter().any(|cue| normalized.contains(cue)) {
            return pool.adjectives;
        }
    }
    FALLBACK_ADJECTIVES
}

pub struct NameGenerator {
    recent: Mutex<VecDeque<String>>,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self {
            recent: Mutex::new(VecDeque::with_capacity(RECENT_CAPACITY)),
        }
    }

    pub fn generate(&self, vibe: &str, dominant: EngineCategory) -> String {
        let adjectives = adjectives_for(vibe);
        let nouns = nouns_for(dominant);
        let mut rng = rand::rng();

        let mut recent = match self.recent.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut name = String::new();
        for _ in 0..REROLL_ATTEMPTS {
            let adjective = adjectives[rng.random_range(0..adjectives.len())];
            let noun = nouns[rng.random_range(0..nouns.len())];
            name = format!("{adjective} {noun}");
            if !recent.contains(&name) {
                break;
            }
        }
        if recent.len() == RECENT_CAPACITY {
            recent.pop_front();
        }
        recent.push_back(name.clone());
        name
    }
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_words_pick_the_matching_pool() {
        assert!(adjectives_for("warm dusty tape haze").contains(&"Amber"));
        assert!(adjectives_for("searing molten leads").contains(&"Molten"));
        assert!(adjectives_for("completely uncategorizable").contains(&"Electric"));
    }

    #[test]
    fn names_are_adjective_noun_pairs() {
        let names = NameGenerator::new();
        let name = names.generate("dark murky dub", EngineCategory::Delay);
        let parts: Vec<&str> = name.split(' ').collect();
        assert_eq!(parts.len(), 2);
        assert!(MOOD_POOLS[1].adjectives.contains(&parts[0]));
        assert!(nouns_for(EngineCategory::Delay).contains(&parts[1]));
    }

    #[test]
    fn consecutive_names_avoid_repeats() {
        let names = NameGenerator::new();
        let first = names.generate("warm", EngineCategory::Reverb);
        let second = names.generate("warm", EngineCategory::Reverb);
        assert_ne!(first, second);
    }

    #[test]
    fn every_category_has_nouns() {
        for category in EngineCategory::ALL {
            assert!(!nouns_for(category).is_empty());
        }
    }
}
