//! Prompt routing.
//!
//! Evocative prompts ("glowing hot coals") match a character profile and
//! get rule-based guardrails: the profile knows which engines fit the
//! character and which would break it. Prompts leaning on real-world
//! references (artists, studios, hardware) route knowledge-based, where
//! the model's own associations are trusted without a deny list.

use crate::catalog::{self, EngineId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRoute {
    RuleBased(&'static CharacterProfile),
    KnowledgeBased,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CharacterProfile {
    pub name: &'static str,
    /// Single words match whole tokens, phrases match as substrings.
    pub triggers: &'static [&'static str],
    pub preferred: &'static [EngineId],
    pub forbidden: &'static [EngineId],
    /// Vibe line used when the blueprint has to be derived without the LLM.
    pub vibe: &'static str,
}

impl CharacterProfile {
    pub fn is_forbidden(&self, id: EngineId) -> bool {
        self.forbidden.contains(&id)
    }
}

pub static PROFILES: &[CharacterProfile] = &[
    CharacterProfile {
        name: "molten",
        triggers: &[
            "hot coals", "molten", "lava", "burning", "scorched", "fire", "inferno", "embers",
            "furnace",
        ],
        preferred: &[
            catalog::MUFF_FUZZ,
            catalog::VINTAGE_TUBE_PREAMP,
            catalog::LADDER_FILTER,
            catalog::CLASSIC_COMPRESSOR,
            catalog::MULTIBAND_SATURATOR,
        ],
        forbidden: &[
            catalog::SHIMMER_REVERB,
            catalog::TAPE_ECHO,
            catalog::SPECTRAL_FREEZE,
        ],
        vibe: "searing saturated heat, dry and aggressive",
    },
    CharacterProfile {
        name: "underwater",
        triggers: &[
            "underwater", "submerged", "ocean", "deep sea", "drowned", "abyss", "sunken",
        ],
        preferred: &[
            catalog::LADDER_FILTER,
            catalog::STEREO_CHORUS,
            catalog::BUCKET_BRIGADE_DELAY,
            catalog::PLATE_REVERB,
            catalog::VINTAGE_OPTO_COMPRESSOR,
        ],
        forbidden: &[catalog::HARMONIC_EXCITER, catalog::BIT_CRUSHER],
        vibe: "murky filtered depths in slow motion",
    },
    CharacterProfile {
        name: "frozen",
        triggers: &[
            "frozen", "ice", "icy", "glacial", "arctic", "winter", "crystalline", "frost",
        ],
        preferred: &[
            catalog::SPECTRAL_FREEZE,
            catalog::SHIMMER_REVERB,
            catalog::DIGITAL_DELAY,
            catalog::PARAMETRIC_EQ,
            catalog::STEREO_WIDENER,
        ],
        forbidden: &[
            catalog::VINTAGE_TUBE_PREAMP,
            catalog::MUFF_FUZZ,
            catalog::TAPE_ECHO,
        ],
        vibe: "brittle sparkling stillness",
    },
    CharacterProfile {
        name: "cathedral",
        triggers: &[
            "cathedral", "church", "sacred", "choir", "monastery", "hallowed", "liturgy",
        ],
        preferred: &[
            catalog::CONVOLUTION_REVERB,
            catalog::SHIMMER_REVERB,
            catalog::INTELLIGENT_HARMONIZER,
            catalog::VINTAGE_OPTO_COMPRESSOR,
        ],
        forbidden: &[catalog::BIT_CRUSHER, catalog::BUFFER_REPEAT],
        vibe: "vast consecrated stone air",
    },
    CharacterProfile {
        name: "worn tape",
        triggers: &[
            "cassette", "reel to reel", "worn tape", "tape machine", "four track", "dictaphone",
        ],
        preferred: &[
            catalog::TAPE_ECHO,
            catalog::VINTAGE_TUBE_PREAMP,
            catalog::VINTAGE_OPTO_COMPRESSOR,
            catalog::VINTAGE_CONSOLE_EQ,
        ],
        forbidden: &[catalog::DIGITAL_DELAY, catalog::BIT_CRUSHER],
        vibe: "saturated flutter and rounded highs",
    },
    CharacterProfile {
        name: "metal",
        triggers: &["metal", "djent", "brutal", "chug", "high gain", "thrash"],
        preferred: &[
            catalog::NOISE_GATE,
            catalog::RODENT_DISTORTION,
            catalog::PARAMETRIC_EQ,
            catalog::CLASSIC_COMPRESSOR,
        ],
        forbidden: &[catalog::SHIMMER_REVERB, catalog::GRANULAR_CLOUD],
        vibe: "tight percussive aggression",
    },
    CharacterProfile {
        name: "dreamy",
        triggers: &[
            "dreamy", "ethereal", "floating", "heavenly", "angelic", "celestial", "ambient pad",
            "weightless",
        ],
        preferred: &[
            catalog::SHIMMER_REVERB,
            catalog::DIMENSION_EXPANDER,
            catalog::STEREO_CHORUS,
            catalog::VINTAGE_OPTO_COMPRESSOR,
        ],
        forbidden: &[
            catalog::RODENT_DISTORTION,
            catalog::MUFF_FUZZ,
            catalog::NOISE_GATE,
        ],
        vibe: "weightless luminous wash",
    },
    CharacterProfile {
        name: "robotic",
        triggers: &["robot", "robotic", "android", "mechanical", "cyborg", "automaton"],
        preferred: &[
            catalog::RING_MODULATOR,
            catalog::PHASED_VOCODER,
            catalog::BIT_CRUSHER,
            catalog::COMB_RESONATOR,
        ],
        forbidden: &[catalog::SPRING_REVERB, catalog::VINTAGE_TUBE_PREAMP],
        vibe: "cold precise machine articulation",
    },
    CharacterProfile {
        name: "haunted",
        triggers: &[
            "haunted", "ghost", "ghostly", "eerie", "sinister", "horror", "graveyard", "seance",
        ],
        preferred: &[
            catalog::FREQUENCY_SHIFTER,
            catalog::SPECTRAL_GATE,
            catalog::MAGNETIC_DRUM_ECHO,
            catalog::PLATE_REVERB,
        ],
        forbidden: &[catalog::K_STYLE_OVERDRIVE],
        vibe: "unsettled hollow presence",
    },
    CharacterProfile {
        name: "funky",
        triggers: &["funk", "funky", "wah", "clav", "groove", "syncopated"],
        preferred: &[
            catalog::ENVELOPE_FILTER,
            catalog::CLASSIC_COMPRESSOR,
            catalog::ANALOG_PHASER,
            catalog::VINTAGE_CONSOLE_EQ,
        ],
        forbidden: &[catalog::SHIMMER_REVERB, catalog::SPECTRAL_FREEZE],
        vibe: "snappy syncopated bounce",
    },
];

/// Picks the route for a prompt. The profile with the most trigger hits
/// wins; table order breaks ties, no hits routes knowledge-based.
pub fn route(prompt: &str) -> PromptRoute {
    let normalized = prompt.to_lowercase();
    let words: Vec<&str> = normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let mut best: Option<(&'static CharacterProfile, usize)> = None;
    for profile in PROFILES {
        let hits = profile
            .triggers
            .iter()
            .filter(|t| trigger_matches(t, &normalized, &words))
            .count();
        if hits > 0 && best.map(|(_, h)| hits > h).unwrap_or(true) {
            best = Some((profile, hits));
        }
    }
    match best {
        Some((profile, _)) => PromptRoute::RuleBased(profile),
        None => PromptRoute::KnowledgeBased,
    }
}

fn trigger_matches(trigger: &str, normalized: &str, words: &[&str]) -> bool {
    if trigger.contains(' ') {
        normalized.contains(trigger)
    } else {
        words.contains(&trigger)
    }
}
