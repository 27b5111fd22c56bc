//! Explicit engine mentions.
//!
//! When the prompt names an engine outright the final preset must carry
//! it, whatever the model and retrieval decided. This table is matched
//! against the lowercased prompt, deliberately separate from the
//! generation stage's routing triggers, a mention here is a hard
//! requirement rather than a stylistic hint.

use crate::catalog::{self, EngineId};

pub struct RequiredEngineRule {
    /// Single words match whole tokens, phrases match as substrings.
    pub phrase: &'static str,
    pub engine: EngineId,
}

const fn req(phrase: &'static str, engine: EngineId) -> RequiredEngineRule {
    RequiredEngineRule { phrase, engine }
}

pub static REQUIRED_ENGINE_RULES: &[RequiredEngineRule] = &[
    req("spring reverb", catalog::SPRING_REVERB),
    req("spring tank", catalog::SPRING_REVERB),
    req("shimmer", catalog::SHIMMER_REVERB),
    req("plate reverb", catalog::PLATE_REVERB),
    req("gated reverb", catalog::GATED_REVERB),
    req("convolution", catalog::CONVOLUTION_REVERB),
    req("tape echo", catalog::TAPE_ECHO),
    req("tape delay", catalog::TAPE_ECHO),
    req("drum echo", catalog::MAGNETIC_DRUM_ECHO),
    req("bucket brigade", catalog::BUCKET_BRIGADE_DELAY),
    req("analog delay", catalog::BUCKET_BRIGADE_DELAY),
    req("digital delay", catalog::DIGITAL_DELAY),
    req("fuzz", catalog::MUFF_FUZZ),
    req("overdrive", catalog::K_STYLE_OVERDRIVE),
    req("rodent", catalog::RODENT_DISTORTION),
    req("tube preamp", catalog::VINTAGE_TUBE_PREAMP),
    req("tube", catalog::VINTAGE_TUBE_PREAMP),
    req("bitcrusher", catalog::BIT_CRUSHER),
    req("bit crusher", catalog::BIT_CRUSHER),
    req("wave folder", catalog::WAVE_FOLDER),
    req("exciter", catalog::HARMONIC_EXCITER),
    req("chorus", catalog::STEREO_CHORUS),
    req("phaser", catalog::ANALOG_PHASER),
    req("tremolo", catalog::CLASSIC_TREMOLO),
    req("rotary", catalog::ROTARY_SPEAKER),
    req("leslie", catalog::ROTARY_SPEAKER),
    req("ring mod", catalog::RING_MODULATOR),
    req("vocoder", catalog::PHASED_VOCODER),
    req("harmonizer", catalog::INTELLIGENT_HARMONIZER),
    req("pitch shifter", catalog::PITCH_SHIFTER),
    req("doubler", catalog::DETUNE_DOUBLER),
    req("wah", catalog::ENVELOPE_FILTER),
    req("compressor", catalog::CLASSIC_COMPRESSOR),
    req("opto", catalog::VINTAGE_OPTO_COMPRESSOR),
    req("limiter", catalog::MASTERING_LIMITER),
    req("gate", catalog::NOISE_GATE),
    req("granular", catalog::GRANULAR_CLOUD),
    req("freeze", catalog::SPECTRAL_FREEZE),
    req("widener", catalog::STEREO_WIDENER),
    req("vocal formant", catalog::VOCAL_FORMANT_FILTER),
];

/// Engines the prompt explicitly asks for, deduplicated, in rule order.
pub fn required_engines(prompt: &str) -> Vec<EngineId> {
    let normalized = prompt.to_lowercase();
    let words: Vec<&str> = normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let mut found = Vec::new();
    for rule in REQUIRED_ENGINE_RULES {
        let hit = if rule.phrase.contains(' ') {
            normalized.contains(rule.phrase)
        } else {
            words.contains(&rule.phrase)
        };
        if hit && !found.contains(&rule.engine) {
            found.push(rule.engine);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        EngineCatalog, NOISE_GATE, SHIMMER_REVERB, SPRING_REVERB, TAPE_ECHO,
    };

    #[test]
    fn finds_named_engines() {
        let found = required_engines("ambient pad with shimmer reverb and spring reverb");
        assert!(found.contains(&SHIMMER_REVERB));
        assert!(found.contains(&SPRING_REVERB));
    }

    #[test]
    fn gate_needs_a_whole_word() {
        // "gated reverb" must pull in the gated reverb, not the noise gate.
        let found = required_engines("explosive gated reverb drums");
        assert!(!found.contains(&NOISE_GATE));
        assert!(required_engines("a gate before the amp").contains(&NOISE_GATE));
    }

    #[test]
    fn deduplicates_mentions() {
        let found = required_engines("tape echo, more tape delay on the tail");
        assert_eq!(found.iter().filter(|id| **id == TAPE_ECHO).count(), 1);
    }

    #[test]
    fn rules_reference_real_engines() {
        let catalog = EngineCatalog::builtin();
        for rule in REQUIRED_ENGINE_RULES {
            assert!(
                catalog.contains(rule.engine),
                "rule '{}' names unknown engine",
                rule.phrase
            );
        }
    }

    #[test]
    fn plain_prompts_require_nothing() {
        assert!(required_engines("something warm and nostalgic").is_empty());
    }
}
